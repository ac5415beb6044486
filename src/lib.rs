//! Schema-driven CRUD engine: one generic implementation serving tables described by runtime metadata.
//! Covers primary-key resolution, reference-guarded and soft deletes, tenant capability filtering and login.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod tenant;

pub use config::{load_from_path, load_from_pool, RootCredentials, SchemaRegistry, Settings, TableDefinition};
pub use error::{AppError, ConfigError, StoreError};
pub use routes::{app_router, auth_routes, common_routes, crud_routes};
pub use service::{DeleteService, JwtTokenIssuer};
pub use state::AppState;
pub use store::{ensure_sys_tables, replace_schema_rows, MemoryRecordStore, PgRecordStore, RecordStore};
pub use tenant::{Caller, Principal};
