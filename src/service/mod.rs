//! Engine services: delete orchestration, integrity guard, soft delete, schema visibility and login.

pub mod audit;
pub mod auth;
pub mod delete;
pub mod integrity;
pub mod soft_delete;
pub mod validation;
pub mod visibility;

#[cfg(test)]
pub(crate) mod fixtures;

pub use audit::{AuditStamper, BasicAuditStamper};
pub use auth::{
    BcryptVerifier, Claims, CredentialAuthenticator, JwtTokenIssuer, LoginOutcome, PasswordVerifier, TokenBundle,
    TokenIssuer,
};
pub use delete::DeleteService;
pub use integrity::{BlockingReference, ReferenceGuard};
pub use soft_delete::SoftDeleteExecutor;
pub use validation::{LoginRequest, RequestValidator};
pub use visibility::visible_schema;

use crate::error::StoreError;
use crate::store::{Record, RecordQuery, RecordStore};
use serde_json::Value;

pub const PRIMARY_KEY_NOT_CONFIGURED: &str = "Primary key not configured";
pub const RECORD_NOT_FOUND: &str = "Record not found";
pub const ARCHIVE_DATA_NOT_FOUND: &str = "Archive data not found";
pub const LINKED_RECORD: &str = "This table is linked to others, so deleting from it isn't allowed directly";
pub const ARCHIVED: &str = "Archived successfully";
pub const DELETED: &str = "Deleted successfully";

pub(crate) async fn fetch_by_id(
    store: &dyn RecordStore,
    table: &str,
    pk: &str,
    id: &str,
) -> Result<Vec<Record>, StoreError> {
    let query = RecordQuery::new(table).filter(pk, Value::String(id.to_string()));
    store.records(&query).await
}
