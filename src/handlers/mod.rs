//! HTTP handlers for schema, login and record deletion.

pub mod auth;
pub mod entity;
pub mod schema;
pub use auth::*;
pub use entity::*;
pub use schema::*;
