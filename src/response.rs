//! Response bodies shared by handlers.

use crate::config::TableDefinition;
use axum::{http::StatusCode, Json};
use serde::Serialize;

/// `{ "message": ... }` acknowledgement for mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub message: &'static str,
}

impl Ack {
    pub fn new(message: &'static str) -> Self {
        Ack { message }
    }
}

#[derive(Serialize)]
pub struct SchemaBody {
    pub tables: Vec<TableDefinition>,
}

pub fn ok<T: Serialize>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(body))
}
