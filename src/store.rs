//! Storage collaborator: equality queries, update by id and delete by id over registry tables.

pub mod memory;
pub mod postgres;

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub use memory::{MemoryRecordStore, StoreCall};
pub use postgres::{ensure_sys_tables, qualified_sys_table, replace_schema_rows, PgRecordStore};

/// One row as returned by storage. The engine only reads identity columns from it.
pub type Record = Map<String, Value>;

/// Unordered equality query: every `(column, value)` pair must match.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordQuery {
    pub table: String,
    pub filters: Vec<(String, Value)>,
    pub limit: Option<u32>,
}

impl RecordQuery {
    pub fn new(table: impl Into<String>) -> Self {
        RecordQuery {
            table: table.into(),
            filters: Vec::new(),
            limit: None,
        }
    }

    pub fn filter(mut self, column: impl Into<String>, value: Value) -> Self {
        self.filters.push((column.into(), value));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn records(&self, query: &RecordQuery) -> Result<Vec<Record>, StoreError>;

    /// Apply `update` to the row whose `identifier` column equals `id`. Returns rows affected.
    async fn update_record_by_id(
        &self,
        table: &str,
        identifier: &str,
        id: &Value,
        update: &Map<String, Value>,
    ) -> Result<u64, StoreError>;

    /// Physically remove the row whose `identifier` column equals `id`. Returns rows affected.
    async fn delete_record_by_id(&self, table: &str, identifier: &str, id: &Value) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Canonical text form used for identity comparison: path id `"7"` equals stored `7`.
/// `None` for JSON null.
pub fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(v.to_string()),
    }
}

/// Identity equality over [`value_text`]; null only equals null.
pub fn values_match(a: &Value, b: &Value) -> bool {
    value_text(a) == value_text(b)
}
