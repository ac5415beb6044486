//! In-process record store. Records every collaborator call so callers can assert on side effects.

use crate::error::StoreError;
use crate::store::{values_match, Record, RecordQuery, RecordStore};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// One call made against the store, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreCall {
    Records(RecordQuery),
    Update {
        table: String,
        identifier: String,
        id: Value,
        update: Map<String, Value>,
    },
    Delete {
        table: String,
        identifier: String,
        id: Value,
    },
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Record>>,
    calls: Vec<StoreCall>,
}

#[derive(Default)]
pub struct MemoryRecordStore {
    inner: Mutex<Inner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row to `table`. Non-object values are ignored.
    pub fn insert(&self, table: &str, row: Value) {
        if let Value::Object(map) = row {
            self.lock().tables.entry(table.to_string()).or_default().push(map);
        }
    }

    pub fn with_rows(self, table: &str, rows: impl IntoIterator<Item = Value>) -> Self {
        for row in rows {
            self.insert(table, row);
        }
        self
    }

    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn delete_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, StoreCall::Delete { .. }))
            .count()
    }

    pub fn update_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, StoreCall::Update { .. }))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // poisoning is ignored
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn row_matches(row: &Record, column: &str, value: &Value) -> bool {
    values_match(row.get(column).unwrap_or(&Value::Null), value)
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn records(&self, query: &RecordQuery) -> Result<Vec<Record>, StoreError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Records(query.clone()));
        let rows = inner.tables.get(&query.table).map(Vec::as_slice).unwrap_or(&[]);
        let limit = query.limit.map(|n| n as usize).unwrap_or(usize::MAX);
        Ok(rows
            .iter()
            .filter(|row| query.filters.iter().all(|(c, v)| row_matches(row, c, v)))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update_record_by_id(
        &self,
        table: &str,
        identifier: &str,
        id: &Value,
        update: &Map<String, Value>,
    ) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Update {
            table: table.to_string(),
            identifier: identifier.to_string(),
            id: id.clone(),
            update: update.clone(),
        });
        let mut affected = 0;
        if let Some(rows) = inner.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|r| row_matches(r, identifier, id)) {
                for (k, v) in update {
                    row.insert(k.clone(), v.clone());
                }
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn delete_record_by_id(&self, table: &str, identifier: &str, id: &Value) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Delete {
            table: table.to_string(),
            identifier: identifier.to_string(),
            id: id.clone(),
        });
        let Some(rows) = inner.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| !row_matches(r, identifier, id));
        Ok((before - rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn query_update_delete_are_recorded() {
        let store = MemoryRecordStore::new().with_rows(
            "customers",
            [json!({ "id": 7, "name": "Ada" }), json!({ "id": 8, "name": "Bob" })],
        );

        let found = store
            .records(&RecordQuery::new("customers").filter("id", json!("7")))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], json!("Ada"));

        let mut update = Map::new();
        update.insert("name".into(), json!("Ada L."));
        assert_eq!(store.update_record_by_id("customers", "id", &json!("7"), &update).await.unwrap(), 1);
        assert_eq!(store.rows("customers")[0]["name"], json!("Ada L."));

        assert_eq!(store.delete_record_by_id("customers", "id", &json!(8)).await.unwrap(), 1);
        assert_eq!(store.delete_record_by_id("customers", "id", &json!(8)).await.unwrap(), 0);
        assert_eq!(store.rows("customers").len(), 1);

        assert_eq!(store.calls().len(), 4);
        assert_eq!(store.update_calls(), 1);
        assert_eq!(store.delete_calls(), 2);
    }

    #[tokio::test]
    async fn limit_and_unknown_table() {
        let store = MemoryRecordStore::new().with_rows("t", [json!({ "k": 1 }), json!({ "k": 1 })]);
        let q = RecordQuery::new("t").filter("k", json!(1)).limit(1);
        assert_eq!(store.records(&q).await.unwrap().len(), 1);
        assert!(store.records(&RecordQuery::new("missing")).await.unwrap().is_empty());
    }
}
