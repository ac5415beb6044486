//! PostgreSQL record store and the `_sys_tables` schema persistence.

use crate::config::{SchemaRegistry, TableDefinition};
use crate::error::StoreError;
use crate::sql::{delete_by_id, quoted, select_records, update_by_id, QueryBuf};
use crate::store::{Record, RecordQuery, RecordStore};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use std::sync::Arc;

/// Returns schema-qualified name for a `_sys_*` table (e.g. `crud._sys_tables`).
pub fn qualified_sys_table(sys_schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(sys_schema), quoted(table))
}

/// Create the sys schema and `_sys_tables` if missing. Rows keep insertion order in `position`.
pub async fn ensure_sys_tables(pool: &PgPool, sys_schema: &str) -> Result<(), StoreError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(sys_schema)))
        .execute(pool)
        .await?;
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            name TEXT PRIMARY KEY,
            position BIGSERIAL NOT NULL,
            payload JSONB NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        qualified_sys_table(sys_schema, "_sys_tables")
    );
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

/// Replace every stored table definition in one transaction. Returns rows written.
pub async fn replace_schema_rows(
    pool: &PgPool,
    sys_schema: &str,
    tables: &[TableDefinition],
) -> Result<u64, StoreError> {
    let q_table = qualified_sys_table(sys_schema, "_sys_tables");
    let mut tx = pool.begin().await?;
    sqlx::query(&format!("DELETE FROM {}", q_table)).execute(&mut *tx).await?;
    let mut count = 0u64;
    for table in tables {
        let payload = serde_json::to_value(table).map_err(|e| StoreError::Backend(e.to_string()))?;
        sqlx::query(&format!(
            "INSERT INTO {} (name, payload, updated_at) VALUES ($1, $2, NOW())",
            q_table
        ))
        .bind(&table.name)
        .bind(&payload)
        .execute(&mut *tx)
        .await?;
        count += 1;
    }
    tx.commit().await?;
    Ok(count)
}

/// Record store over one PostgreSQL schema. Only tables present in the registry are addressable.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
    schema: String,
    registry: Arc<SchemaRegistry>,
}

impl PgRecordStore {
    pub fn new(pool: PgPool, schema: impl Into<String>, registry: Arc<SchemaRegistry>) -> Self {
        PgRecordStore {
            pool,
            schema: schema.into(),
            registry,
        }
    }

    fn table(&self, name: &str) -> Result<&TableDefinition, StoreError> {
        self.registry
            .table(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let done = query.execute(&self.pool).await?;
        Ok(done.rows_affected())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn records(&self, query: &RecordQuery) -> Result<Vec<Record>, StoreError> {
        let table = self.table(&query.table)?;
        let q = select_records(&self.schema, &table.name, &query.filters, query.limit);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut sql = sqlx::query_scalar::<_, Value>(&q.sql);
        for p in &q.params {
            sql = sql.bind(p.clone());
        }
        let rows = sql.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect())
    }

    async fn update_record_by_id(
        &self,
        table: &str,
        identifier: &str,
        id: &Value,
        update: &Map<String, Value>,
    ) -> Result<u64, StoreError> {
        if update.is_empty() {
            return Ok(0);
        }
        let table = self.table(table)?;
        let q = update_by_id(&self.schema, table, identifier, id, update);
        self.execute(&q).await
    }

    async fn delete_record_by_id(&self, table: &str, identifier: &str, id: &Value) -> Result<u64, StoreError> {
        let table = self.table(table)?;
        let q = delete_by_id(&self.schema, &table.name, identifier, id);
        self.execute(&q).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
