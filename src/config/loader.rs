//! Load the schema registry from a JSON file or from `<sys_schema>._sys_tables`.

use crate::config::registry::SchemaRegistry;
use crate::config::types::{SchemaDocument, TableDefinition};
use crate::error::ConfigError;
use crate::store::postgres::qualified_sys_table;
use sqlx::PgPool;
use std::path::Path;

/// Parse a schema document. Accepts `{ "tables": [...] }` or a bare array of tables.
pub fn parse_document(raw: &str) -> Result<SchemaDocument, ConfigError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| ConfigError::Load(e.to_string()))?;
    let doc = if value.is_array() {
        SchemaDocument {
            tables: serde_json::from_value(value).map_err(|e| ConfigError::Load(e.to_string()))?,
        }
    } else {
        serde_json::from_value(value).map_err(|e| ConfigError::Load(e.to_string()))?
    };
    Ok(doc)
}

pub async fn load_from_path(path: &Path) -> Result<SchemaRegistry, ConfigError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let doc = parse_document(&raw)?;
    tracing::info!(path = %path.display(), tables = doc.tables.len(), "schema loaded from file");
    SchemaRegistry::from_document(doc)
}

/// Load tables from `_sys_tables` in insertion order. Tables must already exist (`ensure_sys_tables`).
pub async fn load_from_pool(pool: &PgPool, sys_schema: &str) -> Result<SchemaRegistry, ConfigError> {
    let sql = format!(
        "SELECT payload FROM {} ORDER BY position",
        qualified_sys_table(sys_schema, "_sys_tables")
    );
    tracing::debug!(sql = %sql, "query");
    let rows = sqlx::query_scalar::<_, serde_json::Value>(&sql)
        .fetch_all(pool)
        .await
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in rows {
        let table: TableDefinition = serde_json::from_value(row).map_err(|e| ConfigError::Load(e.to_string()))?;
        tables.push(table);
    }
    tracing::info!(tables = tables.len(), "schema loaded from database");
    SchemaRegistry::from_tables(tables)
}
