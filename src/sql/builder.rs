//! Builds parameterized SELECT, UPDATE, DELETE for registry tables.

use crate::config::TableDefinition;
use crate::sql::params::PgBindValue;
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> u32 {
        self.params.push(v);
        self.params.len() as u32
    }

    /// `"col"::text = $n`, or `"col" IS NULL` for a null value.
    fn identity_predicate(&mut self, column: &str, value: &Value) -> String {
        match PgBindValue::text_of(value) {
            PgBindValue::Null => format!("{} IS NULL", quoted(column)),
            bind => {
                let n = self.push_param(bind);
                format!("{}::text = ${}", quoted(column), n)
            }
        }
    }
}

/// SELECT rows as JSON objects where every filter matches by text identity.
pub fn select_records(schema: &str, table: &str, filters: &[(String, Value)], limit: Option<u32>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::with_capacity(filters.len());
    for (col, val) in filters {
        where_parts.push(q.identity_predicate(col, val));
    }
    q.sql = format!("SELECT row_to_json(t) FROM {} AS t", qualified_table(schema, table));
    if !where_parts.is_empty() {
        q.sql.push_str(" WHERE ");
        q.sql.push_str(&where_parts.join(" AND "));
    }
    if let Some(n) = limit {
        q.sql.push_str(&format!(" LIMIT {}", n));
    }
    q
}

/// UPDATE by identifier column. Values of fields declaring a `type` are bound as text and cast to it;
/// nulls are written as a literal NULL so the column type decides.
pub fn update_by_id(
    schema: &str,
    table: &TableDefinition,
    identifier: &str,
    id: &Value,
    update: &Map<String, Value>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(update.len());
    for (col, val) in update {
        let data_type = table.field(col).and_then(|f| f.data_type.as_deref());
        let rhs = match (val, data_type) {
            (Value::Null, _) => "NULL".to_string(),
            (_, Some(ty)) => {
                let n = q.push_param(PgBindValue::text_of(val));
                format!("${}::{}", n, ty)
            }
            (_, None) => {
                let n = q.push_param(PgBindValue::from_json(val));
                format!("${}", n)
            }
        };
        sets.push(format!("{} = {}", quoted(col), rhs));
    }
    let predicate = q.identity_predicate(identifier, id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {}",
        qualified_table(schema, &table.name),
        sets.join(", "),
        predicate
    );
    q
}

/// DELETE by identifier column.
pub fn delete_by_id(schema: &str, table: &str, identifier: &str, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let predicate = q.identity_predicate(identifier, id);
    q.sql = format!("DELETE FROM {} WHERE {}", qualified_table(schema, table), predicate);
    q
}
