//! Schema registry: the validated table catalog, immutable once loaded.

use crate::config::types::{FieldSpec, SchemaDocument, TableDefinition};
use crate::config::validator::validate;
use crate::error::ConfigError;
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    /// Tables in load order; every "first match" lookup follows this order.
    tables: Vec<TableDefinition>,
    index_by_name: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Validate and index a schema document.
    pub fn from_document(doc: SchemaDocument) -> Result<Self, ConfigError> {
        validate(&doc)?;
        let index_by_name = doc
            .tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
        Ok(SchemaRegistry {
            tables: doc.tables,
            index_by_name,
        })
    }

    pub fn from_tables(tables: Vec<TableDefinition>) -> Result<Self, ConfigError> {
        Self::from_document(SchemaDocument { tables })
    }

    pub fn tables(&self) -> &[TableDefinition] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableDefinition> {
        self.index_by_name.get(name).map(|&i| &self.tables[i])
    }

    pub fn primary_key(&self, table: &str) -> Option<&str> {
        self.table(table).and_then(TableDefinition::primary_key)
    }

    pub fn soft_delete_fields(&self, table: &str) -> Map<String, Value> {
        self.table(table)
            .map(TableDefinition::soft_delete_fields)
            .unwrap_or_default()
    }

    /// The login table. With several tenant tables the first in load order wins.
    pub fn tenant_table(&self) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.tenant)
    }

    /// Names of tables accepting `DELETE /crud/:table/:id`.
    pub fn delete_eligible_tables(&self) -> Vec<&str> {
        self.tables
            .iter()
            .filter(|t| t.is_delete_eligible())
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Every `(table, field, spec)` whose reference points at `target`, in load and declaration order.
    pub fn referencing_fields<'a>(
        &'a self,
        target: &'a str,
    ) -> impl Iterator<Item = (&'a TableDefinition, &'a str, &'a FieldSpec)> + 'a {
        self.tables.iter().flat_map(move |t| {
            t.external_fields
                .iter()
                .filter(move |(_, f)| f.references(target))
                .map(move |(name, f)| (t, name.as_str(), f))
        })
    }
}
