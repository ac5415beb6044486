//! Schema validation at load time: hard errors for ambiguous names, warnings for the rest.

use crate::config::types::SchemaDocument;
use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};

pub fn validate(doc: &SchemaDocument) -> Result<(), ConfigError> {
    let mut names = HashSet::new();
    for t in &doc.tables {
        if t.name.trim().is_empty() {
            return Err(ConfigError::Validation("table name must not be empty".into()));
        }
        if !names.insert(t.name.as_str()) {
            return Err(ConfigError::DuplicateTable(t.name.clone()));
        }
    }

    let fields_by_table: HashMap<&str, HashSet<&str>> = doc
        .tables
        .iter()
        .map(|t| (t.name.as_str(), t.external_fields.keys().map(String::as_str).collect()))
        .collect();

    let tenants: Vec<&str> = doc.tables.iter().filter(|t| t.tenant).map(|t| t.name.as_str()).collect();
    if tenants.len() > 1 {
        tracing::warn!(tables = ?tenants, "several tenant tables declared, login uses {}", tenants[0]);
    }

    for t in &doc.tables {
        let primaries = t.external_fields.values().filter(|f| f.primary).count();
        if primaries > 1 {
            tracing::warn!(table = %t.name, "several primary fields declared, the first one is used");
        }
        if primaries == 0 && t.is_delete_eligible() {
            tracing::warn!(table = %t.name, "delete enabled but no primary field declared");
        }
        if t.crud_soft_delete_enabled && t.soft_delete_fields().is_empty() {
            tracing::warn!(table = %t.name, "soft delete enabled but no soft_delete field configured");
        }
        if t.crud_delete_enabled && t.crud_soft_delete_enabled {
            tracing::warn!(table = %t.name, "both delete and soft delete enabled, soft delete takes precedence");
        }
        for (name, f) in &t.external_fields {
            let Some(r) = &f.reference else { continue };
            match fields_by_table.get(r.table.as_str()) {
                None => tracing::warn!(
                    table = %t.name,
                    field = %name,
                    "reference to unknown table {}",
                    r.table
                ),
                Some(cols) if !cols.contains(r.column.as_str()) => tracing::warn!(
                    table = %t.name,
                    field = %name,
                    "reference to undeclared column {}.{}",
                    r.table,
                    r.column
                ),
                Some(_) => {}
            }
        }
    }

    Ok(())
}
