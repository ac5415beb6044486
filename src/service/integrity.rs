//! Referential integrity guard: refuse a hard delete while another table still points at the row.

use crate::config::SchemaRegistry;
use crate::error::StoreError;
use crate::store::{Record, RecordQuery, RecordStore};
use serde_json::Value;

/// The first referencing `(table, field)` found holding the target's value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockingReference {
    pub table: String,
    pub field: String,
}

/// One candidate check: rows of `table` whose `field` equals `value`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceProbe<'a> {
    pub table: &'a str,
    pub field: &'a str,
    pub value: &'a Value,
}

pub struct ReferenceGuard;

impl ReferenceGuard {
    /// Probes to run before deleting `target_record` from `target_table`, in registry order.
    /// Fields whose referenced column is missing or null on the target are skipped.
    pub fn probes<'a>(
        registry: &'a SchemaRegistry,
        target_table: &'a str,
        target_record: &'a Record,
    ) -> Vec<ReferenceProbe<'a>> {
        registry
            .referencing_fields(target_table)
            .filter_map(|(table, field, spec)| {
                let column = &spec.reference.as_ref()?.column;
                match target_record.get(column) {
                    None | Some(Value::Null) => {
                        tracing::debug!(
                            table = %table.name,
                            field = %field,
                            column = %column,
                            "referenced column absent on target, skipping"
                        );
                        None
                    }
                    Some(value) => Some(ReferenceProbe {
                        table: table.name.as_str(),
                        field,
                        value,
                    }),
                }
            })
            .collect()
    }

    /// Runs the probes one at a time and stops at the first referencing row.
    pub async fn find_blocking_reference(
        registry: &SchemaRegistry,
        store: &dyn RecordStore,
        target_table: &str,
        target_record: &Record,
    ) -> Result<Option<BlockingReference>, StoreError> {
        for probe in Self::probes(registry, target_table, target_record) {
            let query = RecordQuery::new(probe.table)
                .filter(probe.field, probe.value.clone())
                .limit(1);
            let rows = store.records(&query).await?;
            if !rows.is_empty() {
                return Ok(Some(BlockingReference {
                    table: probe.table.to_string(),
                    field: probe.field.to_string(),
                }));
            }
        }
        Ok(None)
    }
}
