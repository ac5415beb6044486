//! Capability-filtered view of the schema for the requesting caller.

use crate::config::{SchemaRegistry, TableDefinition};
use crate::tenant::Caller;

/// Deep copy of the registry. For anyone but root, tenant tables lose post, delete and soft delete;
/// get and put are left as stored.
pub fn visible_schema(registry: &SchemaRegistry, caller: &Caller) -> Vec<TableDefinition> {
    let mut tables = registry.tables().to_vec();
    if !caller.is_root() {
        for t in tables.iter_mut().filter(|t| t.tenant) {
            t.crud_post_enabled = false;
            t.crud_delete_enabled = false;
            t.crud_soft_delete_enabled = false;
        }
    }
    tables
}
