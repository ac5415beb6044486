//! Raw schema types matching the JSON schema source (`{ "tables": [...] }`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Foreign-key marker: this field points at `table.column`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub table: String,
    pub column: String,
}

/// Archive behaviour for one field: when `configured`, a soft delete writes `value` into it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftDelete {
    #[serde(default)]
    pub configured: bool,
    #[serde(default)]
    pub value: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(default)]
    pub primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_delete: Option<SoftDelete>,
    /// PostgreSQL type name used to cast bound values on update (e.g. "timestamptz", "integer").
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Keys the engine does not interpret; kept so the schema endpoint returns them as declared.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldSpec {
    pub fn is_soft_delete_configured(&self) -> bool {
        self.soft_delete.as_ref().map(|s| s.configured).unwrap_or(false)
    }

    pub fn references(&self, table: &str) -> bool {
        self.reference.as_ref().map(|r| r.table == table).unwrap_or(false)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    /// Marks the table holding end-user login identities.
    #[serde(default)]
    pub tenant: bool,
    #[serde(default)]
    pub crud_get_enabled: bool,
    #[serde(default)]
    pub crud_post_enabled: bool,
    #[serde(default)]
    pub crud_put_enabled: bool,
    #[serde(default)]
    pub crud_delete_enabled: bool,
    #[serde(default)]
    pub crud_soft_delete_enabled: bool,
    #[serde(default)]
    pub external_fields: IndexMap<String, FieldSpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TableDefinition {
    /// First field flagged `primary`, in declaration order. Duplicate flags are not an error here.
    pub fn primary_key(&self) -> Option<&str> {
        self.external_fields
            .iter()
            .find(|(_, f)| f.primary)
            .map(|(name, _)| name.as_str())
    }

    /// Every configured soft-delete field paired with the value it is set to on archive.
    pub fn soft_delete_fields(&self) -> Map<String, Value> {
        self.external_fields
            .iter()
            .filter_map(|(name, f)| match &f.soft_delete {
                Some(sd) if sd.configured => Some((name.clone(), sd.value.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn is_delete_eligible(&self) -> bool {
        self.crud_delete_enabled || self.crud_soft_delete_enabled
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.external_fields.get(name)
    }
}

/// Whole schema source as stored on disk or in `_sys_tables`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
}
