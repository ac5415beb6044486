//! Shared test schema.

use crate::config::{SchemaDocument, SchemaRegistry};
use serde_json::json;

pub(crate) fn shop_registry() -> SchemaRegistry {
    let doc: SchemaDocument = serde_json::from_value(json!({ "tables": [
        { "name": "users", "tenant": true,
          "crud_get_enabled": true, "crud_post_enabled": true, "crud_put_enabled": true,
          "crud_delete_enabled": true,
          "external_fields": {
              "id": { "primary": true },
              "email": {},
              "password": {}
          } },
        { "name": "customers", "crud_get_enabled": true, "crud_delete_enabled": true,
          "external_fields": { "id": { "primary": true }, "name": {} } },
        { "name": "orders", "crud_delete_enabled": true,
          "external_fields": {
              "id": { "primary": true },
              "customer_id": { "reference": { "table": "customers", "column": "id" } }
          } },
        { "name": "invoices", "crud_soft_delete_enabled": true,
          "external_fields": {
              "id": { "primary": true },
              "customer_id": { "reference": { "table": "customers", "column": "id" } },
              "status": { "soft_delete": { "configured": true, "value": "VOID" } }
          } },
        { "name": "accounts", "crud_soft_delete_enabled": true,
          "external_fields": {
              "id": { "primary": true },
              "deleted_at": { "soft_delete": { "configured": true, "value": "ARCHIVED" } }
          } },
        { "name": "keyless", "crud_delete_enabled": true,
          "external_fields": { "name": {} } },
        { "name": "unarchivable", "crud_soft_delete_enabled": true,
          "external_fields": { "id": { "primary": true } } },
        { "name": "readonly", "crud_get_enabled": true,
          "external_fields": { "id": { "primary": true } } },
        { "name": "ledgers", "crud_delete_enabled": true, "crud_soft_delete_enabled": true,
          "external_fields": {
              "id": { "primary": true },
              "closed": { "soft_delete": { "configured": true, "value": true } }
          } },
        { "name": "postings", "crud_delete_enabled": true,
          "external_fields": {
              "id": { "primary": true },
              "ledger_id": { "reference": { "table": "ledgers", "column": "id" } }
          } }
    ] }))
    .expect("fixture schema");
    SchemaRegistry::from_document(doc).expect("fixture registry")
}
