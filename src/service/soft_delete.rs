//! Soft delete: write the configured archive values instead of removing the row.

use crate::config::{SchemaRegistry, TableDefinition};
use crate::error::AppError;
use crate::response::Ack;
use crate::service::audit::AuditStamper;
use crate::service::{fetch_by_id, ARCHIVED, ARCHIVE_DATA_NOT_FOUND, PRIMARY_KEY_NOT_CONFIGURED, RECORD_NOT_FOUND};
use crate::store::RecordStore;
use crate::tenant::Caller;
use serde_json::Value;

pub struct SoftDeleteExecutor;

impl SoftDeleteExecutor {
    /// Resolve, fetch and archive `id` in `table`. No referential check is made: the row stays in place.
    pub async fn apply_soft_delete(
        registry: &SchemaRegistry,
        store: &dyn RecordStore,
        audit: &dyn AuditStamper,
        table: &str,
        id: &str,
        caller: &Caller,
    ) -> Result<Ack, AppError> {
        let def = registry
            .table(table)
            .ok_or_else(|| AppError::Validation(format!("table_name must be one of the configured tables, got {}", table)))?;
        let pk = def
            .primary_key()
            .ok_or_else(|| AppError::Unavailable(PRIMARY_KEY_NOT_CONFIGURED.into()))?;
        if fetch_by_id(store, table, pk, id).await?.is_empty() {
            return Err(AppError::NotFound(RECORD_NOT_FOUND.into()));
        }
        Self::archive(store, audit, def, pk, id, caller).await
    }

    /// Archive step for a row already known to exist.
    pub(crate) async fn archive(
        store: &dyn RecordStore,
        audit: &dyn AuditStamper,
        def: &TableDefinition,
        pk: &str,
        id: &str,
        caller: &Caller,
    ) -> Result<Ack, AppError> {
        let mut update = def.soft_delete_fields();
        if update.is_empty() {
            return Err(AppError::Unavailable(ARCHIVE_DATA_NOT_FOUND.into()));
        }
        update.extend(audit.stamp_for_update(caller));
        let affected = store
            .update_record_by_id(&def.name, pk, &Value::String(id.to_string()), &update)
            .await?;
        tracing::info!(table = %def.name, id = %id, affected, "record archived");
        Ok(Ack::new(ARCHIVED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::audit::BasicAuditStamper;
    use crate::service::fixtures::shop_registry;
    use crate::store::{MemoryRecordStore, StoreCall};
    use serde_json::json;

    #[tokio::test]
    async fn archives_with_configured_values_and_audit() {
        let reg = shop_registry();
        let store = MemoryRecordStore::new().with_rows("accounts", [json!({ "id": 3, "deleted_at": null })]);
        let ack = SoftDeleteExecutor::apply_soft_delete(&reg, &store, &BasicAuditStamper, "accounts", "3", &Caller::user("9"))
            .await
            .unwrap();
        assert_eq!(ack.message, "Archived successfully");

        let rows = store.rows("accounts");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["deleted_at"], json!("ARCHIVED"));
        assert_eq!(rows[0]["updated_by"], json!("9"));
        assert_eq!(store.delete_calls(), 0);

        let update = store
            .calls()
            .into_iter()
            .find_map(|c| match c {
                StoreCall::Update { identifier, id, update, .. } => Some((identifier, id, update)),
                _ => None,
            })
            .unwrap();
        assert_eq!(update.0, "id");
        assert_eq!(update.1, json!("3"));
        assert!(update.2.contains_key("updated_at"));
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let reg = shop_registry();
        let store = MemoryRecordStore::new();
        let err = SoftDeleteExecutor::apply_soft_delete(&reg, &store, &BasicAuditStamper, "accounts", "3", &Caller::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(m) if m == "Record not found"));
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn no_configured_fields_is_unavailable() {
        let reg = shop_registry();
        let store = MemoryRecordStore::new().with_rows("unarchivable", [json!({ "id": 1 })]);
        let err = SoftDeleteExecutor::apply_soft_delete(&reg, &store, &BasicAuditStamper, "unarchivable", "1", &Caller::root())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unavailable(m) if m == "Archive data not found"));
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn missing_primary_key_is_unavailable() {
        let reg = shop_registry();
        let store = MemoryRecordStore::new();
        let err = SoftDeleteExecutor::apply_soft_delete(&reg, &store, &BasicAuditStamper, "keyless", "1", &Caller::root())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unavailable(m) if m == "Primary key not configured"));
        assert!(store.calls().is_empty());
    }
}
