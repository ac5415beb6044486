//! Delete orchestration: soft delete for archive tables, guarded hard delete otherwise.

use crate::config::SchemaRegistry;
use crate::error::AppError;
use crate::response::Ack;
use crate::service::audit::AuditStamper;
use crate::service::integrity::ReferenceGuard;
use crate::service::soft_delete::SoftDeleteExecutor;
use crate::service::validation::RequestValidator;
use crate::service::{fetch_by_id, DELETED, LINKED_RECORD, PRIMARY_KEY_NOT_CONFIGURED, RECORD_NOT_FOUND};
use crate::store::RecordStore;
use crate::tenant::Caller;
use serde_json::Value;

pub struct DeleteService;

impl DeleteService {
    /// Steps run strictly in order and each storage call is awaited before the next:
    /// eligibility, primary key, fetch, then either archive or reference check and physical delete.
    pub async fn delete_record(
        registry: &SchemaRegistry,
        store: &dyn RecordStore,
        audit: &dyn AuditStamper,
        table: &str,
        id: &str,
        caller: &Caller,
    ) -> Result<Ack, AppError> {
        let def = RequestValidator::validate_delete(registry, table, id)?;

        let pk = def
            .primary_key()
            .ok_or_else(|| AppError::Unavailable(PRIMARY_KEY_NOT_CONFIGURED.into()))?;

        let rows = fetch_by_id(store, table, pk, id).await?;
        let Some(record) = rows.first() else {
            return Err(AppError::NotFound(RECORD_NOT_FOUND.into()));
        };

        if def.crud_soft_delete_enabled {
            return SoftDeleteExecutor::archive(store, audit, def, pk, id, caller).await;
        }

        if let Some(blocking) = ReferenceGuard::find_blocking_reference(registry, store, table, record).await? {
            tracing::warn!(
                table = %table,
                id = %id,
                referenced_by = %blocking.table,
                field = %blocking.field,
                "delete blocked by reference"
            );
            return Err(AppError::Conflict(LINKED_RECORD.into()));
        }

        let affected = store
            .delete_record_by_id(table, pk, &Value::String(id.to_string()))
            .await?;
        tracing::info!(table = %table, id = %id, affected, "record deleted");
        Ok(Ack::new(DELETED))
    }
}
