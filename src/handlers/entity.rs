//! Record mutation handlers.

use crate::error::AppError;
use crate::service::DeleteService;
use crate::state::AppState;
use crate::tenant::Caller;
use axum::extract::{Path, State};

/// DELETE /crud/:table_name/:id — archive or delete per the table's policy.
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path((table_name, id)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let ack = DeleteService::delete_record(
        &state.registry,
        state.store.as_ref(),
        state.audit.as_ref(),
        &table_name,
        &id,
        &caller,
    )
    .await?;
    Ok(crate::response::ok(ack))
}
