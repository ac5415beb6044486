//! Schema handler.

use crate::response::{ok, SchemaBody};
use crate::service::visible_schema;
use crate::state::AppState;
use crate::tenant::Caller;
use axum::extract::State;

/// GET /schema — registry tables with tenant write capabilities hidden from non-root callers.
pub async fn get_schema(State(state): State<AppState>, caller: Caller) -> impl axum::response::IntoResponse {
    ok(SchemaBody {
        tables: visible_schema(&state.registry, &caller),
    })
}
