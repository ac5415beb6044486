//! Record routes. The table is a path parameter resolved against the registry by the handler.
//! Create, read and update are served by the generic CRUD layer mounted next to these routes.

use crate::handlers::entity::delete as delete_handler;
use crate::state::AppState;
use axum::{routing::delete, Router};

pub fn crud_routes(state: AppState) -> Router {
    Router::new()
        .route("/crud/:table_name/:id", delete(delete_handler))
        .with_state(state)
}
