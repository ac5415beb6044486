//! Schema and login routes.

use crate::handlers::{get_schema, login};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/schema", get(get_schema))
        .route("/login", post(login))
        .with_state(state)
}
