//! Login handler.

use crate::error::AppError;
use crate::response::ok;
use crate::service::CredentialAuthenticator;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

/// POST /login with `{ email, password }`.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let auth = CredentialAuthenticator {
        registry: &state.registry,
        store: state.store.as_ref(),
        tokens: state.tokens.as_ref(),
        passwords: state.passwords.as_ref(),
        root: &state.root,
    };
    let outcome = auth.login(&body).await?;
    Ok(ok(outcome))
}
