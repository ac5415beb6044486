//! Resolve the caller from the `Authorization: Bearer <token>` header.

use crate::state::AppState;
use crate::tenant::{Caller, ROOT_ID};
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

/// Missing or invalid tokens resolve to an anonymous caller; routes that need identity decide what that means.
#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer ").or_else(|| s.strip_prefix("bearer ")))
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let Some(token) = token else {
            return Ok(Caller::anonymous());
        };
        match state.tokens.verify_token(token) {
            Ok(claims) if claims.is_admin && claims.sub == ROOT_ID => Ok(Caller::root()),
            Ok(claims) => Ok(Caller::user(claims.sub)),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid bearer token");
                Ok(Caller::anonymous())
            }
        }
    }
}
