//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned for every failed login, whatever stage rejected it.
pub const LOGIN_FAILED_MESSAGE: &str = "Incorrect username or password";
/// Client-facing message for every 5xx; the detail goes to the log only.
pub const SERVER_FAILURE_MESSAGE: &str = "Something went wrong, please try again later";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("duplicate table name: {0}")]
    DuplicateTable(String),
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Failures reported by a [`RecordStore`](crate::store::RecordStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("storage: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// Schema misconfiguration detected at request time (missing primary key, no archive fields).
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Conflict(String),
    /// Always carries [`LOGIN_FAILED_MESSAGE`]; build it through [`AppError::unauthorized`].
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized(LOGIN_FAILED_MESSAGE)
    }

    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Store(StoreError::Db(sqlx::Error::RowNotFound)) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Store(StoreError::UnknownTable(_)) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Store(_) => (StatusCode::SERVICE_UNAVAILABLE, "storage_error"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Unavailable(_) => (StatusCode::NOT_FOUND, "unavailable"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Token(_) => (StatusCode::INTERNAL_SERVER_ERROR, "token_error"),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    /// Top-level message kept for clients that only read `message`.
    pub message: String,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
            SERVER_FAILURE_MESSAGE.to_string()
        } else {
            self.to_string()
        };
        let body = ErrorBody {
            message: message.clone(),
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
