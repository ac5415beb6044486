//! Request-shape validation run before any engine logic touches storage.

use crate::config::{SchemaRegistry, TableDefinition};
use crate::error::AppError;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

/// Email with at least two domain segments (`name@example.com`).
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("static email pattern"))
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct RequestValidator;

impl RequestValidator {
    /// `table` must name a table with delete or soft delete enabled; `id` must be non-empty.
    pub fn validate_delete<'a>(
        registry: &'a SchemaRegistry,
        table: &str,
        id: &str,
    ) -> Result<&'a TableDefinition, AppError> {
        let def = registry
            .table(table)
            .filter(|t| t.is_delete_eligible())
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "\"table_name\" must be one of [{}]",
                    registry.delete_eligible_tables().join(", ")
                ))
            })?;
        if id.trim().is_empty() {
            return Err(AppError::Validation("\"id\" is required".into()));
        }
        Ok(def)
    }

    /// Shape check for `POST /login`. Failures here are request errors, not authentication failures.
    pub fn validate_login(body: &Value) -> Result<LoginRequest, AppError> {
        let obj = body
            .as_object()
            .ok_or_else(|| AppError::Validation("body must be a JSON object".into()))?;
        let email = match obj.get("email") {
            None | Some(Value::Null) => return Err(AppError::Validation("\"email\" is required".into())),
            Some(Value::String(s)) => s,
            Some(_) => return Err(AppError::Validation("\"email\" must be a string".into())),
        };
        if !Self::is_valid_email(email) {
            return Err(AppError::Validation("\"email\" must be a valid email".into()));
        }
        let password = match obj.get("password") {
            None | Some(Value::Null) => return Err(AppError::Validation("\"password\" is required".into())),
            Some(Value::String(s)) if s.is_empty() => {
                return Err(AppError::Validation("\"password\" is not allowed to be empty".into()))
            }
            Some(Value::String(s)) => s,
            Some(_) => return Err(AppError::Validation("\"password\" must be a string".into())),
        };
        Ok(LoginRequest {
            email: email.clone(),
            password: password.clone(),
        })
    }

    pub fn is_valid_email(s: &str) -> bool {
        s.len() <= 254 && email_regex().is_match(s)
    }
}
