//! Login: the built-in root principal, or a row of the tenant table verified against its bcrypt hash.

use crate::config::{RootCredentials, SchemaRegistry};
use crate::error::AppError;
use crate::service::validation::RequestValidator;
use crate::store::{value_text, RecordQuery, RecordStore};
use crate::tenant::{Principal, ROOT_ID};
use async_trait::async_trait;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;

pub const LOGIN_SUCCESSFUL: &str = "Login successful";
/// Column of the tenant table holding the bcrypt hash.
pub const PASSWORD_COLUMN: &str = "password";
const EMAIL_COLUMN: &str = "email";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenBundle {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Only the root login carries `true`; tokens without the claim are non-admin.
    #[serde(default)]
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

pub trait TokenIssuer: Send + Sync {
    fn issue_token(&self, principal: &Principal) -> Result<TokenBundle, AppError>;
    fn verify_token(&self, token: &str) -> Result<Claims, AppError>;
}

/// HS256 JWT issuer.
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        JwtTokenIssuer {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_token(&self, principal: &Principal) -> Result<TokenBundle, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: principal.id.clone(),
            is_admin: principal.is_admin,
            iat: now,
            exp: now + self.ttl_secs as i64,
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok(TokenBundle {
            token,
            token_type: "Bearer".into(),
            expires_in: self.ttl_secs,
        })
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    /// Constant-time check of `password` against a stored hash. Malformed hashes verify as false.
    async fn verify(&self, password: &str, hash: &str) -> bool;

    /// Same work as `verify`, for logins with no stored hash to check.
    async fn verify_missing(&self, _password: &str) {}
}

/// Hash of a throwaway password at the default cost, built once.
fn placeholder_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| bcrypt::hash("placeholder", bcrypt::DEFAULT_COST).unwrap_or_default())
}

#[derive(Clone, Debug, Default)]
pub struct BcryptVerifier;

#[async_trait]
impl PasswordVerifier for BcryptVerifier {
    async fn verify(&self, password: &str, hash: &str) -> bool {
        let (password, hash) = (password.to_string(), hash.to_string());
        let res = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await;
        match res {
            Ok(Ok(matched)) => matched,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "stored password hash is not valid bcrypt");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "password verification task failed");
                false
            }
        }
    }

    async fn verify_missing(&self, password: &str) {
        let password = password.to_string();
        let _ = tokio::task::spawn_blocking(move || bcrypt::verify(password, placeholder_hash())).await;
    }
}

/// Successful login body: token bundle, the user profile and a message.
#[derive(Clone, Debug, Serialize)]
pub struct LoginOutcome {
    #[serde(flatten)]
    pub tokens: TokenBundle,
    pub user: Value,
    pub message: &'static str,
    #[serde(skip)]
    pub principal: Principal,
}

/// Why a login was refused. Only ever logged; every variant renders the same client message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthFailure {
    RootPasswordMismatch,
    NoTenantTable,
    NoPrimaryKey,
    UnknownEmail,
    NoPasswordHash,
    NoIdentity,
    ReservedIdentity,
    PasswordMismatch,
}

fn reject(stage: AuthFailure) -> AppError {
    tracing::debug!(stage = ?stage, "login rejected");
    AppError::unauthorized()
}

/// Walks the longer input in full; never returns early.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());
    let diff = (0..len).fold(a.len() ^ b.len(), |acc, i| {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        acc | usize::from(x ^ y)
    });
    diff == 0
}

pub struct CredentialAuthenticator<'a> {
    pub registry: &'a SchemaRegistry,
    pub store: &'a dyn RecordStore,
    pub tokens: &'a dyn TokenIssuer,
    pub passwords: &'a dyn PasswordVerifier,
    pub root: &'a RootCredentials,
}

impl CredentialAuthenticator<'_> {
    /// Validate the request body, then authenticate.
    pub async fn login(&self, body: &Value) -> Result<LoginOutcome, AppError> {
        let req = RequestValidator::validate_login(body)?;
        self.authenticate(&req.email, &req.password).await
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let principal = if email == self.root.email {
            self.authenticate_root(password)?
        } else {
            self.authenticate_tenant(email, password).await?
        };
        let tokens = self.tokens.issue_token(&principal)?;
        tracing::info!(principal = %principal.id, admin = principal.is_admin, "login succeeded");
        Ok(LoginOutcome {
            tokens,
            user: principal.user.clone(),
            message: LOGIN_SUCCESSFUL,
            principal,
        })
    }

    fn authenticate_root(&self, password: &str) -> Result<Principal, AppError> {
        if !constant_time_eq(password.as_bytes(), self.root.password.as_bytes()) {
            return Err(reject(AuthFailure::RootPasswordMismatch));
        }
        Ok(Principal {
            id: ROOT_ID.into(),
            is_admin: true,
            user: json!({
                "email": self.root.email,
                "first_name": "Root",
                "last_name": "User",
                "is_admin": true,
            }),
        })
    }

    async fn authenticate_tenant(&self, email: &str, password: &str) -> Result<Principal, AppError> {
        let table = self
            .registry
            .tenant_table()
            .ok_or_else(|| reject(AuthFailure::NoTenantTable))?;
        let pk = table.primary_key().ok_or_else(|| reject(AuthFailure::NoPrimaryKey))?;

        let query = RecordQuery::new(table.name.as_str()).filter(EMAIL_COLUMN, Value::String(email.to_string()));
        let rows = self.store.records(&query).await?;
        let Some(mut row) = rows.into_iter().next() else {
            self.passwords.verify_missing(password).await;
            return Err(reject(AuthFailure::UnknownEmail));
        };

        let hash = match row.get(PASSWORD_COLUMN) {
            Some(Value::String(h)) if !h.is_empty() => h.clone(),
            _ => {
                self.passwords.verify_missing(password).await;
                return Err(reject(AuthFailure::NoPasswordHash));
            }
        };
        if !self.passwords.verify(password, &hash).await {
            return Err(reject(AuthFailure::PasswordMismatch));
        }
        let id = row
            .get(pk)
            .and_then(value_text)
            .ok_or_else(|| reject(AuthFailure::NoIdentity))?;
        if id == ROOT_ID {
            return Err(reject(AuthFailure::ReservedIdentity));
        }

        row.remove(PASSWORD_COLUMN);
        row.insert("is_admin".into(), Value::Bool(false));
        Ok(Principal {
            id,
            is_admin: false,
            user: Value::Object(row),
        })
    }
}
