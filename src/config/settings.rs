//! Process settings read from the environment (a `.env` file is honoured).

use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_ROOT_EMAIL: &str = "rootuser@user.com";
pub const DEFAULT_ROOT_PASSWORD: &str = "root";
const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// The built-in privileged login, checked before the tenant table.
#[derive(Clone, Debug)]
pub struct RootCredentials {
    pub email: String,
    pub password: String,
}

impl Default for RootCredentials {
    fn default() -> Self {
        RootCredentials {
            email: DEFAULT_ROOT_EMAIL.into(),
            password: DEFAULT_ROOT_PASSWORD.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    /// JSON schema file. When unset the registry is read from `<sys_schema>._sys_tables`.
    pub schema_path: Option<PathBuf>,
    pub sys_schema: String,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub root: RootCredentials,
    pub bind_addr: String,
    pub body_limit_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using an insecure development secret");
            "schema-crud-dev-secret".into()
        });
        let root = RootCredentials {
            email: env_or("ROOT_EMAIL", DEFAULT_ROOT_EMAIL),
            password: env_or("ROOT_PASSWORD", DEFAULT_ROOT_PASSWORD),
        };
        Ok(Settings {
            database_url: env_or("DATABASE_URL", "postgres://localhost/schema_crud"),
            schema_path: std::env::var("SCHEMA_PATH").ok().filter(|s| !s.is_empty()).map(PathBuf::from),
            sys_schema: env_or("CRUD_SYS_SCHEMA", "crud"),
            jwt_secret,
            token_ttl_secs: env_parse("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?,
            root,
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:3000"),
            body_limit_bytes: env_parse("BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES)?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Validation(format!("{} must be a number, got '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
