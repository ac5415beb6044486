//! Caller identity: the privileged root principal, tenant-table users and anonymous callers.

use serde::{Deserialize, Serialize};

/// Principal id reserved for the built-in root login.
pub const ROOT_ID: &str = "-1";

/// Identity attached to a request, resolved from its bearer token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Caller {
    /// `None` when the request carried no valid token.
    pub id: Option<String>,
    /// Set only from a verified token's admin claim, never from the id.
    pub admin: bool,
}

impl Caller {
    pub fn anonymous() -> Self {
        Caller { id: None, admin: false }
    }

    pub fn root() -> Self {
        Caller {
            id: Some(ROOT_ID.into()),
            admin: true,
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Caller {
            id: Some(id.into()),
            admin: false,
        }
    }

    pub fn is_root(&self) -> bool {
        self.admin && self.id.as_deref() == Some(ROOT_ID)
    }
}

/// Authenticated login identity returned to the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Root id or the tenant row's primary-key value as text.
    pub id: String,
    pub is_admin: bool,
    /// Profile echoed back to the client (tenant row without its password hash).
    pub user: serde_json::Value,
}
