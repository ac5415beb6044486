//! Audit stamping merged into updates issued by the engine.

use crate::tenant::Caller;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

pub trait AuditStamper: Send + Sync {
    /// Fields written alongside an update made on behalf of `caller`.
    fn stamp_for_update(&self, caller: &Caller) -> Map<String, Value>;
}

/// Writes `updated_at` (RFC 3339, UTC) and `updated_by` (caller id, or null when anonymous).
#[derive(Clone, Debug, Default)]
pub struct BasicAuditStamper;

impl AuditStamper for BasicAuditStamper {
    fn stamp_for_update(&self, caller: &Caller) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert(
            "updated_at".into(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        out.insert(
            "updated_by".into(),
            caller.id.clone().map(Value::String).unwrap_or(Value::Null),
        );
        out
    }
}
