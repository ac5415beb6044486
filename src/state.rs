//! Shared application state for all routes. The registry is immutable once built.

use crate::config::{RootCredentials, SchemaRegistry};
use crate::service::{AuditStamper, BasicAuditStamper, BcryptVerifier, PasswordVerifier, TokenIssuer};
use crate::store::RecordStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SchemaRegistry>,
    pub store: Arc<dyn RecordStore>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub passwords: Arc<dyn PasswordVerifier>,
    pub audit: Arc<dyn AuditStamper>,
    pub root: Arc<RootCredentials>,
}

impl AppState {
    /// State with bcrypt verification, the basic audit stamper and default root credentials.
    pub fn new(registry: Arc<SchemaRegistry>, store: Arc<dyn RecordStore>, tokens: Arc<dyn TokenIssuer>) -> Self {
        AppState {
            registry,
            store,
            tokens,
            passwords: Arc::new(BcryptVerifier),
            audit: Arc::new(BasicAuditStamper),
            root: Arc::new(RootCredentials::default()),
        }
    }

    pub fn with_root(mut self, root: RootCredentials) -> Self {
        self.root = Arc::new(root);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditStamper>) -> Self {
        self.audit = audit;
        self
    }
}
