use serde::Serialize;

use super::Identity;

/// Snapshot of the identity loader handed to pages and handlers, so the current user is an
/// explicit parameter rather than an ambient lookup.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionContext {
    pub identity: Option<Identity>,
    pub loading: bool,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self { identity: None, loading: true }
    }
}

impl SessionContext {
    pub fn ready(identity: Option<Identity>) -> Self {
        Self { identity, loading: false }
    }
}
