use parking_lot::Mutex;

use super::store::SessionStore;
use crate::error::SessionResult;

/// In-process store. Each instance is its own isolated session scope.
#[derive(Debug)]
pub struct MemorySessionStore {
    key: String,
    slot: Mutex<Option<String>>,
}

impl Default for MemorySessionStore {
    fn default() -> Self { Self::new(super::DEFAULT_SESSION_KEY) }
}

impl MemorySessionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), slot: Mutex::new(None) }
    }

    /// Pre-populate the key with arbitrary text, valid record or not.
    pub fn with_raw(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self { key: key.into(), slot: Mutex::new(Some(text.into())) }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().clone()
    }

    pub fn contains_key(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl SessionStore for MemorySessionStore {
    fn key(&self) -> &str { &self.key }

    fn read_raw(&self) -> SessionResult<Option<String>> {
        Ok(self.slot.lock().clone())
    }

    fn write_raw(&self, text: &str) -> SessionResult<()> {
        *self.slot.lock() = Some(text.to_string());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        self.slot.lock().take();
        Ok(())
    }
}
