use crate::error::{SessionError, SessionResult};
use crate::identity::Identity;

/// Result of reading the session key. Malformed is kept distinct from Absent so callers have
/// to decide what a corrupt record means instead of silently reading it as "logged out".
#[derive(Debug)]
pub enum LoadOutcome {
    Present(Identity),
    Absent,
    /// The stored text exists but is not a record.
    Malformed(SessionError),
    /// The backend could not be read; the stored record, if any, is untouched.
    Unavailable(SessionError),
}

impl LoadOutcome {
    pub fn into_identity(self) -> Option<Identity> {
        match self {
            LoadOutcome::Present(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool { matches!(self, LoadOutcome::Absent) }

    pub fn is_malformed(&self) -> bool { matches!(self, LoadOutcome::Malformed(_)) }

    pub fn is_unavailable(&self) -> bool { matches!(self, LoadOutcome::Unavailable(_)) }
}

/// Persisted home of the current identity: one fixed key holding one serialized record.
///
/// Backends implement the raw text operations; `save` and `load` layer the JSON record format
/// on top. Every write replaces the record whole. `clear` must succeed when the key is
/// already gone.
pub trait SessionStore: Send + Sync {
    fn key(&self) -> &str;

    fn read_raw(&self) -> SessionResult<Option<String>>;

    fn write_raw(&self, text: &str) -> SessionResult<()>;

    fn clear(&self) -> SessionResult<()>;

    fn save(&self, identity: &Identity) -> SessionResult<()> {
        let text = identity.to_json()?;
        self.write_raw(&text)
    }

    fn load(&self) -> LoadOutcome {
        match self.read_raw() {
            Ok(None) => LoadOutcome::Absent,
            Ok(Some(text)) => match Identity::from_json(&text) {
                Ok(id) => LoadOutcome::Present(id),
                Err(e) => LoadOutcome::Malformed(e.into()),
            },
            Err(e @ SessionError::Io(_)) => LoadOutcome::Unavailable(e),
            Err(e) => LoadOutcome::Malformed(e),
        }
    }
}
