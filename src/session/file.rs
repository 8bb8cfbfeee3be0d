use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::store::SessionStore;
use crate::error::{SessionError, SessionResult};

/// Local profile store: `<dir>/<key>.json`, the on-disk counterpart of browser-local storage.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
    key: String,
}

fn valid_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> SessionResult<Self> {
        if !valid_key(key) {
            return Err(SessionError::Encoding(format!("invalid session key '{}'", key)));
        }
        Ok(Self { dir: dir.as_ref().to_path_buf(), key: key.to_string() })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    fn tmp_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", self.key))
    }
}

impl SessionStore for FileSessionStore {
    fn key(&self) -> &str { &self.key }

    fn read_raw(&self) -> SessionResult<Option<String>> {
        match std::fs::read(self.path()) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| SessionError::Encoding(format!("session file is not utf-8: {}", e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_raw(&self, text: &str) -> SessionResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        // Replace the record whole: readers see either the old file or the new one.
        let tmp = self.tmp_path();
        std::fs::write(&tmp, text.as_bytes())?;
        std::fs::rename(&tmp, self.path())?;
        debug!(target: "session", path = %self.path().display(), bytes = text.len(), "file_store.write");
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match std::fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
