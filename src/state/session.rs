//! Durable session storage.
//!
//! DESIGN
//! ======
//! The session is read once through an injected [`SessionStore`] and then
//! cached in memory by the client. Stores only need `load`/`save`/`clear`;
//! the file store keeps the two durable keys (`token`, `user_id`) in a small
//! JSON object.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Authenticated identity held by the client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self { token: Some(token.into()), user_id: Some(user_id.into()) }
    }

    /// Token, if present and non-empty.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// Durable backing store for the session.
pub trait SessionStore: Send + Sync {
    /// Read the stored session; an absent session loads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store exists but cannot be read.
    fn load(&self) -> Result<Session, ClientError>;

    /// Persist `session`, replacing anything stored before.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&self, session: &Session) -> Result<(), ClientError>;

    /// Remove the stored session. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be removed.
    fn clear(&self) -> Result<(), ClientError>;
}

/// Session stored as a JSON file.
///
/// A file that no longer parses loads as logged out, so a later `save` or
/// `clear` can recover it.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Session, ClientError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Session::default()),
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(session) => Ok(session),
                Err(error) => {
                    tracing::warn!(path = %self.path.display(), %error, "unreadable session file; treating as logged out");
                    Ok(Session::default())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Session::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        let mut file = open_private(&self.path)?;
        file.write_all(raw.as_bytes())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Open `path` for writing, readable by the owner only on unix.
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

/// Process-local store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Session>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { inner: Mutex::new(session) }
    }

    fn with<T>(&self, f: impl FnOnce(&mut Session) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Session, ClientError> {
        Ok(self.with(|s| s.clone()))
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        self.with(|s| *s = session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        self.with(|s| *s = Session::default());
        Ok(())
    }
}
