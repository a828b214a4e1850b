//! Session storage.
//!
//! Holds the authenticated token and user profile. When backed by a file
//! (`<base>/session.json`), the session survives across runs; the file is
//! written with restricted permissions (0600). Tokens are never logged or
//! displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Profile of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

/// Authenticated identity: opaque token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Owns the current session and its persistence.
///
/// Created once at startup and passed by reference to whatever needs it
/// (route guard, login/logout handlers).
#[derive(Debug, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
    current: Option<Session>,
}

impl SessionStore {
    /// Returns the default session file path.
    pub fn default_path() -> PathBuf {
        paths::session_path()
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a file-backed store, loading the persisted session if present.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read session from {}", path.display()))?;
            Some(
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse session from {}", path.display()))?,
            )
        } else {
            None
        };

        Ok(Self {
            path: Some(path),
            current,
        })
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Stores a new session, replacing any previous one, and persists it.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be written. The in-memory
    /// session is left unchanged in that case.
    pub fn set(&mut self, token: impl Into<String>, user: User) -> Result<()> {
        let session = Session {
            token: token.into(),
            user,
        };
        if let Some(path) = &self.path {
            write_session(path, &session)?;
        }
        tracing::debug!(email = %session.user.email, "session stored");
        self.current = Some(session);
        Ok(())
    }

    /// Removes the session and its persisted file.
    /// Returns whether a session existed.
    ///
    /// # Errors
    /// Returns an error if the session file exists but cannot be removed.
    pub fn clear(&mut self) -> Result<bool> {
        let mut had_session = self.current.take().is_some();
        if let Some(path) = &self.path
            && path.exists()
        {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            had_session = true;
        }
        if had_session {
            tracing::debug!("session cleared");
        }
        Ok(had_session)
    }
}

/// Masks a token for display, keeping only a short prefix and suffix.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn write_session(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(session).context("Failed to serialize session")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .with_context(|| format!("Failed to open {} for writing", path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    #[cfg(not(unix))]
    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open {} for writing", path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn user_a() -> User {
        User {
            name: "A".to_string(),
            email: "a@b.com".to_string(),
        }
    }

    #[test]
    fn test_in_memory_store_starts_empty() {
        let store = SessionStore::in_memory();
        assert!(store.get().is_none());
        assert!(!store.is_authenticated());
        assert!(store.path().is_none());
    }

    #[test]
    fn test_set_then_reopen_restores_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = SessionStore::open(&path).unwrap();
        store.set("t1", user_a()).unwrap();
        assert!(path.exists());

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(),
            Some(&Session {
                token: "t1".to_string(),
                user: user_a(),
            })
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_has_restricted_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut store = SessionStore::open(&path).unwrap();
        store.set("t1", user_a()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_clear_removes_file_and_reports() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut store = SessionStore::open(&path).unwrap();
        store.set("t1", user_a()).unwrap();

        assert!(store.clear().unwrap());
        assert!(!path.exists());
        assert!(store.get().is_none());
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        assert!(SessionStore::open(&path).is_err());
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abc"), "***");
        assert_eq!(mask_token("abcdefghijkl"), "abcd...ijkl");
    }
}
