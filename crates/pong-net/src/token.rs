//! Persistence of the authorization token the store issues.
//!
//! The token is read on every connect attempt and overwritten whenever the
//! store hands out a new one. It lives under a fixed key; for the file
//! backend the key is the file name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Errors from a token backend.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The stored token could not be read.
    #[error("failed to read token {path}: {source}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The token could not be written.
    #[error("failed to write token {path}: {source}")]
    Write {
        /// File that was written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A place to keep the authorization token between sessions.
pub trait TokenStore {
    /// The stored token, if one exists. A missing token is `Ok(None)`.
    fn load(&self) -> Result<Option<String>, TokenError>;

    /// Replace the stored token.
    fn store(&mut self, token: &str) -> Result<(), TokenError>;
}

/// Token kept in a single file named after the key.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the token as `<dir>/<key>`.
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(key),
        }
    }

    /// Path of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(TokenError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn store(&mut self, token: &str) -> Result<(), TokenError> {
        let write_err = |source| TokenError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, token).map_err(write_err)
    }
}

/// In-memory key/value token storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    key: String,
    entries: HashMap<String, String>,
}

impl MemoryTokenStore {
    /// Empty store using `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: HashMap::new(),
        }
    }

    /// Store pre-seeded with a token.
    pub fn with_token(key: impl Into<String>, token: impl Into<String>) -> Self {
        let mut store = Self::new(key);
        store.entries.insert(store.key.clone(), token.into());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenError> {
        Ok(self.entries.get(&self.key).cloned())
    }

    fn store(&mut self, token: &str) -> Result<(), TokenError> {
        self.entries.insert(self.key.clone(), token.to_string());
        Ok(())
    }
}

impl<T: TokenStore + ?Sized> TokenStore for Box<T> {
    fn load(&self) -> Result<Option<String>, TokenError> {
        (**self).load()
    }

    fn store(&mut self, token: &str) -> Result<(), TokenError> {
        (**self).store(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path(), "auth_token");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileTokenStore::new(&dir.path().join("nested"), "auth_token");

        store.store("first").unwrap();
        store.store("second").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("second"));
        assert!(store.path().ends_with("nested/auth_token"));
    }

    #[test]
    fn test_blank_file_is_no_token() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("auth_token"), "  \n").unwrap();
        let store = FileTokenStore::new(dir.path(), "auth_token");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryTokenStore::new("auth_token");
        assert!(store.load().unwrap().is_none());
        store.store("abc").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));

        let seeded = MemoryTokenStore::with_token("auth_token", "xyz");
        assert_eq!(seeded.load().unwrap().as_deref(), Some("xyz"));
    }
}
