// src/session.rs
//
// Persistence of the bearer token and the signed-in user. The dashboard kept
// these two values in browser local storage; here the same contract is a
// trait with an in-memory and a JSON-file implementation.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::SessionError;
use crate::models::User;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: Option<String>,
    pub user: Option<User>,
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> StoredSession;
    fn save(&self, token: &str, user: &User) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;

    fn token(&self) -> Option<String> {
        self.load().token
    }

    fn user(&self) -> Option<User> {
        self.load().user
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<StoredSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(StoredSession {
                token: Some(token.into()),
                user: None,
            }),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> StoredSession {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn save(&self, token: &str, user: &User) -> Result<(), SessionError> {
        let mut guard = self.inner.write().unwrap_or_else(|p| p.into_inner());
        *guard = StoredSession {
            token: Some(token.to_string()),
            user: Some(user.clone()),
        };
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.inner.write().unwrap_or_else(|p| p.into_inner());
        *guard = StoredSession::default();
        Ok(())
    }
}

/// JSON file with `token` and `user`. A missing or unreadable file is an
/// empty session.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> StoredSession {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return StoredSession::default(),
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring corrupt session file");
            StoredSession::default()
        })
    }

    fn save(&self, token: &str, user: &User) -> Result<(), SessionError> {
        let session = StoredSession {
            token: Some(token.to_string()),
            user: Some(user.clone()),
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&session)?)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// File-backed when `SESSION_FILE` is set, in-memory otherwise.
pub fn store_from_config(cfg: &Config) -> Arc<dyn SessionStore> {
    match &cfg.session_file {
        Some(path) => Arc::new(FileSessionStore::new(path)),
        None => Arc::new(MemorySessionStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            full_name: "Admin".into(),
            email: "admin@clinic.local".into(),
            roles: vec!["admin".into()],
        }
    }

    #[test]
    fn test_memory_store_save_and_clear() {
        let store = MemorySessionStore::new();
        assert_eq!(store.token(), None);

        store.save("tok", &user()).unwrap();
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.user(), Some(user()));

        store.clear().unwrap();
        assert_eq!(store.load(), StoredSession::default());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = std::env::temp_dir()
            .join(format!("session-{}", uuid::Uuid::new_v4()))
            .join("session.json");

        FileSessionStore::new(&path).save("tok", &user()).unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.token().as_deref(), Some("tok"));
        assert_eq!(reopened.user().map(|u| u.email), Some("admin@clinic.local".to_string()));

        reopened.clear().unwrap();
        assert_eq!(reopened.token(), None);
        // clearing twice is fine
        reopened.clear().unwrap();

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_corrupt_file_is_empty_session() {
        let path = std::env::temp_dir().join(format!("session-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, b"{not json").unwrap();

        assert_eq!(FileSessionStore::new(&path).load(), StoredSession::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_store_from_config_picks_file_when_set() {
        let mut cfg = Config::from_env().unwrap();
        let path = std::env::temp_dir().join(format!("session-{}.json", uuid::Uuid::new_v4()));

        cfg.session_file = Some(path.clone());
        store_from_config(&cfg).save("tok", &user()).unwrap();
        assert_eq!(FileSessionStore::new(&path).token().as_deref(), Some("tok"));

        cfg.session_file = None;
        assert_eq!(store_from_config(&cfg).token(), None);
        let _ = fs::remove_file(path);
    }
}
