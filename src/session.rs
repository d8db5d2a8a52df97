//! Single-user session snapshot persisted to a flat JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::error;

/// Represents the authenticated user's Jira credentials plus the last filter
/// they worked through. Credentials live here only; every service call
/// receives them as explicit parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub api_token: String,
    pub instance: String,
    #[serde(default)]
    pub filter_id: Option<String>,
}

/// Manages the one active session: an in-memory copy guarded by a lock, with
/// every change mirrored to the snapshot file so a restart resumes where the
/// user left off.
#[derive(Clone)]
pub struct SessionStore {
    path: PathBuf,
    cache: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Creates a store bound to the snapshot path, loading any persisted
    /// session. Read or parse failures fall back to "not logged in".
    pub fn new(path: PathBuf) -> Self {
        let initial = if path.exists() {
            let content = fs::read_to_string(&path).unwrap_or_default();
            serde_json::from_str(&content).ok()
        } else {
            None
        };
        Self {
            path,
            cache: Arc::new(RwLock::new(initial)),
        }
    }

    /// Returns a copy of the current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.cache.read().expect("session lock poisoned").clone()
    }

    /// Replaces the session after a successful login.
    pub fn login(&self, session: Session) {
        *self.cache.write().expect("session lock poisoned") = Some(session.clone());
        self.persist(Some(&session));
    }

    /// Records the filter the user last searched with.
    pub fn set_filter_id(&self, filter_id: impl Into<String>) {
        let mut guard = self.cache.write().expect("session lock poisoned");
        if let Some(session) = guard.as_mut() {
            session.filter_id = Some(filter_id.into());
            let snapshot = session.clone();
            drop(guard);
            self.persist(Some(&snapshot));
        }
    }

    /// Drops the session and removes the snapshot.
    pub fn clear(&self) {
        *self.cache.write().expect("session lock poisoned") = None;
        self.persist(None);
    }

    fn persist(&self, session: Option<&Session>) {
        let result = match session {
            Some(session) => serde_json::to_string(session)
                .map_err(std::io::Error::other)
                .and_then(|content| {
                    if let Some(parent) = self.path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&self.path, content)
                }),
            None if self.path.exists() => fs::remove_file(&self.path),
            None => Ok(()),
        };
        if let Err(err) = result {
            error!("Failed to persist session snapshot: {err}");
        }
    }
}
