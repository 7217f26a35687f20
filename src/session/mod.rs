//! Session context
//!
//! Holds the current credential and profile, backed by a [`SessionStore`].
//! Created on login, read on every outgoing request, destroyed on logout.
//! Shared as `Arc<SessionContext>` between the HTTP client, the route guard
//! and the app.

pub mod guard;
pub mod store;

use std::sync::RwLock;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Session, UserProfile};

pub use guard::{Access, AccessPolicy, CredentialPresent, Resolution, RouteGuard, UnexpiredCredential};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, TOKEN_KEY, USER_KEY};

/// Session storage errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session data is corrupt: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Session lock poisoned")]
    Poisoned,
}

/// Explicit session state injected into the client, guard and app
pub struct SessionContext {
    store: Box<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.has_credential())
            .finish()
    }
}

impl SessionContext {
    /// Restore any persisted session from the store
    pub fn load(store: Box<dyn SessionStore>) -> Result<Self, SessionError> {
        let credential = store.get(TOKEN_KEY)?.filter(|t| !t.is_empty());
        let current = credential.map(|credential| {
            let profile = store
                .get(USER_KEY)
                .ok()
                .flatten()
                .and_then(|raw| match serde_json::from_str::<UserProfile>(&raw) {
                    Ok(profile) => Some(profile),
                    Err(e) => {
                        warn!(error = %e, "stored user profile unreadable");
                        None
                    }
                })
                .unwrap_or_else(|| UserProfile {
                    username: String::new(),
                    email: String::new(),
                });
            Session {
                credential,
                profile,
            }
        });

        debug!(restored = current.is_some(), "session loaded");
        Ok(Self {
            store,
            current: RwLock::new(current),
        })
    }

    /// Load from `session.json` in the data directory, or memory when there is none
    pub fn open_default() -> Result<Self, SessionError> {
        let store: Box<dyn SessionStore> = match FileSessionStore::default_path() {
            Some(path) => Box::new(FileSessionStore::new(path)),
            None => Box::new(MemorySessionStore::new()),
        };
        Self::load(store)
    }

    /// A context with no persisted state, kept in memory only
    pub fn ephemeral() -> Self {
        Self {
            store: Box::new(MemorySessionStore::new()),
            current: RwLock::new(None),
        }
    }

    /// Current bearer credential, if any
    pub fn credential(&self) -> Option<String> {
        self.current
            .read()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.credential.clone()))
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some_and(|c| !c.is_empty())
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.current
            .read()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.profile.clone()))
            .filter(|p| !p.username.is_empty() || !p.email.is_empty())
    }

    /// Store a freshly issued session (both keys)
    pub fn begin(&self, session: Session) -> Result<(), SessionError> {
        self.store.set(TOKEN_KEY, &session.credential)?;
        self.store
            .set(USER_KEY, &serde_json::to_string(&session.profile)?)?;

        debug!(user = %session.profile.username, "session started");
        let mut current = self.current.write().map_err(|_| SessionError::Poisoned)?;
        *current = Some(session);
        Ok(())
    }

    /// Drop the session and clear both storage keys
    pub fn end(&self) -> Result<(), SessionError> {
        {
            let mut current = self.current.write().map_err(|_| SessionError::Poisoned)?;
            *current = None;
        }
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        debug!("session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn alice() -> Session {
        Session {
            credential: "t1".into(),
            profile: UserProfile {
                username: "alice".into(),
                email: "a@x.com".into(),
            },
        }
    }

    /// Store wrapper that exposes the raw entries for assertions
    #[derive(Clone, Default)]
    struct SharedStore(Arc<MemorySessionStore>);

    impl SessionStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
            self.0.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
            self.0.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), SessionError> {
            self.0.remove(key)
        }
    }

    #[test]
    fn test_begin_writes_both_keys() {
        let store = SharedStore::default();
        let ctx = SessionContext::load(Box::new(store.clone())).unwrap();
        assert!(!ctx.has_credential());

        ctx.begin(alice()).unwrap();
        assert_eq!(ctx.credential().as_deref(), Some("t1"));
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("t1"));
        let user: UserProfile =
            serde_json::from_str(&store.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_end_clears_both_keys() {
        let store = SharedStore::default();
        let ctx = SessionContext::load(Box::new(store.clone())).unwrap();
        ctx.begin(alice()).unwrap();

        ctx.end().unwrap();
        assert!(!ctx.has_credential());
        assert!(ctx.profile().is_none());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_load_restores_persisted_session() {
        let store = SharedStore::default();
        store.set(TOKEN_KEY, "persisted").unwrap();
        store
            .set(USER_KEY, r#"{"username":"bob","email":"b@x.com"}"#)
            .unwrap();

        let ctx = SessionContext::load(Box::new(store)).unwrap();
        assert_eq!(ctx.credential().as_deref(), Some("persisted"));
        assert_eq!(ctx.profile().unwrap().username, "bob");
    }

    #[test]
    fn test_load_token_without_profile() {
        let store = SharedStore::default();
        store.set(TOKEN_KEY, "bare").unwrap();
        store.set(USER_KEY, "{broken").unwrap();

        let ctx = SessionContext::load(Box::new(store)).unwrap();
        assert!(ctx.has_credential());
        assert!(ctx.profile().is_none());
    }

    #[test]
    fn test_empty_token_is_not_a_session() {
        let store = SharedStore::default();
        store.set(TOKEN_KEY, "").unwrap();
        let ctx = SessionContext::load(Box::new(store)).unwrap();
        assert!(!ctx.has_credential());
    }
}
