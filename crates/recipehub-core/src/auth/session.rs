use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::models::User;
use crate::storage::KeyValueStore;

/// Storage key holding the raw bearer token
const TOKEN_KEY: &str = "token";

/// Storage key holding the JSON-serialized user profile
const USER_KEY: &str = "user";

/// The authentication token paired with the signed-in user's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<Value>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Value) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn user(&self) -> Option<User> {
        self.user.as_ref().map(User::from_value)
    }
}

pub type ListenerId = u64;

type Listener = Arc<dyn Fn(&Session) + Send + Sync>;

/// Persisted session state shared by everything that issues requests.
///
/// Writes go straight to the backend. `last_known` tracks what this instance
/// last wrote or observed, so `poll_external` only reports changes made by
/// someone else sharing the backend.
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
    last_known: Mutex<Session>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener_id: AtomicU64,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        let store = Self {
            backend,
            last_known: Mutex::new(Session::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
        };
        let initial = store.read();
        debug!(authenticated = initial.is_authenticated(), "Session loaded");
        *store.lock_last_known() = initial;
        store
    }

    /// Load the session from storage.
    ///
    /// Never fails: unreadable entries and malformed user JSON are logged and
    /// treated as absent.
    pub fn read(&self) -> Session {
        let token = match self.backend.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                None
            }
        };

        let user = match self.backend.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Null) => None,
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Stored user is not valid JSON, ignoring");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored user");
                None
            }
        };

        Session { token, user }
    }

    /// Persist a session. A `None` field removes that entry.
    ///
    /// A failed write may leave one entry updated; what did land is recorded
    /// as this instance's own state either way.
    pub fn set(&self, session: &Session) -> Result<()> {
        let result = self.write(session);
        let saved = self.read();
        debug!(
            authenticated = saved.is_authenticated(),
            complete = result.is_ok(),
            "Session saved"
        );
        *self.lock_last_known() = saved;
        result
    }

    fn write(&self, session: &Session) -> Result<()> {
        match session.token.as_deref() {
            Some(token) if !token.is_empty() => self.backend.set(TOKEN_KEY, token)?,
            _ => self.backend.remove(TOKEN_KEY)?,
        }

        match &session.user {
            Some(user) if !user.is_null() => {
                let raw = serde_json::to_string(user).context("Failed to serialize user")?;
                self.backend.set(USER_KEY, &raw)?;
            }
            _ => self.backend.remove(USER_KEY)?,
        }
        Ok(())
    }

    /// Remove both entries.
    pub fn clear(&self) -> Result<()> {
        let result = self
            .backend
            .remove(TOKEN_KEY)
            .and_then(|()| self.backend.remove(USER_KEY));
        *self.lock_last_known() = self.read();
        debug!(complete = result.is_ok(), "Session cleared");
        result
    }

    /// Current bearer token, read from storage
    pub fn token(&self) -> Option<String> {
        self.read().token
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().user()
    }

    /// Register a callback for changes made outside this instance.
    pub fn on_external_change<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.lock_listeners().push((id, Arc::new(callback)));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Re-read storage and notify listeners if someone else changed it.
    ///
    /// Returns whether a change was observed.
    pub fn poll_external(&self) -> bool {
        let current = self.read();
        {
            let mut last = self.lock_last_known();
            if *last == current {
                return false;
            }
            *last = current.clone();
        }

        // Snapshot so callbacks may register or remove listeners
        let listeners: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        debug!(
            authenticated = current.is_authenticated(),
            listeners = listeners.len(),
            "External session change observed"
        );
        for listener in listeners {
            listener(&current);
        }
        true
    }

    /// Poll storage for external changes every `interval` on the tokio runtime.
    ///
    /// The task stops once the store itself has been dropped.
    pub fn spawn_external_watcher(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                match store.upgrade() {
                    Some(store) => {
                        store.poll_external();
                    }
                    None => break,
                }
            }
            debug!("Session watcher stopped");
        })
    }

    fn lock_last_known(&self) -> MutexGuard<'_, Session> {
        self.last_known.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailingStore, FileStore, MemoryStore};
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    fn memory_store() -> (MemoryStore, SessionStore) {
        let backend = MemoryStore::new();
        let store = SessionStore::new(Arc::new(backend.clone()));
        (backend, store)
    }

    #[test]
    fn test_read_after_set_round_trips() {
        let (_, store) = memory_store();
        let sessions = [
            Session::new("abc", json!({"id": 1, "name": "Ann"})),
            Session {
                token: Some("token-only".to_string()),
                user: None,
            },
            Session {
                token: None,
                user: Some(json!({"id": "u1", "tags": ["a", "b"]})),
            },
            Session::default(),
        ];

        for session in sessions {
            store.set(&session).unwrap();
            assert_eq!(store.read(), session);
        }
    }

    #[test]
    fn test_clear_empties_the_session() {
        let (backend, store) = memory_store();
        store.set(&Session::new("abc", json!({"id": 1}))).unwrap();

        store.clear().unwrap();
        assert_eq!(store.read(), Session::default());
        assert_eq!(backend.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(backend.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_with_missing_fields_removes_entries() {
        let (backend, store) = memory_store();
        store.set(&Session::new("abc", json!({"id": 1}))).unwrap();

        store
            .set(&Session {
                token: Some("def".to_string()),
                user: None,
            })
            .unwrap();
        assert_eq!(backend.get(TOKEN_KEY).unwrap().as_deref(), Some("def"));
        assert_eq!(backend.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_persisted_layout() {
        let (backend, store) = memory_store();
        store.set(&Session::new("raw-token", json!({"id": 1}))).unwrap();

        assert_eq!(backend.get(TOKEN_KEY).unwrap().as_deref(), Some("raw-token"));
        let user: Value = serde_json::from_str(&backend.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(user, json!({"id": 1}));
    }

    #[test]
    fn test_malformed_user_reads_as_absent() {
        let backend = MemoryStore::new();
        backend.set(TOKEN_KEY, "abc").unwrap();
        backend.set(USER_KEY, "{not json").unwrap();

        let store = SessionStore::new(Arc::new(backend.clone()));
        let session = store.read();
        assert_eq!(session.token.as_deref(), Some("abc"));
        assert_eq!(session.user, None);

        backend.set(USER_KEY, "null").unwrap();
        assert_eq!(store.read().user, None);
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let backend = MemoryStore::new();
        backend.set(TOKEN_KEY, "").unwrap();
        let store = SessionStore::new(Arc::new(backend));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_current_user() {
        let (_, store) = memory_store();
        assert!(store.current_user().is_none());

        store.set(&Session::new("abc", json!({"id": 4, "name": "Bo"}))).unwrap();
        let user = store.current_user().unwrap();
        assert_eq!(user.display_name(), "Bo");
        assert!(user.has_id("4"));
    }

    #[test]
    fn test_sibling_write_is_reported_as_external() {
        let backend = MemoryStore::new();
        let ours = SessionStore::new(Arc::new(backend.clone()));
        let theirs = SessionStore::new(Arc::new(backend));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        ours.on_external_change(move |session| {
            seen_clone.lock().unwrap().push(session.clone());
        });

        // Nothing changed yet
        assert!(!ours.poll_external());

        theirs.set(&Session::new("abc", json!({"id": 1}))).unwrap();
        assert!(ours.poll_external());
        // Reported once
        assert!(!ours.poll_external());

        theirs.clear().unwrap();
        assert!(ours.poll_external());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].token.as_deref(), Some("abc"));
        assert_eq!(seen[1], Session::default());
    }

    #[test]
    fn test_own_writes_are_not_external() {
        let (_, store) = memory_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        store.on_external_change(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.set(&Session::new("abc", json!({"id": 1}))).unwrap();
        assert!(!store.poll_external());
        store.clear().unwrap();
        assert!(!store.poll_external());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_partial_write_is_not_reported_as_external() {
        let backend = FailingStore {
            fail_key: Some(USER_KEY),
            ..FailingStore::default()
        };
        let store = SessionStore::new(Arc::new(backend.clone()));
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        store.on_external_change(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        // The token lands, the user does not
        assert!(store.set(&Session::new("abc", json!({"id": 1}))).is_err());
        assert_eq!(backend.inner.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert_eq!(store.read().user, None);

        assert!(!store.poll_external());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_remove_listener() {
        let backend = MemoryStore::new();
        let ours = SessionStore::new(Arc::new(backend.clone()));
        let theirs = SessionStore::new(Arc::new(backend));

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let id = ours.on_external_change(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(ours.remove_listener(id));
        assert!(!ours.remove_listener(id));

        theirs.set(&Session::new("abc", json!({}))).unwrap();
        assert!(ours.poll_external());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_file_backed_sessions_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new("abc", json!({"id": 1, "email": "a@b.com"}));

        {
            let store = SessionStore::new(Arc::new(FileStore::new(dir.path().to_path_buf())));
            store.set(&session).unwrap();
        }

        let reopened = SessionStore::new(Arc::new(FileStore::new(dir.path().to_path_buf())));
        assert_eq!(reopened.read(), session);
    }

    #[tokio::test]
    async fn test_watcher_delivers_external_changes() {
        let backend = MemoryStore::new();
        let ours = Arc::new(SessionStore::new(Arc::new(backend.clone())));
        let theirs = SessionStore::new(Arc::new(backend));

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        ours.on_external_change(move |session| {
            let _ = tx.send(session.clone());
        });
        let watcher = ours.spawn_external_watcher(Duration::from_millis(10));

        theirs.set(&Session::new("from-elsewhere", json!({"id": 2}))).unwrap();

        let observed = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("watcher did not report the change")
            .unwrap();
        assert_eq!(observed.token.as_deref(), Some("from-elsewhere"));

        watcher.abort();
    }
}
