//! Session store.
//!
//! Holds the authenticated user and bearer token for the whole client and
//! mirrors every change into a [`SessionStorage`] so a restart finds the same
//! session again.

use super::model::{SessionState, User, UserRole};
use crate::error::Result;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Durable backing for the session store.
///
/// Implementations decide where the session lives (TOML file, keychain,
/// memory for tests). The store only ever writes whole snapshots.
pub trait SessionStorage: Send + Sync {
    /// Loads the last saved session, `Ok(None)` when nothing was saved.
    fn load(&self) -> Result<Option<SessionState>>;

    /// Replaces the saved session.
    fn save(&self, state: &SessionState) -> Result<()>;

    /// Removes the saved session.
    fn clear(&self) -> Result<()>;
}

/// Storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    saved: Mutex<Option<SessionState>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<SessionState>> {
        Ok(self
            .saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, state: &SessionState) -> Result<()> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// The client's single source of truth about who is signed in.
pub struct SessionStore {
    state: RwLock<SessionState>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Restores the session saved in `storage`.
    ///
    /// A session that cannot be read is treated as signed out; the failure is logged.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let state = match storage.load() {
            Ok(Some(state)) if state.is_authenticated && state.token.is_some() => state,
            Ok(_) => SessionState::default(),
            Err(e) => {
                tracing::warn!("Failed to restore session, starting signed out: {}", e);
                SessionState::default()
            }
        };
        Self {
            state: RwLock::new(state),
            storage,
        }
    }

    /// A store that never touches the disk.
    pub fn in_memory() -> Self {
        Self::restore(Arc::new(MemorySessionStorage::new()))
    }

    /// Records a successful login or registration.
    ///
    /// The in-memory state is updated even if persisting fails.
    pub fn set_auth(&self, user: User, token: impl Into<String>) -> Result<()> {
        let next = SessionState::authenticated(user, token);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        self.storage.save(&next)
    }

    /// Replaces the cached user (after `GET /api/auth/me`), keeping the token.
    pub fn update_user(&self, user: User) -> Result<()> {
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if !state.is_authenticated {
                return Ok(());
            }
            state.user = Some(user);
            state.clone()
        };
        self.storage.save(&snapshot)
    }

    /// Forgets user and token, in memory and on disk.
    pub fn logout(&self) -> Result<()> {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = SessionState::default();
        self.storage.clear()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).role()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.snapshot();
        f.debug_struct("SessionStore")
            .field("is_authenticated", &state.is_authenticated)
            .field("user", &state.user.as_ref().map(|u| &u.email))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServantinError;

    fn provider() -> User {
        User {
            id: "p1".into(),
            email: "thomas@example.ch".into(),
            name: "Thomas Müller".into(),
            first_name: None,
            last_name: None,
            phone: None,
            role: UserRole::Provider,
            has_provider_profile: true,
        }
    }

    struct FailingStorage;

    impl SessionStorage for FailingStorage {
        fn load(&self) -> Result<Option<SessionState>> {
            Err(ServantinError::storage("corrupt"))
        }
        fn save(&self, _state: &SessionState) -> Result<()> {
            Err(ServantinError::storage("read-only"))
        }
        fn clear(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_set_auth_persists_and_flips_flag() {
        let storage = Arc::new(MemorySessionStorage::new());
        let store = SessionStore::restore(storage.clone());
        assert!(!store.is_authenticated());

        store.set_auth(provider(), "jwt-1").unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("jwt-1"));
        assert_eq!(store.role(), Some(UserRole::Provider));
        let saved = storage.load().unwrap().unwrap();
        assert_eq!(saved.token.as_deref(), Some("jwt-1"));
    }

    #[test]
    fn test_session_survives_restore() {
        let storage = Arc::new(MemorySessionStorage::new());
        SessionStore::restore(storage.clone())
            .set_auth(provider(), "jwt-2")
            .unwrap();

        let reloaded = SessionStore::restore(storage);
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.user().unwrap().email, "thomas@example.ch");
    }

    #[test]
    fn test_logout_clears_memory_and_storage() {
        let storage = Arc::new(MemorySessionStorage::new());
        let store = SessionStore::restore(storage.clone());
        store.set_auth(provider(), "jwt-3").unwrap();

        store.logout().unwrap();

        let state = store.snapshot();
        assert!(state.user.is_none());
        assert!(state.token.is_none());
        assert!(!state.is_authenticated);
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_unreadable_storage_starts_signed_out() {
        let store = SessionStore::restore(Arc::new(FailingStorage));
        assert!(!store.is_authenticated());

        // memory still reflects the login even though persisting failed
        assert!(store.set_auth(provider(), "jwt-4").is_err());
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_update_user_ignored_when_signed_out() {
        let store = SessionStore::in_memory();
        store.update_user(provider()).unwrap();
        assert!(store.user().is_none());
    }
}
