//! TOML-backed [`SessionStorage`].

use crate::storage::{AtomicTomlError, AtomicTomlFile};
use servantin_core::error::{Result, ServantinError};
use servantin_core::session::{SessionState, SessionStorage};
use std::path::PathBuf;
use tracing::debug;

impl From<AtomicTomlError> for ServantinError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io(e) => e.into(),
            AtomicTomlError::Parse(e) => e.into(),
            AtomicTomlError::Serialize(e) => e.into(),
            other => ServantinError::storage(other.to_string()),
        }
    }
}

/// Stores the session as `auth-storage.toml` in the client home.
#[derive(Debug, Clone)]
pub struct TomlSessionStorage {
    file: AtomicTomlFile<SessionState>,
}

impl TomlSessionStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }
}

impl SessionStorage for TomlSessionStorage {
    fn load(&self) -> Result<Option<SessionState>> {
        debug!(path = %self.file.path().display(), "Loading session");
        Ok(self.file.load()?)
    }

    fn save(&self, state: &SessionState) -> Result<()> {
        self.file.save(state)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use servantin_core::session::{SessionStore, User, UserRole};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn provider() -> User {
        User {
            id: "u2".into(),
            email: "marc@example.ch".into(),
            name: "Marc Rossel".into(),
            first_name: Some("Marc".into()),
            last_name: None,
            phone: None,
            role: UserRole::Provider,
            has_provider_profile: true,
        }
    }

    #[test]
    fn test_session_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("auth-storage.toml");

        let store = SessionStore::restore(Arc::new(TomlSessionStorage::new(path.clone())));
        store.set_auth(provider(), "jwt-token").unwrap();

        let restored = SessionStore::restore(Arc::new(TomlSessionStorage::new(path)));
        assert!(restored.is_authenticated());
        assert_eq!(restored.token().as_deref(), Some("jwt-token"));
        assert_eq!(restored.role(), Some(UserRole::Provider));
    }

    #[test]
    fn test_logout_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("auth-storage.toml");
        let store = SessionStore::restore(Arc::new(TomlSessionStorage::new(path.clone())));
        store.set_auth(provider(), "jwt-token").unwrap();
        assert!(path.exists());

        store.logout().unwrap();
        assert!(!path.exists());
        let restored = SessionStore::restore(Arc::new(TomlSessionStorage::new(path)));
        assert!(!restored.is_authenticated());
    }

    #[test]
    fn test_corrupt_file_starts_signed_out() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("auth-storage.toml");
        std::fs::write(&path, "token = [").unwrap();

        let storage = TomlSessionStorage::new(path.clone());
        assert!(storage.load().is_err());
        let store = SessionStore::restore(Arc::new(TomlSessionStorage::new(path)));
        assert!(!store.is_authenticated());
    }
}
