//! Path management for servantin client files.
//!
//! Everything the client writes lives under one directory, by default the
//! platform config directory (`~/.config/servantin/` on Linux). Setting
//! `SERVANTIN_HOME` moves the whole tree, which tests and sandboxes rely on.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the client home directory.
pub const HOME_ENV: &str = "SERVANTIN_HOME";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Neither `SERVANTIN_HOME` nor a platform config directory is available.
    #[error("Cannot find a configuration directory (set {HOME_ENV})")]
    ConfigDirNotFound,
}

/// Resolved client paths.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/servantin/         # Client home (or $SERVANTIN_HOME)
/// ├── config.toml              # API URL and request timeout
/// ├── auth-storage.toml        # Persisted session
/// └── logs/                    # CLI logs
///     └── servantin-cli.log.YYYY-MM-DD
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServantinPaths {
    home: PathBuf,
}

impl ServantinPaths {
    /// Uses `home` as the client directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Resolves the client directory from an explicit override, else the platform default.
    ///
    /// # Returns
    ///
    /// - `Ok(ServantinPaths)`: Paths rooted at the override or `<config dir>/servantin`
    /// - `Err(PathError::ConfigDirNotFound)`: No override and no platform directory
    pub fn resolve(home_override: Option<PathBuf>) -> Result<Self, PathError> {
        if let Some(home) = home_override.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(Self::with_home(home));
        }
        dirs::config_dir()
            .map(|dir| Self::with_home(dir.join("servantin")))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Resolves the client directory, honouring `SERVANTIN_HOME`.
    pub fn from_env() -> Result<Self, PathError> {
        Self::resolve(std::env::var_os(HOME_ENV).map(PathBuf::from))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn config_file(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// The persisted session (`auth-storage` key).
    pub fn session_file(&self) -> PathBuf {
        self.home.join("auth-storage.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.home.join("logs")
    }
}
