//! Client configuration.
//!
//! Loaded from `config.toml` in the client home (written with defaults on
//! first run) and cached. `SERVANTIN_API_URL` overrides the backend URL.

use crate::paths::ServantinPaths;
use crate::storage::AtomicTomlFile;
use serde::{Deserialize, Serialize};
use servantin_core::error::{Result, ServantinError};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable overriding [`ClientConfig::api_url`].
pub const API_URL_ENV: &str = "SERVANTIN_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend, without the `/api` prefix.
    pub api_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Applies an API URL override; blank values are ignored.
    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.api_url = url;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ServantinError::config(format!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ServantinError::config("request_timeout_secs must be positive"));
        }
        Ok(())
    }
}

/// Loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicTomlFile<ClientConfig>,
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &ServantinPaths) -> Self {
        Self {
            file: AtomicTomlFile::new(paths.config_file()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, reading the file on first access.
    pub fn get_config(&self) -> Result<ClientConfig> {
        if let Some(cached) = self
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(cached.clone());
        }

        let loaded = self
            .load_file()?
            .with_api_url_override(std::env::var(API_URL_ENV).ok());
        loaded.validate()?;
        debug!(api_url = %loaded.api_url, "Loaded client config");

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn load_file(&self) -> Result<ClientConfig> {
        match self.file.load()? {
            Some(config) => Ok(config),
            None => {
                let defaults = ClientConfig::default();
                self.file.save(&defaults)?;
                info!(path = %self.file.path().display(), "Created default config");
                Ok(defaults)
            }
        }
    }
}
