use crate::logging;
use anyhow::{Context, Result};
use servantin_application::AppContext;
use servantin_core::navigation::Router;
use servantin_core::session::SessionStore;
use servantin_infrastructure::{ApiClient, ConfigService, ServantinPaths, TomlSessionStorage};
use std::sync::Arc;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;

/// Everything a command needs, built once per invocation.
pub struct Runtime {
    pub ctx: Arc<AppContext>,
    pub router: Arc<Router>,
    _log_guard: WorkerGuard,
}

impl Runtime {
    /// The screen the last action navigated to.
    pub fn current_route(&self) -> String {
        self.router.current().path()
    }
}

/// Resolves paths, starts logging, loads config and the saved session, and wires the API client.
pub fn bootstrap(api_url: Option<String>) -> Result<Runtime> {
    let paths = ServantinPaths::from_env().context("Failed to resolve servantin directory")?;
    let log_guard = logging::init(&paths.logs_dir())?;

    let config = ConfigService::new(&paths)
        .get_config()
        .context("Failed to load client configuration")?
        .with_api_url_override(api_url);
    config.validate().context("Invalid client configuration")?;
    debug!("Using backend {}", config.api_url);

    let session = Arc::new(SessionStore::restore(Arc::new(TomlSessionStorage::new(
        paths.session_file(),
    ))));
    let router = Arc::new(Router::default());
    let api = ApiClient::new(&config, session.clone(), router.clone())
        .context("Failed to build API client")?;
    let ctx = Arc::new(AppContext::new(Arc::new(api), session, router.clone()));

    Ok(Runtime {
        ctx,
        router,
        _log_guard: log_guard,
    })
}
