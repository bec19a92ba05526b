//! Infrastructure for the Servantin client: the HTTP API client, file paths,
//! configuration and the on-disk session.

pub mod config_service;
pub mod http;
pub mod paths;
pub mod storage;
pub mod toml_session_storage;

pub use config_service::{ClientConfig, ConfigService};
pub use http::ApiClient;
pub use paths::ServantinPaths;
pub use toml_session_storage::TomlSessionStorage;
