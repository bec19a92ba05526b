//! Error types for the Servantin client.
//!
//! Two families live here:
//! - [`ApiError`]: every failure observed while talking to the backend, classified
//!   by [`ApiErrorKind`] so screens can react uniformly.
//! - [`ServantinError`]: local failures (files, config, serialization) plus a
//!   wrapper around `ApiError`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failed backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiErrorKind {
    /// 401: the session is missing or expired.
    Auth,
    /// Any other 4xx: the request was rejected, usually with a message for the form.
    Validation,
    /// 404: the requested entity does not exist.
    #[serde(rename = "notfound")]
    NotFound,
    /// Transport failures, undecodable payloads and 5xx answers.
    Network,
}

/// A single field-level validation failure reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// A failed backend call.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    /// HTTP status when a response was received.
    pub status: Option<u16>,
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            field_errors: Vec::new(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Auth, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_field_errors(mut self, field_errors: Vec<FieldError>) -> Self {
        self.field_errors = field_errors;
        self
    }

    /// Maps an HTTP status to the error kind the client reacts to.
    pub fn kind_for_status(status: u16) -> ApiErrorKind {
        match status {
            401 => ApiErrorKind::Auth,
            404 => ApiErrorKind::NotFound,
            400..=499 => ApiErrorKind::Validation,
            _ => ApiErrorKind::Network,
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ApiErrorKind::Auth
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }

    /// Message to show inline in a form.
    ///
    /// Answers the backend rejected carry its wording; network failures fall
    /// back to the screen's generic message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.kind {
            ApiErrorKind::Network => fallback.to_string(),
            _ if self.message.trim().is_empty() => fallback.to_string(),
            _ => self.message.clone(),
        }
    }
}

/// Local (non-HTTP) failures of the client.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ServantinError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persistent storage error (locking, atomic writes)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ServantinError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Returns the wrapped backend error, if any.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ServantinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ServantinError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ServantinError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ServantinError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ServantinError>`.
pub type Result<T> = std::result::Result<T, ServantinError>;

/// Result of a backend call.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
