//! Session domain models.

use serde::{Deserialize, Serialize};

/// Role of an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Client,
    Provider,
    Admin,
}

/// The authenticated user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub has_provider_profile: bool,
}

impl User {
    /// Name used in greetings: the explicit first name, else the first word of `name`.
    pub fn display_first_name(&self) -> &str {
        if let Some(first) = self.first_name.as_deref().filter(|s| !s.trim().is_empty()) {
            return first;
        }
        self.name.split_whitespace().next().unwrap_or("")
    }

    pub fn is_provider(&self) -> bool {
        self.role == UserRole::Provider
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Payload of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    pub user: User,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// The persisted slice of the session store.
///
/// Scalar fields come first so the TOML encoding keeps values ahead of tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authenticated(user: User, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            is_authenticated: true,
            user: Some(user),
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }
}
