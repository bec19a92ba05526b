//! Marketplace API trait.
//!
//! Defines every backend operation the client performs. The HTTP
//! implementation lives in `servantin-infrastructure`; controllers only see
//! this trait.

use crate::admin::Page;
use crate::booking::{Booking, CreateBookingRequest};
use crate::category::Category;
use crate::error::ApiResult;
use crate::message::Message;
use crate::provider::{
    AdminProvider, MatchRequest, ProviderMatch, ProviderProfile, ProviderProfileRequest,
};
use crate::session::{AuthResponse, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub register_as_provider: bool,
}

/// An abstract client for the Servantin backend.
///
/// Each method performs exactly one request. Failures come back as
/// [`crate::error::ApiError`] with the backend's message; nothing is retried.
///
/// # Implementation Notes
///
/// Implementations must:
/// - Attach the session token as a bearer credential when one is present
/// - Clear the session and navigate to login on any 401, whatever the call
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Creates an account.
    ///
    /// # Returns
    ///
    /// - `Ok(AuthResponse)`: Account created, token issued
    /// - `Err(ApiError)`: Validation failure (e.g. email taken) or transport error
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse>;

    /// Exchanges credentials for a token.
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse>;

    /// Returns the user behind the current token.
    async fn me(&self) -> ApiResult<User>;

    /// Sends a password reset link to `email`.
    async fn request_password_reset(&self, email: &str) -> ApiResult<()>;

    /// Sets a new password using a reset token.
    async fn confirm_password_reset(&self, token: &str, new_password: &str) -> ApiResult<()>;

    async fn verify_email(&self, token: &str) -> ApiResult<()>;

    async fn resend_verification(&self, email: &str) -> ApiResult<()>;

    /// Lists categories in display order.
    async fn list_categories(&self) -> ApiResult<Vec<Category>>;

    async fn get_category(&self, slug: &str) -> ApiResult<Category>;

    /// Finds providers for a category around a location.
    ///
    /// # Returns
    ///
    /// - `Ok(vec![])`: Nobody matched; a booking will be broadcast
    /// - `Ok(matches)`: Ranked by the server
    async fn match_providers(&self, request: &MatchRequest) -> ApiResult<Vec<ProviderMatch>>;

    async fn get_provider(&self, id: &str) -> ApiResult<ProviderMatch>;

    /// The signed-in provider's profile.
    ///
    /// # Returns
    ///
    /// - `Err(ApiError)` with kind `NotFound`: no profile yet (onboarding pending)
    async fn get_own_profile(&self) -> ApiResult<ProviderProfile>;

    async fn create_profile(&self, request: &ProviderProfileRequest) -> ApiResult<ProviderProfile>;

    async fn update_profile(&self, request: &ProviderProfileRequest) -> ApiResult<ProviderProfile>;

    /// Bookings as listed under the provider namespace.
    async fn provider_profile_bookings(&self) -> ApiResult<Vec<Booking>>;

    async fn create_booking(&self, request: &CreateBookingRequest) -> ApiResult<Booking>;

    async fn get_booking(&self, id: &str) -> ApiResult<Booking>;

    async fn client_bookings(&self) -> ApiResult<Vec<Booking>>;

    async fn provider_bookings(&self) -> ApiResult<Vec<Booking>>;

    /// Requests waiting for the provider's answer.
    async fn pending_requests(&self) -> ApiResult<Vec<Booking>>;

    async fn accept_booking(&self, id: &str) -> ApiResult<Booking>;

    async fn decline_booking(&self, id: &str, reason: Option<&str>) -> ApiResult<Booking>;

    async fn complete_booking(&self, id: &str) -> ApiResult<Booking>;

    async fn cancel_booking(&self, id: &str) -> ApiResult<Booking>;

    /// Thread of a booking, oldest first.
    async fn list_messages(&self, booking_id: &str) -> ApiResult<Vec<Message>>;

    async fn send_message(&self, booking_id: &str, content: &str) -> ApiResult<Message>;

    async fn admin_providers(&self) -> ApiResult<Vec<AdminProvider>>;

    async fn verify_provider(
        &self,
        id: &str,
        verified: bool,
        notes: Option<&str>,
    ) -> ApiResult<AdminProvider>;

    /// All bookings, paginated (`page` starts at 0).
    async fn admin_bookings(&self, page: u32, size: u32) -> ApiResult<Page<Booking>>;
}
