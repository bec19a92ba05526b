//! `MarketplaceApi` over HTTP.
//!
//! Every request goes through [`ApiClient::execute`], which attaches the
//! bearer token, classifies failures into [`ApiError`] and reacts to a 401 by
//! clearing the session and sending the user to login.

use crate::config_service::ClientConfig;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use servantin_core::admin::Page;
use servantin_core::api::{LoginRequest, MarketplaceApi, RegisterRequest};
use servantin_core::booking::{Booking, CreateBookingRequest};
use servantin_core::category::Category;
use servantin_core::error::{ApiError, ApiResult, FieldError, Result, ServantinError};
use servantin_core::message::{Message, SendMessageRequest};
use servantin_core::navigation::{Navigator, Route};
use servantin_core::provider::{
    AdminProvider, MatchRequest, ProviderMatch, ProviderProfile, ProviderProfileRequest,
};
use servantin_core::session::{AuthResponse, SessionStore, User};
use std::sync::Arc;
use tracing::{debug, warn};

/// Error body produced by the backend for every rejected request.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<Vec<FieldError>>,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResetConfirmBody<'a> {
    token: &'a str,
    new_password: &'a str,
}

/// HTTP client for the Servantin backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Builds a client for `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the underlying HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ServantinError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "API request");
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request once and turns any non-success answer into an [`ApiError`].
    async fn execute(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await.map_err(|err| {
            ApiError::network(format!("Request to the Servantin API failed: {err}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_http_error(status, &body))
    }

    fn handle_unauthorized(&self) {
        warn!("API answered 401, signing out");
        if let Err(e) = self.session.logout() {
            warn!("Failed to clear persisted session: {}", e);
        }
        self.navigator.navigate(Route::login());
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.execute(builder).await?;
        let status = response.status();
        response.json::<T>().await.map_err(|err| {
            ApiError::network(format!("Failed to decode API response: {err}"))
                .with_status(status.as_u16())
        })
    }

    async fn send_only(&self, builder: RequestBuilder) -> ApiResult<()> {
        self.execute(builder).await.map(|_| ())
    }
}

fn map_http_error(status: StatusCode, body: &str) -> ApiError {
    let payload = serde_json::from_str::<ErrorPayload>(body).unwrap_or_default();
    let message = payload
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    ApiError::new(ApiError::kind_for_status(status.as_u16()), message)
        .with_status(status.as_u16())
        .with_field_errors(payload.errors.unwrap_or_default())
}

fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

#[async_trait]
impl MarketplaceApi for ApiClient {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.fetch(self.request(Method::POST, "/api/auth/register").json(request))
            .await
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.fetch(self.request(Method::POST, "/api/auth/login").json(request))
            .await
    }

    async fn me(&self) -> ApiResult<User> {
        self.fetch(self.request(Method::GET, "/api/auth/me")).await
    }

    async fn request_password_reset(&self, email: &str) -> ApiResult<()> {
        self.send_only(
            self.request(Method::POST, "/api/auth/password-reset/request")
                .json(&EmailBody { email }),
        )
        .await
    }

    async fn confirm_password_reset(&self, token: &str, new_password: &str) -> ApiResult<()> {
        self.send_only(
            self.request(Method::POST, "/api/auth/password-reset/confirm")
                .json(&PasswordResetConfirmBody {
                    token,
                    new_password,
                }),
        )
        .await
    }

    async fn verify_email(&self, token: &str) -> ApiResult<()> {
        self.send_only(
            self.request(Method::POST, "/api/auth/verify-email")
                .json(&TokenBody { token }),
        )
        .await
    }

    async fn resend_verification(&self, email: &str) -> ApiResult<()> {
        self.send_only(
            self.request(Method::POST, "/api/auth/resend-verification")
                .query(&[("email", email)]),
        )
        .await
    }

    async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        self.fetch(self.request(Method::GET, "/api/categories")).await
    }

    async fn get_category(&self, slug: &str) -> ApiResult<Category> {
        let path = format!("/api/categories/{}", segment(slug));
        self.fetch(self.request(Method::GET, &path)).await
    }

    async fn match_providers(&self, request: &MatchRequest) -> ApiResult<Vec<ProviderMatch>> {
        self.fetch(self.request(Method::POST, "/api/providers/match").json(request))
            .await
    }

    async fn get_provider(&self, id: &str) -> ApiResult<ProviderMatch> {
        let path = format!("/api/providers/{}", segment(id));
        self.fetch(self.request(Method::GET, &path)).await
    }

    async fn get_own_profile(&self) -> ApiResult<ProviderProfile> {
        self.fetch(self.request(Method::GET, "/api/providers/profile"))
            .await
    }

    async fn create_profile(&self, request: &ProviderProfileRequest) -> ApiResult<ProviderProfile> {
        self.fetch(self.request(Method::POST, "/api/providers/profile").json(request))
            .await
    }

    async fn update_profile(&self, request: &ProviderProfileRequest) -> ApiResult<ProviderProfile> {
        self.fetch(self.request(Method::PUT, "/api/providers/profile").json(request))
            .await
    }

    async fn provider_profile_bookings(&self) -> ApiResult<Vec<Booking>> {
        self.fetch(self.request(Method::GET, "/api/providers/bookings"))
            .await
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> ApiResult<Booking> {
        self.fetch(self.request(Method::POST, "/api/bookings").json(request))
            .await
    }

    async fn get_booking(&self, id: &str) -> ApiResult<Booking> {
        let path = format!("/api/bookings/{}", segment(id));
        self.fetch(self.request(Method::GET, &path)).await
    }

    async fn client_bookings(&self) -> ApiResult<Vec<Booking>> {
        self.fetch(self.request(Method::GET, "/api/bookings/client"))
            .await
    }

    async fn provider_bookings(&self) -> ApiResult<Vec<Booking>> {
        self.fetch(self.request(Method::GET, "/api/bookings/provider"))
            .await
    }

    async fn pending_requests(&self) -> ApiResult<Vec<Booking>> {
        self.fetch(self.request(Method::GET, "/api/bookings/provider/pending"))
            .await
    }

    async fn accept_booking(&self, id: &str) -> ApiResult<Booking> {
        let path = format!("/api/bookings/{}/accept", segment(id));
        self.fetch(self.request(Method::POST, &path)).await
    }

    async fn decline_booking(&self, id: &str, reason: Option<&str>) -> ApiResult<Booking> {
        let path = format!("/api/bookings/{}/decline", segment(id));
        let mut builder = self.request(Method::POST, &path);
        if let Some(reason) = reason.filter(|r| !r.trim().is_empty()) {
            builder = builder.query(&[("reason", reason)]);
        }
        self.fetch(builder).await
    }

    async fn complete_booking(&self, id: &str) -> ApiResult<Booking> {
        let path = format!("/api/bookings/{}/complete", segment(id));
        self.fetch(self.request(Method::POST, &path)).await
    }

    async fn cancel_booking(&self, id: &str) -> ApiResult<Booking> {
        let path = format!("/api/bookings/{}/cancel", segment(id));
        self.fetch(self.request(Method::POST, &path)).await
    }

    async fn list_messages(&self, booking_id: &str) -> ApiResult<Vec<Message>> {
        let path = format!("/api/bookings/{}/messages", segment(booking_id));
        self.fetch(self.request(Method::GET, &path)).await
    }

    async fn send_message(&self, booking_id: &str, content: &str) -> ApiResult<Message> {
        let path = format!("/api/bookings/{}/messages", segment(booking_id));
        let body = SendMessageRequest {
            content: content.to_string(),
        };
        self.fetch(self.request(Method::POST, &path).json(&body))
            .await
    }

    async fn admin_providers(&self) -> ApiResult<Vec<AdminProvider>> {
        self.fetch(self.request(Method::GET, "/api/admin/providers"))
            .await
    }

    async fn verify_provider(
        &self,
        id: &str,
        verified: bool,
        notes: Option<&str>,
    ) -> ApiResult<AdminProvider> {
        let path = format!("/api/admin/providers/{}/verify", segment(id));
        let mut query = vec![("verified", verified.to_string())];
        if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
            query.push(("notes", notes.to_string()));
        }
        self.fetch(self.request(Method::PUT, &path).query(&query))
            .await
    }

    async fn admin_bookings(&self, page: u32, size: u32) -> ApiResult<Page<Booking>> {
        self.fetch(
            self.request(Method::GET, "/api/admin/bookings")
                .query(&[("page", page), ("size", size)]),
        )
        .await
    }
}
