//! Test doubles shared by the controller tests.

use crate::AppContext;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use servantin_core::admin::Page;
use servantin_core::api::{LoginRequest, MarketplaceApi, RegisterRequest};
use servantin_core::booking::{
    Booking, BookingCategory, BookingClient, BookingProvider, BookingStatus, CreateBookingRequest,
    PaymentStatus,
};
use servantin_core::category::Category;
use servantin_core::error::{ApiError, ApiResult};
use servantin_core::message::Message;
use servantin_core::navigation::Router;
use servantin_core::provider::{
    AdminProvider, MatchRequest, ProviderMatch, ProviderProfile, ProviderProfileRequest,
};
use servantin_core::session::{AuthResponse, SessionStore, User, UserRole};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn user(id: &str, name: &str, role: UserRole) -> User {
    User {
        id: id.to_string(),
        email: format!("{id}@example.ch"),
        name: name.to_string(),
        first_name: None,
        last_name: None,
        phone: None,
        role,
        has_provider_profile: role == UserRole::Provider,
    }
}

pub fn client_user() -> User {
    user("u1", "Claire Fleury", UserRole::Client)
}

pub fn provider_user() -> User {
    user("u2", "Marc Rossel", UserRole::Provider)
}

pub fn admin_user() -> User {
    user("u9", "Admin Servantin", UserRole::Admin)
}

pub fn categories() -> Vec<Category> {
    vec![
        Category {
            id: "c2".into(),
            slug: "home-repair".into(),
            name: "Petits travaux".into(),
            description: "Réparations".into(),
            icon: "wrench".into(),
            sort_order: 2,
        },
        Category {
            id: "c1".into(),
            slug: "babysitting".into(),
            name: "Babysitting".into(),
            description: "Garde d'enfants".into(),
            icon: "baby".into(),
            sort_order: 1,
        },
    ]
}

pub fn booking(id: &str, status: BookingStatus) -> Booking {
    let created = Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap();
    Booking {
        id: id.to_string(),
        category: BookingCategory {
            id: "c1".into(),
            slug: "babysitting".into(),
            name: "Babysitting".into(),
        },
        client: BookingClient {
            id: "u1".into(),
            name: "Claire Fleury".into(),
            email: "u1@example.ch".into(),
        },
        provider: None,
        status,
        description: "Garde d'un enfant".into(),
        postal_code: "2800".into(),
        city: "Delémont".into(),
        canton: "JU".into(),
        preferred_date: None,
        preferred_time_slot: None,
        budget_min: None,
        budget_max: None,
        agreed_price: None,
        payment_status: PaymentStatus::Pending,
        rating: None,
        unread_message_count: 0,
        created_at: created,
        updated_at: created,
    }
}

pub fn with_provider(mut booking: Booking) -> Booking {
    booking.provider = Some(BookingProvider {
        id: "p1".into(),
        name: "Marc Rossel".into(),
        photo_url: None,
        is_verified: true,
        average_rating: Some(4.8),
    });
    booking
}

pub fn message(id: &str, sender_id: &str, content: &str) -> Message {
    Message {
        id: id.to_string(),
        sender_id: sender_id.to_string(),
        sender_name: String::new(),
        content: content.to_string(),
        is_read: false,
        created_at: Utc.with_ymd_and_hms(2025, 3, 5, 10, 0, 0).unwrap(),
    }
}

pub fn provider_match(id: &str, name: &str) -> ProviderMatch {
    ProviderMatch {
        id: id.to_string(),
        user_id: format!("user-{id}"),
        name: name.to_string(),
        photo_url: None,
        bio: String::new(),
        languages: vec!["fr".into()],
        is_verified: true,
        average_rating: Some(4.5),
        rating_count: 3,
        city: "Delémont".into(),
        hourly_rate: Some(30.0),
        fixed_price: None,
        pricing_type: "HOURLY".into(),
        response_time_minutes: Some(60),
    }
}

pub fn profile_from(request: &ProviderProfileRequest) -> ProviderProfile {
    ProviderProfile {
        id: "p1".into(),
        name: "Marc Rossel".into(),
        bio: request.bio.clone(),
        category_ids: request.category_ids.clone(),
        languages: request.languages.clone(),
        postal_code: request.postal_code.clone(),
        city: request.city.clone(),
        service_radius: request.service_radius,
        hourly_rate: request.hourly_rate,
        certifications: request.certifications.clone(),
        years_of_experience: request.years_of_experience,
        is_verified: false,
        average_rating: None,
        rating_count: 0,
    }
}

/// In-memory backend recording every call as `"operation:detail"`.
#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
    pub auth: Mutex<Option<AuthResponse>>,
    pub categories: Mutex<Vec<Category>>,
    pub matches: Mutex<Vec<ProviderMatch>>,
    pub bookings: Mutex<BTreeMap<String, Booking>>,
    pub messages: Mutex<Vec<Message>>,
    pub profile: Mutex<Option<ProviderProfile>>,
    pub providers: Mutex<Vec<AdminProvider>>,
    /// When set, `accept_booking` waits for a notification before answering.
    pub accept_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockApi {
    pub fn new() -> Self {
        let api = Self::default();
        *api.categories.lock().unwrap() = categories();
        api
    }

    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        *self.bookings.lock().unwrap() = bookings.into_iter().map(|b| (b.id.clone(), b)).collect();
        self
    }

    /// Makes every later call to `operation` fail with `error`.
    pub fn fail(&self, operation: &'static str, error: ApiError) {
        self.failures.lock().unwrap().insert(operation, error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<String> {
        let prefix = format!("{operation}:");
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(&prefix))
            .collect()
    }

    fn record(&self, operation: &'static str, detail: impl Into<String>) -> ApiResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation}:{}", detail.into()));
        match self.failures.lock().unwrap().get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn booking(&self, id: &str) -> ApiResult<Booking> {
        self.bookings
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Booking not found").with_status(404))
    }

    fn transition(&self, id: &str, status: BookingStatus) -> ApiResult<Booking> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .get_mut(id)
            .ok_or_else(|| ApiError::not_found("Booking not found").with_status(404))?;
        booking.status = status;
        Ok(booking.clone())
    }

    fn all_bookings(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().values().cloned().collect()
    }

    fn auth_response(&self) -> ApiResult<AuthResponse> {
        self.auth
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::validation("Email ou mot de passe invalide").with_status(400))
    }
}

#[async_trait]
impl MarketplaceApi for MockApi {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.record("register", request.email.clone())?;
        self.auth_response()
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.record("login", request.email.clone())?;
        self.auth_response()
    }

    async fn me(&self) -> ApiResult<User> {
        self.record("me", "")?;
        self.auth_response().map(|a| a.user)
    }

    async fn request_password_reset(&self, email: &str) -> ApiResult<()> {
        self.record("request_password_reset", email)
    }

    async fn confirm_password_reset(&self, token: &str, _new_password: &str) -> ApiResult<()> {
        self.record("confirm_password_reset", token)
    }

    async fn verify_email(&self, token: &str) -> ApiResult<()> {
        self.record("verify_email", token)
    }

    async fn resend_verification(&self, email: &str) -> ApiResult<()> {
        self.record("resend_verification", email)
    }

    async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        self.record("list_categories", "")?;
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn get_category(&self, slug: &str) -> ApiResult<Category> {
        self.record("get_category", slug)?;
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Category not found").with_status(404))
    }

    async fn match_providers(&self, request: &MatchRequest) -> ApiResult<Vec<ProviderMatch>> {
        self.record(
            "match_providers",
            format!(
                "{}|{}|{}|{}",
                request.category_id,
                request.postal_code,
                request.city,
                request
                    .preferred_time
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_default()
            ),
        )?;
        Ok(self.matches.lock().unwrap().clone())
    }

    async fn get_provider(&self, id: &str) -> ApiResult<ProviderMatch> {
        self.record("get_provider", id)?;
        self.matches
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Provider not found").with_status(404))
    }

    async fn get_own_profile(&self) -> ApiResult<ProviderProfile> {
        self.record("get_own_profile", "")?;
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::not_found("Provider profile not found").with_status(404))
    }

    async fn create_profile(&self, request: &ProviderProfileRequest) -> ApiResult<ProviderProfile> {
        self.record("create_profile", request.bio.clone())?;
        let profile = profile_from(request);
        *self.profile.lock().unwrap() = Some(profile.clone());
        Ok(profile)
    }

    async fn update_profile(&self, request: &ProviderProfileRequest) -> ApiResult<ProviderProfile> {
        self.record("update_profile", request.bio.clone())?;
        let profile = profile_from(request);
        *self.profile.lock().unwrap() = Some(profile.clone());
        Ok(profile)
    }

    async fn provider_profile_bookings(&self) -> ApiResult<Vec<Booking>> {
        self.record("provider_profile_bookings", "")?;
        Ok(self.all_bookings())
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> ApiResult<Booking> {
        self.record("create_booking", request.category_id.clone())?;
        let mut created = booking("B-new", BookingStatus::Requested);
        created.description = request.description.clone();
        created.postal_code = request.postal_code.clone();
        created.city = request.city.clone();
        self.bookings
            .lock()
            .unwrap()
            .insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn get_booking(&self, id: &str) -> ApiResult<Booking> {
        self.record("get_booking", id)?;
        self.booking(id)
    }

    async fn client_bookings(&self) -> ApiResult<Vec<Booking>> {
        self.record("client_bookings", "")?;
        Ok(self.all_bookings())
    }

    async fn provider_bookings(&self) -> ApiResult<Vec<Booking>> {
        self.record("provider_bookings", "")?;
        Ok(self.all_bookings())
    }

    async fn pending_requests(&self) -> ApiResult<Vec<Booking>> {
        self.record("pending_requests", "")?;
        Ok(self
            .all_bookings()
            .into_iter()
            .filter(|b| b.status == BookingStatus::Requested)
            .collect())
    }

    async fn accept_booking(&self, id: &str) -> ApiResult<Booking> {
        self.record("accept_booking", id)?;
        let gate = self.accept_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.transition(id, BookingStatus::Accepted)
    }

    async fn decline_booking(&self, id: &str, reason: Option<&str>) -> ApiResult<Booking> {
        self.record("decline_booking", format!("{id}|{}", reason.unwrap_or("")))?;
        self.transition(id, BookingStatus::Declined)
    }

    async fn complete_booking(&self, id: &str) -> ApiResult<Booking> {
        self.record("complete_booking", id)?;
        self.transition(id, BookingStatus::Completed)
    }

    async fn cancel_booking(&self, id: &str) -> ApiResult<Booking> {
        self.record("cancel_booking", id)?;
        self.transition(id, BookingStatus::Canceled)
    }

    async fn list_messages(&self, booking_id: &str) -> ApiResult<Vec<Message>> {
        self.record("list_messages", booking_id)?;
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn send_message(&self, booking_id: &str, content: &str) -> ApiResult<Message> {
        self.record("send_message", format!("{booking_id}|{content}"))?;
        let mut messages = self.messages.lock().unwrap();
        let sent = message(&format!("m{}", messages.len() + 1), "u1", content);
        messages.push(sent.clone());
        Ok(sent)
    }

    async fn admin_providers(&self) -> ApiResult<Vec<AdminProvider>> {
        self.record("admin_providers", "")?;
        Ok(self.providers.lock().unwrap().clone())
    }

    async fn verify_provider(
        &self,
        id: &str,
        verified: bool,
        notes: Option<&str>,
    ) -> ApiResult<AdminProvider> {
        self.record("verify_provider", format!("{id}|{verified}|{}", notes.unwrap_or("")))?;
        let mut providers = self.providers.lock().unwrap();
        let provider = providers
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::not_found("Provider not found").with_status(404))?;
        provider.is_verified = verified;
        provider.verification_notes = notes.map(str::to_string);
        Ok(provider.clone())
    }

    async fn admin_bookings(&self, page: u32, size: u32) -> ApiResult<Page<Booking>> {
        self.record("admin_bookings", format!("{page}|{size}"))?;
        let all = self.all_bookings();
        let total = all.len() as u64;
        let total_pages = all.len().div_ceil(size.max(1) as usize) as u32;
        let content = all
            .into_iter()
            .skip((page * size) as usize)
            .take(size as usize)
            .collect();
        Ok(Page {
            content,
            page,
            size,
            total_elements: total,
            total_pages,
            first: page == 0,
            last: page + 1 >= total_pages,
        })
    }
}

/// A context wired to a [`MockApi`] and an in-memory router.
pub struct TestHarness {
    pub ctx: Arc<AppContext>,
    pub api: Arc<MockApi>,
    pub router: Arc<Router>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_api(MockApi::new())
    }

    pub fn with_api(api: MockApi) -> Self {
        let api = Arc::new(api);
        let router = Arc::new(Router::default());
        let ctx = Arc::new(AppContext::new(
            api.clone(),
            Arc::new(SessionStore::in_memory()),
            router.clone(),
        ));
        Self { ctx, api, router }
    }

    pub fn signed_in(user: User) -> Self {
        Self::signed_in_with(user, MockApi::new())
    }

    pub fn signed_in_with(user: User, api: MockApi) -> Self {
        let harness = Self::with_api(api);
        harness.ctx.session.set_auth(user, "token").unwrap();
        harness
    }
}
