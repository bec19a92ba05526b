//! Back-office: provider verification and the booking ledger.

use crate::{AppContext, GENERIC_ERROR, InFlight, ScreenError, ScreenResult};
use servantin_core::admin::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, Page};
use servantin_core::booking::Booking;
use servantin_core::provider::AdminProvider;
use servantin_core::session::UserRole;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

#[derive(Debug)]
struct AdminView {
    providers: Vec<AdminProvider>,
    bookings: Page<Booking>,
}

impl Default for AdminView {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            bookings: Page::empty(DEFAULT_PAGE, DEFAULT_PAGE_SIZE),
        }
    }
}

pub struct AdminController {
    ctx: Arc<AppContext>,
    view: Mutex<AdminView>,
    in_flight: InFlight,
}

impl AdminController {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            view: Mutex::new(AdminView::default()),
            in_flight: InFlight::new(),
        }
    }

    pub async fn load_providers(&self) -> ScreenResult<Vec<AdminProvider>> {
        self.ctx.require_role(UserRole::Admin)?;
        let providers = self.ctx.api.admin_providers().await.map_err(|e| {
            warn!("Failed to fetch providers: {}", e);
            ScreenError::message(e.user_message(GENERIC_ERROR))
        })?;
        self.view().providers = providers.clone();
        Ok(providers)
    }

    /// One page of all bookings; `None` picks the defaults.
    pub async fn load_bookings(
        &self,
        page: Option<u32>,
        size: Option<u32>,
    ) -> ScreenResult<Page<Booking>> {
        self.ctx.require_role(UserRole::Admin)?;
        let page = page.unwrap_or(DEFAULT_PAGE);
        let size = size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE);
        let bookings = self
            .ctx
            .api
            .admin_bookings(page, size)
            .await
            .map_err(|e| {
                warn!("Failed to fetch bookings page {}: {}", page, e);
                ScreenError::message(e.user_message(GENERIC_ERROR))
            })?;
        self.view().bookings = bookings.clone();
        Ok(bookings)
    }

    pub fn providers(&self) -> Vec<AdminProvider> {
        self.view().providers.clone()
    }

    pub fn bookings(&self) -> Page<Booking> {
        self.view().bookings.clone()
    }

    pub fn is_busy(&self, provider_id: &str) -> bool {
        self.in_flight.is_busy(provider_id)
    }

    /// Sets the verified badge of a provider. Failures are only logged.
    pub async fn verify(
        &self,
        provider_id: &str,
        verified: bool,
        notes: Option<&str>,
    ) -> Option<AdminProvider> {
        let _guard = self.in_flight.try_begin(provider_id)?;
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());
        match self
            .ctx
            .api
            .verify_provider(provider_id, verified, notes)
            .await
        {
            Ok(updated) => {
                info!("Provider {} verified={}", provider_id, verified);
                let mut view = self.view();
                if let Some(slot) = view.providers.iter_mut().find(|p| p.id == updated.id) {
                    *slot = updated.clone();
                }
                Some(updated)
            }
            Err(e) => {
                warn!("Failed to verify provider {}: {}", provider_id, e);
                None
            }
        }
    }

    fn view(&self) -> MutexGuard<'_, AdminView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
