//! The client's list of bookings.

use crate::{AppContext, GENERIC_ERROR, InFlight, ScreenError, ScreenResult};
use servantin_core::booking::{Booking, ClientFilter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Counters above the booking list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    pub total: usize,
    pub active: usize,
    pub unread_messages: u32,
}

#[derive(Debug, Default)]
struct DashboardView {
    greeting_name: String,
    bookings: Vec<Booking>,
    filter: ClientFilter,
}

pub struct ClientDashboardController {
    ctx: Arc<AppContext>,
    view: Mutex<DashboardView>,
    in_flight: InFlight,
}

impl ClientDashboardController {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            view: Mutex::new(DashboardView::default()),
            in_flight: InFlight::new(),
        }
    }

    pub async fn load(&self) -> ScreenResult<()> {
        let user = self.ctx.require_user()?;
        let bookings = self.ctx.api.client_bookings().await.map_err(|e| {
            warn!("Failed to fetch bookings: {}", e);
            ScreenError::message(e.user_message(GENERIC_ERROR))
        })?;

        let mut view = self.view();
        view.greeting_name = user.display_first_name().to_string();
        view.bookings = bookings;
        Ok(())
    }

    pub fn greeting(&self) -> String {
        format!("Bonjour, {} !", self.view().greeting_name)
    }

    pub fn set_filter(&self, filter: ClientFilter) {
        self.view().filter = filter;
    }

    pub fn filter(&self) -> ClientFilter {
        self.view().filter
    }

    /// Bookings passing the current filter.
    pub fn visible(&self) -> Vec<Booking> {
        let view = self.view();
        view.bookings
            .iter()
            .filter(|b| view.filter.matches(&b.status))
            .cloned()
            .collect()
    }

    pub fn empty_message(&self) -> &'static str {
        match self.filter() {
            ClientFilter::All => "Vous n'avez pas encore de demande.",
            ClientFilter::Active => "Aucune demande en cours.",
            ClientFilter::Completed => "Aucune demande terminée.",
        }
    }

    pub fn stats(&self) -> ClientStats {
        let view = self.view();
        ClientStats {
            total: view.bookings.len(),
            active: view.bookings.iter().filter(|b| b.status.is_active()).count(),
            unread_messages: view.bookings.iter().map(|b| b.unread_message_count).sum(),
        }
    }

    pub fn is_busy(&self, booking_id: &str) -> bool {
        self.in_flight.is_busy(booking_id)
    }

    /// Cancels an active booking and swaps in the server's copy.
    ///
    /// Ignored while a request for the same booking is running. Failures are
    /// only logged and yield `None`.
    pub async fn cancel(&self, booking_id: &str) -> Option<Booking> {
        let _guard = self.in_flight.try_begin(booking_id)?;
        match self.ctx.api.cancel_booking(booking_id).await {
            Ok(updated) => {
                info!("Booking {} canceled", booking_id);
                let mut view = self.view();
                if let Some(slot) = view.bookings.iter_mut().find(|b| b.id == updated.id) {
                    *slot = updated.clone();
                }
                Some(updated)
            }
            Err(e) => {
                warn!("Failed to cancel booking {}: {}", booking_id, e);
                None
            }
        }
    }

    fn view(&self) -> MutexGuard<'_, DashboardView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockApi, TestHarness, booking, client_user};
    use servantin_core::booking::BookingStatus;
    use servantin_core::error::ApiError;
    use servantin_core::navigation::Route;

    fn api() -> MockApi {
        let mut unread = booking("B2", BookingStatus::Accepted);
        unread.unread_message_count = 2;
        MockApi::new().with_bookings(vec![
            booking("B1", BookingStatus::Requested),
            unread,
            booking("B3", BookingStatus::Completed),
            booking("B4", BookingStatus::Declined),
        ])
    }

    #[tokio::test]
    async fn test_anonymous_visitor_is_sent_to_login() {
        let harness = TestHarness::with_api(api());
        let dashboard = ClientDashboardController::new(harness.ctx.clone());

        let err = dashboard.load().await.unwrap_err();
        assert_eq!(err, ScreenError::Redirected(Route::login()));
        assert!(harness.api.calls_to("client_bookings").is_empty());
    }

    #[tokio::test]
    async fn test_filters_and_stats() {
        let harness = TestHarness::signed_in_with(client_user(), api());
        let dashboard = ClientDashboardController::new(harness.ctx.clone());
        dashboard.load().await.unwrap();

        assert_eq!(dashboard.greeting(), "Bonjour, Claire !");
        assert_eq!(dashboard.stats(), ClientStats {
            total: 4,
            active: 2,
            unread_messages: 2,
        });

        dashboard.set_filter(ClientFilter::Active);
        let ids: Vec<_> = dashboard.visible().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["B1", "B2"]);

        dashboard.set_filter(ClientFilter::Completed);
        let ids: Vec<_> = dashboard.visible().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["B3", "B4"]);
    }

    #[tokio::test]
    async fn test_cancel_applies_returned_booking() {
        let harness = TestHarness::signed_in_with(client_user(), api());
        let dashboard = ClientDashboardController::new(harness.ctx.clone());
        dashboard.load().await.unwrap();

        let updated = dashboard.cancel("B1").await.unwrap();
        assert_eq!(updated.status, BookingStatus::Canceled);
        assert_eq!(harness.api.calls_to("cancel_booking"), vec!["cancel_booking:B1"]);
        let b1 = dashboard.visible().into_iter().find(|b| b.id == "B1").unwrap();
        assert_eq!(b1.status, BookingStatus::Canceled);
        assert!(!dashboard.is_busy("B1"));
    }

    #[tokio::test]
    async fn test_cancel_failure_leaves_state() {
        let harness = TestHarness::signed_in_with(client_user(), api());
        harness
            .api
            .fail("cancel_booking", ApiError::network("timeout"));
        let dashboard = ClientDashboardController::new(harness.ctx.clone());
        dashboard.load().await.unwrap();

        assert!(dashboard.cancel("B1").await.is_none());
        let b1 = dashboard.visible().into_iter().find(|b| b.id == "B1").unwrap();
        assert_eq!(b1.status, BookingStatus::Requested);
    }
}
