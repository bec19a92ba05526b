//! The provider's incoming requests and missions.

use crate::{AppContext, GENERIC_ERROR, InFlight, ScreenError, ScreenResult};
use servantin_core::booking::{Booking, BookingAction, BookingStatus, ProviderTab};
use servantin_core::session::UserRole;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Counters above the tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProviderStats {
    pub new_requests: usize,
    pub active: usize,
    pub completed: usize,
    pub unread_messages: u32,
    /// Sum of agreed prices over completed missions.
    pub earnings: f64,
}

#[derive(Debug, Default)]
struct DashboardView {
    pending: Vec<Booking>,
    bookings: Vec<Booking>,
    tab: ProviderTab,
}

pub struct ProviderDashboardController {
    ctx: Arc<AppContext>,
    view: Mutex<DashboardView>,
    in_flight: InFlight,
}

impl ProviderDashboardController {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            view: Mutex::new(DashboardView::default()),
            in_flight: InFlight::new(),
        }
    }

    /// Fetches pending requests and all missions together; either failing fails the load.
    pub async fn load(&self) -> ScreenResult<()> {
        self.ctx.require_role(UserRole::Provider)?;
        let api = &self.ctx.api;
        let (pending, bookings) = tokio::try_join!(api.pending_requests(), api.provider_bookings())
            .map_err(|e| {
                warn!("Failed to fetch provider bookings: {}", e);
                ScreenError::message(e.user_message(GENERIC_ERROR))
            })?;

        let mut view = self.view();
        view.pending = pending;
        view.bookings = bookings;
        Ok(())
    }

    pub fn set_tab(&self, tab: ProviderTab) {
        self.view().tab = tab;
    }

    pub fn tab(&self) -> ProviderTab {
        self.view().tab
    }

    /// Bookings of the current tab. The pending tab lists the dedicated pending feed.
    pub fn visible(&self) -> Vec<Booking> {
        let view = self.view();
        let source = match view.tab {
            ProviderTab::Pending => &view.pending,
            ProviderTab::Active | ProviderTab::History => &view.bookings,
        };
        source
            .iter()
            .filter(|b| view.tab.matches(&b.status))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> ProviderStats {
        let view = self.view();
        let completed: Vec<&Booking> = view
            .bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
            .collect();
        ProviderStats {
            new_requests: view.pending.len(),
            active: view
                .bookings
                .iter()
                .filter(|b| ProviderTab::Active.matches(&b.status))
                .count(),
            completed: completed.len(),
            unread_messages: view.bookings.iter().map(|b| b.unread_message_count).sum(),
            earnings: completed.iter().filter_map(|b| b.agreed_price).sum(),
        }
    }

    pub fn is_busy(&self, booking_id: &str) -> bool {
        self.in_flight.is_busy(booking_id)
    }

    pub async fn accept(&self, booking_id: &str) -> Option<Booking> {
        self.transition(booking_id, BookingAction::Accept, None).await
    }

    pub async fn decline(&self, booking_id: &str, reason: Option<&str>) -> Option<Booking> {
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        self.transition(booking_id, BookingAction::Decline, reason)
            .await
    }

    pub async fn complete(&self, booking_id: &str) -> Option<Booking> {
        self.transition(booking_id, BookingAction::Complete, None)
            .await
    }

    /// Runs one transition for `booking_id` and re-fetches both lists on success.
    ///
    /// A second request for the same id while one is running is dropped.
    async fn transition(
        &self,
        booking_id: &str,
        action: BookingAction,
        reason: Option<&str>,
    ) -> Option<Booking> {
        let _guard = self.in_flight.try_begin(booking_id)?;
        let api = &self.ctx.api;
        let result = match action {
            BookingAction::Accept => api.accept_booking(booking_id).await,
            BookingAction::Decline => api.decline_booking(booking_id, reason).await,
            BookingAction::Complete => api.complete_booking(booking_id).await,
            BookingAction::Cancel => api.cancel_booking(booking_id).await,
        };

        match result {
            Ok(updated) => {
                info!("Booking {} is now {}", booking_id, updated.status);
                if let Err(e) = self.load().await {
                    warn!("Failed to refresh provider bookings: {}", e);
                }
                Some(updated)
            }
            Err(e) => {
                warn!("Failed to {} booking {}: {}", action.as_ref(), booking_id, e);
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
    use crate::testing::{MockApi, TestHarness, booking, client_user, provider_user};
    use servantin_core::error::ApiError;
    use servantin_core::navigation::Route;
    use tokio::sync::Notify;

    fn api() -> MockApi {
        let mut done = booking("B3", BookingStatus::Completed);
        done.agreed_price = Some(120.0);
        done.unread_message_count = 1;
        let mut done_unpriced = booking("B5", BookingStatus::Completed);
        done_unpriced.agreed_price = None;
        MockApi::new().with_bookings(vec![
            booking("B1", BookingStatus::Requested),
            booking("B2", BookingStatus::Requested),
            booking("B4", BookingStatus::InProgress),
            done,
            done_unpriced,
            booking("B6", BookingStatus::Canceled),
        ])
    }

    async fn loaded() -> (TestHarness, ProviderDashboardController) {
        let harness = TestHarness::signed_in_with(provider_user(), api());
        let dashboard = ProviderDashboardController::new(harness.ctx.clone());
        dashboard.load().await.unwrap();
        (harness, dashboard)
    }

    fn ids(bookings: Vec<Booking>) -> Vec<String> {
        bookings.into_iter().map(|b| b.id).collect()
    }

    #[tokio::test]
    async fn test_clients_are_sent_to_their_dashboard() {
        let harness = TestHarness::signed_in_with(client_user(), api());
        let dashboard = ProviderDashboardController::new(harness.ctx.clone());

        let err = dashboard.load().await.unwrap_err();
        assert_eq!(err, ScreenError::Redirected(Route::Dashboard));
        assert!(harness.api.calls_to("pending_requests").is_empty());
    }

    #[tokio::test]
    async fn test_tabs_and_stats() {
        let (_harness, dashboard) = loaded().await;

        assert_eq!(ids(dashboard.visible()), vec!["B1", "B2"]);
        dashboard.set_tab(ProviderTab::Active);
        assert_eq!(ids(dashboard.visible()), vec!["B4"]);
        dashboard.set_tab(ProviderTab::History);
        assert_eq!(ids(dashboard.visible()), vec!["B3", "B5", "B6"]);

        assert_eq!(dashboard.stats(), ProviderStats {
            new_requests: 2,
            active: 1,
            completed: 2,
            unread_messages: 1,
            earnings: 120.0,
        });
    }

    #[tokio::test]
    async fn test_load_fails_as_a_unit() {
        let harness = TestHarness::signed_in_with(provider_user(), api());
        harness
            .api
            .fail("provider_bookings", ApiError::network("timeout"));
        let dashboard = ProviderDashboardController::new(harness.ctx.clone());

        assert_eq!(
            dashboard.load().await.unwrap_err(),
            ScreenError::message(GENERIC_ERROR)
        );
        assert!(dashboard.visible().is_empty());
    }

    #[tokio::test]
    async fn test_accept_locks_only_its_booking() {
        let (harness, dashboard) = loaded().await;
        let gate = Arc::new(Notify::new());
        *harness.api.accept_gate.lock().unwrap() = Some(gate.clone());

        let observe = async {
            tokio::task::yield_now().await;
            assert!(dashboard.is_busy("B1"));
            assert!(!dashboard.is_busy("B2"));
            assert!(dashboard.accept("B1").await.is_none(), "duplicate is dropped");
            gate.notify_one();
        };
        let (accepted, ()) = tokio::join!(dashboard.accept("B1"), observe);

        assert_eq!(accepted.unwrap().status, BookingStatus::Accepted);
        assert_eq!(harness.api.calls_to("accept_booking"), vec!["accept_booking:B1"]);
        assert!(!dashboard.is_busy("B1"));
        assert_eq!(ids(dashboard.visible()), vec!["B2"], "lists re-fetched");
    }

    #[tokio::test]
    async fn test_decline_sends_trimmed_reason() {
        let (harness, dashboard) = loaded().await;

        dashboard.decline("B2", Some("  Indisponible ")).await.unwrap();
        dashboard.decline("B1", Some("   ")).await.unwrap();
        assert_eq!(harness.api.calls_to("decline_booking"), vec![
            "decline_booking:B2|Indisponible",
            "decline_booking:B1|",
        ]);
    }

    #[tokio::test]
    async fn test_failed_transition_keeps_lists() {
        let (harness, dashboard) = loaded().await;
        harness
            .api
            .fail("complete_booking", ApiError::validation("Statut invalide"));
        let before = harness.api.calls_to("provider_bookings").len();

        assert!(dashboard.complete("B4").await.is_none());
        assert_eq!(harness.api.calls_to("provider_bookings").len(), before);
        dashboard.set_tab(ProviderTab::Active);
        assert_eq!(ids(dashboard.visible()), vec!["B4"]);
    }
}
