//! One booking with its status timeline and message thread.

use crate::{AppContext, GENERIC_ERROR, ScreenError, ScreenResult};
use servantin_core::booking::status::{TimelineEntry, client_actions, status_timeline};
use servantin_core::booking::{Booking, BookingAction};
use servantin_core::message::Message;
use servantin_core::navigation::Route;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What a load ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// The screen was left before the responses arrived; nothing was applied.
    Cancelled,
}

#[derive(Debug, Default)]
struct DetailView {
    booking: Option<Booking>,
    messages: Vec<Message>,
    user_id: String,
}

pub struct BookingDetailController {
    ctx: Arc<AppContext>,
    booking_id: String,
    created: bool,
    view: Mutex<DetailView>,
    sending: AtomicBool,
    canceling: AtomicBool,
}

impl BookingDetailController {
    /// `created` is set when arriving straight from the wizard.
    pub fn new(ctx: Arc<AppContext>, booking_id: impl Into<String>, created: bool) -> Self {
        Self {
            ctx,
            booking_id: booking_id.into(),
            created,
            view: Mutex::new(DetailView::default()),
            sending: AtomicBool::new(false),
            canceling: AtomicBool::new(false),
        }
    }

    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    /// Whether to show the "request sent" banner.
    pub fn created(&self) -> bool {
        self.created
    }

    /// Fetches the booking and its thread together.
    ///
    /// A missing booking sends the user back to the dashboard.
    pub async fn load(&self, cancel: &CancellationToken) -> ScreenResult<LoadOutcome> {
        let user = self.ctx.require_user()?;
        let api = &self.ctx.api;
        let id = self.booking_id.as_str();

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Load of booking {} cancelled", id);
                return Ok(LoadOutcome::Cancelled);
            }
            result = async { tokio::try_join!(api.get_booking(id), api.list_messages(id)) } => result,
        };

        match fetched {
            Ok((booking, messages)) => {
                let mut view = self.view();
                view.booking = Some(booking);
                view.messages = messages;
                view.user_id = user.id;
                Ok(LoadOutcome::Loaded)
            }
            Err(e) if e.is_not_found() => Err(self.ctx.redirect(Route::Dashboard)),
            Err(e) => {
                warn!("Failed to fetch booking {}: {}", id, e);
                Err(ScreenError::message(e.user_message(GENERIC_ERROR)))
            }
        }
    }

    pub fn booking(&self) -> Option<Booking> {
        self.view().booking.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.view().messages.clone()
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.view()
            .booking
            .as_ref()
            .map(status_timeline)
            .unwrap_or_default()
    }

    /// Messaging opens once a provider is attached.
    pub fn can_message(&self) -> bool {
        self.view()
            .booking
            .as_ref()
            .is_some_and(Booking::has_provider)
    }

    pub fn can_cancel(&self) -> bool {
        self.view()
            .booking
            .as_ref()
            .is_some_and(|b| client_actions(&b.status).contains(&BookingAction::Cancel))
    }

    /// Whether `message` goes on the right-hand side.
    pub fn is_own_message(&self, message: &Message) -> bool {
        message.is_from(&self.view().user_id)
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::SeqCst)
    }

    /// Sends a message and appends the server's copy.
    ///
    /// Blank input and sends overlapping a running one are ignored; failures are only logged.
    pub async fn send_message(&self, input: &str) -> Option<Message> {
        let content = input.trim();
        if content.is_empty() || !self.can_message() {
            return None;
        }
        let _sending = Busy::acquire(&self.sending)?;

        match self.ctx.api.send_message(&self.booking_id, content).await {
            Ok(message) => {
                self.view().messages.push(message.clone());
                Some(message)
            }
            Err(e) => {
                warn!("Failed to send message on booking {}: {}", self.booking_id, e);
                None
            }
        }
    }

    /// Cancels the booking while it is still active and applies the returned entity.
    pub async fn cancel(&self) -> Option<Booking> {
        if !self.can_cancel() {
            return None;
        }
        let _canceling = Busy::acquire(&self.canceling)?;

        match self.ctx.api.cancel_booking(&self.booking_id).await {
            Ok(updated) => {
                info!("Booking {} canceled", self.booking_id);
                self.view().booking = Some(updated.clone());
                Some(updated)
            }
            Err(e) => {
                warn!("Failed to cancel booking {}: {}", self.booking_id, e);
                None
            }
        }
    }

    fn view(&self) -> MutexGuard<'_, DetailView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single-slot busy flag, released on drop.
struct Busy<'a>(&'a AtomicBool);

impl<'a> Busy<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
