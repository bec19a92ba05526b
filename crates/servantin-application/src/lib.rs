//! Application layer for the Servantin client.
//!
//! One controller per screen. Controllers share an [`AppContext`] (API,
//! session, booking draft, navigator), keep their own view state and turn
//! every backend failure into a [`ScreenError`] the screen can show inline.

pub mod admin;
pub mod auth;
pub mod booking_detail;
pub mod booking_wizard;
pub mod client_dashboard;
pub mod context;
pub mod home;
pub mod in_flight;
pub mod provider_dashboard;
pub mod provider_onboarding;
pub mod provider_profile;

#[cfg(test)]
pub(crate) mod testing;

pub use context::AppContext;
pub use in_flight::{InFlight, InFlightGuard};

use servantin_core::navigation::Route;
use thiserror::Error;

/// Generic message when the backend gave nothing usable.
pub const GENERIC_ERROR: &str = "Une erreur est survenue";

/// Why a screen action did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    /// Shown inline on the current screen.
    #[error("{0}")]
    Message(String),
    /// The screen navigated away instead (login required, wrong role, missing entity).
    #[error("redirected to {0}")]
    Redirected(Route),
}

impl ScreenError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

pub type ScreenResult<T> = std::result::Result<T, ScreenError>;
