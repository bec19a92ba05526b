//! Explicit application state shared by every controller.

use crate::{ScreenError, ScreenResult};
use servantin_core::api::MarketplaceApi;
use servantin_core::booking::BookingDraftStore;
use servantin_core::navigation::{Navigator, Route};
use servantin_core::session::{SessionStore, User, UserRole};
use std::sync::Arc;
use tracing::warn;

/// Everything a controller may touch.
///
/// Built once at startup and passed explicitly; tests build one around mocks.
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn MarketplaceApi>,
    pub session: Arc<SessionStore>,
    pub draft: Arc<BookingDraftStore>,
    pub navigator: Arc<dyn Navigator>,
}

impl AppContext {
    pub fn new(
        api: Arc<dyn MarketplaceApi>,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            session,
            draft: Arc::new(BookingDraftStore::new()),
            navigator,
        }
    }

    /// Navigates and returns the matching [`ScreenError::Redirected`].
    pub fn redirect(&self, route: Route) -> ScreenError {
        self.navigator.navigate(route.clone());
        ScreenError::Redirected(route)
    }

    /// The signed-in user, or a redirect to login.
    pub fn require_user(&self) -> ScreenResult<User> {
        match self.session.user() {
            Some(user) if self.session.is_authenticated() => Ok(user),
            _ => Err(self.redirect(Route::login())),
        }
    }

    /// The signed-in user with `role`; anonymous visitors go to login, others to their dashboard.
    pub fn require_role(&self, role: UserRole) -> ScreenResult<User> {
        let user = self.require_user()?;
        if user.role == role {
            Ok(user)
        } else {
            Err(self.redirect(Route::Dashboard))
        }
    }

    /// Clears the session; a failure to delete the saved copy is only logged.
    pub fn sign_out(&self) {
        if let Err(e) = self.session.logout() {
            warn!("Failed to clear persisted session: {}", e);
        }
    }
}
