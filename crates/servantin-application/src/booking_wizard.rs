//! The four-step booking wizard.
//!
//! Field values live in the shared [`BookingDraftStore`](servantin_core::booking::BookingDraftStore)
//! so they survive a detour through login. This controller adds what only the
//! screen needs: the category list, provider search results and errors.

use crate::{AppContext, GENERIC_ERROR, ScreenError, ScreenResult};
use chrono::NaiveDate;
use servantin_core::booking::{Booking, BookingDraft, TimeSlot, WizardStep};
use servantin_core::category::{Category, find_by_slug};
use servantin_core::navigation::Route;
use servantin_core::provider::ProviderMatch;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

const SEARCH_FAILED: &str = "Erreur lors de la recherche de prestataires";
const CREATE_FAILED: &str = "Erreur lors de la création de la réservation";
const INCOMPLETE: &str = "Veuillez choisir un service et renseigner le lieu et la description";
const BROADCAST_NOTICE: &str = "Aucun prestataire trouvé dans votre zone. Votre demande sera envoyée à tous les prestataires disponibles.";

/// Path the login screen returns to after an anonymous submit.
pub const WIZARD_PATH: &str = "/book";

#[derive(Debug, Default)]
struct WizardView {
    categories: Vec<Category>,
    matches: Vec<ProviderMatch>,
    searched: bool,
    search_error: Option<String>,
    submit_error: Option<String>,
}

/// Result of pressing "Confirmer".
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Anonymous visitor sent to login; nothing was created.
    LoginRequired,
    Created(Booking),
}

pub struct BookingWizardController {
    ctx: Arc<AppContext>,
    view: Mutex<WizardView>,
}

impl BookingWizardController {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            view: Mutex::new(WizardView::default()),
        }
    }

    /// Loads categories; a known `category_hint` slug preselects it and opens the details step.
    pub async fn start(&self, category_hint: Option<&str>) -> ScreenResult<()> {
        let mut categories = self.ctx.api.list_categories().await.map_err(|e| {
            warn!("Failed to load categories: {}", e);
            ScreenError::message(e.user_message(GENERIC_ERROR))
        })?;
        categories.sort_by_key(|c| c.sort_order);

        if let Some(category) = category_hint.and_then(|slug| find_by_slug(&categories, slug)) {
            self.ctx.draft.set_category(&category.id, &category.name);
            self.ctx.draft.set_step(WizardStep::Details);
        }
        self.view().categories = categories;
        Ok(())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.view().categories.clone()
    }

    pub fn draft(&self) -> BookingDraft {
        self.ctx.draft.snapshot()
    }

    pub fn step(&self) -> WizardStep {
        self.ctx.draft.step()
    }

    pub fn can_proceed(&self) -> bool {
        self.ctx.draft.snapshot().can_proceed()
    }

    pub fn select_category(&self, category: &Category) {
        self.ctx.draft.set_category(&category.id, &category.name);
    }

    pub fn set_location(&self, postal_code: &str, city: &str, canton: &str) {
        self.ctx.draft.set_location(postal_code, city, canton);
    }

    pub fn set_description(&self, description: &str) {
        self.ctx.draft.set_description(description);
    }

    pub fn set_preferred_time(&self, date: Option<NaiveDate>, slot: Option<TimeSlot>) {
        self.ctx.draft.set_preferred_time(date, slot);
    }

    pub fn set_budget(&self, min: Option<f64>, max: Option<f64>) {
        self.ctx.draft.set_budget(min, max);
    }

    /// Advances one step; entering the provider step runs the match search once.
    pub async fn next(&self) -> WizardStep {
        if !self.ctx.draft.advance() {
            return self.ctx.draft.step();
        }
        let step = self.ctx.draft.step();
        if step == WizardStep::Provider {
            self.search_providers().await;
        }
        step
    }

    pub fn back(&self) -> WizardStep {
        self.ctx.draft.back();
        self.ctx.draft.step()
    }

    /// Queries matching providers for the current draft. Failures stay inline.
    pub async fn search_providers(&self) {
        let Some(request) = self.ctx.draft.snapshot().match_request() else {
            return;
        };
        {
            let mut view = self.view();
            view.search_error = None;
            view.searched = false;
        }
        debug!("Matching providers for category {}", request.category_id);

        let result = self.ctx.api.match_providers(&request).await;
        let mut view = self.view();
        view.searched = true;
        match result {
            Ok(matches) => view.matches = matches,
            Err(e) => {
                warn!("Provider search failed: {}", e);
                view.matches.clear();
                view.search_error = Some(SEARCH_FAILED.to_string());
            }
        }
    }

    pub fn matches(&self) -> Vec<ProviderMatch> {
        self.view().matches.clone()
    }

    pub fn search_error(&self) -> Option<String> {
        self.view().search_error.clone()
    }

    /// Shown when a search succeeded with no provider: the request will go to everyone.
    pub fn broadcast_notice(&self) -> Option<&'static str> {
        let view = self.view();
        (view.searched && view.search_error.is_none() && view.matches.is_empty())
            .then_some(BROADCAST_NOTICE)
    }

    /// Picks a provider, or `None` to let the platform choose.
    pub fn select_provider(&self, provider: Option<&ProviderMatch>) {
        self.ctx.draft.set_selected_provider(
            provider.map(|p| p.id.clone()),
            provider.map(|p| p.name.clone()),
        );
    }

    pub fn submit_error(&self) -> Option<String> {
        self.view().submit_error.clone()
    }

    /// Creates the booking. Anonymous visitors are sent to login and keep their draft;
    /// a draft missing its category or details is refused without calling the backend.
    pub async fn submit(&self) -> ScreenResult<SubmitOutcome> {
        if !self.ctx.session.is_authenticated() {
            self.ctx.navigator.navigate(Route::login_then(WIZARD_PATH));
            return Ok(SubmitOutcome::LoginRequired);
        }
        let draft = self.ctx.draft.snapshot();
        if !draft.is_complete() {
            return Err(self.fail_submit(INCOMPLETE.to_string()));
        }
        let Some(request) = draft.to_create_request() else {
            return Err(self.fail_submit(CREATE_FAILED.to_string()));
        };
        self.view().submit_error = None;

        match self.ctx.api.create_booking(&request).await {
            Ok(booking) => {
                info!("Booking {} created", booking.id);
                self.ctx.draft.reset();
                self.ctx.navigator.navigate(Route::BookingDetail {
                    id: booking.id.clone(),
                    success: true,
                });
                Ok(SubmitOutcome::Created(booking))
            }
            Err(e) => {
                warn!("Booking creation failed: {}", e);
                Err(self.fail_submit(e.user_message(CREATE_FAILED)))
            }
        }
    }

    fn fail_submit(&self, message: String) -> ScreenError {
        self.view().submit_error = Some(message.clone());
        ScreenError::Message(message)
    }

    fn view(&self) -> MutexGuard<'_, WizardView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
