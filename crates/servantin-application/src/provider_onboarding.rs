//! First-time provider profile creation, in four steps.

use crate::{AppContext, GENERIC_ERROR, ScreenError, ScreenResult};
use servantin_core::category::Category;
use servantin_core::navigation::Route;
use servantin_core::provider::{ProviderProfile, ProviderProfileRequest};
use servantin_core::session::UserRole;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Minimum length of the presentation text.
pub const MIN_BIO_LENGTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnboardingStep {
    #[default]
    Profile,
    Services,
    Location,
    Verification,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 4] = [
        OnboardingStep::Profile,
        OnboardingStep::Services,
        OnboardingStep::Location,
        OnboardingStep::Verification,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Profile => "Profil",
            Self::Services => "Services",
            Self::Location => "Localisation",
            Self::Verification => "Vérification",
        }
    }

    fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Whether `form` holds what this step asks for.
    pub fn is_complete(self, form: &ProviderProfileRequest) -> bool {
        match self {
            Self::Profile => form.bio.chars().count() >= MIN_BIO_LENGTH,
            Self::Services => !form.category_ids.is_empty() && !form.languages.is_empty(),
            Self::Location => {
                !form.postal_code.is_empty() && !form.city.is_empty() && form.hourly_rate > 0.0
            }
            Self::Verification => true,
        }
    }
}

#[derive(Debug, Default)]
struct OnboardingView {
    step: OnboardingStep,
    form: ProviderProfileRequest,
    categories: Vec<Category>,
    error: Option<String>,
}

pub struct ProviderOnboardingController {
    ctx: Arc<AppContext>,
    view: Mutex<OnboardingView>,
}

impl ProviderOnboardingController {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            view: Mutex::new(OnboardingView::default()),
        }
    }

    /// Checks the role and loads categories. A failed category load is only logged.
    pub async fn start(&self) -> ScreenResult<()> {
        self.ctx.require_role(UserRole::Provider)?;
        match self.ctx.api.list_categories().await {
            Ok(mut categories) => {
                categories.sort_by_key(|c| c.sort_order);
                self.view().categories = categories;
            }
            Err(e) => warn!("Failed to load categories: {}", e),
        }
        Ok(())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.view().categories.clone()
    }

    pub fn step(&self) -> OnboardingStep {
        self.view().step
    }

    pub fn form(&self) -> ProviderProfileRequest {
        self.view().form.clone()
    }

    pub fn update_form(&self, change: impl FnOnce(&mut ProviderProfileRequest)) {
        change(&mut self.view().form);
    }

    pub fn is_valid(&self) -> bool {
        let view = self.view();
        view.step.is_complete(&view.form)
    }

    /// Moves forward when the current step is complete.
    pub fn next(&self) -> OnboardingStep {
        let mut view = self.view();
        if view.step.is_complete(&view.form) {
            if let Some(next) = view.step.next() {
                view.step = next;
            }
        }
        view.step
    }

    pub fn back(&self) -> OnboardingStep {
        let mut view = self.view();
        if let Some(previous) = view.step.previous() {
            view.step = previous;
        }
        view.step
    }

    pub fn error(&self) -> Option<String> {
        self.view().error.clone()
    }

    /// Creates the profile and opens the provider dashboard.
    ///
    /// Refused without a backend call while any step before verification is incomplete.
    pub async fn submit(&self) -> ScreenResult<ProviderProfile> {
        let user = self.ctx.require_role(UserRole::Provider)?;
        let form = {
            let mut view = self.view();
            let incomplete = OnboardingStep::ALL
                .into_iter()
                .find(|step| !step.is_complete(&view.form));
            if let Some(step) = incomplete {
                let message = incomplete_message(step);
                view.error = Some(message.clone());
                return Err(ScreenError::Message(message));
            }
            view.error = None;
            view.form.clone()
        };

        let profile = match self.ctx.api.create_profile(&form).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Failed to create provider profile: {}", e);
                let message = e.user_message(GENERIC_ERROR);
                self.view().error = Some(message.clone());
                return Err(ScreenError::Message(message));
            }
        };
        info!("Provider profile {} created", profile.id);

        let mut user = user;
        user.has_provider_profile = true;
        if let Err(e) = self.ctx.session.update_user(user) {
            warn!("Failed to persist provider flag: {}", e);
        }
        self.ctx.navigator.navigate(Route::ProviderDashboard);
        Ok(profile)
    }

    fn view(&self) -> MutexGuard<'_, OnboardingView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn incomplete_message(step: OnboardingStep) -> String {
    format!("Étape « {} » incomplète", step.title())
}
