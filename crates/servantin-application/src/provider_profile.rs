//! The provider's own profile, with an edit mode.

use crate::{AppContext, GENERIC_ERROR, ScreenError, ScreenResult};
use servantin_core::category::{Category, category_name};
use servantin_core::navigation::Route;
use servantin_core::provider::{ProviderProfile, ProviderProfileRequest};
use servantin_core::session::UserRole;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

const SAVED: &str = "Profil mis à jour avec succès";
const SAVE_FAILED: &str = "Erreur lors de la sauvegarde";

#[derive(Debug, Default)]
struct ProfileView {
    profile: Option<ProviderProfile>,
    categories: Vec<Category>,
    /// Present while editing.
    form: Option<ProviderProfileRequest>,
    success: Option<String>,
    error: Option<String>,
}

pub struct ProviderProfileController {
    ctx: Arc<AppContext>,
    view: Mutex<ProfileView>,
}

impl ProviderProfileController {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            view: Mutex::new(ProfileView::default()),
        }
    }

    /// Loads the profile with the category list. Providers without a profile go to onboarding.
    pub async fn load(&self) -> ScreenResult<()> {
        self.ctx.require_role(UserRole::Provider)?;
        let api = &self.ctx.api;
        match tokio::try_join!(api.get_own_profile(), api.list_categories()) {
            Ok((profile, categories)) => {
                let mut view = self.view();
                view.profile = Some(profile);
                view.categories = categories;
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(self.ctx.redirect(Route::ProviderOnboarding)),
            Err(e) => {
                warn!("Failed to fetch provider profile: {}", e);
                Err(ScreenError::message(e.user_message(GENERIC_ERROR)))
            }
        }
    }

    pub fn profile(&self) -> Option<ProviderProfile> {
        self.view().profile.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.view().categories.clone()
    }

    /// Names of the profile's categories, in profile order.
    pub fn category_names(&self) -> Vec<String> {
        let view = self.view();
        view.profile
            .iter()
            .flat_map(|p| p.category_ids.iter())
            .map(|id| category_name(&view.categories, id).to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn is_editing(&self) -> bool {
        self.view().form.is_some()
    }

    pub fn form(&self) -> Option<ProviderProfileRequest> {
        self.view().form.clone()
    }

    pub fn success(&self) -> Option<String> {
        self.view().success.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.view().error.clone()
    }

    /// Copies the loaded profile into an editable form.
    pub fn begin_edit(&self) -> bool {
        let mut view = self.view();
        let Some(form) = view.profile.as_ref().map(ProviderProfile::to_request) else {
            return false;
        };
        view.form = Some(form);
        view.success = None;
        view.error = None;
        true
    }

    /// Applies `change` to the form; ignored outside edit mode.
    pub fn update_form(&self, change: impl FnOnce(&mut ProviderProfileRequest)) {
        if let Some(form) = self.view().form.as_mut() {
            change(form);
        }
    }

    pub fn cancel_edit(&self) {
        let mut view = self.view();
        view.form = None;
        view.error = None;
    }

    /// Sends the whole form, leaves edit mode and re-reads the profile.
    pub async fn save(&self) -> ScreenResult<ProviderProfile> {
        let Some(form) = self.form() else {
            return Err(ScreenError::message(SAVE_FAILED));
        };
        {
            let mut view = self.view();
            view.success = None;
            view.error = None;
        }

        if let Err(e) = self.ctx.api.update_profile(&form).await {
            warn!("Failed to save provider profile: {}", e);
            let message = e.user_message(SAVE_FAILED);
            self.view().error = Some(message.clone());
            return Err(ScreenError::Message(message));
        }
        info!("Provider profile updated");
        {
            let mut view = self.view();
            view.success = Some(SAVED.to_string());
            view.form = None;
        }

        self.load().await?;
        self.profile()
            .ok_or_else(|| ScreenError::message(GENERIC_ERROR))
    }

    fn view(&self) -> MutexGuard<'_, ProfileView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
