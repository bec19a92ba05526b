//! Sign-in, registration, password recovery and email verification.

use crate::{AppContext, GENERIC_ERROR, ScreenError, ScreenResult};
use servantin_core::api::{LoginRequest, RegisterRequest};
use servantin_core::navigation::Route;
use servantin_core::session::{AuthResponse, User, UserRole};
use servantin_core::validation::{
    PasswordRule, all_met, passwords_match, registration_checklist, reset_checklist,
};
use std::sync::Arc;
use tracing::{info, warn};

const LOGIN_FAILED: &str = "Email ou mot de passe incorrect";
const PASSWORDS_DIFFER: &str = "Les mots de passe ne correspondent pas";
const TERMS_REQUIRED: &str = "Veuillez accepter les conditions générales";
const FORGOT_FAILED: &str = "Une erreur est survenue. Veuillez réessayer.";
const RESET_TOKEN_MISSING: &str = "Token de réinitialisation manquant.";
const RESET_RULES_UNMET: &str = "Le mot de passe ne respecte pas tous les critères.";
const RESET_PASSWORDS_DIFFER: &str = "Les mots de passe ne correspondent pas.";
const RESET_FAILED: &str = "Le lien de réinitialisation est invalide ou a expiré.";
const EMAIL_VERIFIED: &str = "Votre email a été vérifié avec succès !";
const VERIFY_FAILED: &str = "Le lien de vérification est invalide ou a expiré.";
const RESEND_FAILED: &str = "Impossible d'envoyer l'email de vérification.";

/// Fields of the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
    pub register_as_provider: bool,
}

impl RegistrationForm {
    /// Live checklist under the password field. Informational only.
    pub fn checklist(&self) -> Vec<PasswordRule> {
        registration_checklist(&self.password)
    }

    fn to_request(&self) -> RegisterRequest {
        let phone = self.phone.trim();
        RegisterRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            name: self.name.clone(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            register_as_provider: self.register_as_provider,
        }
    }
}

/// Outcome of opening a verification link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyEmailState {
    NoToken,
    Success(String),
    Error(String),
}

pub struct AuthController {
    ctx: Arc<AppContext>,
}

impl AuthController {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Signs in and navigates to `redirect` when it names a screen, else to the role's home.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        redirect: Option<&str>,
    ) -> ScreenResult<Route> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .ctx
            .api
            .login(&request)
            .await
            .map_err(|e| ScreenError::message(e.user_message(LOGIN_FAILED)))?;

        let role = response.user.role;
        self.remember(response);
        let route = redirect
            .and_then(Route::parse)
            .unwrap_or_else(|| Route::home_for(role));
        self.ctx.navigator.navigate(route.clone());
        Ok(route)
    }

    /// Creates an account. Providers continue to onboarding.
    pub async fn register(&self, form: &RegistrationForm) -> ScreenResult<Route> {
        if form.password != form.confirm_password {
            return Err(ScreenError::message(PASSWORDS_DIFFER));
        }
        if !form.accept_terms {
            return Err(ScreenError::message(TERMS_REQUIRED));
        }

        let response = self
            .ctx
            .api
            .register(&form.to_request())
            .await
            .map_err(|e| ScreenError::message(e.user_message(GENERIC_ERROR)))?;

        let route = match response.user.role {
            UserRole::Provider => Route::ProviderOnboarding,
            _ => Route::Dashboard,
        };
        self.remember(response);
        self.ctx.navigator.navigate(route.clone());
        Ok(route)
    }

    pub async fn forgot_password(&self, email: &str) -> ScreenResult<()> {
        self.ctx
            .api
            .request_password_reset(email)
            .await
            .map_err(|e| ScreenError::message(e.user_message(FORGOT_FAILED)))
    }

    /// Sets a new password from a reset link, then sends the user to login.
    pub async fn reset_password(
        &self,
        token: Option<&str>,
        password: &str,
        confirmation: &str,
    ) -> ScreenResult<()> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Err(ScreenError::message(RESET_TOKEN_MISSING));
        };
        if !all_met(&reset_checklist(password)) {
            return Err(ScreenError::message(RESET_RULES_UNMET));
        }
        if !passwords_match(password, confirmation) {
            return Err(ScreenError::message(RESET_PASSWORDS_DIFFER));
        }

        self.ctx
            .api
            .confirm_password_reset(token, password)
            .await
            .map_err(|e| ScreenError::message(e.user_message(RESET_FAILED)))?;
        self.ctx.navigator.navigate(Route::login());
        Ok(())
    }

    pub async fn verify_email(&self, token: Option<&str>) -> VerifyEmailState {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return VerifyEmailState::NoToken;
        };
        match self.ctx.api.verify_email(token).await {
            Ok(()) => VerifyEmailState::Success(EMAIL_VERIFIED.to_string()),
            Err(e) => VerifyEmailState::Error(e.user_message(VERIFY_FAILED)),
        }
    }

    pub async fn resend_verification(&self, email: &str) -> ScreenResult<()> {
        if email.trim().is_empty() {
            return Ok(());
        }
        self.ctx
            .api
            .resend_verification(email)
            .await
            .map_err(|e| ScreenError::message(e.user_message(RESEND_FAILED)))
    }

    /// Re-reads the current user from the backend.
    pub async fn refresh_user(&self) -> ScreenResult<User> {
        self.ctx.require_user()?;
        let user = self
            .ctx
            .api
            .me()
            .await
            .map_err(|e| ScreenError::message(e.user_message(GENERIC_ERROR)))?;
        if let Err(e) = self.ctx.session.update_user(user.clone()) {
            warn!("Failed to persist refreshed user: {}", e);
        }
        Ok(user)
    }

    pub fn logout(&self) {
        self.ctx.sign_out();
        self.ctx.navigator.navigate(Route::Home);
    }

    fn remember(&self, response: AuthResponse) {
        info!("Signed in as {} ({:?})", response.user.email, response.user.role);
        if let Err(e) = self.ctx.session.set_auth(response.user, response.token) {
            warn!("Failed to persist session: {}", e);
        }
    }
}
