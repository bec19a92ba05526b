pub mod admin;
pub mod auth;
pub mod book;
pub mod bookings;
pub mod catalog;
pub mod provider;

use anyhow::anyhow;
use servantin_application::ScreenError;
use servantin_core::navigation::Route;

/// Turns a screen failure into a message for the terminal.
///
/// Redirects become a hint about which command to run instead.
pub(crate) fn explain(err: ScreenError) -> anyhow::Error {
    match err {
        ScreenError::Message(message) => anyhow!(message),
        ScreenError::Redirected(Route::Login { .. }) => {
            anyhow!("Vous devez être connecté : servantin login <email> --password <mot de passe>")
        }
        ScreenError::Redirected(Route::ProviderOnboarding) => {
            anyhow!("Profil prestataire introuvable : servantin provider onboard")
        }
        ScreenError::Redirected(route) => anyhow!("Accès refusé (redirigé vers {route})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirects_become_hints() {
        let err = explain(ScreenError::Redirected(Route::login()));
        assert!(err.to_string().contains("servantin login"));

        let err = explain(ScreenError::Redirected(Route::Dashboard));
        assert_eq!(err.to_string(), "Accès refusé (redirigé vers /dashboard)");

        let err = explain(ScreenError::message("Code postal invalide"));
        assert_eq!(err.to_string(), "Code postal invalide");
    }
}
