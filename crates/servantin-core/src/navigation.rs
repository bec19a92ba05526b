//! Screens, navigation requests and the header menu.

use crate::session::{SessionState, UserRole};
use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Static sections of the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandingSection {
    Categories,
    HowItWorks,
    BecomeProvider,
}

impl LandingSection {
    pub const ALL: [LandingSection; 3] = [
        LandingSection::Categories,
        LandingSection::HowItWorks,
        LandingSection::BecomeProvider,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::HowItWorks => "how-it-works",
            Self::BecomeProvider => "become-provider",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Categories => "Services",
            Self::HowItWorks => "Comment ça marche",
            Self::BecomeProvider => "Devenir prestataire",
        }
    }
}

/// Every screen of the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Landing(LandingSection),
    Login { redirect: Option<String> },
    Register { provider: bool },
    ForgotPassword,
    ResetPassword { token: Option<String> },
    VerifyEmail { token: Option<String> },
    Book { category: Option<String> },
    Dashboard,
    BookingDetail { id: String, success: bool },
    ProviderHome,
    ProviderDashboard,
    ProviderProfile,
    ProviderOnboarding,
    Admin,
}

impl Route {
    pub fn login() -> Self {
        Self::Login { redirect: None }
    }

    pub fn login_then(redirect: impl Into<String>) -> Self {
        Self::Login {
            redirect: Some(redirect.into()),
        }
    }

    pub fn booking(id: impl Into<String>) -> Self {
        Self::BookingDetail {
            id: id.into(),
            success: false,
        }
    }

    /// Landing screen after sign-in for a role.
    pub fn home_for(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::Provider => Self::ProviderHome,
            UserRole::Client => Self::Dashboard,
        }
    }

    /// Screens that send anonymous visitors to login.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::BookingDetail { .. }
                | Self::ProviderHome
                | Self::ProviderDashboard
                | Self::ProviderProfile
                | Self::ProviderOnboarding
                | Self::Admin
        )
    }

    /// URL path with query string.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Landing(section) => format!("/{}", section.slug()),
            Self::Login { redirect } => with_query("/login", &[("redirect", redirect.as_deref())]),
            Self::Register { provider } => {
                with_query("/register", &[("provider", provider.then_some("true"))])
            }
            Self::ForgotPassword => "/forgot-password".to_string(),
            Self::ResetPassword { token } => {
                with_query("/auth/reset-password", &[("token", token.as_deref())])
            }
            Self::VerifyEmail { token } => {
                with_query("/auth/verify-email", &[("token", token.as_deref())])
            }
            Self::Book { category } => with_query("/book", &[("category", category.as_deref())]),
            Self::Dashboard => "/dashboard".to_string(),
            Self::BookingDetail { id, success } => with_query(
                &format!("/dashboard/bookings/{}", urlencoding::encode(id)),
                &[("success", success.then_some("true"))],
            ),
            Self::ProviderHome => "/provider".to_string(),
            Self::ProviderDashboard => "/provider/dashboard".to_string(),
            Self::ProviderProfile => "/provider/profile".to_string(),
            Self::ProviderOnboarding => "/provider/onboarding".to_string(),
            Self::Admin => "/admin".to_string(),
        }
    }

    /// Parses a path produced by [`Route::path`]. Unknown paths yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let params = parse_query(query);
        let param = |key: &str| params.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());
        let flag = |key: &str| param(key).as_deref() == Some("true");

        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        let route = match path {
            "/" => Self::Home,
            "/login" => Self::Login {
                redirect: param("redirect"),
            },
            "/register" => Self::Register {
                provider: flag("provider"),
            },
            "/forgot-password" => Self::ForgotPassword,
            "/auth/reset-password" => Self::ResetPassword {
                token: param("token"),
            },
            "/auth/verify-email" => Self::VerifyEmail {
                token: param("token"),
            },
            "/book" => Self::Book {
                category: param("category"),
            },
            "/dashboard" => Self::Dashboard,
            "/provider" => Self::ProviderHome,
            "/provider/dashboard" => Self::ProviderDashboard,
            "/provider/profile" => Self::ProviderProfile,
            "/provider/onboarding" => Self::ProviderOnboarding,
            "/admin" => Self::Admin,
            other => {
                if let Some(id) = other.strip_prefix("/dashboard/bookings/") {
                    if id.is_empty() || id.contains('/') {
                        return None;
                    }
                    Self::BookingDetail {
                        id: urlencoding::decode(id).ok()?.into_owned(),
                        success: flag("success"),
                    }
                } else {
                    let section = LandingSection::ALL
                        .into_iter()
                        .find(|s| other.strip_prefix('/') == Some(s.slug()))?;
                    Self::Landing(section)
                }
            }
        };
        Some(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn with_query(path: &str, params: &[(&str, Option<&str>)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{key}={}", urlencoding::encode(v))))
        .collect();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", query.join("&"))
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = urlencoding::decode(value).ok()?.into_owned();
            (!value.is_empty()).then(|| (key.to_string(), value))
        })
        .collect()
}

/// Receives navigation requests from controllers and the API client.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

#[derive(Debug)]
struct RouterState {
    current: Route,
    history: Vec<Route>,
}

/// In-memory navigator: keeps the current route and everything visited before it.
#[derive(Debug)]
pub struct Router {
    state: Mutex<RouterState>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Router {
    pub fn new(start: Route) -> Self {
        Self {
            state: Mutex::new(RouterState {
                current: start,
                history: Vec::new(),
            }),
        }
    }

    pub fn current(&self) -> Route {
        self.lock().current.clone()
    }

    /// Routes visited before the current one, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.lock().history.clone()
    }

    /// Returns to the previous route, if any.
    pub fn back(&self) -> Option<Route> {
        let mut state = self.lock();
        let previous = state.history.pop()?;
        state.current = previous.clone();
        Some(previous)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        info!(to = %route, "navigate");
        let mut state = self.lock();
        let previous = std::mem::replace(&mut state.current, route);
        state.history.push(previous);
    }
}

/// An entry of the header menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Link { label: &'static str, route: Route },
    Logout,
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Link { label, .. } => label,
            Self::Logout => "Déconnexion",
        }
    }
}

/// Header menu for the current session.
pub fn menu_for(session: &SessionState) -> Vec<MenuItem> {
    let Some(user) = session.user.as_ref().filter(|_| session.is_authenticated) else {
        return vec![
            MenuItem::Link {
                label: "Connexion",
                route: Route::login(),
            },
            MenuItem::Link {
                label: "Inscription",
                route: Route::Register { provider: false },
            },
        ];
    };

    let mut items = vec![MenuItem::Link {
        label: "Mon espace",
        route: Route::Dashboard,
    }];
    match user.role {
        UserRole::Provider => items.push(MenuItem::Link {
            label: "Espace prestataire",
            route: Route::ProviderHome,
        }),
        UserRole::Admin => items.push(MenuItem::Link {
            label: "Administration",
            route: Route::Admin,
        }),
        UserRole::Client => {}
    }
    items.push(MenuItem::Logout);
    items
}

/// Top-level links shown to everyone.
pub fn landing_links() -> Vec<MenuItem> {
    LandingSection::ALL
        .into_iter()
        .map(|section| MenuItem::Link {
            label: section.label(),
            route: Route::Landing(section),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Navigator, Route};
    use std::sync::Mutex;

    /// Navigator that only records what it was asked to do.
    #[derive(Debug, Default)]
    pub struct RecordingNavigator {
        pub routes: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{User, UserRole};

    fn user(role: UserRole) -> User {
        User {
            id: "u1".into(),
            email: "u@x.ch".into(),
            name: "Lea Meier".into(),
            first_name: None,
            last_name: None,
            phone: None,
            role,
            has_provider_profile: false,
        }
    }

    #[test]
    fn test_paths_parse_back() {
        let routes = vec![
            Route::Home,
            Route::Landing(LandingSection::HowItWorks),
            Route::login(),
            Route::login_then("/book"),
            Route::Register { provider: true },
            Route::ResetPassword {
                token: Some("a b&c".into()),
            },
            Route::Book {
                category: Some("babysitting".into()),
            },
            Route::BookingDetail {
                id: "B1".into(),
                success: true,
            },
            Route::ProviderOnboarding,
            Route::Admin,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route.clone()), "{route}");
        }
    }

    #[test]
    fn test_specific_paths() {
        assert_eq!(Route::login_then("/book").path(), "/login?redirect=%2Fbook");
        assert_eq!(Route::booking("B7").path(), "/dashboard/bookings/B7");
        assert_eq!(Route::Register { provider: false }.path(), "/register");
        assert_eq!(Route::parse("/nowhere"), None);
        assert_eq!(Route::parse("/dashboard/"), Some(Route::Dashboard));
    }

    #[test]
    fn test_home_for_role() {
        assert_eq!(Route::home_for(UserRole::Admin), Route::Admin);
        assert_eq!(Route::home_for(UserRole::Provider), Route::ProviderHome);
        assert_eq!(Route::home_for(UserRole::Client), Route::Dashboard);
    }

    #[test]
    fn test_router_tracks_history() {
        let router = Router::default();
        router.navigate(Route::Dashboard);
        router.navigate(Route::booking("B1"));
        assert_eq!(router.current(), Route::booking("B1"));
        assert_eq!(router.history(), vec![Route::Home, Route::Dashboard]);
        assert_eq!(router.back(), Some(Route::Dashboard));
        assert_eq!(router.current(), Route::Dashboard);
    }

    #[test]
    fn test_menu_by_session() {
        let anonymous = menu_for(&SessionState::new());
        assert_eq!(
            anonymous.iter().map(MenuItem::label).collect::<Vec<_>>(),
            vec!["Connexion", "Inscription"]
        );

        let provider = menu_for(&SessionState::authenticated(user(UserRole::Provider), "t"));
        assert_eq!(
            provider.iter().map(MenuItem::label).collect::<Vec<_>>(),
            vec!["Mon espace", "Espace prestataire", "Déconnexion"]
        );

        let admin = menu_for(&SessionState::authenticated(user(UserRole::Admin), "t"));
        assert!(admin.contains(&MenuItem::Link {
            label: "Administration",
            route: Route::Admin
        }));
        assert_eq!(landing_links().len(), 3);
    }
}
