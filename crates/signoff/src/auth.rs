//! Authentication heuristic over the current URL and a DOM probe.
//!
//! The remote site offers no session API, so "logged in" is inferred from
//! where the browser landed and which landmark elements are on the page.
//! False negatives only cost a redundant login attempt.

use crate::site::SiteContract;

/// Read-only presence checks against the page currently loaded.
pub trait DomProbe {
    /// Whether the login form is on the page.
    fn has_login_form(&self) -> bool;
    /// Whether the authenticated user menu is on the page.
    fn has_user_menu(&self) -> bool;
}

/// Presence of the two landmark elements, captured at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomSnapshot {
    pub login_form: bool,
    pub user_menu: bool,
}

impl DomProbe for DomSnapshot {
    fn has_login_form(&self) -> bool {
        self.login_form
    }

    fn has_user_menu(&self) -> bool {
        self.user_menu
    }
}

/// Which rule decided the authentication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSignal {
    /// URL is a document view or the dashboard.
    AuthenticatedUrl,
    /// Login page with the login form present.
    LoginForm,
    /// User menu present.
    UserMenu,
    /// Nothing conclusive.
    Unclear,
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub signal: AuthSignal,
}

/// Decide whether the session is authenticated. First match wins.
pub fn resolve(site: &SiteContract, current_url: &str, probe: &dyn DomProbe) -> AuthStatus {
    if site.is_document_url(current_url) || site.is_dashboard_url(current_url) {
        return AuthStatus {
            authenticated: true,
            signal: AuthSignal::AuthenticatedUrl,
        };
    }

    if site.is_login_url(current_url) && probe.has_login_form() {
        return AuthStatus {
            authenticated: false,
            signal: AuthSignal::LoginForm,
        };
    }

    if probe.has_user_menu() {
        return AuthStatus {
            authenticated: true,
            signal: AuthSignal::UserMenu,
        };
    }

    AuthStatus {
        authenticated: false,
        signal: AuthSignal::Unclear,
    }
}

/// Boolean shorthand for [`resolve`].
pub fn is_authenticated(site: &SiteContract, current_url: &str, probe: &dyn DomProbe) -> bool {
    resolve(site, current_url, probe).authenticated
}
