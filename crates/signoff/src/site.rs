//! Identifiers the remote proposal site exposes in its rendered pages.
//!
//! These are contract points with a third-party UI. When the site changes
//! them, extraction degrades to `Not found` instead of failing, so they are
//! kept in one place and can be overridden as a unit.

use serde::{Deserialize, Serialize};

/// URL segments and DOM identifiers for one proposal site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContract {
    /// Path segment present on a document view URL.
    pub document_path: String,
    /// Path segment present on the dashboard URL.
    pub dashboard_path: String,
    /// Path segment present on the login URL.
    pub login_path: String,
    /// Element id of the login form.
    pub login_form_id: String,
    /// Class of the user menu shown to authenticated users.
    pub user_menu_class: String,
    /// Element id of the email input.
    pub email_input_id: String,
    /// Element id of the password input.
    pub password_input_id: String,
    /// Class of the signature certificate block.
    pub certificate_class: String,
    /// Class of each activity timeline entry.
    pub timeline_block_class: String,
    /// Class of the title inside a timeline entry.
    pub timeline_title_class: String,
    /// Class of the element holding a certificate value.
    pub certificate_value_class: String,
}

impl Default for SiteContract {
    fn default() -> Self {
        Self {
            document_path: "proposals/view".to_string(),
            dashboard_path: "dashboard".to_string(),
            login_path: "/login/".to_string(),
            login_form_id: "form_login".to_string(),
            user_menu_class: "user-menu".to_string(),
            email_input_id: "Email".to_string(),
            password_input_id: "Password".to_string(),
            certificate_class: "timeline-contentblock-certificate".to_string(),
            timeline_block_class: "timeline-block".to_string(),
            timeline_title_class: "timeline-title".to_string(),
            certificate_value_class: "certificate-value".to_string(),
        }
    }
}

impl SiteContract {
    pub fn login_form_selector(&self) -> String {
        format!("#{}", self.login_form_id)
    }

    pub fn user_menu_selector(&self) -> String {
        format!(".{}", self.user_menu_class)
    }

    pub fn email_selector(&self) -> String {
        format!("#{}", self.email_input_id)
    }

    pub fn password_selector(&self) -> String {
        format!("#{}", self.password_input_id)
    }

    pub fn certificate_selector(&self) -> String {
        format!(".{}", self.certificate_class)
    }

    pub fn timeline_block_selector(&self) -> String {
        format!(".{}", self.timeline_block_class)
    }

    pub fn timeline_title_selector(&self) -> String {
        format!(".{}", self.timeline_title_class)
    }

    /// Selector for the first submit button of a form.
    pub fn submit_selector(&self) -> &'static str {
        "button[type='submit']"
    }

    pub fn is_document_url(&self, url: &str) -> bool {
        url.contains(&self.document_path)
    }

    pub fn is_dashboard_url(&self, url: &str) -> bool {
        url.contains(&self.dashboard_path)
    }

    pub fn is_login_url(&self, url: &str) -> bool {
        url.contains(&self.login_path)
    }
}
