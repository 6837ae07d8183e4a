//! Run configuration and resolution.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use signoff::{SignoffError, SignoffResult, SiteContract};

/// Default login page of the proposal site.
pub const DEFAULT_LOGIN_URL: &str = "https://betterproposals.io/2/login/";

/// Default output file, overwritten on every run.
pub const DEFAULT_OUTPUT: &str = "proposal.csv";

/// Default number of rows processed per run.
pub const DEFAULT_MAX_ROWS: usize = 10;

/// Account credentials for the proposal site.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Build credentials, falling back to the plain `email` / `password`
    /// environment variables. Both values are required.
    pub fn resolve(email: Option<String>, password: Option<String>) -> SignoffResult<Self> {
        let email = non_empty(email.or_else(|| std::env::var("email").ok()));
        let password = non_empty(password.or_else(|| std::env::var("password").ok()));
        match (email, password) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            _ => Err(SignoffError::Config(
                "email and password must be set (--email/--password or SIGNOFF_EMAIL/SIGNOFF_PASSWORD)"
                    .to_string(),
            )),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Fixed waits used while driving the browser.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Pause after a navigation or form submission.
    pub settle: Duration,
    /// Budget for bounded element waits.
    pub element_wait: Duration,
    /// Interval between polls inside a bounded wait.
    pub poll_interval: Duration,
    /// Pause between rows of a batch.
    pub row_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(10),
            element_wait: Duration::from_secs(20),
            poll_interval: Duration::from_millis(250),
            row_delay: Duration::from_secs(2),
        }
    }
}

impl Timing {
    /// No waiting at all. Bounded waits check exactly once.
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            element_wait: Duration::ZERO,
            poll_interval: Duration::ZERO,
            row_delay: Duration::ZERO,
        }
    }
}

/// Everything the per-document pipeline needs besides the browser.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub site: SiteContract,
    pub timing: Timing,
    pub credentials: Credentials,
    pub login_url: String,
}

/// Load a `.env` file into the process environment.
///
/// With no explicit path the file is looked up from the working directory
/// upwards. Variables already set in the environment are left alone.
/// Returns the file that was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|()| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

/// Default persistent browser profile location.
pub fn default_profile_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("signoff")
        .join("chrome-profile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_credentials_are_used() {
        let creds =
            Credentials::resolve(Some("a@example.test".into()), Some("secret".into())).unwrap();
        assert_eq!(creds.email, "a@example.test");
        assert!(!format!("{creds:?}").contains("secret"));
    }

    #[test]
    fn blank_password_is_rejected() {
        let result = Credentials::resolve(Some("a@example.test".into()), Some("  ".into()));
        assert!(matches!(result, Err(SignoffError::Config(_))));
    }

    #[test]
    fn env_file_supplies_legacy_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "email=dotenv@example.test\npassword=from-file\nSIGNOFF_ENV_FILE_LOADED=1\n",
        )
        .unwrap();

        assert_eq!(load_env_file(Some(&path)), Some(path.clone()));
        assert_eq!(std::env::var("SIGNOFF_ENV_FILE_LOADED").as_deref(), Ok("1"));
        assert!(Credentials::resolve(None, None).is_ok());
    }

    #[test]
    fn missing_env_file_is_ignored() {
        assert_eq!(load_env_file(Some(Path::new("/nonexistent/.env"))), None);
    }

    #[test]
    fn default_profile_dir_is_namespaced() {
        assert!(default_profile_dir().ends_with("signoff/chrome-profile"));
    }
}
