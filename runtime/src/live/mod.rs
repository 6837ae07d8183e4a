//! Live page handling: browser sessions, login, and raw extraction.

pub mod extract;
pub mod login;
pub mod session;

pub use extract::extract_raw;
pub use login::{check_authentication, locate_document, login, reach_document};
pub use session::Session;
