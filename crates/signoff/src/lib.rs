//! signoff: signature certificate parsing, session heuristics, and proposal tables.

pub mod auth;
pub mod rules;
pub mod sheet;
pub mod site;
pub mod table;
pub mod types;

pub use auth::{is_authenticated, resolve, AuthSignal, AuthStatus, DomProbe, DomSnapshot};
pub use rules::{direct_sent_by, sent_by_or_sentinel, CertificateField, LabelRule, PatternExtractor};
pub use site::SiteContract;
pub use table::{ResultTable, Table, EXTRACTED_COLUMNS};
pub use types::*;
