//! Core data types for document targets, raw page fragments, and derived fields.

use serde::{Deserialize, Serialize};

/// Sentinel for a field that could not be located.
pub const NOT_FOUND: &str = "Not found";

/// Sentinel written to every extracted column of a row whose pipeline failed.
pub const ERROR: &str = "Error";

/// Marker phrase identifying a "sent by" timeline entry.
pub const SENT_BY_MARKER: &str = "Sent by";

/// One document to visit, read from a spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTarget {
    pub company: String,
    pub document_url: String,
}

/// A timeline entry whose title mentions who sent the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentByCandidate {
    pub html: String,
    pub title_text: String,
}

/// HTML pulled from a loaded document page, before any field derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExtraction {
    /// Outer HTML of the certificate block; empty for unsigned documents.
    pub certificate_html: String,
    /// Outer HTML of every timeline block, concatenated in page order.
    pub timeline_html: String,
    pub sent_by_candidates: Vec<SentByCandidate>,
}

impl RawExtraction {
    /// Whether the page had a certificate block at all.
    pub fn has_certificate(&self) -> bool {
        !self.certificate_html.is_empty()
    }
}

/// The four derived fields written to the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(rename = "Signed by")]
    pub signed_by: String,
    #[serde(rename = "Signed date")]
    pub signed_date: String,
    #[serde(rename = "IP address")]
    pub ip_address: String,
    #[serde(rename = "Sent by")]
    pub sent_by: String,
}

impl ExtractedFields {
    /// All four fields set to [`NOT_FOUND`].
    pub fn not_found() -> Self {
        Self::filled(NOT_FOUND)
    }

    /// All four fields set to [`ERROR`].
    pub fn error() -> Self {
        Self::filled(ERROR)
    }

    /// Error row whose first column carries the reason.
    pub fn error_with(reason: impl std::fmt::Display) -> Self {
        Self {
            signed_by: format!("{ERROR}: {reason}"),
            ..Self::error()
        }
    }

    fn filled(value: &str) -> Self {
        Self {
            signed_by: value.to_string(),
            signed_date: value.to_string(),
            ip_address: value.to_string(),
            sent_by: value.to_string(),
        }
    }

    /// Values in output column order.
    pub fn to_columns(&self) -> [String; 4] {
        [
            self.signed_by.clone(),
            self.signed_date.clone(),
            self.ip_address.clone(),
            self.sent_by.clone(),
        ]
    }
}

impl Default for ExtractedFields {
    fn default() -> Self {
        Self::not_found()
    }
}

/// Errors that can occur while driving or parsing a document page.
#[derive(thiserror::Error, Debug)]
pub enum SignoffError {
    #[error("Timed out after {waited_ms}ms waiting for {what}")]
    Timeout { what: String, waited_ms: u64 },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Navigation mismatch: expected URL containing {expected:?}, got {actual}")]
    NavigationMismatch { expected: String, actual: String },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why the model tier produced no usable fields.
///
/// Never surfaced to a result row; the caller falls back to the pattern tier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Model output unresolved: {0}")]
pub struct Unresolved(pub String);

/// Convenience result type.
pub type SignoffResult<T> = Result<T, SignoffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_with_only_touches_first_column() {
        let fields = ExtractedFields::error_with("missing column 'Company'");
        assert_eq!(fields.signed_by, "Error: missing column 'Company'");
        assert_eq!(fields.signed_date, ERROR);
        assert_eq!(fields.ip_address, ERROR);
        assert_eq!(fields.sent_by, ERROR);
    }

    #[test]
    fn serializes_with_output_labels() {
        let json = serde_json::to_value(ExtractedFields::not_found()).unwrap();
        assert_eq!(json["Signed by"], NOT_FOUND);
        assert_eq!(json["IP address"], NOT_FOUND);
        assert_eq!(json.as_object().unwrap().len(), 4);
    }
}
