//! Labeled-pattern rules and the pattern tier of field derivation.
//!
//! Each certificate field is one rule: a label phrase, followed eventually
//! by the first value-holder element after it. Matching is deliberately
//! loose (non-greedy, dot matches newline) so partial or malformed markup
//! still yields whatever it can. A rule that fails leaves its field at
//! `Not found` and never affects the other rules.

use regex::Regex;

use crate::site::SiteContract;
use crate::types::{ExtractedFields, RawExtraction, SentByCandidate, NOT_FOUND, SENT_BY_MARKER};

/// A certificate-derived output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificateField {
    SignedBy,
    SignedDate,
    IpAddress,
}

/// Label phrase that precedes a field's value in the certificate block.
#[derive(Debug, Clone, Copy)]
pub struct LabelRule {
    pub field: CertificateField,
    pub label: &'static str,
}

/// The certificate rules, one per field.
pub const CERTIFICATE_RULES: &[LabelRule] = &[
    LabelRule {
        field: CertificateField::SignedBy,
        label: "Accepted and Signed by",
    },
    LabelRule {
        field: CertificateField::SignedDate,
        label: "Accepted and Signed on",
    },
    LabelRule {
        field: CertificateField::IpAddress,
        label: "IP Address from signature location",
    },
];

struct CompiledRule {
    field: CertificateField,
    label: &'static str,
    pattern: Option<Regex>,
}

/// Compiled pattern tier for one site.
pub struct PatternExtractor {
    rules: Vec<CompiledRule>,
    timeline_sent_by: Option<Regex>,
    timeline_title: Option<Regex>,
}

impl PatternExtractor {
    /// Compile [`CERTIFICATE_RULES`] against the site's value class.
    pub fn new(site: &SiteContract) -> Self {
        Self::with_rules(site, CERTIFICATE_RULES)
    }

    /// Compile a custom rule table.
    pub fn with_rules(site: &SiteContract, rules: &[LabelRule]) -> Self {
        let value_class = regex::escape(&site.certificate_value_class);
        let rules = rules
            .iter()
            .map(|rule| {
                let source = format!(
                    r#"(?s){}.*?<div class="{value_class}">(.*?)</div>"#,
                    regex::escape(rule.label)
                );
                CompiledRule {
                    field: rule.field,
                    label: rule.label,
                    pattern: compile(&source),
                }
            })
            .collect();

        let timeline_sent_by = compile(&format!(
            r#"(?s)<div class="{}[^>]*">{}\s+(.*?)</div>"#,
            regex::escape(&site.timeline_title_class),
            regex::escape(SENT_BY_MARKER)
        ));

        let timeline_title = compile(&format!(
            r#"(?s)<div class="{}[^>]*">(.*?)</div>"#,
            regex::escape(&site.timeline_title_class)
        ));

        Self {
            rules,
            timeline_sent_by,
            timeline_title,
        }
    }

    /// Capture one field from a certificate fragment.
    pub fn capture(&self, field: CertificateField, certificate_html: &str) -> Option<String> {
        let rule = self.rules.iter().find(|r| r.field == field)?;
        if !certificate_html.contains(rule.label) {
            return None;
        }
        let caps = rule.pattern.as_ref()?.captures(certificate_html)?;
        caps.get(1).map(|m| m.as_str().trim().to_string())
    }

    /// Search concatenated timeline markup for a "Sent by" title.
    pub fn capture_timeline_sent_by(&self, timeline_html: &str) -> Option<String> {
        let caps = self.timeline_sent_by.as_ref()?.captures(timeline_html)?;
        caps.get(1).map(|m| m.as_str().trim().to_string())
    }

    /// Sent-by candidates found by scanning saved timeline markup.
    ///
    /// Used when the timeline comes from a file rather than a live page,
    /// where title text is not available element by element.
    pub fn timeline_candidates(&self, timeline_html: &str) -> Vec<SentByCandidate> {
        let Some(re) = self.timeline_title.as_ref() else {
            return Vec::new();
        };
        re.captures_iter(timeline_html)
            .filter_map(|caps| {
                let title_text = caps.get(1)?.as_str().trim().to_string();
                title_text.contains(SENT_BY_MARKER).then(|| SentByCandidate {
                    html: caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default(),
                    title_text,
                })
            })
            .collect()
    }

    /// Derive all four fields from raw page fragments.
    ///
    /// `sent_by` is the value already derived from the timeline candidates;
    /// when it is still `Not found` the candidates and then the raw timeline
    /// markup are searched again.
    pub fn extract(&self, raw: &RawExtraction, sent_by: &str) -> ExtractedFields {
        let mut fields = ExtractedFields {
            sent_by: sent_by.to_string(),
            ..ExtractedFields::not_found()
        };

        for rule in &self.rules {
            if let Some(value) = self.capture(rule.field, &raw.certificate_html) {
                match rule.field {
                    CertificateField::SignedBy => fields.signed_by = value,
                    CertificateField::SignedDate => fields.signed_date = value,
                    CertificateField::IpAddress => fields.ip_address = value,
                }
            }
        }

        if fields.sent_by == NOT_FOUND {
            if let Some(value) = direct_sent_by(&raw.sent_by_candidates) {
                fields.sent_by = value;
            }
        }
        if fields.sent_by == NOT_FOUND {
            if let Some(value) = self.capture_timeline_sent_by(&raw.timeline_html) {
                fields.sent_by = value;
            }
        }

        fields
    }
}

fn compile(source: &str) -> Option<Regex> {
    match Regex::new(source) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("skipping pattern {source:?}: {e}");
            None
        }
    }
}

/// Remove the "Sent by" marker and surrounding whitespace from a title.
pub fn strip_sent_by_marker(title_text: &str) -> String {
    title_text.replace(SENT_BY_MARKER, "").trim().to_string()
}

/// Sender taken from the first candidate carrying the marker.
pub fn direct_sent_by(candidates: &[SentByCandidate]) -> Option<String> {
    candidates
        .iter()
        .find(|c| c.title_text.contains(SENT_BY_MARKER))
        .map(|c| strip_sent_by_marker(&c.title_text))
}

/// [`direct_sent_by`], or `Not found`.
pub fn sent_by_or_sentinel(candidates: &[SentByCandidate]) -> String {
    direct_sent_by(candidates).unwrap_or_else(|| NOT_FOUND.to_string())
}
