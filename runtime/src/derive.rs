//! Two-tier field derivation: model first when configured, patterns otherwise.
//!
//! The sender is always taken from the timeline candidates when one exists,
//! whichever tier produced the other fields.

use crate::llm::ModelClient;
use serde::Serialize;
use signoff::{rules, ExtractedFields, PatternExtractor, RawExtraction, SiteContract, NOT_FOUND};

/// Which tier produced a set of fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Model,
    Pattern,
}

/// Fields plus the tier they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derived {
    pub fields: ExtractedFields,
    pub tier: Tier,
}

/// Turns raw page fragments into the four output fields.
pub struct FieldDeriver {
    patterns: PatternExtractor,
    model: Option<ModelClient>,
}

impl FieldDeriver {
    pub fn new(site: &SiteContract, model: Option<ModelClient>) -> Self {
        Self {
            patterns: PatternExtractor::new(site),
            model,
        }
    }

    /// Deriver that never calls the model service.
    pub fn pattern_only(site: &SiteContract) -> Self {
        Self::new(site, None)
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn patterns(&self) -> &PatternExtractor {
        &self.patterns
    }

    /// Derive fields, falling back to patterns on any model failure.
    pub async fn derive(&self, raw: &RawExtraction) -> Derived {
        let direct = rules::direct_sent_by(&raw.sent_by_candidates);
        if let Some(sent_by) = &direct {
            tracing::info!("Directly extracted 'Sent by': {sent_by}");
        }
        let sent_by = direct.clone().unwrap_or_else(|| NOT_FOUND.to_string());

        if let Some(model) = &self.model {
            match model.extract(&raw.certificate_html, &sent_by).await {
                Ok(mut fields) => {
                    // The model's sender is never trusted.
                    fields.sent_by = sent_by;
                    tracing::info!("Data successfully parsed from model response");
                    return Derived {
                        fields,
                        tier: Tier::Model,
                    };
                }
                Err(unresolved) => {
                    tracing::warn!("{unresolved}; falling back to pattern extraction");
                }
            }
        }

        tracing::info!("Using pattern extraction");
        let mut fields = self.patterns.extract(raw, &sent_by);
        if let Some(sent_by) = direct {
            fields.sent_by = sent_by;
        }
        Derived {
            fields,
            tier: Tier::Pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signoff::SentByCandidate;

    #[tokio::test]
    async fn pattern_only_uses_direct_sender() {
        let deriver = FieldDeriver::pattern_only(&SiteContract::default());
        assert!(!deriver.has_model());
        let raw = RawExtraction {
            certificate_html:
                r#"Accepted and Signed by <div class="certificate-value">Jane Doe</div>"#.to_string(),
            timeline_html: r#"<div class="timeline-title">Sent by Markup Person</div>"#.to_string(),
            sent_by_candidates: vec![SentByCandidate {
                html: String::new(),
                title_text: "Sent by Alex Smith".to_string(),
            }],
        };
        let derived = deriver.derive(&raw).await;
        assert_eq!(derived.tier, Tier::Pattern);
        assert_eq!(derived.fields.signed_by, "Jane Doe");
        assert_eq!(derived.fields.sent_by, "Alex Smith");
        assert_eq!(derived.fields.ip_address, NOT_FOUND);
    }
}
