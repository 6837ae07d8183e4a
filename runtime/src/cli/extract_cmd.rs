//! `signoff extract`: derive fields from saved HTML fragments.

use super::ModelArgs;
use crate::derive::{Derived, FieldDeriver};
use anyhow::{Context, Result};
use signoff::{RawExtraction, SiteContract};
use std::path::Path;

/// Build the raw extraction from fragment files on disk.
pub fn load_fragments(
    deriver: &FieldDeriver,
    certificate: &Path,
    timeline: Option<&Path>,
) -> Result<RawExtraction> {
    let certificate_html = std::fs::read_to_string(certificate)
        .with_context(|| format!("failed to read {}", certificate.display()))?;
    let timeline_html = match timeline {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => String::new(),
    };
    let sent_by_candidates = deriver.patterns().timeline_candidates(&timeline_html);

    Ok(RawExtraction {
        certificate_html,
        timeline_html,
        sent_by_candidates,
    })
}

/// Derive and print the fields as JSON.
pub async fn run(model: &ModelArgs, certificate: &Path, timeline: Option<&Path>) -> Result<()> {
    let site = SiteContract::default();
    let deriver = FieldDeriver::new(&site, model.client());
    let raw = load_fragments(&deriver, certificate, timeline)?;
    let derived: Derived = deriver.derive(&raw).await;
    println!("{}", serde_json::to_string_pretty(&derived)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Tier;

    #[tokio::test]
    async fn fragments_from_disk_feed_the_pattern_tier() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.html");
        let timeline = dir.path().join("timeline.html");
        std::fs::write(
            &cert,
            r#"<div class="timeline-contentblock-certificate">
                Accepted and Signed by <div class="certificate-value">Jane Doe</div>
                IP Address from signature location <div class="certificate-value">203.0.113.7</div>
            </div>"#,
        )
        .unwrap();
        std::fs::write(
            &timeline,
            r#"<div class="timeline-block"><div class="timeline-title">Sent by Alex Smith</div></div>"#,
        )
        .unwrap();

        let deriver = FieldDeriver::pattern_only(&SiteContract::default());
        let raw = load_fragments(&deriver, &cert, Some(&timeline)).unwrap();
        assert_eq!(raw.sent_by_candidates.len(), 1);

        let derived = deriver.derive(&raw).await;
        assert_eq!(derived.tier, Tier::Pattern);
        assert_eq!(derived.fields.signed_by, "Jane Doe");
        assert_eq!(derived.fields.ip_address, "203.0.113.7");
        assert_eq!(derived.fields.sent_by, "Alex Smith");
        assert_eq!(derived.fields.signed_date, signoff::NOT_FOUND);
    }

    #[test]
    fn missing_certificate_file_is_an_error() {
        let deriver = FieldDeriver::pattern_only(&SiteContract::default());
        let err = load_fragments(&deriver, Path::new("/nonexistent/cert.html"), None).unwrap_err();
        assert!(format!("{err:#}").contains("cert.html"));
    }
}
