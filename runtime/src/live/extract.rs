//! Pull the certificate block and the activity timeline off a document page.

use crate::config::Timing;
use crate::live::login::wait_for_element;
use crate::renderer::RenderContext;
use anyhow::{Context, Result};
use signoff::{RawExtraction, SentByCandidate, SiteContract, SENT_BY_MARKER};

/// Capture the raw fragments field derivation works from.
///
/// A missing certificate is not an error (the document may be unsigned),
/// and neither is an empty timeline. Browser failures are.
pub async fn extract_raw(
    ctx: &dyn RenderContext,
    site: &SiteContract,
    timing: &Timing,
) -> Result<RawExtraction> {
    tracing::info!("Extracting certificate information...");
    let certificate_html = wait_for_element(
        ctx,
        &site.certificate_selector(),
        timing.element_wait,
        timing.poll_interval,
    )
    .await
    .context("failed while waiting for the certificate block")?;

    let certificate_html = match certificate_html {
        Some(html) => {
            tracing::info!("Certificate section found and HTML extracted");
            tracing::debug!(certificate_html = %html, "certificate block");
            html
        }
        None => {
            tracing::warn!("Certificate section not found - document may not have been signed yet");
            String::new()
        }
    };

    tracing::info!("Extracting timeline blocks...");
    let blocks = ctx
        .snapshot_all(
            &site.timeline_block_selector(),
            &site.timeline_title_selector(),
        )
        .await
        .context("failed to read timeline blocks")?;

    let mut timeline_html = String::new();
    let mut sent_by_candidates = Vec::new();
    for block in &blocks {
        timeline_html.push_str(&block.outer_html);
        if let Some(title) = &block.child_text {
            tracing::debug!("Timeline block: {title}");
            if title.contains(SENT_BY_MARKER) {
                sent_by_candidates.push(SentByCandidate {
                    html: block.outer_html.clone(),
                    title_text: title.clone(),
                });
            }
        }
    }

    if blocks.is_empty() {
        tracing::warn!("No timeline blocks found");
    } else {
        tracing::info!("Found {} timeline blocks", blocks.len());
        tracing::debug!(timeline_html = %timeline_html, "timeline blocks");
        if sent_by_candidates.is_empty() {
            tracing::warn!("No 'Sent by' blocks found in timeline");
        } else {
            tracing::info!(
                "Found {} blocks with 'Sent by' information",
                sent_by_candidates.len()
            );
        }
    }

    Ok(RawExtraction {
        certificate_html,
        timeline_html,
        sent_by_candidates,
    })
}
