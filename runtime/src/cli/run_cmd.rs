//! `signoff run`: process the spreadsheet and write the augmented CSV.

use super::RunArgs;
use crate::acquisition::{load_input_table, HttpClient, TableOrigin};
use crate::batch::{BatchRunner, BatchSummary};
use crate::config::{default_profile_dir, Credentials, PipelineConfig, Timing};
use crate::derive::FieldDeriver;
use crate::renderer::chromium::{BrowserOptions, ChromiumRenderer};
use anyhow::{Context, Result};
use signoff::SiteContract;
use std::time::Duration;

const PREVIEW_ROWS: usize = 5;
const SHEET_TIMEOUT_MS: u64 = 30_000;

impl RunArgs {
    /// Timing derived from the flags. The poll interval stays at its default.
    pub fn timing(&self) -> Timing {
        Timing {
            settle: Duration::from_secs(self.settle_secs),
            element_wait: Duration::from_secs(self.wait_secs),
            row_delay: Duration::from_secs(self.delay_secs),
            ..Timing::default()
        }
    }

    /// Resolve credentials and assemble the pipeline configuration.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let credentials = Credentials::resolve(self.email.clone(), self.password.clone())?;
        Ok(PipelineConfig {
            site: SiteContract::default(),
            timing: self.timing(),
            credentials,
            login_url: self.login_url.clone(),
        })
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            executable: self.chrome.clone(),
            user_data_dir: self.profile_dir.clone().unwrap_or_else(default_profile_dir),
            profile_name: self.profile_name.clone(),
            headless: self.headless,
        }
    }
}

/// Run the batch end to end.
pub async fn run(args: RunArgs) -> Result<()> {
    // Fail on missing credentials before touching the network or a browser.
    let config = args.pipeline_config()?;
    tracing::info!("Starting document processing");

    let deriver = FieldDeriver::new(&config.site, args.model.client());

    let http = HttpClient::new(SHEET_TIMEOUT_MS);
    let (input, origin) = load_input_table(&http, args.sheet_url.as_deref()).await;
    if origin == TableOrigin::Sample {
        tracing::warn!("Running against the built-in sample rows");
    }

    let renderer = ChromiumRenderer::new(args.browser_options());
    let outcome = BatchRunner::new(&renderer, &deriver, &config)
        .run(&input, args.max_rows)
        .await;

    let table = outcome.results.into_table();
    table
        .write_path(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    tracing::info!("Results saved to {}", args.output.display());

    log_summary(&outcome.summary);
    println!("{}", table.preview(PREVIEW_ROWS));
    Ok(())
}

fn log_summary(summary: &BatchSummary) {
    let elapsed = summary.elapsed();
    tracing::info!(
        processed = summary.processed,
        failed = summary.failed,
        skipped = summary.skipped(),
        "Batch finished in {}.{:03}s (started {})",
        elapsed.num_seconds(),
        elapsed.num_milliseconds() % 1000,
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
}
