//! Batch orchestrator: one browser session per spreadsheet row.
//!
//! Rows run strictly one after another. A failing row gets `Error` values
//! and the batch moves on; every input row ends up in the output exactly
//! once, in input order.

use crate::config::PipelineConfig;
use crate::derive::{Derived, FieldDeriver};
use crate::live::{self, Session};
use crate::renderer::Renderer;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use signoff::{DocumentTarget, ExtractedFields, ResultTable, Table};

/// Counters for a finished batch.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_rows: usize,
    pub processed: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Rows left untouched because of the row cap.
    pub fn skipped(&self) -> usize {
        self.total_rows - self.processed
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// The augmented table and its summary.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: ResultTable,
    pub summary: BatchSummary,
}

/// Drives the per-document pipeline over a table.
pub struct BatchRunner<'a> {
    renderer: &'a dyn Renderer,
    deriver: &'a FieldDeriver,
    config: &'a PipelineConfig,
}

impl<'a> BatchRunner<'a> {
    pub fn new(renderer: &'a dyn Renderer, deriver: &'a FieldDeriver, config: &'a PipelineConfig) -> Self {
        Self {
            renderer,
            deriver,
            config,
        }
    }

    /// Run the full pipeline for one document in its own browser session.
    ///
    /// The session is closed before returning, whether or not the pipeline
    /// succeeded.
    pub async fn process_document(&self, label: &str, target: &DocumentTarget) -> Result<Derived> {
        let mut session = Session::open(self.renderer, label).await?;
        let result = self.drive(&mut session, target).await;
        session.close().await;
        result
    }

    async fn drive(&self, session: &mut Session, target: &DocumentTarget) -> Result<Derived> {
        let ctx = session.context_mut();
        live::reach_document(ctx, self.config, &target.document_url).await?;

        let raw = live::extract_raw(ctx, &self.config.site, &self.config.timing)
            .await
            .context("failed to extract information")?;

        let derived = self.deriver.derive(&raw).await;
        tracing::info!(
            tier = ?derived.tier,
            "Parsed data: {}",
            serde_json::to_string(&derived.fields).unwrap_or_default()
        );
        Ok(derived)
    }

    /// Process up to `max_rows` rows of `input`.
    pub async fn run(&self, input: &Table, max_rows: usize) -> BatchOutcome {
        let started_at = Utc::now();
        let mut results = ResultTable::from_input(input);
        let to_process = max_rows.min(input.len());
        let mut failed = 0;

        tracing::info!("Processing {to_process} of {} rows", input.len());

        for i in 0..to_process {
            let (fields, ok) = self.process_row(input, i, to_process).await;
            if !ok {
                failed += 1;
            }
            results.record(i, &fields);

            if i + 1 < to_process && !self.config.timing.row_delay.is_zero() {
                tokio::time::sleep(self.config.timing.row_delay).await;
            }
        }

        BatchOutcome {
            results,
            summary: BatchSummary {
                started_at,
                finished_at: Utc::now(),
                total_rows: input.len(),
                processed: to_process,
                failed,
            },
        }
    }

    /// Fields for one row and whether its pipeline succeeded.
    async fn process_row(&self, input: &Table, row: usize, total: usize) -> (ExtractedFields, bool) {
        let position = format!("{}/{total}", row + 1);
        let target = match input.target(row) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!("Error processing row {position}: {e}");
                return (ExtractedFields::error_with(e), false);
            }
        };

        tracing::info!(
            "Processing URL {position}: {} for company: {}",
            target.document_url,
            target.company
        );

        match self.process_document(&format!("row {position}"), &target).await {
            Ok(derived) => {
                tracing::info!("Successfully processed URL {position}");
                (derived.fields, true)
            }
            Err(e) => {
                tracing::error!("Failed to process URL {position}: {e:#}");
                (ExtractedFields::error(), false)
            }
        }
    }
}
