//! Load the input table from a shared spreadsheet.
//!
//! Tries the export URL derived from the share link, then the one rebuilt
//! from the sheet id, and finally falls back to the built-in sample table
//! so a run always has rows to work on.

use super::http_client::HttpClient;
use anyhow::{bail, Context, Result};
use signoff::sheet::{export_url, export_url_from_id_with_base, sample_table, EXPORT_BASE};
use signoff::Table;

/// Where the input table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOrigin {
    /// Export URL derived from the share link.
    Export(String),
    /// Export URL rebuilt from the sheet id.
    ExportById(String),
    /// Built-in sample rows.
    Sample,
}

/// Download and parse one CSV export.
pub async fn fetch_table(client: &HttpClient, url: &str) -> Result<Table> {
    let resp = client.get(url).await?;
    if resp.is_html() {
        bail!("{url} returned an HTML page instead of CSV (is the sheet shared publicly?)");
    }
    let table = Table::from_csv_str(&resp.body).with_context(|| format!("invalid CSV from {url}"))?;
    if table.is_empty() {
        bail!("{url} returned no rows");
    }
    Ok(table)
}

/// Load the input table, never failing.
pub async fn load_input_table(client: &HttpClient, share_url: Option<&str>) -> (Table, TableOrigin) {
    load_input_table_from(client, share_url, EXPORT_BASE).await
}

/// [`load_input_table`] with the by-id export served from `export_base`.
pub async fn load_input_table_from(
    client: &HttpClient,
    share_url: Option<&str>,
    export_base: &str,
) -> (Table, TableOrigin) {
    let Some(share_url) = share_url else {
        tracing::warn!("No spreadsheet URL configured");
        tracing::info!("Creating sample table for testing");
        return (sample_table(), TableOrigin::Sample);
    };

    let primary = export_url(share_url);
    match fetch_table(client, &primary).await {
        Ok(table) => {
            tracing::info!("Successfully read spreadsheet with {} rows", table.len());
            return (table, TableOrigin::Export(primary));
        }
        Err(e) => {
            tracing::warn!("Failed to read spreadsheet directly ({e:#}), trying alternative download method");
        }
    }

    if let Some(by_id) = export_url_from_id_with_base(share_url, export_base) {
        if by_id != primary {
            match fetch_table(client, &by_id).await {
                Ok(table) => {
                    tracing::info!("Successfully downloaded spreadsheet with {} rows", table.len());
                    return (table, TableOrigin::ExportById(by_id));
                }
                Err(e) => tracing::error!("Error downloading spreadsheet: {e:#}"),
            }
        }
    } else {
        tracing::error!("No sheet id found in {share_url}");
    }

    tracing::error!("Failed to read data from spreadsheet");
    tracing::info!("Creating sample table for testing");
    (sample_table(), TableOrigin::Sample)
}
