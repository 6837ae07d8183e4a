//! Async HTTP client wrapping reqwest.
//!
//! Used to download spreadsheet exports. Follows redirects (share links
//! bounce through a few hosts) but never retries.

use anyhow::{bail, Context, Result};
use std::time::Duration;

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Content-Type header.
    pub content_type: Option<String>,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Whether the body looks like an HTML page rather than data.
    pub fn is_html(&self) -> bool {
        let declared = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("text/html"));
        declared || self.body.trim_start().starts_with('<')
    }
}

/// HTTP client for input acquisition.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a new HTTP client with the given request timeout.
    pub fn new(timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("signoff/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Perform a single GET request. Non-success statuses are errors.
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        let r = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;

        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let content_type = r
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !r.status().is_success() {
            bail!("GET {url} returned HTTP {status}");
        }

        let body = r
            .text()
            .await
            .with_context(|| format!("failed to read body of {url}"))?;

        Ok(HttpResponse {
            url: url.to_string(),
            final_url,
            status,
            content_type,
            body,
        })
    }
}
