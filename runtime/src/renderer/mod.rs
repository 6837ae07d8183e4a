//! Renderer abstraction for browser-driven document pages.
//!
//! Defines the `Renderer` and `RenderContext` traits that abstract over
//! the browser engine (currently Chromium via chromiumoxide). Everything
//! above this layer talks to pages through selectors and URLs only.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;

/// One element matched on a page, with the text of a chosen child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSnapshot {
    /// Full outer HTML of the element.
    pub outer_html: String,
    /// Rendered text of the first matching child, if there was one.
    pub child_text: Option<String>,
}

/// A browser engine that hands out one isolated session per call.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Launch a fresh browser session.
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
}

/// A single browser session showing one page at a time.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL. Returns once the navigation command is accepted.
    async fn navigate(&mut self, url: &str) -> Result<()>;
    /// Get the current URL.
    async fn get_url(&self) -> Result<String>;
    /// Whether any element matches `selector` right now.
    async fn element_exists(&self, selector: &str) -> Result<bool>;
    /// Outer HTML of the first element matching `selector`, if any.
    async fn outer_html(&self, selector: &str) -> Result<Option<String>>;
    /// Snapshot every element matching `selector`, reading the text of its
    /// first descendant matching `child_selector`.
    async fn snapshot_all(
        &self,
        selector: &str,
        child_selector: &str,
    ) -> Result<Vec<ElementSnapshot>>;
    /// Clear the input matching `selector` and type `value` into it.
    async fn fill(&mut self, selector: &str, value: &str) -> Result<()>;
    /// Click the first element matching `selector`. `false` if none matched.
    async fn click_first(&mut self, selector: &str) -> Result<bool>;
    /// Tear the session down.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A renderer used when no browser is available.
///
/// Every session request fails, which the batch records as an error row.
pub struct NoopRenderer;

#[async_trait]
impl Renderer for NoopRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        Err(anyhow::anyhow!("Browser not available"))
    }
}
