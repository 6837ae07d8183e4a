//! Scoped browser sessions.
//!
//! A session owns one browser for the lifetime of one document. It is torn
//! down on every exit path; teardown failures are logged and dropped.

use crate::renderer::{RenderContext, Renderer};
use anyhow::{Context, Result};
use std::time::{Duration, Instant};

/// A browser session bound to one document.
pub struct Session {
    /// Label used in log lines (usually the row number).
    pub label: String,
    /// The browser context.
    context: Box<dyn RenderContext>,
    /// When the session was opened.
    created_at: Instant,
}

impl Session {
    /// Open a fresh browser session.
    pub async fn open(renderer: &dyn Renderer, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let context = renderer
            .new_context()
            .await
            .with_context(|| format!("failed to open browser session for {label}"))?;
        Ok(Self {
            label,
            context,
            created_at: Instant::now(),
        })
    }

    /// Get the browser context for this session.
    pub fn context_mut(&mut self) -> &mut dyn RenderContext {
        self.context.as_mut()
    }

    /// How long the session has been alive.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Close the session and release the browser. Never fails.
    pub async fn close(self) {
        tracing::info!("Closing browser session {}...", self.label);
        let age = self.age();
        match self.context.close().await {
            Ok(()) => tracing::info!("Browser session {} closed after {:.1?}", self.label, age),
            Err(e) => tracing::error!("Error closing browser session {}: {e:#}", self.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{ElementSnapshot, NoopRenderer};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingContext {
        closed: Arc<AtomicUsize>,
        fail_close: bool,
    }

    #[async_trait]
    impl RenderContext for CountingContext {
        async fn navigate(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }
        async fn get_url(&self) -> Result<String> {
            Ok(String::new())
        }
        async fn element_exists(&self, _selector: &str) -> Result<bool> {
            Ok(false)
        }
        async fn outer_html(&self, _selector: &str) -> Result<Option<String>> {
            Ok(None)
        }
        async fn snapshot_all(&self, _s: &str, _c: &str) -> Result<Vec<ElementSnapshot>> {
            Ok(Vec::new())
        }
        async fn fill(&mut self, _selector: &str, _value: &str) -> Result<()> {
            Ok(())
        }
        async fn click_first(&mut self, _selector: &str) -> Result<bool> {
            Ok(false)
        }
        async fn close(self: Box<Self>) -> Result<()> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                anyhow::bail!("teardown exploded");
            }
            Ok(())
        }
    }

    struct CountingRenderer {
        closed: Arc<AtomicUsize>,
        fail_close: bool,
    }

    #[async_trait]
    impl Renderer for CountingRenderer {
        async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
            Ok(Box::new(CountingContext {
                closed: Arc::clone(&self.closed),
                fail_close: self.fail_close,
            }))
        }
    }

    #[tokio::test]
    async fn close_releases_the_browser() {
        let closed = Arc::new(AtomicUsize::new(0));
        let renderer = CountingRenderer {
            closed: Arc::clone(&closed),
            fail_close: false,
        };
        let mut session = Session::open(&renderer, "row 1").await.unwrap();
        let result = session.context_mut().fill("#Email", "x").await;
        assert!(result.is_ok());
        session.close().await;
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn teardown_errors_are_swallowed() {
        let closed = Arc::new(AtomicUsize::new(0));
        let renderer = CountingRenderer {
            closed: Arc::clone(&closed),
            fail_close: true,
        };
        let session = Session::open(&renderer, "row 2").await.unwrap();
        assert_eq!(session.label, "row 2");
        session.close().await;
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn open_failure_is_reported() {
        let result = Session::open(&NoopRenderer, "row 3").await;
        assert!(result.is_err());
    }
}
