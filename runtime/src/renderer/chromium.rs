//! Chromium-based renderer using chromiumoxide.

use super::{ElementSnapshot, RenderContext, Renderer};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use tokio::task::JoinHandle;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. SIGNOFF_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("SIGNOFF_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    for name in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
        "chrome",
    ] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 3. Common install locations
    let common: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else {
        &[]
    };
    common.iter().map(PathBuf::from).find(|p| p.exists())
}

/// How each browser session is launched.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Explicit browser binary; discovered with [`find_chromium`] otherwise.
    pub executable: Option<PathBuf>,
    /// Persistent user data directory, so cookies survive between sessions.
    pub user_data_dir: PathBuf,
    /// Profile directory name inside `user_data_dir`.
    pub profile_name: String,
    /// Run without a visible window.
    pub headless: bool,
}

/// Chromium-based renderer. Every context is a separate browser process.
pub struct ChromiumRenderer {
    options: BrowserOptions,
}

impl ChromiumRenderer {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }

    fn config(&self) -> Result<BrowserConfig> {
        let chrome_path = match &self.options.executable {
            Some(path) => path.clone(),
            None => find_chromium()
                .context("Chromium not found. Set SIGNOFF_CHROMIUM_PATH or pass --chrome.")?,
        };

        std::fs::create_dir_all(&self.options.user_data_dir).with_context(|| {
            format!(
                "failed to create profile dir: {}",
                self.options.user_data_dir.display()
            )
        })?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(&self.options.user_data_dir)
            .window_size(1920, 1080)
            .arg(format!("--profile-directory={}", self.options.profile_name))
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-extensions");
        if !self.options.headless {
            builder = builder.with_head();
        }

        builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        tracing::info!("Launching Chromium...");
        let config = self.config()?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Spawn the handler task
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("chromiumoxide handler event error: {e}");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(anyhow::anyhow!("failed to create new page: {e}"));
            }
        };
        tracing::info!("Chromium ready");

        Ok(Box::new(ChromiumContext {
            browser,
            page,
            handler_task,
        }))
    }
}

/// A single Chromium browser with its one page.
pub struct ChromiumContext {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("navigation to {url} failed"))?;
        Ok(())
    }

    async fn get_url(&self) -> Result<String> {
        let url = self
            .page
            .url()
            .await
            .context("failed to get URL")?
            .unwrap_or_default();
        Ok(url)
    }

    async fn element_exists(&self, selector: &str) -> Result<bool> {
        let found = self
            .page
            .find_elements(selector)
            .await
            .with_context(|| format!("query {selector} failed"))?;
        Ok(!found.is_empty())
    }

    async fn outer_html(&self, selector: &str) -> Result<Option<String>> {
        let found = self
            .page
            .find_elements(selector)
            .await
            .with_context(|| format!("query {selector} failed"))?;
        match found.first() {
            Some(element) => Ok(Some(
                element
                    .outer_html()
                    .await
                    .context("failed to read outer HTML")?
                    .unwrap_or_default(),
            )),
            None => Ok(None),
        }
    }

    async fn snapshot_all(
        &self,
        selector: &str,
        child_selector: &str,
    ) -> Result<Vec<ElementSnapshot>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .with_context(|| format!("query {selector} failed"))?;

        let mut snapshots = Vec::with_capacity(elements.len());
        for element in elements {
            let outer_html = element
                .outer_html()
                .await
                .context("failed to read outer HTML")?
                .unwrap_or_default();
            let children = element
                .find_elements(child_selector)
                .await
                .with_context(|| format!("query {child_selector} failed"))?;
            let child_text = match children.first() {
                Some(child) => Some(
                    child
                        .inner_text()
                        .await
                        .context("failed to read child text")?
                        .unwrap_or_default(),
                ),
                None => None,
            };
            snapshots.push(ElementSnapshot {
                outer_html,
                child_text,
            });
        }
        Ok(snapshots)
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .with_context(|| format!("input {selector} not found"))?;
        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await
            .with_context(|| format!("failed to clear {selector}"))?;
        element
            .click()
            .await
            .with_context(|| format!("failed to focus {selector}"))?;
        element
            .type_str(value)
            .await
            .with_context(|| format!("failed to type into {selector}"))?;
        Ok(())
    }

    async fn click_first(&mut self, selector: &str) -> Result<bool> {
        let found = self
            .page
            .find_elements(selector)
            .await
            .with_context(|| format!("query {selector} failed"))?;
        match found.first() {
            Some(element) => {
                element
                    .click()
                    .await
                    .with_context(|| format!("failed to click {selector}"))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        let closed = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        closed.context("failed to close Chromium")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(dir: &tempfile::TempDir) -> BrowserOptions {
        BrowserOptions {
            executable: None,
            user_data_dir: dir.path().join("profile"),
            profile_name: "Default".to_string(),
            headless: true,
        }
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_snapshot_and_fill() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChromiumRenderer::new(options(&dir));
        let mut ctx = renderer
            .new_context()
            .await
            .expect("failed to create context");

        ctx.navigate(
            "data:text/html,<div class='timeline-block'><div class='timeline-title'>Sent by Alex</div></div><input id='Email'>",
        )
        .await
        .expect("navigation failed");

        let blocks = ctx
            .snapshot_all(".timeline-block", ".timeline-title")
            .await
            .expect("snapshot failed");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].child_text.as_deref(), Some("Sent by Alex"));

        assert!(ctx.element_exists("#Email").await.unwrap());
        ctx.fill("#Email", "jane@example.test").await.expect("fill failed");
        assert!(!ctx.click_first("button[type='submit']").await.unwrap());

        ctx.close().await.expect("close failed");
    }
}
