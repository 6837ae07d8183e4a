//! Authentication, login, and document positioning on a live page.
//!
//! Every step waits a fixed settle duration after acting instead of
//! listening for page-ready events. Nothing here retries; failures come
//! back as typed [`SignoffError`]s inside `anyhow::Error`.

use crate::config::{Credentials, PipelineConfig, Timing};
use crate::renderer::RenderContext;
use anyhow::Result;
use signoff::{auth, AuthStatus, DomSnapshot, SignoffError, SiteContract};
use std::time::Duration;
use tokio::time::Instant;

/// Probe the current page for the login form and the user menu.
pub async fn probe_dom(ctx: &dyn RenderContext, site: &SiteContract) -> Result<DomSnapshot> {
    Ok(DomSnapshot {
        login_form: ctx.element_exists(&site.login_form_selector()).await?,
        user_menu: ctx.element_exists(&site.user_menu_selector()).await?,
    })
}

/// Decide whether the session is already authenticated.
pub async fn check_authentication(ctx: &dyn RenderContext, site: &SiteContract) -> Result<AuthStatus> {
    let current_url = ctx.get_url().await?;
    tracing::info!("Current URL: {current_url}");

    let snapshot = probe_dom(ctx, site).await?;
    let status = auth::resolve(site, &current_url, &snapshot);
    tracing::info!(
        authenticated = status.authenticated,
        signal = ?status.signal,
        "Authentication status resolved"
    );
    Ok(status)
}

/// Navigate and wait the settle duration.
pub async fn navigate_and_settle(ctx: &mut dyn RenderContext, url: &str, timing: &Timing) -> Result<()> {
    ctx.navigate(url).await?;
    tracing::info!("Waiting for page to load ({:?})...", timing.settle);
    tokio::time::sleep(timing.settle).await;
    Ok(())
}

/// Poll for `selector` until it appears or `budget` runs out.
///
/// Returns the element's outer HTML, or `None` on expiry. The page is always
/// checked at least once.
pub async fn wait_for_element(
    ctx: &dyn RenderContext,
    selector: &str,
    budget: Duration,
    poll_interval: Duration,
) -> Result<Option<String>> {
    let deadline = Instant::now() + budget;
    loop {
        if let Some(html) = ctx.outer_html(selector).await? {
            return Ok(Some(html));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(poll_interval).await;
    }
}

async fn require_element(ctx: &dyn RenderContext, selector: &str, timing: &Timing) -> Result<()> {
    tracing::info!("Looking for {selector}...");
    match wait_for_element(ctx, selector, timing.element_wait, timing.poll_interval).await? {
        Some(_) => Ok(()),
        None => Err(SignoffError::Timeout {
            what: selector.to_string(),
            waited_ms: timing.element_wait.as_millis() as u64,
        }
        .into()),
    }
}

/// Submit credentials once and check that the login page was left behind.
pub async fn login(
    ctx: &mut dyn RenderContext,
    site: &SiteContract,
    timing: &Timing,
    login_url: &str,
    credentials: &Credentials,
) -> Result<()> {
    tracing::info!("Not authenticated, proceeding with login...");

    let current_url = ctx.get_url().await?;
    if !site.is_login_url(&current_url) {
        tracing::info!("Navigating to login page: {login_url}");
        navigate_and_settle(ctx, login_url, timing).await?;
    }

    let email = site.email_selector();
    require_element(ctx, &email, timing).await?;
    ctx.fill(&email, &credentials.email).await?;
    tracing::info!("Email entered");

    let password = site.password_selector();
    require_element(ctx, &password, timing).await?;
    ctx.fill(&password, &credentials.password).await?;
    tracing::info!("Password entered");

    if !ctx.click_first(site.submit_selector()).await? {
        tracing::error!("No login button found");
        return Err(SignoffError::ElementNotFound(site.submit_selector().to_string()).into());
    }
    tracing::info!("Login button clicked");

    tracing::info!("Waiting for post-login page to load ({:?})...", timing.settle);
    tokio::time::sleep(timing.settle).await;

    let after = ctx.get_url().await?;
    if site.is_login_url(&after) {
        tracing::error!("Login failed - still on login page");
        return Err(SignoffError::NavigationMismatch {
            expected: format!("URL without {}", site.login_path),
            actual: after,
        }
        .into());
    }

    tracing::info!("Login successful!");
    Ok(())
}

/// Make sure the browser shows `document_url`.
pub async fn locate_document(
    ctx: &mut dyn RenderContext,
    site: &SiteContract,
    timing: &Timing,
    document_url: &str,
) -> Result<()> {
    let current_url = ctx.get_url().await?;
    if current_url.contains(document_url) {
        tracing::info!("Already on the correct document page");
        return Ok(());
    }

    tracing::info!("Navigating to document URL: {document_url}");
    navigate_and_settle(ctx, document_url, timing).await?;

    let landed = ctx.get_url().await?;
    if !site.is_document_url(&landed) {
        tracing::error!("Navigation failed - unexpected URL: {landed}");
        return Err(SignoffError::NavigationMismatch {
            expected: site.document_path.clone(),
            actual: landed,
        }
        .into());
    }

    tracing::info!("Successfully navigated to document page");
    Ok(())
}

/// Open the document, logging in first when the session is not authenticated.
pub async fn reach_document(
    ctx: &mut dyn RenderContext,
    config: &PipelineConfig,
    document_url: &str,
) -> Result<()> {
    tracing::info!("Navigating directly to document URL: {document_url}");
    if let Err(e) = navigate_and_settle(ctx, document_url, &config.timing).await {
        tracing::warn!("Direct navigation failed: {e:#}");
    }

    let status = check_authentication(ctx, &config.site).await?;
    if !status.authenticated {
        login(
            ctx,
            &config.site,
            &config.timing,
            &config.login_url,
            &config.credentials,
        )
        .await?;
    }

    locate_document(ctx, &config.site, &config.timing, document_url).await
}
