//! In-memory proposal site used to drive the pipeline without a browser.

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use signoff::SiteContract;
use signoff_runtime::config::{Credentials, PipelineConfig, Timing};
use signoff_runtime::renderer::{ElementSnapshot, RenderContext, Renderer};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const LOGIN_URL: &str = "https://proposals.example.test/2/login/";
pub const DASHBOARD_URL: &str = "https://proposals.example.test/2/dashboard/";
pub const DOC_URL: &str = "https://proposals.example.test/2/proposals/view/?id=101";
pub const EMAIL: &str = "ops@example.test";
pub const PASSWORD: &str = "hunter2";

pub const CERTIFICATE: &str = r#"<div class="timeline-contentblock-certificate">
    <div>Accepted and Signed by</div><div class="certificate-value">Jane Doe</div>
    <div>Accepted and Signed on</div><div class="certificate-value">08 May 2025 14:02</div>
    <div>IP Address from signature location</div><div class="certificate-value">203.0.113.7</div>
</div>"#;

/// State shared by every session, like cookies in a persistent profile.
#[derive(Debug)]
pub struct SiteState {
    pub authenticated: bool,
    pub show_login_inputs: bool,
    pub show_submit: bool,
    pub certificate: Option<String>,
    pub timeline: Vec<ElementSnapshot>,
    pub opened: usize,
    pub closed: usize,
    pub navigations: Vec<String>,
    pub submissions: usize,
}

impl Default for SiteState {
    fn default() -> Self {
        Self {
            authenticated: false,
            show_login_inputs: true,
            show_submit: true,
            certificate: Some(CERTIFICATE.to_string()),
            timeline: vec![
                timeline_block("Viewed by Jane Doe"),
                timeline_block("Sent by Alex Smith"),
            ],
            opened: 0,
            closed: 0,
            navigations: Vec::new(),
            submissions: 0,
        }
    }
}

pub fn timeline_block(title: &str) -> ElementSnapshot {
    ElementSnapshot {
        outer_html: format!(
            r#"<div class="timeline-block"><div class="timeline-title">{title}</div></div>"#
        ),
        child_text: Some(title.to_string()),
    }
}

#[derive(Clone, Default)]
pub struct FakeSite {
    pub state: Arc<Mutex<SiteState>>,
}

impl FakeSite {
    pub fn new(state: SiteState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut SiteState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    pub fn context(&self) -> FakeContext {
        FakeContext {
            site: SiteContract::default(),
            state: self.state.clone(),
            current_url: "about:blank".to_string(),
            typed: HashMap::new(),
        }
    }
}

#[async_trait]
impl Renderer for FakeSite {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        self.with(|s| s.opened += 1);
        Ok(Box::new(self.context()))
    }
}

pub struct FakeContext {
    site: SiteContract,
    state: Arc<Mutex<SiteState>>,
    pub current_url: String,
    pub typed: HashMap<String, String>,
}

impl FakeContext {
    fn authenticated(&self) -> bool {
        self.state.lock().unwrap().authenticated
    }

    fn on_login(&self) -> bool {
        self.site.is_login_url(&self.current_url)
    }

    fn on_document(&self) -> bool {
        self.site.is_document_url(&self.current_url) && self.authenticated()
    }
}

#[async_trait]
impl RenderContext for FakeContext {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.state.lock().unwrap().navigations.push(url.to_string());
        if url.contains("unreachable") {
            bail!("net::ERR_NAME_NOT_RESOLVED");
        }
        self.current_url = if self.site.is_document_url(url) && !self.authenticated() {
            LOGIN_URL.to_string()
        } else {
            url.to_string()
        };
        Ok(())
    }

    async fn get_url(&self) -> Result<String> {
        Ok(self.current_url.clone())
    }

    async fn element_exists(&self, selector: &str) -> Result<bool> {
        if selector == self.site.login_form_selector() {
            return Ok(self.on_login());
        }
        if selector == self.site.user_menu_selector() {
            return Ok(self.authenticated() && !self.on_login() && self.current_url != "about:blank");
        }
        Ok(false)
    }

    async fn outer_html(&self, selector: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        if selector == self.site.email_selector() || selector == self.site.password_selector() {
            let visible = self.site.is_login_url(&self.current_url) && state.show_login_inputs;
            return Ok(visible.then(|| format!("<input id=\"{}\">", &selector[1..])));
        }
        if selector == self.site.certificate_selector() {
            let visible = self.site.is_document_url(&self.current_url) && state.authenticated;
            return Ok(if visible { state.certificate.clone() } else { None });
        }
        Ok(None)
    }

    async fn snapshot_all(&self, selector: &str, _child: &str) -> Result<Vec<ElementSnapshot>> {
        if selector == self.site.timeline_block_selector() && self.on_document() {
            return Ok(self.state.lock().unwrap().timeline.clone());
        }
        Ok(Vec::new())
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<()> {
        self.typed.insert(selector.to_string(), value.to_string());
        Ok(())
    }

    async fn click_first(&mut self, selector: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if selector != self.site.submit_selector()
            || !self.site.is_login_url(&self.current_url)
            || !state.show_submit
        {
            return Ok(false);
        }
        state.submissions += 1;
        let email_ok = self.typed.get(&self.site.email_selector()).map(String::as_str) == Some(EMAIL);
        let password_ok =
            self.typed.get(&self.site.password_selector()).map(String::as_str) == Some(PASSWORD);
        if email_ok && password_ok {
            state.authenticated = true;
            self.current_url = DASHBOARD_URL.to_string();
        }
        Ok(true)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.state.lock().unwrap().closed += 1;
        Ok(())
    }
}

pub fn pipeline_config(password: &str) -> PipelineConfig {
    PipelineConfig {
        site: SiteContract::default(),
        timing: Timing::immediate(),
        credentials: Credentials {
            email: EMAIL.to_string(),
            password: password.to_string(),
        },
        login_url: LOGIN_URL.to_string(),
    }
}
