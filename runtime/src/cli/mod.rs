//! CLI subcommand implementations for the signoff binary.

pub mod doctor;
pub mod extract_cmd;
pub mod run_cmd;

use crate::config::{DEFAULT_LOGIN_URL, DEFAULT_MAX_ROWS, DEFAULT_OUTPUT};
use crate::llm::{ModelClient, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use clap::Args;
use std::path::PathBuf;

/// Model service settings shared by `run` and `extract`.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// API key for the model service. Without it only patterns are used.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Model name
    #[arg(long, env = "SIGNOFF_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Chat-completions endpoint
    #[arg(long, env = "SIGNOFF_MODEL_URL", default_value = DEFAULT_ENDPOINT)]
    pub model_url: String,
}

impl ModelArgs {
    pub fn client(&self) -> Option<ModelClient> {
        ModelClient::from_key(self.openai_api_key.clone(), &self.model, &self.model_url)
    }
}

/// Arguments for a batch run.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Account email for the proposal site
    #[arg(long, env = "SIGNOFF_EMAIL")]
    pub email: Option<String>,

    /// Account password for the proposal site
    #[arg(long, env = "SIGNOFF_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Share link of the input spreadsheet
    #[arg(long, env = "SIGNOFF_SHEET_URL")]
    pub sheet_url: Option<String>,

    /// Login page of the proposal site
    #[arg(long, env = "SIGNOFF_LOGIN_URL", default_value = DEFAULT_LOGIN_URL)]
    pub login_url: String,

    /// Persistent browser profile directory
    #[arg(long, env = "SIGNOFF_PROFILE_DIR")]
    pub profile_dir: Option<PathBuf>,

    /// Profile name inside the profile directory
    #[arg(long, default_value = "Default")]
    pub profile_name: String,

    /// Maximum number of rows to process
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    pub max_rows: usize,

    /// Output CSV file (overwritten)
    #[arg(long, short, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Explicit browser binary
    #[arg(long, env = "SIGNOFF_CHROMIUM_PATH")]
    pub chrome: Option<PathBuf>,

    /// Seconds to wait after each navigation or submission
    #[arg(long, default_value_t = 10)]
    pub settle_secs: u64,

    /// Seconds to wait for an expected element
    #[arg(long, default_value_t = 20)]
    pub wait_secs: u64,

    /// Seconds to pause between rows
    #[arg(long, default_value_t = 2)]
    pub delay_secs: u64,
}
