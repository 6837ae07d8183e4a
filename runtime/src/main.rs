// Copyright 2026 Signoff Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use signoff_runtime::cli::{self, ModelArgs, RunArgs};
use signoff_runtime::config::load_env_file;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "signoff",
    about = "Signoff: signature certificate details from proposal documents",
    version,
    after_help = "Run 'signoff <command> --help' for details on each command.\nWith no command, 'signoff' runs the batch."
)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the spreadsheet and write the augmented CSV
    Run(RunArgs),
    /// Derive fields from saved certificate and timeline HTML
    Extract {
        /// Certificate fragment
        #[arg(long)]
        certificate: PathBuf,
        /// Timeline fragment
        #[arg(long)]
        timeline: Option<PathBuf>,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Check environment and diagnose issues
    Doctor(RunArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so `.env` values back the flags' env fallbacks.
    let env_file = load_env_file(None);
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    if let Some(path) = env_file {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let result = match cli.command {
        None => cli::run_cmd::run(cli.run).await,
        Some(Commands::Run(args)) => cli::run_cmd::run(args).await,
        Some(Commands::Extract {
            certificate,
            timeline,
            model,
        }) => cli::extract_cmd::run(&model, &certificate, timeline.as_deref()).await,
        Some(Commands::Doctor(args)) => cli::doctor::run(&args).await,
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "signoff", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!("{e:#}");
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}
