//! cpctl: reconcile logging facilities on managed control planes.
//!
//! # Usage
//!
//! ```text
//! cpctl enable-logging --name <cluster> [--region <r>] [-f <config.yaml>]
//!       [--all[=false]] [--api] [--audit] [--authenticator]
//!       [--controller-manager] [--scheduler] [--approve] [--timeout <secs>]
//! cpctl get clusters [--name <cluster>] [--region <r>] [--all-regions]
//!       [--chunk-size <n>] [-o table|json]
//! ```

mod client;
mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use commands::{enable_logging::EnableLoggingArgs, get::GetCommand};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "cpctl",
    version,
    about = "Manage logging facilities on managed Kubernetes control planes",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Control-plane API endpoint; `{region}` is replaced with the target region.
    #[arg(long, global = true, env = "CPCTL_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Log debug events to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn endpoint(&self) -> Result<&str> {
        self.endpoint_url.as_deref().context(
            "no control-plane endpoint configured; pass --endpoint-url or set CPCTL_ENDPOINT_URL",
        )
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Update cluster logging configuration.
    EnableLogging(EnableLoggingArgs),

    /// Get resources.
    Get {
        #[command(subcommand)]
        command: GetCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let Cli { global, command } = Cli::parse();
    init_tracing(global.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    runtime.block_on(async move {
        match command {
            Commands::EnableLogging(args) => args.run(&global).await,
            Commands::Get { command } => commands::get::run(command, &global).await,
        }
    })
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
