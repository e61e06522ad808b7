//! autoterm — starts, stops, and terminates instances on cron schedules
//! read from their own tags.
//!
//! # Usage
//!
//! ```text
//! autoterm check --inventory fleet.toml
//! autoterm plan  --inventory fleet.toml --at 2026-10-16T18:00:00Z --format json
//! autoterm run   --inventory fleet.toml --config autoterm.toml --save
//! autoterm run   --inventory fleet.toml --interval 1m
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "autoterm",
    about = "Tag-driven start/stop/terminate scheduler",
    version,
    propagate_version = true
)]
struct Cli {
    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Common {
    /// Fleet file (TOML, or JSON by extension).
    #[arg(short, long)]
    pub inventory: PathBuf,

    /// autoterm.toml; built-in defaults when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Evaluate schedules at this RFC 3339 instant instead of now.
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every schedule and apply due actions to the fleet.
    Run {
        #[command(flatten)]
        common: Common,
        /// Repeat every interval ("30s", "1m") until Ctrl-C.
        #[arg(long)]
        interval: Option<String>,
        /// Write the updated fleet back to the inventory file.
        #[arg(long)]
        save: bool,
    },
    /// Show which actions a cycle would take, without applying them.
    Plan {
        #[command(flatten)]
        common: Common,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Validate every schedule expression and target-group tag.
    Check {
        #[command(flatten)]
        common: Common,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,autoterm=debug"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Run {
            common,
            interval,
            save,
        } => commands::run::run(&common, interval.as_deref(), save).await,
        Commands::Plan { common, format } => commands::plan::plan(&common, &format).await,
        Commands::Check { common } => commands::check::check(&common),
    }
}
