// DraftDB tool entrypoint
//!
//! The heavy lifting (configuration, bootstrap, command logic) lives in
//! dedicated modules so this file remains a thin orchestrator.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use draftdb::commands;
use draftdb::config::ToolConfig;
use draftdb::lifecycle::bootstrap;
use draftdb_core::ResolvePolicy;
use log::info;
use std::path::PathBuf;

mod logging;

/// DraftDB checkpoint resolution tool.
#[derive(Parser, Debug)]
#[command(name = "draftdb")]
#[command(version)]
#[command(about = "Checkpoint resolution tool for DraftDB application databases", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./draftdb.toml when present)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Application whose database to operate on
    #[arg(short = 'a', long = "app")]
    app: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List rows with pending checkpoints
    Status {
        /// Table to inspect
        #[arg(short = 't', long = "table")]
        table: String,
    },
    /// Resolve pending checkpoint rows, in bulk or one row at a time
    Resolve {
        /// Table to resolve
        #[arg(short = 't', long = "table")]
        table: String,

        /// Keep the newest checkpoint, or revert to the last committed state
        #[arg(short = 'p', long = "policy", value_enum)]
        policy: PolicyArg,

        /// Resolve only this row instead of the whole table
        #[arg(short = 'r', long = "row")]
        row: Option<String>,
    },
    /// Populate a table with demo rows and checkpoints
    Seed {
        /// Table to seed
        #[arg(short = 't', long = "table")]
        table: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    /// Promote each row's newest checkpoint to committed status
    Newest,
    /// Discard each row's checkpoints, reverting to committed state
    Oldest,
}

impl From<PolicyArg> for ResolvePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Newest => ResolvePolicy::TakeNewest,
            PolicyArg::Oldest => ResolvePolicy::TakeOldest,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ToolConfig::load(cli.config.as_deref())?;

    // Logging before any other side effects
    logging::init_logging(
        &config.logging.level,
        config.logging.file_path.as_deref(),
        config.logging.log_to_console,
    )?;

    info!(
        "draftdb v{} starting: app={}",
        env!("CARGO_PKG_VERSION"),
        cli.app
    );

    let handle = bootstrap(&config, &cli.app)?;

    match cli.command {
        Command::Status { table } => commands::status::run(&handle, &table).await,
        Command::Resolve { table, policy, row } => {
            commands::resolve::run(&handle, &table, policy.into(), row).await
        }
        Command::Seed { table } => commands::seed::run(&handle, &table),
    }
}
