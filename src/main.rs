//! Janus probe CLI
//!
//! Checks that a Janus server answers correlated requests over its
//! ZeroMQ transport. Exits 0 when every check passes, 1 otherwise.

use clap::Parser;
use colored::Colorize;
use janus_probe::commands::Commands;
use janus_probe::{cli, common::logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "janus-probe", about = "Janus ZeroMQ transport probe")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    // The run future (and its socket) is dropped before we exit.
    let result = tokio::select! {
        result = cli::dispatch(cli.command, cli.config.as_deref()) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match result {
        Some(Ok(outcome)) => std::process::exit(outcome.exit_code()),
        None => {
            eprintln!("{} Interrupted", "✗".red());
            std::process::exit(1);
        }
        Some(Err(e)) => {
            eprintln!("{} Error: {e}", "✗".red());
            std::process::exit(1);
        }
    }
}
