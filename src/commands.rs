//! CLI command definitions
//!
//! Defines the clap commands for the probe.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the request/reply checks against a Janus server
    Run {
        /// Janus ZeroMQ endpoint (host:port or tcp://host:port)
        #[arg(long, short)]
        endpoint: Option<String>,

        /// How long to wait for each reply, in milliseconds
        #[arg(long, short)]
        timeout_ms: Option<u64>,

        /// Print every request and reply
        #[arg(long, short)]
        verbose: bool,
    },

    /// Show the resolved configuration
    Config,
}
