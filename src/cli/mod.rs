//! CLI command handling
//!
//! Resolves configuration and dispatches commands.

use std::path::Path;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{paths, Result};
use crate::testing;

/// Outcome of a dispatched command, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Failure => 1,
        }
    }
}

/// Load the configuration file, explicit or default
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config_file: Option<&Path>) -> Result<Outcome> {
    let config = load_config(config_file)?;

    match command {
        Commands::Run {
            endpoint,
            timeout_ms,
            verbose,
        } => {
            let config = config.with_overrides(endpoint, timeout_ms)?;
            tracing::debug!(
                endpoint = %config.connection.endpoint,
                timeout_ms = config.timeouts.receive_ms,
                "Starting run"
            );

            let report = testing::run_probe(&config, verbose).await?;
            Ok(if report.passed() {
                Outcome::Success
            } else {
                Outcome::Failure
            })
        }

        Commands::Config => {
            let location = match config_file {
                Some(path) => path.display().to_string(),
                None => paths::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(no config directory)".to_string()),
            };
            println!("Config file:     {}", location);
            println!("Endpoint:        {}", config.connection.endpoint);
            println!("Receive timeout: {} ms", config.timeouts.receive_ms);
            Ok(Outcome::Success)
        }
    }
}
