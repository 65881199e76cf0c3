//! Berth - CloudFormation for a load-balanced web application on ECS.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use berth::cli::output;
use berth::cli::{execute, Cli};
use berth::core::constants::LOG_ENV;
use berth::core::deployment::missing_var_message;
use berth::error::{ConfigError, Error, SynthError};

fn main() {
    // Usage errors exit 1 like every other failure; help and version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("berth=debug")
        } else {
            EnvFilter::new("berth=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli.command, cli.config) {
        match &e {
            // One line per variable, so the operator can fix them all at once.
            Error::Config(ConfigError::MissingVariables(vars)) => {
                for var in vars {
                    output::error(&missing_var_message(var));
                }
            }
            _ => {
                output::error(&e.to_string());
                let suggestion = match &e {
                    Error::Config(ConfigError::Parse(_)) => Some("check berth.toml syntax"),
                    Error::Synth(SynthError::InvalidCapacity { .. }) => {
                        Some("set [service] min_capacity <= max_capacity in berth.toml")
                    }
                    _ => None,
                };
                if let Some(hint) = suggestion {
                    output::hint(hint);
                }
            }
        }
        std::process::exit(1);
    }
}
