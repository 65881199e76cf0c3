//! Command-line interface.

pub mod check;
pub mod completions;
pub mod name;
pub mod output;
pub mod secrets;
pub mod synth;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::constants;
use crate::core::deployment::Variant;

/// Berth - CloudFormation for a load-balanced web application on ECS.
#[derive(Parser)]
#[command(
    name = "berth",
    about = "Synthesize CloudFormation for a load-balanced web application on ECS",
    version,
    after_help = "Reads THIS_DEPLOYMENT_ENV, THIS_DEPLOYMENT_NAMESPACE and THIS_DEPLOYMENT_DOMAINNAME."
)]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to berth.toml (defaults to ./berth.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Synthesize the template (default)
    Synth {
        #[command(flatten)]
        variant: VariantOpt,

        /// Directory the template is written to
        #[arg(long, value_name = "DIR", default_value = constants::OUT_DIR)]
        out: PathBuf,

        /// Print the template to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Validate the deployment environment and show what would be declared
    Check {
        #[command(flatten)]
        variant: VariantOpt,
    },

    /// List the container secrets and their parameter store paths
    Secrets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the generated name for a suffix
    Name {
        /// Suffix appended to Kind + Namespace (e.g. VPC)
        suffix: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Synth {
            variant: VariantOpt::default(),
            out: PathBuf::from(constants::OUT_DIR),
            stdout: false,
        }
    }
}

/// Variant selection shared by commands that build a stack.
#[derive(Args, Default, Clone, Copy)]
pub struct VariantOpt {
    /// Stack variant to build
    #[arg(long, value_enum, default_value_t = VariantArg::Basic, env = "BERTH_VARIANT")]
    pub variant: VariantArg,
}

/// Stack variants.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VariantArg {
    /// Fargate behind an HTTP listener
    #[default]
    Basic,
    /// EC2 capacity, container logs, HTTPS
    Tls,
    /// TLS plus container secrets from SSM
    Secure,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Basic => Variant::Basic,
            VariantArg::Tls => Variant::Tls,
            VariantArg::Secure => Variant::Secure,
        }
    }
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Option<Command>, config: Option<PathBuf>) -> crate::error::Result<()> {
    use Command::*;

    let config = config.as_deref();

    match command.unwrap_or_default() {
        Synth {
            variant,
            out,
            stdout,
        } => synth::execute(variant.variant.into(), &out, stdout, config),
        Check { variant } => check::execute(variant.variant.into(), config),
        Secrets { json } => secrets::execute(json, config),
        Name { suffix } => name::execute(&suffix),
        Completions { shell } => completions::execute(shell),
    }
}
