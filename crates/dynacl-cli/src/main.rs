//! # dynacl CLI entry point
//!
//! Parses command-line arguments, loads provider configuration from the
//! environment and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dynacl_cli::check::{run_check, CheckArgs};
use dynacl_cli::collect::{run_collect, CollectArgs};
use dynacl_eval::ProviderConfig;

/// Dynamic ACL resolution against YAML fixtures.
///
/// Provider settings come from `DYNACL_STATIC_CACHE_CAPACITY` and
/// `DYNACL_DIRECTORY_FAILURE_POLICY` (`fail-closed` or `abort`).
#[derive(Parser, Debug)]
#[command(name = "dynacl", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the effective entries for a user on a resource.
    Collect(CollectArgs),

    /// Check that every fixture resource reaches the root.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match ProviderConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(?config, "provider configuration");

    let result = match cli.command {
        Commands::Collect(args) => run_collect(&args, config),
        Commands::Check(args) => run_check(&args, config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
