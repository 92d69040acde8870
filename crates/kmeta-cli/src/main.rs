//! # kmeta CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use kmeta_cli::check::{run_check, CheckArgs};
use kmeta_cli::logging::{self, LogFormat};
use kmeta_cli::schema::{run_schema, SchemaArgs};
use kmeta_cli::serve::{run_serve, ServeArgs};
use kmeta_cli::EXIT_ERROR;

/// Validation and editor diagnostics for Kaggle metadata files.
///
/// Checks `dataset-metadata.json` and `kernel-metadata.json` descriptors
/// against the Kaggle metadata contracts, from the shell or as a language
/// server.
#[derive(Parser, Debug)]
#[command(name = "kmeta", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate metadata files and directories.
    Check(CheckArgs),

    /// Print an embedded schema.
    Schema(SchemaArgs),

    /// Run the language server on stdin/stdout.
    Serve(ServeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "kmeta starting");

    let result = match &cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Schema(args) => run_schema(args),
        Commands::Serve(args) => run_serve(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
