//! # Serve Subcommand
//!
//! Runs the language server on stdin/stdout until the client sends `exit`
//! or closes the stream.

use anyhow::{Context, Result};
use clap::Args;

use crate::{EXIT_CLEAN, EXIT_NO_SHUTDOWN};

/// Arguments for `kmeta serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Accepted for editor clients that always pass it; stdio is the only
    /// transport.
    #[arg(long)]
    pub stdio: bool,
}

/// Execute the serve subcommand.
///
/// Exits with [`EXIT_CLEAN`] after an orderly `shutdown`/`exit` sequence or
/// end of input following `shutdown`, and [`EXIT_NO_SHUTDOWN`] when the
/// client exits without requesting shutdown first.
pub fn run_serve(_args: &ServeArgs) -> Result<u8> {
    let clean = kmeta_lsp::serve_stdio().context("language server transport failed")?;
    Ok(exit_code(clean))
}

/// Process exit code for a finished session.
pub fn exit_code(shutdown_requested: bool) -> u8 {
    if shutdown_requested {
        EXIT_CLEAN
    } else {
        EXIT_NO_SHUTDOWN
    }
}
