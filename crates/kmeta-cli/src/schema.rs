//! # Schema Subcommand
//!
//! Prints an embedded schema definition as pretty JSON, for editors that
//! want to register it with their own JSON language support.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kmeta_core::SchemaKey;

/// Arguments for `kmeta schema`.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Which contract to print: `dataset` or `kernel`.
    #[arg(value_name = "KIND")]
    pub kind: SchemaKey,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let mut out = std::io::stdout().lock();
    write_schema(args.kind, &mut out)?;
    Ok(crate::EXIT_CLEAN)
}

/// Write the definition for `key` followed by a newline.
pub fn write_schema<W: Write>(key: SchemaKey, out: &mut W) -> Result<()> {
    let definition = kmeta_schema::schemas::definition(key);
    let text = serde_json::to_string_pretty(&definition)
        .with_context(|| format!("failed to serialize the {key} schema"))?;
    writeln!(out, "{text}").context("failed to write schema")?;
    Ok(())
}
