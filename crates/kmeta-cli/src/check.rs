//! # Check Subcommand
//!
//! Validates metadata files from the shell or CI with the same engine the
//! language server uses, so a file that is clean in the editor is clean here.
//!
//! Directories are walked recursively for files whose name selects a
//! schema (`dataset-metadata.json`, `kernel-metadata.json`). Files named
//! explicitly are checked regardless of where they live, but only governed
//! filenames can produce diagnostics.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use kmeta_core::{Diagnostic, SchemaKey};
use kmeta_schema::DiagnosticEngine;
use serde::Serialize;

/// Arguments for `kmeta check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files or directories to check.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Report format.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `path:line:col: severity: message [source]`, one per line.
    #[default]
    Text,
    /// A JSON array of `{ "path", "diagnostics" }` objects.
    Json,
}

/// Diagnostics for one checked file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when clean, 1 when any diagnostic was reported.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let mut out = std::io::stdout().lock();
    run_check_to(args, &mut out)
}

/// [`run_check`] with the report written to `out`.
pub fn run_check_to<W: Write>(args: &CheckArgs, out: &mut W) -> Result<u8> {
    let engine = DiagnosticEngine::new();
    let files = collect_files(&args.paths)?;

    let mut reports = Vec::with_capacity(files.len());
    for path in &files {
        reports.push(check_file(&engine, path)?);
    }

    let total: usize = reports.iter().map(|r| r.diagnostics.len()).sum();
    tracing::info!(files = reports.len(), diagnostics = total, "check complete");

    match args.format {
        OutputFormat::Text => {
            for report in &reports {
                render_text(report, out)?;
            }
        }
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&reports).context("failed to serialize report")?;
            writeln!(out, "{text}").context("failed to write report")?;
        }
    }

    Ok(if total > 0 {
        crate::EXIT_DIAGNOSTICS
    } else {
        crate::EXIT_CLEAN
    })
}

/// Expand `paths` into the sorted, de-duplicated list of files to check.
///
/// A path that does not exist is an error.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("cannot access {}", path.display()))?;
        if metadata.is_dir() {
            walk_for_metadata(path, &mut files)
                .with_context(|| format!("failed to walk {}", path.display()))?;
        } else {
            if !is_metadata_file(path) {
                tracing::warn!(path = %path.display(), "not a dataset or kernel metadata file; nothing to check");
            }
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_for_metadata(dir: &Path, acc: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_symlink() && path.is_dir() {
            tracing::debug!(path = %path.display(), "skipping symlinked directory");
        } else if file_type.is_dir() {
            walk_for_metadata(&path, acc)?;
        } else if is_metadata_file(&path) {
            acc.push(path);
        }
    }
    Ok(())
}

fn is_metadata_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(SchemaKey::from_uri)
        .is_some()
}

/// Read and validate one file.
pub fn check_file(engine: &DiagnosticEngine, path: &Path) -> Result<FileReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let diagnostics = engine.assemble(&path.to_string_lossy(), &text);
    tracing::debug!(path = %path.display(), count = diagnostics.len(), "checked file");
    Ok(FileReport {
        path: path.to_path_buf(),
        diagnostics,
    })
}

/// Write one line per diagnostic, with 1-based line and column.
pub fn render_text<W: Write>(report: &FileReport, out: &mut W) -> Result<()> {
    for d in &report.diagnostics {
        writeln!(
            out,
            "{}:{}:{}: {}: {} [{}]",
            report.path.display(),
            d.range.start.line + 1,
            d.range.start.character + 1,
            d.severity.label(),
            d.message,
            d.source,
        )
        .context("failed to write report")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmeta_core::{Position, Range};

    #[test]
    fn test_render_text_is_one_based() {
        let report = FileReport {
            path: PathBuf::from("titanic/dataset-metadata.json"),
            diagnostics: vec![Diagnostic::warning(
                Range::new(Position::new(2, 11), Position::new(2, 16)),
                "/title \"abc\" is shorter than 5 characters",
            )],
        };
        let mut out = Vec::new();
        render_text(&report, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "titanic/dataset-metadata.json:3:12: warning: /title \"abc\" is shorter than 5 characters [kaggle-metadata-validator]\n"
        );
    }

    #[test]
    fn test_is_metadata_file() {
        assert!(is_metadata_file(Path::new("a/dataset-metadata.json")));
        assert!(is_metadata_file(Path::new("kernel-metadata.json")));
        assert!(!is_metadata_file(Path::new("a/metadata.json")));
        assert!(!is_metadata_file(Path::new("a/kernel-metadata.json.bak")));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let err = collect_files(&[PathBuf::from("/definitely/not/here/kmeta")]).unwrap_err();
        assert!(format!("{err:#}").contains("cannot access"));
    }
}
