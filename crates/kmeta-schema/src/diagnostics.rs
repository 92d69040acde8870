//! # Diagnostic Assembly
//!
//! The entry point of the engine: given a document URI and its raw text,
//! produce the complete diagnostic list for that document.
//!
//! 1. Pick the schema by filename suffix; other documents get `[]`.
//! 2. Parse the text twice, independently: with `serde_json` for
//!    validation and with [`crate::tree::parse`] for positioning.
//! 3. Validate.
//! 4. Turn every violation into exactly one diagnostic, located when
//!    possible and pinned to the zero-width range at the start of the
//!    document otherwise.
//!
//! Text that is not valid JSON produces no diagnostics at all. Nothing in
//! here returns an error; every failure is absorbed into the list.

use kmeta_core::{Diagnostic, Range, SchemaKey};
use serde_json::Value;

use crate::position::locate;
use crate::registry::SchemaRegistry;
use crate::tree::{self, Node};
use crate::validate::{validate, Violation};

/// Validates metadata documents and produces editor diagnostics.
///
/// Owns the [`SchemaRegistry`], so compiled validators live exactly as long
/// as the engine.
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
    registry: SchemaRegistry,
}

impl DiagnosticEngine {
    /// An engine over the embedded schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine over a caller-built registry.
    pub fn with_registry(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    /// The schema registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Recompile schemas on next use.
    pub fn reload(&mut self) {
        self.registry.reload();
    }

    /// Full diagnostic list for the document at `uri` with content `text`.
    pub fn assemble(&self, uri: &str, text: &str) -> Vec<Diagnostic> {
        let Some(key) = SchemaKey::from_uri(uri) else {
            return Vec::new();
        };

        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(uri, error = %e, "document is not valid JSON; skipping validation");
                return Vec::new();
            }
        };
        let tree = tree::parse(text);

        let violations = validate(self.registry.get(key), &value);
        let diagnostics: Vec<Diagnostic> = violations
            .iter()
            .map(|violation| to_diagnostic(violation, text, tree.as_ref()))
            .collect();

        tracing::debug!(uri, schema = %key, count = diagnostics.len(), "validated metadata document");
        diagnostics
    }
}

/// One diagnostic for one violation.
///
/// Falls back to [`Range::document_start`] when the violation is about the
/// whole document, when there is no concrete tree, or when the path does
/// not resolve in it.
pub fn to_diagnostic(violation: &Violation, text: &str, tree: Option<&Node>) -> Diagnostic {
    let range = tree
        .and_then(|tree| locate(text, tree, &violation.path))
        .map(|located| located.range())
        .unwrap_or_else(Range::document_start);
    Diagnostic::warning(range, violation.display_message())
}
