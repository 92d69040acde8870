//! # Editor Diagnostics
//!
//! Positions, ranges, and diagnostics in the shape the Language Server
//! Protocol puts on the wire: zero-based `line`/`character` pairs and a
//! numeric severity, so a diagnostic list serializes straight into a CLI
//! report. These types stand in for `lsp-types` so that the engine and the
//! CLI build without the protocol crate; `kmeta-lsp` converts at its edge.
//!
//! A diagnostic list is ephemeral. Each validation pass produces a complete
//! list that replaces the previous one for the same document.

use serde::{Serialize, Serializer};

/// Source tag attached to every diagnostic this engine emits.
pub const DIAGNOSTIC_SOURCE: &str = "kaggle-metadata-validator";

/// A zero-based text position.
///
/// `character` counts UTF-16 code units since the start of the line, the
/// protocol's default position encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based column.
    pub character: u32,
}

impl Position {
    /// Construct a position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open text range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    /// Inclusive start.
    pub start: Position,
    /// Exclusive end.
    pub end: Position,
}

impl Range {
    /// Construct a range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// The zero-width range at the start of the document, used when a
    /// violation cannot be tied to a location.
    pub fn document_start() -> Self {
        Self::default()
    }

    /// Whether start and end coincide.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Diagnostic severity, serialized as the protocol's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Code 1.
    Error,
    /// Code 2. Schema violations are reported at this level.
    Warning,
    /// Code 3.
    Information,
    /// Code 4.
    Hint,
}

impl DiagnosticSeverity {
    /// Protocol integer code (1 = error ... 4 = hint).
    pub fn code(&self) -> u8 {
        match self {
            Self::Error => 1,
            Self::Warning => 2,
            Self::Information => 3,
            Self::Hint => 4,
        }
    }

    /// Lowercase label used in human-readable reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "info",
            Self::Hint => "hint",
        }
    }
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DiagnosticSeverity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// An editor-facing record pairing a message with a text range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Where to underline.
    pub range: Range,
    /// Always [`DiagnosticSeverity::Warning`] for schema violations.
    pub severity: DiagnosticSeverity,
    /// Human-readable description.
    pub message: String,
    /// Producer tag, [`DIAGNOSTIC_SOURCE`].
    pub source: String,
}

impl Diagnostic {
    /// A warning tagged with [`DIAGNOSTIC_SOURCE`].
    pub fn warning(range: Range, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
            source: DIAGNOSTIC_SOURCE.to_string(),
        }
    }
}
