//! # kmeta-schema — Metadata Validation & Diagnostics
//!
//! Validates Kaggle `dataset-metadata.json` and `kernel-metadata.json`
//! descriptors against embedded JSON Schemas and maps each violation back to
//! a range in the source text.
//!
//! ## Pipeline
//!
//! - [`schemas`]: the two embedded schema definitions.
//! - [`registry`]: [`SchemaRegistry`], compiles each definition once.
//! - [`validate`]: runs a compiled validator and returns [`Violation`]s.
//! - [`tree`]: position-preserving JSON parser.
//! - [`position`]: data path to (line, column, end column).
//! - [`diagnostics`]: [`DiagnosticEngine::assemble`], the entry point.
//!
//! ```
//! use kmeta_schema::DiagnosticEngine;
//!
//! let engine = DiagnosticEngine::new();
//! let text = "{\n  \"id\": \"alice/my-dataset\",\n  \"title\": \"abc\"\n}";
//! let diagnostics = engine.assemble("file:///data/dataset-metadata.json", text);
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].range.start.line, 2);
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `kmeta-core` internally.
//! - Pure computation: no file or network I/O.
//! - [`DiagnosticEngine::assemble`] never fails; problems become an empty
//!   list or a fallback-range diagnostic.

pub mod diagnostics;
pub mod position;
pub mod registry;
pub mod schemas;
pub mod tree;
pub mod validate;

pub use diagnostics::{to_diagnostic, DiagnosticEngine};
pub use position::{locate, locate_offset, Located};
pub use registry::SchemaRegistry;
pub use validate::{compile, validate, SchemaError, Violation};
