//! # kmeta-core — Foundational Types for kmeta
//!
//! Vocabulary shared by the validation engine, the language server, and the
//! CLI. Nothing in here performs validation; it only names the things the
//! other crates pass around.
//!
//! ## Key Types
//!
//! - [`SchemaKey`]: which of the two metadata contracts governs a document,
//!   selected by filename suffix and never by content.
//! - [`PathSegment`]: one step of a data path into a parsed document.
//! - [`Position`], [`Range`], [`Diagnostic`]: editor-facing records in the
//!   Language Server Protocol wire shape.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `kmeta-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod diagnostic;
pub mod error;
pub mod path;
pub mod schema_key;

pub use diagnostic::{Diagnostic, DiagnosticSeverity, Position, Range, DIAGNOSTIC_SOURCE};
pub use error::CoreError;
pub use path::{pointer_tokens, PathSegment};
pub use schema_key::SchemaKey;
