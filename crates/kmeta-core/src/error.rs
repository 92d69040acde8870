//! # Error Types
//!
//! Errors raised while interpreting kmeta vocabulary from untyped input
//! (command-line arguments, configuration payloads).

use thiserror::Error;

/// Top-level error type for `kmeta-core`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A schema name that is neither `dataset` nor `kernel`.
    #[error("unknown metadata schema {0:?}; expected \"dataset\" or \"kernel\"")]
    UnknownSchemaKey(String),
}
