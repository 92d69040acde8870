//! # Data Paths
//!
//! A data path addresses a value inside a parsed document as a sequence of
//! object keys and array indices. The empty path addresses the whole
//! document. Paths travel between the structural validator, which reports
//! them as RFC 6901 JSON Pointers, and the position mapper, which walks them
//! through the concrete tree.

use serde::{Deserialize, Serialize};

/// One step of a data path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object member lookup.
    Key(String),
    /// Array element lookup.
    Index(usize),
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Split a JSON Pointer into its unescaped reference tokens.
///
/// Tokens are returned untyped: whether `"0"` names an array element or an
/// object member can only be decided against the document it points into.
pub fn pointer_tokens(pointer: &str) -> Vec<String> {
    let Some(rest) = pointer.strip_prefix('/') else {
        return Vec::new();
    };
    rest.split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect()
}
