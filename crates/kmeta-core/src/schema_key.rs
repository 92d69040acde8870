//! # Schema Key — Document Identity
//!
//! A metadata document is governed by exactly one of two contracts, and the
//! contract is chosen by the document's filename suffix. Content sniffing is
//! never used: a `kernel-metadata.json` that happens to look like a dataset
//! descriptor is still validated as a kernel.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// The metadata contracts this engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKey {
    /// `dataset-metadata.json` descriptors.
    Dataset,
    /// `kernel-metadata.json` descriptors.
    Kernel,
}

impl SchemaKey {
    /// Returns both schema keys in canonical order.
    pub fn all() -> &'static [SchemaKey] {
        &[Self::Dataset, Self::Kernel]
    }

    /// Filename suffix that selects this schema.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset-metadata.json",
            Self::Kernel => "kernel-metadata.json",
        }
    }

    /// Select the schema governing `uri`, if any.
    ///
    /// Works on URIs and plain filesystem paths alike since only the suffix
    /// is inspected.
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|key| uri.ends_with(key.file_suffix()))
    }

    /// Returns the snake_case identifier for this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Kernel => "kernel",
        }
    }
}

impl std::fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dataset" => Ok(Self::Dataset),
            "kernel" => Ok(Self::Kernel),
            other => Err(CoreError::UnknownSchemaKey(other.to_string())),
        }
    }
}
