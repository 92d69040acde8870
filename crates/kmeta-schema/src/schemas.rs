//! # Embedded Schema Definitions
//!
//! The two metadata contracts, as JSON Schema (draft-07) values. They follow
//! the upstream Kaggle API metadata file format
//! (<https://github.com/Kaggle/kaggle-api/wiki/Dataset-Metadata>) and are
//! compiled into the binary; no schema is ever read from disk.
//!
//! Both contracts accept either `id` (`owner/slug`) or `id_no` (numeric id).
//! Kernel flags such as `is_private` are declared `boolean | string` because
//! the upstream tooling writes them either as JSON booleans or as the strings
//! `"true"`/`"false"`.

use kmeta_core::SchemaKey;
use serde_json::{json, Value};

/// Pattern for dataset ids: `owner/slug`, slug 3 to 50 characters.
pub const DATASET_ID_PATTERN: &str = "^[a-zA-Z0-9]+/[a-zA-Z0-9-]{3,50}$";

/// Pattern for kernel ids: `owner/slug`, slug 6 to 50 characters.
pub const KERNEL_ID_PATTERN: &str = "^[a-zA-Z0-9]+/[a-zA-Z0-9-]{6,50}$";

/// Definition for `dataset-metadata.json`.
pub fn dataset_schema() -> Value {
    json!({
        "type": "object",
        "anyOf": [
            { "required": ["id"] },
            { "required": ["id_no"] }
        ],
        "properties": {
            "id": { "type": "string", "pattern": DATASET_ID_PATTERN },
            "id_no": { "type": "integer" },
            "title": { "type": "string", "minLength": 5, "maxLength": 50 },
            "subtitle": { "type": "string", "minLength": 20, "maxLength": 80 }
        },
        "required": ["id", "title"]
    })
}

/// Definition for `kernel-metadata.json`.
pub fn kernel_schema() -> Value {
    json!({
        "type": "object",
        "anyOf": [
            { "required": ["id"] },
            { "required": ["id_no"] }
        ],
        "properties": {
            "id": { "type": "string", "pattern": KERNEL_ID_PATTERN },
            "id_no": { "type": "integer" },
            "title": { "type": "string", "minLength": 5 },
            "code_file": { "type": "string" },
            "language": { "type": "string", "enum": ["python", "r", "markdown"] },
            "kernel_type": { "type": "string", "enum": ["notebook", "script"] },
            "is_private": string_boolean(),
            "enable_gpu": string_boolean(),
            "enable_internet": string_boolean(),
            "dataset_sources": string_array(),
            "competition_sources": string_array(),
            "kernel_sources": string_array(),
            "model_sources": string_array()
        },
        "required": ["title", "code_file", "language", "kernel_type"]
    })
}

/// Embedded definition for `key`.
pub fn definition(key: SchemaKey) -> Value {
    match key {
        SchemaKey::Dataset => dataset_schema(),
        SchemaKey::Kernel => kernel_schema(),
    }
}

/// A boolean, or one of the strings `"true"`/`"false"`.
fn string_boolean() -> Value {
    json!({
        "type": ["boolean", "string"],
        "if": { "type": "string" },
        "then": { "enum": ["true", "false"] }
    })
}

fn string_array() -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" }
    })
}
