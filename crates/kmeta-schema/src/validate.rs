//! # Structural Validation
//!
//! Runs a compiled JSON Schema validator over a parsed document and returns
//! every violation, in the order the `jsonschema` crate evaluates the
//! schema's clauses. The order is deterministic for a given schema and
//! document; callers should rely on each violation's path, not its rank.
//!
//! ## Fail-Open Policy
//!
//! Validation never errors. A missing validator (the schema failed to
//! compile) or a document that is not a JSON object produces no violations
//! at all.

use jsonschema::Validator;
use kmeta_core::{pointer_tokens, PathSegment, SchemaKey};
use serde_json::Value;
use thiserror::Error;

/// Error raised while preparing a schema for validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The definition is not a valid JSON Schema.
    #[error("failed to compile {key} schema: {reason}")]
    Compile {
        /// Which schema failed.
        key: SchemaKey,
        /// Reason reported by the schema compiler.
        reason: String,
    },
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Typed data path to the violating value. Empty for the whole document.
    pub path: Vec<PathSegment>,
    /// The same location as a JSON Pointer (`""` for the root).
    pub instance_path: String,
    /// Human-readable description from the schema engine.
    pub message: String,
}

impl Violation {
    /// Whether the violation concerns the document as a whole.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Message as shown in an editor: the pointer followed by the engine
    /// message, or just the engine message for root violations.
    pub fn display_message(&self) -> String {
        if self.is_root() {
            self.message.clone()
        } else {
            format!("{} {}", self.instance_path, self.message)
        }
    }
}

/// Compile a schema definition into a validator (JSON Schema draft-07).
///
/// # Errors
///
/// Returns [`SchemaError::Compile`] if the definition is not a valid schema.
pub fn compile(key: SchemaKey, definition: &Value) -> Result<Validator, SchemaError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft7);
    opts.build(definition).map_err(|e| SchemaError::Compile {
        key,
        reason: e.to_string(),
    })
}

/// Validate `instance` and collect every violation.
///
/// Returns an empty list when the document is valid, when `validator` is
/// `None`, or when `instance` is not a JSON object.
pub fn validate(validator: Option<&Validator>, instance: &Value) -> Vec<Violation> {
    let Some(validator) = validator else {
        return Vec::new();
    };
    if !instance.is_object() {
        return Vec::new();
    }

    validator
        .iter_errors(instance)
        .map(|e| {
            let instance_path = e.instance_path.to_string();
            Violation {
                path: typed_path(&instance_path, instance),
                message: e.to_string(),
                instance_path,
            }
        })
        .collect()
}

/// Turn a JSON Pointer into a typed data path by walking `instance`.
///
/// A token becomes [`PathSegment::Index`] only when it addresses an element
/// of an array in the document; everything else, including numeric-looking
/// object keys, stays a [`PathSegment::Key`].
pub fn typed_path(pointer: &str, instance: &Value) -> Vec<PathSegment> {
    let mut current = Some(instance);
    let mut path = Vec::new();

    for token in pointer_tokens(pointer) {
        let segment = match current {
            Some(Value::Array(items)) => match token.parse::<usize>() {
                Ok(index) => {
                    current = items.get(index);
                    PathSegment::Index(index)
                }
                Err(_) => {
                    current = None;
                    PathSegment::Key(token)
                }
            },
            Some(Value::Object(members)) => {
                current = members.get(&token);
                PathSegment::Key(token)
            }
            _ => {
                current = None;
                PathSegment::Key(token)
            }
        };
        path.push(segment);
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{dataset_schema, kernel_schema};
    use serde_json::json;

    fn dataset() -> Validator {
        compile(SchemaKey::Dataset, &dataset_schema()).unwrap()
    }

    fn kernel() -> Validator {
        compile(SchemaKey::Kernel, &kernel_schema()).unwrap()
    }

    fn valid_kernel() -> Value {
        json!({
            "id": "alice/titanic-baseline",
            "title": "Titanic Baseline",
            "code_file": "main.py",
            "language": "python",
            "kernel_type": "script",
            "is_private": true,
            "enable_gpu": "false",
            "dataset_sources": ["alice/titanic"]
        })
    }

    fn paths(violations: &[Violation]) -> Vec<String> {
        violations.iter().map(|v| v.instance_path.clone()).collect()
    }

    #[test]
    fn test_embedded_schemas_compile() {
        for key in SchemaKey::all() {
            let definition = crate::schemas::definition(*key);
            assert!(compile(*key, &definition).is_ok(), "{key} schema failed to compile");
        }
    }

    #[test]
    fn test_valid_dataset() {
        let doc = json!({"id": "alice/my-dataset", "title": "A Valid Title"});
        assert!(validate(Some(&dataset()), &doc).is_empty());
    }

    #[test]
    fn test_valid_kernel() {
        assert!(validate(Some(&kernel()), &valid_kernel()).is_empty());
    }

    #[test]
    fn test_dataset_title_too_short() {
        let doc = json!({"id": "alice/my-dataset", "title": "abc"});
        let violations = validate(Some(&dataset()), &doc);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert_eq!(violations[0].path, vec![PathSegment::from("title")]);
        assert_eq!(violations[0].instance_path, "/title");
    }

    #[test]
    fn test_dataset_title_too_long() {
        let doc = json!({"id": "alice/my-dataset", "title": "x".repeat(51)});
        let violations = validate(Some(&dataset()), &doc);
        assert_eq!(paths(&violations), ["/title"]);
    }

    #[test]
    fn test_dataset_subtitle_bounds() {
        let doc = json!({
            "id": "alice/my-dataset",
            "title": "A Valid Title",
            "subtitle": "too short"
        });
        assert_eq!(paths(&validate(Some(&dataset()), &doc)), ["/subtitle"]);
    }

    #[test]
    fn test_dataset_id_pattern() {
        for bad in ["alice", "alice/ab", "alice/under_score", "a b/slug-ok"] {
            let doc = json!({"id": bad, "title": "A Valid Title"});
            let violations = validate(Some(&dataset()), &doc);
            assert_eq!(paths(&violations), ["/id"], "id {bad:?}");
        }
    }

    #[test]
    fn test_kernel_slug_needs_six_characters() {
        let mut doc = valid_kernel();
        doc["id"] = json!("alice/sixsix");
        assert!(validate(Some(&kernel()), &doc).is_empty());
        doc["id"] = json!("alice/fives");
        assert_eq!(paths(&validate(Some(&kernel()), &doc)), ["/id"]);
    }

    #[test]
    fn test_kernel_missing_id_and_id_no() {
        let mut doc = valid_kernel();
        doc.as_object_mut().unwrap().remove("id");
        let violations = validate(Some(&kernel()), &doc);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert!(violations[0].is_root());
        assert!(violations[0].message.contains("anyOf"), "{}", violations[0].message);
    }

    #[test]
    fn test_kernel_id_no_satisfies_disjunction() {
        let mut doc = valid_kernel();
        doc.as_object_mut().unwrap().remove("id");
        doc["id_no"] = json!(12345);
        assert!(validate(Some(&kernel()), &doc).is_empty());
    }

    #[test]
    fn test_dataset_missing_identity_reports_both_clauses() {
        // The dataset contract also lists `id` as required outright.
        let doc = json!({"title": "A Valid Title"});
        let violations = validate(Some(&dataset()), &doc);
        assert_eq!(violations.len(), 2, "{violations:?}");
        assert!(violations.iter().all(Violation::is_root));
    }

    #[test]
    fn test_string_boolean_flags() {
        for ok in [json!(true), json!(false), json!("true"), json!("false")] {
            let mut doc = valid_kernel();
            doc["is_private"] = ok.clone();
            assert!(validate(Some(&kernel()), &doc).is_empty(), "is_private {ok}");
        }

        let mut doc = valid_kernel();
        doc["is_private"] = json!("maybe");
        let violations = validate(Some(&kernel()), &doc);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert_eq!(violations[0].path, vec![PathSegment::from("is_private")]);

        let mut doc = valid_kernel();
        doc["enable_internet"] = json!(1);
        assert_eq!(paths(&validate(Some(&kernel()), &doc)), ["/enable_internet"]);
    }

    #[test]
    fn test_enumerations() {
        let mut doc = valid_kernel();
        doc["language"] = json!("julia");
        doc["kernel_type"] = json!("app");
        let mut found = paths(&validate(Some(&kernel()), &doc));
        found.sort();
        assert_eq!(found, ["/kernel_type", "/language"]);
    }

    #[test]
    fn test_array_items_get_index_segments() {
        let mut doc = valid_kernel();
        doc["dataset_sources"] = json!(["alice/titanic", 7]);
        let violations = validate(Some(&kernel()), &doc);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert_eq!(
            violations[0].path,
            vec![PathSegment::from("dataset_sources"), PathSegment::from(1)]
        );
    }

    #[test]
    fn test_non_object_fails_open() {
        for doc in [json!([]), json!("text"), json!(3), json!(null)] {
            assert!(validate(Some(&dataset()), &doc).is_empty(), "{doc}");
        }
    }

    #[test]
    fn test_missing_validator_fails_open() {
        assert!(validate(None, &json!({})).is_empty());
    }

    #[test]
    fn test_validation_is_deterministic() {
        let doc = json!({"title": 5, "subtitle": "x", "id": "nope"});
        let validator = dataset();
        assert_eq!(validate(Some(&validator), &doc), validate(Some(&validator), &doc));
    }

    #[test]
    fn test_compile_rejects_malformed_definition() {
        let err = compile(SchemaKey::Kernel, &json!({"type": 12})).unwrap_err();
        assert!(matches!(err, SchemaError::Compile { key: SchemaKey::Kernel, .. }));
        assert!(err.to_string().starts_with("failed to compile kernel schema"));
    }

    #[test]
    fn test_typed_path_numeric_object_key() {
        let doc = json!({"0": {"1": true}, "list": [[1, 2]]});
        assert_eq!(
            typed_path("/0/1", &doc),
            vec![PathSegment::from("0"), PathSegment::from("1")]
        );
        assert_eq!(
            typed_path("/list/0/1", &doc),
            vec![PathSegment::from("list"), PathSegment::from(0), PathSegment::from(1)]
        );
        assert!(typed_path("", &doc).is_empty());
    }

    #[test]
    fn test_violation_display_message() {
        let v = Violation {
            path: vec![PathSegment::from("title")],
            instance_path: "/title".to_string(),
            message: r#""abc" is shorter than 5 characters"#.to_string(),
        };
        assert_eq!(v.display_message(), r#"/title "abc" is shorter than 5 characters"#);

        let root = Violation {
            path: Vec::new(),
            instance_path: String::new(),
            message: r#""title" is a required property"#.to_string(),
        };
        assert_eq!(root.display_message(), root.message);
    }
}
