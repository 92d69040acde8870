//! End-to-end behavior of the diagnostics engine on realistic metadata
//! files, plus property tests for positioning and idempotence.

use kmeta_core::{PathSegment, Position, Range};
use kmeta_schema::tree::parse;
use kmeta_schema::{locate, DiagnosticEngine};
use proptest::prelude::*;

const DATASET_URI: &str = "file:///home/alice/titanic/dataset-metadata.json";
const KERNEL_URI: &str = "file:///home/alice/titanic/kernel-metadata.json";

const VALID_DATASET: &str = r#"{
  "title": "Titanic Passenger Manifest",
  "subtitle": "Passenger records from the 1912 voyage",
  "id": "alice/titanic-manifest",
  "licenses": [{"name": "CC0-1.0"}]
}
"#;

const VALID_KERNEL: &str = r#"{
  "id": "alice/titanic-baseline",
  "title": "Titanic Baseline",
  "code_file": "baseline.ipynb",
  "language": "python",
  "kernel_type": "notebook",
  "is_private": "true",
  "enable_gpu": false,
  "enable_internet": true,
  "dataset_sources": ["alice/titanic-manifest"],
  "competition_sources": ["titanic"],
  "kernel_sources": [],
  "model_sources": []
}
"#;

#[test]
fn test_valid_documents_have_no_diagnostics() {
    let engine = DiagnosticEngine::new();
    assert!(engine.assemble(DATASET_URI, VALID_DATASET).is_empty());
    assert!(engine.assemble(KERNEL_URI, VALID_KERNEL).is_empty());
    assert!(engine
        .assemble(DATASET_URI, r#"{"id":"alice/my-dataset","title":"A Valid Title"}"#)
        .is_empty());
}

#[test]
fn test_suffix_selects_schema() {
    let engine = DiagnosticEngine::new();
    // The kernel descriptor also satisfies the looser dataset contract.
    assert!(engine.assemble(DATASET_URI, VALID_KERNEL).is_empty());
    // The reverse misses the kernel-only required keys.
    let diagnostics = engine.assemble(KERNEL_URI, VALID_DATASET);
    assert_eq!(diagnostics.len(), 3, "{diagnostics:?}");
    assert!(diagnostics.iter().all(|d| d.range == Range::document_start()));
}

#[test]
fn test_unrelated_filenames_are_ignored() {
    let engine = DiagnosticEngine::new();
    for uri in [
        "file:///home/alice/titanic/metadata.json",
        "file:///home/alice/titanic/kernel-metadata.jsonc",
        "untitled:Untitled-1",
    ] {
        assert!(engine.assemble(uri, "{\"title\": 1}").is_empty(), "{uri}");
    }
}

#[test]
fn test_short_title_points_at_value() {
    let engine = DiagnosticEngine::new();
    let text = "{\n  \"title\": \"abc\",\n  \"id\": \"alice/my-dataset\"\n}\n";
    let diagnostics = engine.assemble(DATASET_URI, text);
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    // Opening quote of "abc"; the end stops short of the comma.
    assert_eq!(diagnostics[0].range.start, Position::new(1, 11));
    assert_eq!(diagnostics[0].range.end, Position::new(1, 15));
}

#[test]
fn test_string_flag_enumeration() {
    let engine = DiagnosticEngine::new();
    let with_flag = |flag: &str| {
        VALID_KERNEL.replace("\"is_private\": \"true\"", &format!("\"is_private\": {flag}"))
    };

    assert!(engine.assemble(KERNEL_URI, &with_flag("true")).is_empty());
    assert!(engine.assemble(KERNEL_URI, &with_flag("\"false\"")).is_empty());

    let text = with_flag("\"maybe\"");
    let diagnostics = engine.assemble(KERNEL_URI, &text);
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert!(diagnostics[0].message.starts_with("/is_private "));
    assert_eq!(diagnostics[0].range.start, Position::new(6, 16));
}

#[test]
fn test_every_violation_yields_one_diagnostic() {
    let engine = DiagnosticEngine::new();
    let text = r#"{
  "id": "nope",
  "title": 42,
  "code_file": "main.py",
  "language": "julia",
  "kernel_type": "script",
  "dataset_sources": ["ok/source", false]
}"#;
    let diagnostics = engine.assemble(KERNEL_URI, text);
    assert_eq!(diagnostics.len(), 4, "{diagnostics:?}");
    let lines: Vec<u32> = diagnostics.iter().map(|d| d.range.start.line).collect();
    for line in [1, 2, 4, 6] {
        assert!(lines.contains(&line), "no diagnostic on line {line}: {diagnostics:?}");
    }
}

#[test]
fn test_non_object_document_fails_open() {
    let engine = DiagnosticEngine::new();
    assert!(engine.assemble(DATASET_URI, "[1, 2, 3]").is_empty());
    assert!(engine.assemble(KERNEL_URI, "\"kernel\"").is_empty());
}

#[test]
fn test_document_with_comments_fails_open() {
    let engine = DiagnosticEngine::new();
    let text = "{\n  // owner/slug\n  \"id\": \"alice/x\"\n}";
    assert!(engine.assemble(DATASET_URI, text).is_empty());
}

fn scalar_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 _./-]{0,30}".prop_map(|s| format!("\"{s}\"")),
        any::<i32>().prop_map(|n| n.to_string()),
        any::<bool>().prop_map(|b| b.to_string()),
        Just("null".to_string()),
    ]
}

proptest! {
    /// A scalar that ends its line is covered on that line with a
    /// non-empty range.
    #[test]
    fn last_member_scalar_range_is_single_line(
        keys in prop::collection::btree_set("[a-z_]{1,12}", 1..6),
        literal in scalar_literal(),
        indent in 0usize..6,
    ) {
        let pad = " ".repeat(indent);
        let keys: Vec<String> = keys.into_iter().collect();
        let mut text = String::from("{\n");
        for key in &keys[..keys.len() - 1] {
            text.push_str(&format!("{pad}\"{key}\": 0,\n"));
        }
        let last = &keys[keys.len() - 1];
        text.push_str(&format!("{pad}\"{last}\": {literal}\n}}\n"));

        let tree = parse(&text).expect("generated JSON parses");
        let located = locate(&text, &tree, &[PathSegment::Key(last.clone())]).expect("member resolves");
        let range = located.range();
        prop_assert_eq!(range.start.line, keys.len() as u32);
        prop_assert_eq!(range.end.line, range.start.line);
        prop_assert!(range.end.character > range.start.character);
        prop_assert_eq!((range.end.character - range.start.character) as usize, literal.len());
        prop_assert_eq!(range.start.character as usize, indent + last.len() + 4);
    }

    /// Assembling the same document twice yields the same list.
    #[test]
    fn assemble_is_idempotent(
        title in "[a-zA-Z ]{0,60}",
        slug in "[a-z-]{0,12}",
        flag in prop_oneof![Just("true"), Just("\"false\""), Just("\"maybe\""), Just("3")],
    ) {
        let engine = DiagnosticEngine::new();
        let text = format!(
            "{{\n  \"id\": \"alice/{slug}\",\n  \"title\": \"{title}\",\n  \"code_file\": \"a.py\",\n  \"language\": \"r\",\n  \"kernel_type\": \"script\",\n  \"is_private\": {flag}\n}}"
        );
        let first = engine.assemble(KERNEL_URI, &text);
        let second = engine.assemble(KERNEL_URI, &text);
        prop_assert_eq!(first, second);
    }

    /// The concrete parser accepts everything `serde_json` accepts for
    /// metadata-shaped documents.
    #[test]
    fn concrete_parse_accepts_serialized_values(
        entries in prop::collection::btree_map("[a-z]{1,8}", scalar_literal(), 0..8),
    ) {
        let body: Vec<String> = entries.iter().map(|(k, v)| format!("\"{k}\": {v}")).collect();
        let text = format!("{{{}}}", body.join(", "));
        prop_assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
        prop_assert!(parse(&text).is_some());
    }
}
