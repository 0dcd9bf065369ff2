//! Integration tests for `build_document()` and `normalize()` — public API only.

use pretty_assertions::assert_eq;
use serde_json::json;
use zapier_schema_core::{
    build_document, build_document_from_str, normalize, NormalizeError, NormalizeOptions,
};

// ── End-to-end ──────────────────────────────────────────────────────────────

#[test]
fn test_hoists_app_schema_and_wraps_widget() {
    let exported = json!({
        "schemas": {
            "AppSchema": {"id": "/App", "title": "Root"},
            "Widget": {"id": "/Widget", "$ref": "/Widget2", "description": "a widget"}
        }
    });

    let doc = build_document(&exported, &NormalizeOptions::default()).expect("should build");

    assert_eq!(
        doc,
        json!({
            "definitions": {
                "Widget": {
                    "description": "a widget",
                    "oneOf": [{"$ref": "#/definitions/Widget2"}],
                    "$id": "#Widget"
                }
            },
            "title": "Zapier Integration",
            "$id": "#App"
        })
    );
}

#[test]
fn test_definitions_come_first_and_title_last() {
    let exported = json!({
        "schemas": {
            "A": {"id": "/A"},
            "AppSchema": {"id": "/AppSchema", "type": "object", "title": "Ignored"}
        }
    });

    let doc = build_document(&exported, &NormalizeOptions::default()).unwrap();
    let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.first(), Some(&"definitions"));
    assert!(keys.contains(&"$id"));
    assert_eq!(doc["title"], json!("Zapier Integration"));
}

#[test]
fn test_nested_refs_inside_definitions() {
    let exported = json!({
        "schemas": {
            "AppSchema": {
                "id": "/AppSchema",
                "type": "object",
                "properties": {
                    "triggers": {"$ref": "/TriggersSchema", "description": "All the triggers."},
                    "version": {"type": "string"}
                }
            },
            "TriggersSchema": {
                "id": "/TriggersSchema",
                "type": "object",
                "patternProperties": {
                    "^[a-zA-Z]+$": {"$ref": "/TriggerSchema"}
                }
            }
        }
    });

    let doc = build_document(&exported, &NormalizeOptions::default()).unwrap();

    assert_eq!(
        doc["properties"]["triggers"],
        json!({
            "description": "All the triggers.",
            "oneOf": [{"$ref": "#/definitions/TriggersSchema"}]
        })
    );
    assert_eq!(doc["properties"]["version"], json!({"type": "string"}));
    assert_eq!(
        doc["definitions"]["TriggersSchema"]["patternProperties"]["^[a-zA-Z]+$"],
        json!({"$ref": "#/definitions/TriggerSchema"})
    );
}

#[test]
fn test_input_is_not_mutated() {
    let exported = json!({
        "schemas": {
            "AppSchema": {"id": "/AppSchema", "properties": {"a": {"$ref": "/A"}}}
        }
    });
    let before = exported.clone();

    let _ = build_document(&exported, &NormalizeOptions::default()).unwrap();
    assert_eq!(exported, before);
}

#[test]
fn test_from_str_reports_parse_errors() {
    let err = build_document_from_str("{not json", &NormalizeOptions::default()).unwrap_err();
    assert!(matches!(err, NormalizeError::Json(_)));
}

// ── normalize() ─────────────────────────────────────────────────────────────

#[test]
fn test_wrap_applies_deep_in_tree() {
    let input = json!({
        "anyOf": [
            {"items": {"$ref": "/Deep", "description": "deep one"}}
        ]
    });

    assert_eq!(
        normalize(&input),
        json!({
            "anyOf": [
                {"items": {
                    "description": "deep one",
                    "oneOf": [{"$ref": "#/definitions/Deep"}]
                }}
            ]
        })
    );
}

#[test]
fn test_sequence_preserves_order_and_length() {
    let input = json!([1, {"$ref": "/A"}, "x", [{"$ref": "/B"}], null]);
    let out = normalize(&input);

    let items = out.as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(
        out,
        json!([1, {"$ref": "#/definitions/A"}, "x", [{"$ref": "#/definitions/B"}], null])
    );
}
