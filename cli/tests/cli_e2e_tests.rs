//! CLI end-to-end tests against the shared exported-schema fixture.
//! These complement `cli_tests.rs` by running the full pipeline on a
//! realistic document and through the default input/output locations.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../tests/schemas/exported-schema.json"
);

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("zapier-schema").expect("binary should exist")
}

// ── E2E: default locations ──────────────────────────────────────────────────

#[test]
fn test_gen_defs_uses_default_paths() {
    let dir = TempDir::new().unwrap();
    let package_dir = dir.path().join("node_modules").join("zapier-platform-schema");
    fs::create_dir_all(&package_dir).unwrap();
    fs::copy(FIXTURE, package_dir.join("exported-schema.json")).unwrap();

    cmd()
        .current_dir(dir.path())
        .arg("gen-defs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 9 definitions to types/schemas.d.ts"));

    assert!(dir.path().join("types").join("schemas.d.ts").exists());
}

#[test]
fn test_gen_defs_without_input_fails() {
    let dir = TempDir::new().unwrap();

    cmd()
        .current_dir(dir.path())
        .arg("gen-defs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exported-schema.json"));
}

// ── E2E: fixture contents ───────────────────────────────────────────────────

#[test]
fn test_fixture_declarations() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("schemas.d.ts");

    cmd()
        .args(["gen-defs", "-i", FIXTURE, "-o", output.to_str().unwrap()])
        .args(["--format", "raw"])
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();

    // Root
    assert!(text.contains("/**\n * Represents a full app.\n */\nexport interface ZapierIntegration {"));
    assert!(text.contains("  version: VersionSchema;"));
    assert!(text.contains("  platformVersion: VersionSchema;"));
    assert!(text.contains("  flags?: AppFlagsSchema;"));

    // Described references keep their documentation
    assert!(text.contains("   * All the triggers for your app.\n   */\n  triggers?: TriggersSchema;"));

    // Unions, enums and index signatures
    assert!(text.contains("  test: RequestSchema | FunctionSchema;"));
    assert!(text.contains(r#"  type: "basic" | "custom" | "digest" | "oauth1" | "oauth2" | "session";"#));
    assert!(text.contains("export interface TriggersSchema {\n  [k: string]: TriggerSchema;\n}"));
    assert!(text.contains("  [k: string]: null | string | number | boolean;"));

    // Non-object definitions become type aliases
    assert!(text.contains("export type VersionSchema = string;"));
    assert!(text.contains("export type FunctionSchema = string | {\n  source?: string;\n};"));

    // A reference with sibling keys is still a reference
    assert!(text.contains("  operation?: RequestSchema;"));
}

#[test]
fn test_fixture_normalizes_under_reject_policy() {
    let assert = cmd()
        .args(["normalize", "-i", FIXTURE, "--shape-policy", "reject"])
        .assert()
        .success();

    let doc: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let definitions = doc["definitions"].as_object().unwrap();
    assert_eq!(definitions.len(), 9);
    assert!(!definitions.contains_key("AppSchema"));
    for (name, schema) in definitions {
        assert_eq!(schema["$id"], serde_json::json!(format!("#{name}")));
        assert!(schema.get("id").is_none());
    }
    assert_eq!(
        doc["definitions"]["TriggerSchema"]["properties"]["operation"],
        serde_json::json!({"default": {"method": "GET"}, "$ref": "#/definitions/RequestSchema"})
    );
}
