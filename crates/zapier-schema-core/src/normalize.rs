//! Schema normalization: namespace `$ref` values and wrap described references.
//!
//! The type compiler resolves references against a `definitions` container
//! and drops the `description` of a node that is nothing but a reference.
//! Normalization rewrites the tree so both work:
//!
//! 1. `{$ref, description}` (exactly those two keys) becomes
//!    `{description, oneOf: [{$ref}]}`, keeping the description as a doc comment.
//! 2. Any other `$ref` is prefixed with the definitions container path.
//! 3. Everything else is copied structurally; scalars are returned as-is.
//!
//! The input tree is never mutated.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::config::{NormalizeOptions, ShapePolicy};
use crate::error::NormalizeError;
use crate::schema_utils::{build_path, DESCRIPTION, ONE_OF, REF};

/// Keys of a node that gets wrapped in a single-variant `oneOf`.
const WRAPPABLE_KEYS: [&str; 2] = [REF, DESCRIPTION];

/// A shape the normalizer handled with its fallback behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShapeFinding {
    pub path: String,
    pub message: String,
}

/// Normalize a schema node with the default options.
///
/// Never fails: shapes the normalizer does not recognize fall through to the
/// structural copy. Use [`Normalizer`] with [`ShapePolicy::Reject`] to surface
/// them as errors instead.
///
/// # Example
/// ```
/// use serde_json::json;
/// use zapier_schema_core::normalize;
///
/// let out = normalize(&json!({"$ref": "/Widget", "description": "a widget"}));
/// assert_eq!(out, json!({
///     "description": "a widget",
///     "oneOf": [{"$ref": "#/definitions/Widget"}]
/// }));
/// ```
pub fn normalize(node: &Value) -> Value {
    let normalizer = Normalizer::default();
    let mut findings = Vec::new();
    normalizer.walk(node, "#", &mut findings)
}

/// Prefix a reference with `#/definitions`.
pub fn namespace_reference(reference: &str) -> String {
    Normalizer::default().namespace_reference(reference)
}

/// Replace the first character of an identifier with `#`.
///
/// `"/Foo"` becomes `"#Foo"`; the empty string becomes `"#"`.
pub fn rewrite_identifier(id: &str) -> String {
    Normalizer::default().rewrite_identifier(id)
}

/// Configurable normalizer.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn namespace_reference(&self, reference: &str) -> String {
        format!("{}{}", self.options.definitions_prefix, reference)
    }

    pub fn rewrite_identifier(&self, id: &str) -> String {
        let mut chars = id.chars();
        chars.next();
        format!("{}{}", self.options.anchor_marker, chars.as_str())
    }

    /// Normalize a schema node, applying the configured [`ShapePolicy`].
    pub fn normalize(&self, node: &Value) -> Result<Value, NormalizeError> {
        self.normalize_at(node, "#")
    }

    pub(crate) fn normalize_at(&self, node: &Value, path: &str) -> Result<Value, NormalizeError> {
        let mut findings = Vec::new();
        let result = self.walk(node, path, &mut findings);
        self.settle(findings)?;
        Ok(result)
    }

    /// Apply the shape policy to whatever the walk flagged.
    pub(crate) fn settle(&self, findings: Vec<ShapeFinding>) -> Result<(), NormalizeError> {
        match self.options.shape_policy {
            ShapePolicy::PassThrough => Ok(()),
            ShapePolicy::Warn => {
                for finding in &findings {
                    tracing::warn!(path = %finding.path, "{}", finding.message);
                }
                Ok(())
            }
            ShapePolicy::Reject => match findings.into_iter().next() {
                Some(finding) => Err(NormalizeError::UnrecognizedShape {
                    path: finding.path,
                    message: finding.message,
                }),
                None => Ok(()),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Recursive walker
    // -----------------------------------------------------------------------

    pub(crate) fn walk(&self, node: &Value, path: &str, findings: &mut Vec<ShapeFinding>) -> Value {
        match node {
            Value::Object(obj) => {
                // Checked before the general `$ref` branch so the description survives.
                if is_described_reference(obj) {
                    return self.wrap_reference(obj, path, findings);
                }

                let mut out = Map::with_capacity(obj.len());
                for (key, value) in obj {
                    if key == REF {
                        continue;
                    }
                    let child_path = build_path(path, &[key]);
                    out.insert(key.clone(), self.walk(value, &child_path, findings));
                }
                if let Some(reference) = obj.get(REF) {
                    let ref_path = build_path(path, &[REF]);
                    out.insert(
                        REF.to_string(),
                        self.reference_value(reference, &ref_path, findings),
                    );
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let child_path = build_path(path, &[&i.to_string()]);
                        self.walk(item, &child_path, findings)
                    })
                    .collect(),
            ),
            _ => node.clone(),
        }
    }

    fn wrap_reference(
        &self,
        obj: &Map<String, Value>,
        path: &str,
        findings: &mut Vec<ShapeFinding>,
    ) -> Value {
        let ref_path = build_path(path, &[REF]);
        let reference = obj
            .get(REF)
            .map(|r| self.reference_value(r, &ref_path, findings))
            .unwrap_or(Value::Null);
        let description = obj.get(DESCRIPTION).cloned().unwrap_or(Value::Null);

        let mut variant = Map::new();
        variant.insert(REF.to_string(), reference);

        let mut out = Map::new();
        out.insert(DESCRIPTION.to_string(), description);
        out.insert(
            ONE_OF.to_string(),
            Value::Array(vec![Value::Object(variant)]),
        );
        Value::Object(out)
    }

    fn reference_value(
        &self,
        reference: &Value,
        path: &str,
        findings: &mut Vec<ShapeFinding>,
    ) -> Value {
        match reference {
            Value::String(s) => {
                if !s.starts_with('/') {
                    findings.push(ShapeFinding {
                        path: path.to_string(),
                        message: format!("reference `{s}` does not start with `/`"),
                    });
                }
                Value::String(self.namespace_reference(s))
            }
            other => {
                findings.push(ShapeFinding {
                    path: path.to_string(),
                    message: format!("reference is not a string: {other}"),
                });
                other.clone()
            }
        }
    }
}

/// True when the key set is exactly `{$ref, description}`.
fn is_described_reference(obj: &Map<String, Value>) -> bool {
    let keys: BTreeSet<&str> = obj.keys().map(String::as_str).collect();
    keys == BTreeSet::from(WRAPPABLE_KEYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rejecting() -> Normalizer {
        Normalizer::new(NormalizeOptions {
            shape_policy: ShapePolicy::Reject,
            ..NormalizeOptions::default()
        })
    }

    #[test]
    fn test_scalars_are_identity() {
        for scalar in [json!("text"), json!(3.5), json!(true), json!(null)] {
            assert_eq!(normalize(&scalar), scalar);
        }
    }

    #[test]
    fn test_bare_ref_is_namespaced_not_wrapped() {
        assert_eq!(
            normalize(&json!({"$ref": "/Thing"})),
            json!({"$ref": "#/definitions/Thing"})
        );
    }

    #[test]
    fn test_ref_with_other_keys_keeps_them() {
        let input = json!({
            "$ref": "/Thing",
            "description": "d",
            "default": {"$ref": "/Inner"}
        });
        assert_eq!(
            normalize(&input),
            json!({
                "description": "d",
                "default": {"$ref": "#/definitions/Inner"},
                "$ref": "#/definitions/Thing"
            })
        );
    }

    #[test]
    fn test_two_keys_of_other_names_are_not_wrapped() {
        let input = json!({"$ref": "/Thing", "title": "t"});
        assert_eq!(
            normalize(&input),
            json!({"title": "t", "$ref": "#/definitions/Thing"})
        );
    }

    #[test]
    fn test_wrapped_description_is_not_recursed() {
        let input = json!({"$ref": "/A", "description": {"$ref": "/B"}});
        assert_eq!(
            normalize(&input),
            json!({"description": {"$ref": "/B"}, "oneOf": [{"$ref": "#/definitions/A"}]})
        );
    }

    #[test]
    fn test_rewrite_identifier() {
        assert_eq!(rewrite_identifier("/Foo"), "#Foo");
        assert_eq!(rewrite_identifier(""), "#");
        assert_eq!(rewrite_identifier("/ü"), "#ü");
    }

    #[test]
    fn test_namespace_reference() {
        assert_eq!(namespace_reference("/Foo"), "#/definitions/Foo");
    }

    #[test]
    fn test_custom_prefix_and_marker() {
        let normalizer = Normalizer::new(NormalizeOptions {
            definitions_prefix: "#/$defs".to_string(),
            anchor_marker: "@".to_string(),
            ..NormalizeOptions::default()
        });
        assert_eq!(normalizer.namespace_reference("/X"), "#/$defs/X");
        assert_eq!(normalizer.rewrite_identifier("/X"), "@X");
    }

    #[test]
    fn test_pass_through_keeps_non_string_ref() {
        let input = json!({"$ref": 7, "type": "object"});
        assert_eq!(normalize(&input), json!({"type": "object", "$ref": 7}));
    }

    #[test]
    fn test_reject_non_string_ref_reports_path() {
        let input = json!({"properties": {"a": {"$ref": 7, "type": "object"}}});
        let err = rejecting().normalize(&input).unwrap_err();
        match err {
            NormalizeError::UnrecognizedShape { path, .. } => {
                assert_eq!(path, "#/properties/a/$ref");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reject_relative_ref() {
        let input = json!({"items": [{"$ref": "Thing"}]});
        let err = rejecting().normalize(&input).unwrap_err();
        assert!(err.to_string().contains("#/items/0/$ref"));
    }

    #[test]
    fn test_reject_accepts_well_formed_input() {
        let input = json!({"$ref": "/A", "description": "d"});
        assert!(rejecting().normalize(&input).is_ok());
    }

    #[test]
    fn test_warn_policy_still_transforms() {
        let normalizer = Normalizer::new(NormalizeOptions {
            shape_policy: ShapePolicy::Warn,
            ..NormalizeOptions::default()
        });
        let out = normalizer.normalize(&json!({"$ref": "Thing"})).unwrap();
        assert_eq!(out, json!({"$ref": "#/definitionsThing"}));
    }
}
