//! Configuration for schema normalization.

use serde::{Deserialize, Serialize};

/// What to do with a shape the normalizer does not recognize, such as a
/// `$ref` whose value is not a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapePolicy {
    /// Apply the plain transform and say nothing.
    #[default]
    PassThrough,
    /// Apply the plain transform and log each finding at `warn`.
    Warn,
    /// Fail on the first finding.
    Reject,
}

/// Options for schema normalization.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `definitions-prefix`,
/// `root-schema`). Partial config files are accepted: missing fields fall back
/// to [`NormalizeOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NormalizeOptions {
    /// Prefix prepended to every `$ref` value. Default: `#/definitions`.
    pub definitions_prefix: String,
    /// Replaces the leading `/` of each schema identifier. Default: `#`.
    pub anchor_marker: String,
    /// Named schema hoisted to the document root. Default: `AppSchema`.
    pub root_schema: String,
    /// Title attached to the document root, overriding any hoisted title.
    pub title: String,
    /// Handling of unrecognized shapes.
    pub shape_policy: ShapePolicy,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            definitions_prefix: "#/definitions".to_string(),
            anchor_marker: "#".to_string(),
            root_schema: "AppSchema".to_string(),
            title: "Zapier Integration".to_string(),
            shape_policy: ShapePolicy::PassThrough,
        }
    }
}
