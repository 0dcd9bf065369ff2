//! # zapier-schema-core
//!
//! Prepares the Zapier platform's exported JSON Schema for a
//! schema-to-TypeScript compiler.
//!
//! The exported document is not quite standard JSON Schema: identifiers are
//! bare paths (`/AppSchema`), references are not rooted at a definitions
//! container, and a reference carrying only a description loses that
//! description in generated types. [`build_document`] fixes all three:
//!
//! ```
//! use serde_json::json;
//! use zapier_schema_core::{build_document, NormalizeOptions};
//!
//! let exported = json!({"schemas": {
//!     "AppSchema": {"id": "/AppSchema", "type": "object"},
//!     "Widget": {"id": "/Widget", "$ref": "/Gadget", "description": "a widget"}
//! }});
//!
//! let doc = build_document(&exported, &NormalizeOptions::default()).unwrap();
//! assert_eq!(doc["title"], "Zapier Integration");
//! assert_eq!(doc["definitions"]["Widget"]["oneOf"][0]["$ref"], "#/definitions/Gadget");
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod normalize;
pub mod schema_utils;

pub use config::{NormalizeOptions, ShapePolicy};
pub use document::build_document;
pub use error::NormalizeError;
pub use normalize::{namespace_reference, normalize, rewrite_identifier, Normalizer};
pub use schema_utils::{build_path, definition_name, split_path};

use serde_json::Value;

/// Parse an exported schema document from JSON text and build the
/// normalized document.
pub fn build_document_from_str(
    json: &str,
    options: &NormalizeOptions,
) -> Result<Value, NormalizeError> {
    let exported: Value = serde_json::from_str(json)?;
    build_document(&exported, options)
}
