//! Build the compiler-ready document from the platform's exported schema.
//!
//! The exported document is `{schemas: {Name: {id: "/Name", ...}, ...}}`.
//! Each named schema has its `id` replaced by an anchored `$id` and its body
//! normalized. The root schema is hoisted to the top level; every other schema
//! lands under `definitions`:
//!
//! ```text
//! {definitions: {...others}, ...root entries, title: <options.title>}
//! ```

use serde_json::{Map, Value};

use crate::config::{NormalizeOptions, ShapePolicy};
use crate::error::NormalizeError;
use crate::normalize::{Normalizer, ShapeFinding};
use crate::schema_utils::{build_path, DEFINITIONS, DOLLAR_ID, ID, SCHEMAS, TITLE};

/// Build the normalized document from an exported schema document.
///
/// # Errors
///
/// Fails when `schemas` is missing, when a named schema is not an object or
/// lacks a string `id`, and (under [`ShapePolicy::Reject`]) on any
/// unrecognized shape or a missing root schema.
pub fn build_document(
    exported: &Value,
    options: &NormalizeOptions,
) -> Result<Value, NormalizeError> {
    let schemas = exported
        .get(SCHEMAS)
        .and_then(Value::as_object)
        .ok_or(NormalizeError::MissingSchemas)?;

    let normalizer = Normalizer::new(options.clone());
    let mut findings = Vec::new();

    let mut definitions = Map::with_capacity(schemas.len());
    let mut root = None;

    for (name, schema) in schemas {
        let path = build_path("#", &[SCHEMAS, name]);
        let normalized = normalize_named(&normalizer, name, schema, &path, &mut findings)?;
        if *name == options.root_schema {
            root = Some(normalized);
        } else {
            definitions.insert(name.clone(), Value::Object(normalized));
        }
    }

    normalizer.settle(findings)?;

    tracing::debug!(
        definitions = definitions.len(),
        root = %options.root_schema,
        "built normalized document"
    );

    let mut document = Map::new();
    document.insert(DEFINITIONS.to_string(), Value::Object(definitions));

    match root {
        Some(root) => {
            for (key, value) in root {
                document.insert(key, value);
            }
        }
        None if options.shape_policy == ShapePolicy::Reject => {
            return Err(NormalizeError::MissingRootSchema {
                name: options.root_schema.clone(),
            });
        }
        None => {
            tracing::warn!(root = %options.root_schema, "root schema not found; nothing hoisted");
        }
    }

    document.insert(TITLE.to_string(), Value::String(options.title.clone()));
    Ok(Value::Object(document))
}

/// Strip `id`, normalize the rest, then attach the anchored `$id`.
fn normalize_named(
    normalizer: &Normalizer,
    name: &str,
    schema: &Value,
    path: &str,
    findings: &mut Vec<ShapeFinding>,
) -> Result<Map<String, Value>, NormalizeError> {
    let body = schema.as_object().ok_or_else(|| NormalizeError::InvalidSchema {
        name: name.to_string(),
    })?;

    let id = match body.get(ID) {
        Some(Value::String(id)) => id,
        Some(_) => {
            return Err(NormalizeError::InvalidId {
                name: name.to_string(),
            })
        }
        None => {
            return Err(NormalizeError::MissingId {
                name: name.to_string(),
            })
        }
    };

    if !id.starts_with('/') {
        findings.push(ShapeFinding {
            path: build_path(path, &[ID]),
            message: format!("identifier `{id}` does not start with `/`"),
        });
    }

    let rest: Map<String, Value> = body
        .iter()
        .filter(|(key, _)| key.as_str() != ID)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut normalized = match normalizer.walk(&Value::Object(rest), path, findings) {
        Value::Object(map) => map,
        // walk maps objects to objects
        _ => Map::new(),
    };
    normalized.insert(
        DOLLAR_ID.to_string(),
        Value::String(normalizer.rewrite_identifier(id)),
    );
    Ok(normalized)
}
