//! Shared schema utilities: well-known keywords and JSON Pointer paths.
//!
//! The normalizer reports findings at JSON Pointer locations built here, and
//! the type compiler uses [`definition_name`] to turn a namespaced `$ref` back
//! into the name of the definition it points at.

use std::borrow::Cow;

/// Reference keyword.
pub const REF: &str = "$ref";
/// Free-text annotation keyword.
pub const DESCRIPTION: &str = "description";
/// Alternatives keyword used when wrapping a described reference.
pub const ONE_OF: &str = "oneOf";
/// Identifier keyword as exported by the platform schema package.
pub const ID: &str = "id";
/// Identifier keyword in the normalized output.
pub const DOLLAR_ID: &str = "$id";
/// Container holding every named schema except the root.
pub const DEFINITIONS: &str = "definitions";
/// Collection of named schemas in the exported document.
pub const SCHEMAS: &str = "schemas";
/// Title keyword.
pub const TITLE: &str = "title";

// ---------------------------------------------------------------------------
// JSON Pointer escaping (RFC 6901)
// ---------------------------------------------------------------------------

/// Escape a single path segment per RFC 6901.
///
/// - `~` → `~0`
/// - `/` → `~1`
///
/// Returns `Cow::Borrowed` when no escaping is needed (the common case).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Build a JSON Pointer path by appending segments to a parent path.
///
/// # Example
/// ```
/// use zapier_schema_core::build_path;
/// assert_eq!(build_path("#", &["schemas", "a/b"]), "#/schemas/a~1b");
/// ```
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    let mut path = parent.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&escape_pointer_segment(segment));
    }
    path
}

/// Unescape a single path segment per RFC 6901.
///
/// Order matters: unescape `~1` first to avoid double-unescaping.
pub fn unescape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains("~0") || segment.contains("~1") {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Split a JSON Pointer path into decoded segments.
///
/// Strips the leading `#` fragment identifier (if present), splits on `/`,
/// and unescapes each segment.
///
/// # Example
/// ```
/// use zapier_schema_core::split_path;
/// assert_eq!(split_path("#/definitions/a~1b"), vec!["definitions", "a/b"]);
/// assert_eq!(split_path("#"), Vec::<String>::new());
/// ```
pub fn split_path(path: &str) -> Vec<String> {
    let stripped = path.strip_prefix('#').unwrap_or(path);

    if stripped.is_empty() {
        return Vec::new();
    }

    let mut segments_iter = stripped.split('/');

    // The empty segment before a leading "/" is the root, not a key.
    if stripped.starts_with('/') {
        segments_iter.next();
    }

    segments_iter
        .map(|s| unescape_pointer_segment(s).into_owned())
        .collect()
}

/// Name of the definition a namespaced reference points at.
///
/// Returns `None` unless the reference is exactly
/// `#/definitions/<name>`.
///
/// # Example
/// ```
/// use zapier_schema_core::definition_name;
/// assert_eq!(definition_name("#/definitions/Widget").as_deref(), Some("Widget"));
/// assert_eq!(definition_name("#/properties/x"), None);
/// ```
pub fn definition_name(reference: &str) -> Option<String> {
    if !reference.starts_with('#') {
        return None;
    }
    match split_path(reference).as_slice() {
        [container, name] if container == DEFINITIONS && !name.is_empty() => Some(name.clone()),
        _ => None,
    }
}
