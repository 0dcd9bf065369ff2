use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use heck::ToUpperCamelCase;
use rust_embed::Embed;
use serde::Serialize;
use serde_json::{Map, Value};
use tera::Tera;
use zapier_schema_core::definition_name;
use zapier_schema_core::schema_utils::{DEFINITIONS, DESCRIPTION, REF, TITLE};

use crate::CompileOptions;

#[derive(Embed)]
#[folder = "templates/typescript/"]
struct TypeScriptTemplates;

const FILE_TEMPLATE: &str = "schemas.d.ts.tera";

/// Name used for the root declaration when the document has no title.
const FALLBACK_ROOT_NAME: &str = "Root";

/// Template context for the generated declaration file.
#[derive(Serialize)]
struct FileContext {
    banner: String,
    declarations: Vec<String>,
}

/// Compile a normalized document into TypeScript declaration text.
///
/// The root schema becomes the first declaration, named after its `title`;
/// every entry under `definitions` follows in document order. References to
/// anything that is not declared compile to `unknown`.
pub fn compile(document: &Value, options: &CompileOptions) -> Result<String> {
    let empty = Map::new();
    let definitions = document
        .get(DEFINITIONS)
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let root_name = document
        .get(TITLE)
        .and_then(Value::as_str)
        .map(type_name)
        .unwrap_or_else(|| FALLBACK_ROOT_NAME.to_string());

    let names = declaration_names(&root_name, definitions);
    let emitter = Emitter {
        options,
        names: &names,
    };

    let mut declarations = Vec::with_capacity(definitions.len() + 1);
    declarations.push(emitter.declaration(&root_name, &root_without_definitions(document)));
    for (name, schema) in definitions {
        if let Some(declared) = names.get(name.as_str()) {
            declarations.push(emitter.declaration(declared, schema));
        }
    }

    tracing::debug!(count = declarations.len(), "emitted TypeScript declarations");

    let tera = load_templates()?;
    let ctx = tera::Context::from_serialize(FileContext {
        banner: options.banner_comment.clone(),
        declarations,
    })
    .with_context(|| "Failed to serialize template context")?;
    tera.render(FILE_TEMPLATE, &ctx)
        .with_context(|| format!("Failed to render template: {}", FILE_TEMPLATE))
}

/// Build a Tera engine from the embedded templates.
fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();
    for file_name in TypeScriptTemplates::iter() {
        let file = TypeScriptTemplates::get(&file_name)
            .with_context(|| format!("Failed to load embedded template: {}", file_name))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .with_context(|| format!("Template {} is not valid UTF-8", file_name))?;
        tera.add_raw_template(&file_name, content)
            .with_context(|| format!("Failed to register template: {}", file_name))?;
    }
    Ok(tera)
}

/// The root schema without its `definitions` container.
fn root_without_definitions(document: &Value) -> Value {
    match document {
        Value::Object(obj) => Value::Object(
            obj.iter()
                .filter(|(key, _)| key.as_str() != DEFINITIONS)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// TypeScript type name for a schema or definition name.
pub fn type_name(name: &str) -> String {
    let name = name.to_upper_camel_case();
    match name.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{name}"),
        Some(_) => name,
        None => FALLBACK_ROOT_NAME.to_string(),
    }
}

/// Declared type name for every definition key.
///
/// The root name is taken first; a later name that would repeat an earlier
/// one gets the lowest free numeric suffix (`FooBar`, `FooBar2`, ...).
fn declaration_names(root_name: &str, definitions: &Map<String, Value>) -> HashMap<String, String> {
    let mut taken = HashSet::from([root_name.to_string()]);
    let mut names = HashMap::with_capacity(definitions.len());
    for key in definitions.keys() {
        let base = type_name(key);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while taken.contains(&candidate) {
            candidate = format!("{base}{suffix}");
            suffix += 1;
        }
        if candidate != base {
            tracing::warn!(definition = %key, name = %candidate, "type name collision; renamed");
        }
        taken.insert(candidate.clone());
        names.insert(key.clone(), candidate);
    }
    names
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

struct Emitter<'a> {
    options: &'a CompileOptions,
    /// Definition key -> declared type name.
    names: &'a HashMap<String, String>,
}

impl Emitter<'_> {
    /// `export interface` for object schemas, `export type` for the rest.
    fn declaration(&self, name: &str, schema: &Value) -> String {
        let mut out = doc_comment(schema, "");
        if let Some(obj) = schema.as_object().filter(|_| is_interface(schema)) {
            out.push_str(&format!("export interface {name} "));
            out.push_str(&self.object_literal(obj, ""));
        } else {
            out.push_str(&format!("export type {name} = {};", self.type_expr(schema, "")));
        }
        out
    }

    fn type_expr(&self, schema: &Value, indent: &str) -> String {
        let obj = match schema {
            Value::Object(obj) => obj,
            Value::Bool(false) => return "never".to_string(),
            _ => return "unknown".to_string(),
        };

        if let Some(reference) = obj.get(REF) {
            return reference
                .as_str()
                .and_then(definition_name)
                .and_then(|name| self.names.get(&name).cloned())
                .unwrap_or_else(|| "unknown".to_string());
        }

        if let Some(value) = obj.get("const") {
            return literal(value);
        }

        if let Some(Value::Array(values)) = obj.get("enum") {
            return join_members(values.iter().map(literal).collect(), " | ");
        }

        for (keyword, separator) in [("oneOf", " | "), ("anyOf", " | "), ("allOf", " & ")] {
            if let Some(Value::Array(variants)) = obj.get(keyword) {
                let members = variants
                    .iter()
                    .map(|variant| self.type_expr(variant, indent))
                    .collect();
                return join_members(members, separator);
            }
        }

        match obj.get("type") {
            Some(Value::String(ty)) => self.primitive(ty, obj, indent),
            Some(Value::Array(types)) => join_members(
                types
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|ty| self.primitive(ty, obj, indent))
                    .collect(),
                " | ",
            ),
            _ if is_object_like(obj) => self.object_literal(obj, indent),
            _ if obj.contains_key("items") => self.array(obj, indent),
            _ => "unknown".to_string(),
        }
    }

    fn primitive(&self, ty: &str, obj: &Map<String, Value>, indent: &str) -> String {
        match ty {
            "string" => "string".to_string(),
            "number" | "integer" => "number".to_string(),
            "boolean" => "boolean".to_string(),
            "null" => "null".to_string(),
            "array" => self.array(obj, indent),
            "object" => self.object_literal(obj, indent),
            _ => "unknown".to_string(),
        }
    }

    fn array(&self, obj: &Map<String, Value>, indent: &str) -> String {
        match obj.get("items") {
            Some(Value::Array(tuple)) => {
                let members: Vec<String> = tuple
                    .iter()
                    .map(|item| self.type_expr(item, indent))
                    .collect();
                format!("[{}]", members.join(", "))
            }
            Some(item) => format!("{}[]", parenthesize(&self.type_expr(item, indent))),
            None => "unknown[]".to_string(),
        }
    }

    fn object_literal(&self, obj: &Map<String, Value>, indent: &str) -> String {
        let inner = format!("{indent}  ");

        let required: Vec<&str> = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut members = Vec::new();

        if let Some(Value::Object(properties)) = obj.get("properties") {
            for (name, property) in properties {
                let optional = if required.contains(&name.as_str()) { "" } else { "?" };
                let mut member = doc_comment(property, &inner);
                member.push_str(&format!(
                    "{inner}{}{optional}: {};",
                    property_key(name),
                    self.type_expr(property, &inner)
                ));
                members.push(member);
            }
        }

        if let Some(signature) = self.index_signature(obj, &inner) {
            members.push(format!("{inner}[k: string]: {signature};"));
        }

        if members.is_empty() {
            return "{}".to_string();
        }
        format!("{{\n{}\n{indent}}}", members.join("\n"))
    }

    /// Value type of `[k: string]`, or `None` when the object is closed.
    fn index_signature(&self, obj: &Map<String, Value>, indent: &str) -> Option<String> {
        let mut members = Vec::new();

        if let Some(Value::Object(patterns)) = obj.get("patternProperties") {
            members.extend(
                patterns
                    .values()
                    .map(|schema| self.type_expr(schema, indent)),
            );
        }

        match obj.get("additionalProperties") {
            Some(Value::Bool(false)) => {}
            Some(schema @ Value::Object(_)) => members.push(self.type_expr(schema, indent)),
            _ if members.is_empty() && self.options.unknown_index_signature => {
                members.push("unknown".to_string());
            }
            _ => {}
        }

        if members.is_empty() {
            None
        } else {
            Some(join_members(members, " | "))
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_object_like(obj: &Map<String, Value>) -> bool {
    obj.contains_key("properties")
        || obj.contains_key("patternProperties")
        || obj.contains_key("additionalProperties")
}

/// Object schemas without a combinator or reference become interfaces.
fn is_interface(schema: &Value) -> bool {
    let Some(obj) = schema.as_object() else {
        return false;
    };
    if ["$ref", "oneOf", "anyOf", "allOf", "enum", "const"]
        .iter()
        .any(|key| obj.contains_key(*key))
    {
        return false;
    }
    match obj.get("type") {
        Some(Value::String(ty)) => ty == "object",
        Some(_) => false,
        None => is_object_like(obj),
    }
}

/// Deduplicate and join union/intersection members.
fn join_members(members: Vec<String>, separator: &str) -> String {
    let mut unique: Vec<String> = Vec::with_capacity(members.len());
    for member in members {
        if !unique.contains(&member) {
            unique.push(member);
        }
    }
    match unique.len() {
        0 => "never".to_string(),
        1 => unique.remove(0),
        _ => unique
            .iter()
            .map(|m| parenthesize(m))
            .collect::<Vec<_>>()
            .join(separator),
    }
}

/// Wrap compound types so they bind correctly inside `[]`, `|` and `&`.
fn parenthesize(ty: &str) -> String {
    if is_compound(ty) {
        format!("({ty})")
    } else {
        ty.to_string()
    }
}

/// True when `ty` has a ` | ` or ` & ` outside any braces, brackets,
/// parentheses and string literals.
fn is_compound(ty: &str) -> bool {
    let bytes = ty.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' | b'(' => depth += 1,
            b'}' | b']' | b')' => depth = depth.saturating_sub(1),
            b'|' | b'&' if depth == 0 => {
                let spaced = i > 0 && bytes[i - 1] == b' ' && bytes.get(i + 1) == Some(&b' ');
                if spaced {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => value.to_string(),
        _ => "unknown".to_string(),
    }
}

fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if valid {
        name.to_string()
    } else {
        Value::String(name.to_string()).to_string()
    }
}

/// JSDoc block from the schema's `description`, or nothing.
fn doc_comment(schema: &Value, indent: &str) -> String {
    let Some(description) = schema.get(DESCRIPTION).and_then(Value::as_str) else {
        return String::new();
    };
    let mut out = format!("{indent}/**\n");
    for line in description.replace("*/", "*\\/").lines() {
        if line.is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {line}\n"));
        }
    }
    out.push_str(&format!("{indent} */\n"));
    out
}
