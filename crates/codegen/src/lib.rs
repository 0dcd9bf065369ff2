pub mod typescript;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use zapier_schema_core::schema_utils::DEFINITIONS;

pub use typescript::compile;

/// Banner placed at the top of every generated file.
pub const DEFAULT_BANNER: &str = "/* tslint:disable */
/* eslint-disable */
/**
* This file was automatically generated by zapier-schema.
* DO NOT MODIFY IT BY HAND. Instead, modify the source JSONSchema file,
* and run `zapier-schema gen-defs` to regenerate this file.
*/";

/// Options for compiling a normalized document to TypeScript.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Comment block emitted before any declaration.
    pub banner_comment: String,
    /// Emit `[k: string]: unknown;` for objects that allow additional properties.
    pub unknown_index_signature: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            banner_comment: DEFAULT_BANNER.to_string(),
            unknown_index_signature: true,
        }
    }
}

/// Configuration for writing the declaration file.
#[derive(Debug, Clone)]
pub struct CodegenConfig {
    /// Path of the generated `.d.ts` file
    pub output_path: PathBuf,
    pub compile: CompileOptions,
}

/// What [`generate`] wrote.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummary {
    pub output: PathBuf,
    pub definitions: usize,
    pub bytes: usize,
}

/// Compile a normalized document and write it to `config.output_path`,
/// creating parent directories as needed.
pub fn generate(document: &Value, config: &CodegenConfig) -> Result<GenerateSummary> {
    let text = compile(document, &config.compile).context("Type compilation failed")?;

    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output dir: {}", parent.display()))?;
        }
    }
    fs::write(&config.output_path, &text)
        .with_context(|| format!("Failed to write: {}", config.output_path.display()))?;

    let definitions = document
        .get(DEFINITIONS)
        .and_then(Value::as_object)
        .map_or(0, |defs| defs.len());

    Ok(GenerateSummary {
        output: config.output_path.clone(),
        definitions,
        bytes: text.len(),
    })
}
