use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use zapier_schema_codegen::{generate, CodegenConfig, CompileOptions};
use zapier_schema_core::build_document;

use super::SchemaArgs;
use crate::command::{Command, CommandContext, OutputFormat};

pub const DEFAULT_OUTPUT: &str = "types/schemas.d.ts";

/// Flags for `gen-defs`
#[derive(Args, Debug)]
pub struct GenDefs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Generated declaration file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Ask before overwriting an existing output file
    #[arg(long)]
    pub confirm: bool,

    /// Leave open objects without a `[k: string]: unknown` index signature
    #[arg(long)]
    pub no_unknown_index: bool,
}

impl Command for GenDefs {
    fn name(&self) -> &'static str {
        "gen-defs"
    }

    fn perform(&self, ctx: &mut CommandContext) -> Result<()> {
        if self.confirm && ctx.format().is_machine_readable() {
            anyhow::bail!(
                "`--confirm` prompts interactively and cannot be combined with `--format {}`",
                format_name(ctx.format())
            );
        }

        let options = self.schema.options()?;
        let exported = self.schema.read_input()?;

        ctx.start_spinner("Normalizing schema");
        let document = build_document(&exported, &options)
            .map_err(|e| anyhow::Error::from(e).context("Normalization failed"))?;
        ctx.stop_spinner(true, None);

        if self.confirm && self.output.exists() {
            let prompt = format!("Overwrite {}?", self.output.display());
            if !ctx.confirm(&prompt, false)? {
                ctx.log("Cancelled.");
                return Ok(());
            }
        }

        let config = CodegenConfig {
            output_path: self.output.clone(),
            compile: CompileOptions {
                unknown_index_signature: !self.no_unknown_index,
                ..CompileOptions::default()
            },
        };

        ctx.start_spinner("Compiling type definitions");
        let summary = generate(&document, &config)?;
        ctx.stop_spinner(true, Some("Compiled type definitions"));

        match ctx.format() {
            OutputFormat::Plain => ctx.log(format!(
                "Wrote {} definitions to {}",
                summary.definitions,
                summary.output.display()
            )),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&summary)
                    .context("Failed to serialize summary")?;
                println!("{json}");
            }
            OutputFormat::Raw => {}
        }
        Ok(())
    }
}

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Plain => "plain",
        OutputFormat::Json => "json",
        OutputFormat::Raw => "raw",
    }
}
