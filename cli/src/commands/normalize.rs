use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use zapier_schema_core::build_document;

use super::SchemaArgs;
use crate::command::{Command, CommandContext};

/// Flags for `normalize`
#[derive(Args, Debug)]
pub struct Normalize {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Output file (defaults to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

impl Command for Normalize {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn perform(&self, ctx: &mut CommandContext) -> Result<()> {
        let options = self.schema.options()?;
        let exported = self.schema.read_input()?;

        let document = build_document(&exported, &options)
            .map_err(|e| anyhow::Error::from(e).context("Normalization failed"))?;

        write_json(&document, self.output.as_ref(), self.compact)?;

        if let Some(path) = &self.output {
            ctx.log(format!("Wrote normalized schema to {}", path.display()));
        }
        Ok(())
    }
}

fn write_json<T: serde::Serialize>(val: &T, path: Option<&PathBuf>, compact: bool) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    if compact {
        serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
    } else {
        serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
    }

    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
