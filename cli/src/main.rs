mod command;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use command::{run, Command, CommandContext, OutputFormat};
use commands::{GenDefs, Normalize};

#[derive(Parser)]
#[command(name = "zapier-schema")]
#[command(about = "Generate TypeScript definitions from the Zapier platform schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format; `json` and `raw` suppress progress output
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript definitions from the exported platform schema
    GenDefs(GenDefs),

    /// Write the normalized schema document as JSON
    Normalize(Normalize),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let command: &dyn Command = match &cli.command {
        Commands::GenDefs(cmd) => cmd,
        Commands::Normalize(cmd) => cmd,
    };

    let mut ctx = CommandContext::new(cli.format);
    run(command, &mut ctx)
}
