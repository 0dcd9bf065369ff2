//! Shared command plumbing.
//!
//! A command is a clap-parsed struct that implements [`Command`]. Flags are
//! parsed before [`run`] is called, so `perform` only ever sees valid input.
//! Everything a command needs to talk to the user goes through
//! [`CommandContext`].

use std::fmt::Display;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};

/// How command output is presented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable progress and summaries
    Plain,
    /// A single JSON document on stdout
    Json,
    /// Nothing but the command's primary output
    Raw,
}

impl OutputFormat {
    /// Formats meant for other programs; human-oriented output is suppressed.
    pub fn is_machine_readable(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Raw)
    }
}

pub trait Command {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    fn perform(&self, ctx: &mut CommandContext) -> Result<()>;
}

/// Perform a parsed command.
///
/// A spinner still running when `perform` fails is stopped as failed.
pub fn run(command: &dyn Command, ctx: &mut CommandContext) -> Result<()> {
    tracing::debug!(command = command.name(), format = ?ctx.format(), "performing command");
    let result = command.perform(ctx);
    if result.is_err() {
        ctx.stop_spinner(false, None);
    }
    result
}

pub struct CommandContext {
    format: OutputFormat,
    spinner: Option<ProgressBar>,
}

impl CommandContext {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            spinner: None,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print a line to stdout unless the format is machine-readable.
    pub fn log(&self, message: impl Display) {
        if !self.format.is_machine_readable() {
            println!("{message}");
        }
    }

    /// Ask a yes/no question on the terminal.
    pub fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .context("Failed to read confirmation")
    }

    pub fn start_spinner(&mut self, message: impl Into<String>) {
        self.stop_spinner(true, None);

        let spinner = if self.format.is_machine_readable() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.into());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    /// Stop the running spinner, if any.
    ///
    /// Without a `message` a successful spinner is cleared and a failed one
    /// keeps its last message.
    pub fn stop_spinner(&mut self, success: bool, message: Option<&str>) {
        let Some(spinner) = self.spinner.take() else {
            return;
        };
        match (success, message) {
            (true, Some(message)) => spinner.finish_with_message(format!("✔ {message}")),
            (true, None) => spinner.finish_and_clear(),
            (false, message) => {
                let message = message
                    .map(str::to_string)
                    .unwrap_or_else(|| spinner.message());
                spinner.abandon_with_message(format!("✖ {message}"));
            }
        }
    }

    #[cfg(test)]
    fn spinner_running(&self) -> bool {
        self.spinner.is_some()
    }
}

impl Drop for CommandContext {
    fn drop(&mut self) {
        self.stop_spinner(true, None);
    }
}
