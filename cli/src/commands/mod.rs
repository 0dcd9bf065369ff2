pub mod gen_defs;
pub mod normalize;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use zapier_schema_core::{NormalizeOptions, ShapePolicy};

pub use gen_defs::GenDefs;
pub use normalize::Normalize;

/// Where the platform schema package puts its exported document.
pub const DEFAULT_INPUT: &str = "node_modules/zapier-platform-schema/exported-schema.json";

/// Input and normalization flags shared by every command.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Exported schema document
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// JSON file with normalization options (kebab-case keys)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Schema hoisted to the document root
    #[arg(long)]
    pub root_schema: Option<String>,

    /// Title attached to the document root
    #[arg(long)]
    pub title: Option<String>,

    /// Handling of shapes the normalizer does not recognize
    #[arg(long, value_enum)]
    pub shape_policy: Option<ShapePolicyArg>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum ShapePolicyArg {
    PassThrough,
    Warn,
    Reject,
}

impl From<ShapePolicyArg> for ShapePolicy {
    fn from(val: ShapePolicyArg) -> Self {
        match val {
            ShapePolicyArg::PassThrough => ShapePolicy::PassThrough,
            ShapePolicyArg::Warn => ShapePolicy::Warn,
            ShapePolicyArg::Reject => ShapePolicy::Reject,
        }
    }
}

impl SchemaArgs {
    /// Options from `--config` (or defaults), overridden by individual flags.
    pub fn options(&self) -> Result<NormalizeOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open config file: {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("Failed to parse config from: {}", path.display()))?
            }
            None => NormalizeOptions::default(),
        };

        if let Some(root_schema) = &self.root_schema {
            options.root_schema = root_schema.clone();
        }
        if let Some(title) = &self.title {
            options.title = title.clone();
        }
        if let Some(policy) = self.shape_policy {
            options.shape_policy = policy.into();
        }
        Ok(options)
    }

    pub fn read_input(&self) -> Result<serde_json::Value> {
        let file = File::open(&self.input)
            .with_context(|| format!("Failed to open input file: {}", self.input.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse schema from: {}", self.input.display()))
    }
}
