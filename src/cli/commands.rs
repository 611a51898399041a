//! CLI subcommand definitions

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::pricing::TokenUsage;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Calculate the cost of token usage for a model or a usage file
    Cost(CostArgs),
    /// Show the resolved per-model pricing table and where it came from
    Pricing {
        /// Only show the row matching this model
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[derive(Debug, Args)]
pub(crate) struct CostArgs {
    /// Model name (e.g. claude-3-5-sonnet-20241022)
    #[arg(short, long, required_unless_present = "file")]
    pub(crate) model: Option<String>,

    /// JSON Lines usage file to price, aggregated per model
    #[arg(short, long, value_name = "PATH", conflicts_with = "model")]
    pub(crate) file: Option<PathBuf>,

    /// Price the usage under every provider side by side
    #[arg(long, conflicts_with = "file")]
    pub(crate) compare: bool,

    /// Input tokens
    #[arg(long, default_value_t = 0)]
    pub(crate) input: u64,

    /// Output tokens
    #[arg(long, default_value_t = 0)]
    pub(crate) output: u64,

    /// Cache creation (write) tokens
    #[arg(long, default_value_t = 0)]
    pub(crate) cache_creation: u64,

    /// Cache read tokens
    #[arg(long, default_value_t = 0)]
    pub(crate) cache_read: u64,
}

impl CostArgs {
    pub(crate) fn usage(&self) -> TokenUsage {
        TokenUsage {
            input: self.input,
            output: self.output,
            cache_creation: self.cache_creation,
            cache_read: self.cache_read,
        }
    }
}
