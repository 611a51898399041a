//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;

use clap::Parser;

use crate::config::Config;
use crate::pricing::Provider;

use super::commands::Commands;

#[derive(Parser)]
#[command(name = "ccprice")]
#[command(about = "Per-token Claude pricing and cost calculation", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Pricing provider: anthropic, vertex_ai, vertex_ai_regional
    /// (unrecognized values are priced as anthropic)
    #[arg(short, long, global = true)]
    pub(crate) provider: Option<String>,

    /// Never fetch; use cached pricing regardless of age, else built-in defaults
    #[arg(short = 'O', long, global = true)]
    pub(crate) offline: bool,

    /// Ignore the pricing cache and fetch from LiteLLM
    #[arg(long, global = true, conflicts_with = "offline")]
    pub(crate) refresh: bool,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if !self.offline && config.offline && !self.refresh {
            self.offline = true;
        }
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }
        if self.provider.is_none() {
            self.provider = config.provider.clone();
        }
        self
    }

    pub(crate) fn provider(&self) -> Provider {
        self.provider
            .as_deref()
            .map(Provider::parse)
            .unwrap_or(Provider::Anthropic)
    }

    pub(crate) fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}
