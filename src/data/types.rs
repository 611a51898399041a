use serde::Deserialize;
use std::collections::BTreeMap;

use crate::pricing::TokenUsage;

/// One line of a usage file: either a flat record or a transcript entry
/// carrying an Anthropic API `usage` object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum UsageLine {
    Transcript {
        message: Message,
    },
    Flat {
        model: String,
        #[serde(flatten)]
        usage: TokenUsage,
    },
}

#[derive(Debug, Deserialize)]
pub(super) struct Message {
    pub(super) model: Option<String>,
    pub(super) usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub(super) struct ApiUsage {
    pub(super) input_tokens: Option<u64>,
    pub(super) output_tokens: Option<u64>,
    pub(super) cache_creation_input_tokens: Option<u64>,
    pub(super) cache_read_input_tokens: Option<u64>,
}

impl From<&ApiUsage> for TokenUsage {
    fn from(u: &ApiUsage) -> Self {
        TokenUsage {
            input: u.input_tokens.unwrap_or(0),
            output: u.output_tokens.unwrap_or(0),
            cache_creation: u.cache_creation_input_tokens.unwrap_or(0),
            cache_read: u.cache_read_input_tokens.unwrap_or(0),
        }
    }
}

/// Token usage aggregated per model
#[derive(Debug, Default)]
pub(crate) struct UsageSummary {
    pub(crate) models: BTreeMap<String, TokenUsage>,
    pub(crate) valid: usize,
    pub(crate) skipped: usize,
}
