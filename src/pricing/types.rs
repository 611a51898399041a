use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provider::Provider;

/// Per-token rates for one model (dollars per token, not per million)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct RateSet {
    pub(crate) input_cost_per_token: f64,
    pub(crate) output_cost_per_token: f64,
    pub(crate) cache_creation_cost_per_token: f64,
    pub(crate) cache_read_cost_per_token: f64,
}

impl RateSet {
    /// Build a rate set from dollars-per-million-token prices
    pub(crate) fn per_million(input: f64, output: f64, cache_creation: f64, cache_read: f64) -> Self {
        Self {
            input_cost_per_token: input / 1_000_000.0,
            output_cost_per_token: output / 1_000_000.0,
            cache_creation_cost_per_token: cache_creation / 1_000_000.0,
            cache_read_cost_per_token: cache_read / 1_000_000.0,
        }
    }

    pub(crate) fn scaled(self, factor: f64) -> Self {
        Self {
            input_cost_per_token: self.input_cost_per_token * factor,
            output_cost_per_token: self.output_cost_per_token * factor,
            cache_creation_cost_per_token: self.cache_creation_cost_per_token * factor,
            cache_read_cost_per_token: self.cache_read_cost_per_token * factor,
        }
    }
}

pub(crate) type PricingTable = BTreeMap<String, RateSet>;

/// Where a resolved pricing table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PricingSource {
    Cache,
    #[serde(rename = "litellm")]
    LiteLlm,
    Default,
}

impl PricingSource {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            PricingSource::Cache => "cache",
            PricingSource::LiteLlm => "litellm",
            PricingSource::Default => "default",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedPricing {
    pub(crate) provider: Provider,
    pub(crate) table: PricingTable,
    pub(crate) source: PricingSource,
    pub(crate) timestamp: DateTime<Utc>,
}
