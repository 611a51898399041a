mod cache;
mod calculator;
mod defaults;
mod fetcher;
mod matching;
mod provider;
mod resolver;
mod types;

pub(crate) use cache::PricingCache;
pub(crate) use calculator::{CostBreakdown, CostCalculator, TokenUsage};
pub(crate) use fetcher::LiteLlmFetcher;
pub(crate) use provider::Provider;
pub(crate) use resolver::{DEFAULT_CACHE_TTL_HOURS, PricingResolver};
pub(crate) use types::{PricingSource, PricingTable, ResolvedPricing};
#[cfg(test)]
pub(crate) use resolver::test_support;
#[cfg(test)]
pub(crate) use types::RateSet;
