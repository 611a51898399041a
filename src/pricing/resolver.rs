use std::cell::RefCell;
use std::time::Instant;

use chrono::{TimeDelta, Utc};

use crate::error::PricingError;

use super::cache::{CacheEntry, PricingCache};
use super::defaults::{default_anthropic_pricing, vertex_ai_pricing};
use super::fetcher::{PricingFetcher, parse_litellm_data};
use super::provider::{Provider, REGIONAL_PREMIUM};
use super::types::{PricingSource, PricingTable, ResolvedPricing};

pub(crate) const DEFAULT_CACHE_TTL_HOURS: i64 = 24;

/// Resolves the pricing table for a provider through
/// cache -> remote fetch -> built-in defaults.
pub(crate) struct PricingResolver {
    cache: Option<PricingCache>,
    fetcher: Box<dyn PricingFetcher>,
    ttl: TimeDelta,
    offline: bool,
    memo: RefCell<Option<ResolvedPricing>>,
}

impl PricingResolver {
    pub(crate) fn new(cache: Option<PricingCache>, fetcher: Box<dyn PricingFetcher>) -> Self {
        Self {
            cache,
            fetcher,
            ttl: TimeDelta::hours(DEFAULT_CACHE_TTL_HOURS),
            offline: false,
            memo: RefCell::new(None),
        }
    }

    pub(crate) fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    /// Never fetch; use any cached entry regardless of age, else defaults
    pub(crate) fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub(crate) fn resolve(&self, provider: Provider) -> ResolvedPricing {
        if let Some(memo) = self
            .memo
            .borrow()
            .as_ref()
            .filter(|m| m.provider == provider)
        {
            return memo.clone();
        }
        self.remember(self.resolve_uncached(provider, false))
    }

    /// Skip the memo and the disk cache and go to the remote source
    pub(crate) fn refresh(&self, provider: Provider) -> ResolvedPricing {
        self.remember(self.resolve_uncached(provider, true))
    }

    /// Drop the memoized table; the next `resolve` goes through the full chain
    pub(crate) fn invalidate(&self) {
        self.memo.borrow_mut().take();
    }

    fn remember(&self, resolved: ResolvedPricing) -> ResolvedPricing {
        *self.memo.borrow_mut() = Some(resolved.clone());
        resolved
    }

    fn resolve_uncached(&self, provider: Provider, force: bool) -> ResolvedPricing {
        match provider {
            Provider::VertexAi => built_in(provider, vertex_ai_pricing()),
            Provider::VertexAiRegional => built_in(provider, regional(vertex_ai_pricing())),
            Provider::Anthropic | Provider::Default => self.resolve_remote(provider, force),
        }
    }

    fn resolve_remote(&self, provider: Provider, force: bool) -> ResolvedPricing {
        let key = provider.cache_key();
        let now = Utc::now();

        if self.offline {
            if let Some(entry) = self.cache.as_ref().and_then(|c| c.load(key)) {
                tracing::info!("Using cached {} pricing (offline)", key);
                return from_cache(provider, entry);
            }
            tracing::info!("No cached {} pricing, using defaults", key);
            return built_in(provider, default_anthropic_pricing());
        }

        if !force
            && let Some((entry, age)) = self
                .cache
                .as_ref()
                .and_then(|c| c.load_if_fresh(key, self.ttl, now))
        {
            tracing::info!(
                "Using cached {} pricing ({:.1}h old)",
                key,
                age.num_seconds() as f64 / 3600.0
            );
            return from_cache(provider, entry);
        }

        let start = Instant::now();
        tracing::info!("Fetching pricing from LiteLLM...");
        let table = match self.fetch_table() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("Pricing fetch failed ({}), using defaults", e);
                return built_in(provider, default_anthropic_pricing());
            }
        };
        tracing::info!(
            "Fetched {} models ({:.2}ms)",
            table.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        if let Some(cache) = &self.cache {
            let entry = CacheEntry {
                pricing: table.clone(),
                timestamp: now,
            };
            match cache.store(key, entry) {
                Ok(()) => tracing::debug!("Cached {} pricing at {}", key, cache.path().display()),
                Err(e) => tracing::warn!("{}", e),
            }
        }

        ResolvedPricing {
            provider,
            table,
            source: PricingSource::LiteLlm,
            timestamp: now,
        }
    }

    /// Defaults overlaid with the fetched Claude rows
    fn fetch_table(&self) -> Result<PricingTable, PricingError> {
        let fetched = parse_litellm_data(self.fetcher.fetch()?);
        if fetched.is_empty() {
            return Err(PricingError::NoModels);
        }
        let mut table = default_anthropic_pricing();
        table.extend(fetched);
        Ok(table)
    }
}

fn built_in(provider: Provider, table: PricingTable) -> ResolvedPricing {
    ResolvedPricing {
        provider,
        table,
        source: PricingSource::Default,
        timestamp: Utc::now(),
    }
}

fn from_cache(provider: Provider, entry: CacheEntry) -> ResolvedPricing {
    ResolvedPricing {
        provider,
        table: entry.pricing,
        source: PricingSource::Cache,
        timestamp: entry.timestamp,
    }
}

fn regional(table: PricingTable) -> PricingTable {
    table
        .into_iter()
        .map(|(model, rates)| (model, rates.scaled(REGIONAL_PREMIUM)))
        .collect()
}
