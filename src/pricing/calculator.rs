use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::error::PricingError;

use super::matching::lookup_rates;
use super::provider::Provider;
use super::resolver::PricingResolver;
use super::types::{RateSet, ResolvedPricing};

/// Token counts for one API call or an aggregate of calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct TokenUsage {
    pub(crate) input: u64,
    pub(crate) output: u64,
    pub(crate) cache_creation: u64,
    pub(crate) cache_read: u64,
}

impl TokenUsage {
    /// Counts saturate at `u64::MAX` instead of wrapping
    pub(crate) fn add(&mut self, other: &TokenUsage) {
        self.input = self.input.saturating_add(other.input);
        self.output = self.output.saturating_add(other.output);
        self.cache_creation = self.cache_creation.saturating_add(other.cache_creation);
        self.cache_read = self.cache_read.saturating_add(other.cache_read);
    }

    pub(crate) fn total(&self) -> u64 {
        self.input
            .saturating_add(self.output)
            .saturating_add(self.cache_creation)
            .saturating_add(self.cache_read)
    }
}

/// Dollar cost per component; unrounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub(crate) struct CostBreakdown {
    pub(crate) input_cost: f64,
    pub(crate) output_cost: f64,
    pub(crate) cache_creation_cost: f64,
    pub(crate) cache_read_cost: f64,
    pub(crate) total_cost: f64,
}

impl CostBreakdown {
    pub(crate) fn from_rates(usage: &TokenUsage, rates: &RateSet) -> Self {
        let input_cost = usage.input as f64 * rates.input_cost_per_token;
        let output_cost = usage.output as f64 * rates.output_cost_per_token;
        let cache_creation_cost =
            usage.cache_creation as f64 * rates.cache_creation_cost_per_token;
        let cache_read_cost = usage.cache_read as f64 * rates.cache_read_cost_per_token;
        Self {
            input_cost,
            output_cost,
            cache_creation_cost,
            cache_read_cost,
            total_cost: input_cost + output_cost + cache_creation_cost + cache_read_cost,
        }
    }
}

impl Add for CostBreakdown {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            input_cost: self.input_cost + rhs.input_cost,
            output_cost: self.output_cost + rhs.output_cost,
            cache_creation_cost: self.cache_creation_cost + rhs.cache_creation_cost,
            cache_read_cost: self.cache_read_cost + rhs.cache_read_cost,
            total_cost: self.total_cost + rhs.total_cost,
        }
    }
}

impl Sum for CostBreakdown {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Prices token usage against the current provider's table
pub(crate) struct CostCalculator {
    resolver: PricingResolver,
    provider: Provider,
}

impl CostCalculator {
    pub(crate) fn new(resolver: PricingResolver, provider: Provider) -> Self {
        Self { resolver, provider }
    }

    /// Switch provider; the memoized table belongs to the old one
    pub(crate) fn set_provider(&mut self, provider: Provider) {
        if self.provider != provider {
            self.provider = provider;
            self.resolver.invalidate();
        }
    }

    pub(crate) fn pricing(&self) -> ResolvedPricing {
        self.resolver.resolve(self.provider)
    }

    pub(crate) fn refresh(&self) -> ResolvedPricing {
        self.resolver.refresh(self.provider)
    }

    /// Rates for `model` together with the table key they were found under
    pub(crate) fn rates_for(&self, model: &str) -> Result<(String, RateSet), PricingError> {
        let pricing = self.pricing();
        lookup_rates(model, &pricing.table)
            .map(|(key, rates)| (key.to_string(), rates))
            .ok_or_else(|| PricingError::UnknownModel {
                model: model.to_string(),
                provider: self.provider.to_string(),
            })
    }

    pub(crate) fn calculate(
        &self,
        usage: &TokenUsage,
        model: &str,
    ) -> Result<CostBreakdown, PricingError> {
        let (_, rates) = self.rates_for(model)?;
        Ok(CostBreakdown::from_rates(usage, &rates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::resolver::test_support::FailingFetcher;

    fn calculator(provider: Provider) -> CostCalculator {
        let resolver = PricingResolver::new(None, Box::new(FailingFetcher::default()));
        CostCalculator::new(resolver, provider)
    }

    fn million_in_out() -> TokenUsage {
        TokenUsage {
            input: 1_000_000,
            output: 1_000_000,
            cache_creation: 0,
            cache_read: 0,
        }
    }

    #[test]
    fn regional_sonnet_includes_premium() {
        let costs = calculator(Provider::VertexAiRegional)
            .calculate(&million_in_out(), "claude-3-5-sonnet-20241022")
            .unwrap();
        // $3/M and $15/M plus 10%
        assert!((costs.input_cost - 3.30).abs() < 0.01);
        assert!((costs.output_cost - 16.50).abs() < 0.01);
        assert!((costs.total_cost - 19.80).abs() < 0.01);
    }

    #[test]
    fn anthropic_sonnet_list_price() {
        let costs = calculator(Provider::Anthropic)
            .calculate(&million_in_out(), "claude-3-5-sonnet-20241022")
            .unwrap();
        assert!((costs.input_cost - 3.0).abs() < 1e-9);
        assert!((costs.output_cost - 15.0).abs() < 1e-9);
        assert!((costs.total_cost - 18.0).abs() < 1e-9);
    }

    #[test]
    fn cache_components() {
        let usage = TokenUsage {
            input: 0,
            output: 0,
            cache_creation: 1_000_000,
            cache_read: 1_000_000,
        };
        let costs = calculator(Provider::Anthropic)
            .calculate(&usage, "claude-sonnet-4-20250514")
            .unwrap();
        // 1M * $3.75/M + 1M * $0.3/M = $4.05
        assert!((costs.cache_creation_cost - 3.75).abs() < 1e-9);
        assert!((costs.cache_read_cost - 0.30).abs() < 1e-9);
        assert!((costs.total_cost - 4.05).abs() < 1e-9);
    }

    #[test]
    fn total_is_sum_of_components() {
        let usage = TokenUsage {
            input: 12_345,
            output: 6_789,
            cache_creation: 1_000,
            cache_read: 50_000,
        };
        let c = calculator(Provider::Anthropic)
            .calculate(&usage, "claude-3-opus-20240229")
            .unwrap();
        let sum = c.input_cost + c.output_cost + c.cache_creation_cost + c.cache_read_cost;
        assert!((c.total_cost - sum).abs() < 1e-12);
    }

    #[test]
    fn zero_usage_costs_nothing() {
        let costs = calculator(Provider::Anthropic)
            .calculate(&TokenUsage::default(), "claude-3-haiku-20240307")
            .unwrap();
        assert_eq!(costs, CostBreakdown::default());
    }

    #[test]
    fn unknown_model_is_an_error() {
        let err = calculator(Provider::Anthropic)
            .calculate(&million_in_out(), "gpt-4o")
            .unwrap_err();
        assert!(matches!(
            err,
            PricingError::UnknownModel { ref model, ref provider }
                if model == "gpt-4o" && provider == "anthropic"
        ));
    }

    #[test]
    fn set_provider_switches_rates() {
        let mut calc = calculator(Provider::VertexAi);
        let base = calc
            .calculate(&million_in_out(), "claude-3-5-sonnet-20241022")
            .unwrap();
        calc.set_provider(Provider::VertexAiRegional);
        let regional = calc
            .calculate(&million_in_out(), "claude-3-5-sonnet-20241022")
            .unwrap();
        assert!((regional.total_cost - base.total_cost * 1.10).abs() < 1e-9);
    }

    #[test]
    fn breakdowns_sum() {
        let rates = RateSet::per_million(3.0, 15.0, 3.75, 0.30);
        let one = CostBreakdown::from_rates(&million_in_out(), &rates);
        let total: CostBreakdown = [one, one].into_iter().sum();
        assert!((total.total_cost - 36.0).abs() < 1e-9);
        assert!((total.input_cost - 6.0).abs() < 1e-9);
    }

    #[test]
    fn generic_names_are_unknown_models() {
        let calc = calculator(Provider::Anthropic);
        for model in ["s", "o", "3", "claude", "claude-3"] {
            assert!(
                matches!(calc.rates_for(model), Err(PricingError::UnknownModel { .. })),
                "{model}"
            );
        }
    }

    #[test]
    fn rates_for_reports_matched_key() {
        let (key, rates) = calculator(Provider::Anthropic)
            .rates_for("claude-sonnet-4")
            .unwrap();
        assert_eq!(key, "claude-sonnet-4-20250514");
        assert!((rates.input_cost_per_token - 3e-6).abs() < 1e-15);
    }

    #[test]
    fn usage_add_saturates() {
        let mut usage = TokenUsage {
            input: u64::MAX,
            ..TokenUsage::default()
        };
        usage.add(&TokenUsage {
            input: 1,
            output: 5,
            ..TokenUsage::default()
        });
        assert_eq!(usage.input, u64::MAX);
        assert_eq!(usage.output, 5);
    }

    #[test]
    fn usage_total_saturates() {
        let usage = TokenUsage {
            input: u64::MAX,
            output: 1,
            ..TokenUsage::default()
        };
        assert_eq!(usage.total(), u64::MAX);
    }

    #[test]
    fn huge_counts_price_without_panicking() {
        let usage = TokenUsage {
            input: u64::MAX,
            output: 1,
            ..TokenUsage::default()
        };
        let costs = calculator(Provider::Anthropic)
            .calculate(&usage, "claude-3-haiku-20240307")
            .unwrap();
        assert!(costs.total_cost.is_finite());
    }

    #[test]
    fn usage_total() {
        let usage = TokenUsage {
            input: 1,
            output: 2,
            cache_creation: 3,
            cache_read: 4,
        };
        assert_eq!(usage.total(), 10);
    }
}
