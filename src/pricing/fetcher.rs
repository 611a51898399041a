use std::collections::HashMap;
use std::time::Duration;

use crate::error::PricingError;

use super::types::{PricingTable, RateSet};

const LITELLM_PRICING_URL: &str =
    "https://raw.githubusercontent.com/BerriAI/litellm/main/model_prices_and_context_window.json";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const FETCH_RETRIES: usize = 3;
const RETRY_BACKOFF_MS: u64 = 250;

pub(crate) type RawPricing = HashMap<String, serde_json::Value>;

/// Remote source of raw per-model pricing documents
pub(crate) trait PricingFetcher {
    fn fetch(&self) -> Result<RawPricing, PricingError>;
}

#[derive(Debug, Clone)]
pub(crate) struct LiteLlmFetcher {
    url: String,
    timeout: Duration,
    retries: usize,
}

impl Default for LiteLlmFetcher {
    fn default() -> Self {
        Self {
            url: LITELLM_PRICING_URL.to_string(),
            timeout: FETCH_TIMEOUT,
            retries: FETCH_RETRIES,
        }
    }
}

impl LiteLlmFetcher {
    fn fetch_once(&self, agent: &ureq::Agent) -> Result<RawPricing, PricingError> {
        let response = agent.get(&self.url).call()?;
        let mut body = response.into_body();
        serde_json::from_reader(body.as_reader()).map_err(PricingError::Malformed)
    }
}

impl PricingFetcher for LiteLlmFetcher {
    fn fetch(&self) -> Result<RawPricing, PricingError> {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build()
            .into();

        let mut last_err = PricingError::NoModels;
        for attempt in 0..self.retries {
            match self.fetch_once(&agent) {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    tracing::debug!("Pricing fetch attempt {} failed: {}", attempt + 1, e);
                    last_err = e;
                }
            }

            if attempt + 1 < self.retries {
                std::thread::sleep(Duration::from_millis(
                    RETRY_BACKOFF_MS * (attempt as u64 + 1),
                ));
            }
        }

        Err(last_err)
    }
}

/// Fallback multipliers over the input price when a row lacks cache prices
const CACHE_WRITE_MULTIPLIER: f64 = 1.25;
const CACHE_READ_MULTIPLIER: f64 = 0.10;

/// Extract Anthropic-billed Claude models from a LiteLLM price list
pub(crate) fn parse_litellm_data(data: RawPricing) -> PricingTable {
    let mut models = PricingTable::new();

    for (name, value) in data {
        let model = name.strip_prefix("anthropic/").unwrap_or(&name);
        if !model.starts_with("claude") {
            continue;
        }
        let provider = value.get("litellm_provider").and_then(|v| v.as_str());
        if provider.is_some_and(|p| p != "anthropic") {
            continue;
        }

        let rate = |key: &str| value.get(key).and_then(|v| v.as_f64());
        let (Some(input), Some(output)) = (rate("input_cost_per_token"), rate("output_cost_per_token"))
        else {
            continue;
        };
        let rates = RateSet {
            input_cost_per_token: input,
            output_cost_per_token: output,
            cache_creation_cost_per_token: rate("cache_creation_input_token_cost")
                .unwrap_or(input * CACHE_WRITE_MULTIPLIER),
            cache_read_cost_per_token: rate("cache_read_input_token_cost")
                .unwrap_or(input * CACHE_READ_MULTIPLIER),
        };
        if [
            rates.input_cost_per_token,
            rates.output_cost_per_token,
            rates.cache_creation_cost_per_token,
            rates.cache_read_cost_per_token,
        ]
        .iter()
        .any(|r| !r.is_finite() || *r < 0.0)
        {
            continue;
        }

        models.insert(model.to_string(), rates);
    }

    models
}
