use super::types::{PricingTable, RateSet};

/// Built-in Anthropic list prices in dollars per million tokens:
/// (model, input, output, cache write, cache read)
const ANTHROPIC_LIST_PRICES: &[(&str, f64, f64, f64, f64)] = &[
    ("claude-opus-4-1-20250805", 15.0, 75.0, 18.75, 1.50),
    ("claude-opus-4-20250514", 15.0, 75.0, 18.75, 1.50),
    ("claude-sonnet-4-20250514", 3.0, 15.0, 3.75, 0.30),
    ("claude-3-7-sonnet-20250219", 3.0, 15.0, 3.75, 0.30),
    ("claude-3-5-sonnet-20241022", 3.0, 15.0, 3.75, 0.30),
    ("claude-3-5-sonnet-20240620", 3.0, 15.0, 3.75, 0.30),
    ("claude-3-5-haiku-20241022", 0.80, 4.0, 1.0, 0.08),
    ("claude-3-opus-20240229", 15.0, 75.0, 18.75, 1.50),
    ("claude-3-haiku-20240307", 0.25, 1.25, 0.30, 0.03),
];

pub(crate) fn default_anthropic_pricing() -> PricingTable {
    ANTHROPIC_LIST_PRICES
        .iter()
        .map(|&(model, input, output, cache_create, cache_read)| {
            (
                model.to_string(),
                RateSet::per_million(input, output, cache_create, cache_read),
            )
        })
        .collect()
}

/// Vertex AI global endpoints bill at the Anthropic list price.
pub(crate) fn vertex_ai_pricing() -> PricingTable {
    default_anthropic_pricing()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn vertex_ai_has_same_models_as_anthropic() {
        let anthropic: Vec<_> = default_anthropic_pricing().into_keys().collect();
        let vertex: Vec<_> = vertex_ai_pricing().into_keys().collect();
        assert_eq!(anthropic, vertex);
    }

    #[test]
    fn vertex_ai_rates_match_anthropic() {
        let anthropic = default_anthropic_pricing();
        let vertex = vertex_ai_pricing();
        for (model, rates) in &anthropic {
            assert_eq!(vertex[model], *rates, "rates differ for {model}");
        }
    }

    #[test]
    fn vertex_ai_sonnet_matches_list_price() {
        let sonnet = vertex_ai_pricing()["claude-3-5-sonnet-20241022"];
        assert_eq!(sonnet.input_cost_per_token, 3.0 / 1_000_000.0);
        assert_eq!(sonnet.output_cost_per_token, 15.0 / 1_000_000.0);
        assert_eq!(sonnet.cache_creation_cost_per_token, 3.75 / 1_000_000.0);
        assert_eq!(sonnet.cache_read_cost_per_token, 0.30 / 1_000_000.0);
    }

    #[test]
    fn all_rates_are_positive() {
        for (model, rates) in default_anthropic_pricing() {
            assert!(rates.input_cost_per_token > 0.0, "{model}");
            assert!(rates.output_cost_per_token > 0.0, "{model}");
            assert!(rates.cache_creation_cost_per_token > 0.0, "{model}");
            assert!(rates.cache_read_cost_per_token > 0.0, "{model}");
        }
    }

    #[test]
    fn no_duplicate_models() {
        assert_eq!(default_anthropic_pricing().len(), ANTHROPIC_LIST_PRICES.len());
    }
}
