use std::fmt;

/// API backend whose pricing table applies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) enum Provider {
    Anthropic,
    VertexAi,
    VertexAiRegional,
    /// Anything unrecognized; priced like Anthropic
    #[default]
    Default,
}

/// Markup applied to Vertex AI base rates for regional endpoints
pub(crate) const REGIONAL_PREMIUM: f64 = 1.10;

impl Provider {
    pub(crate) const ALL: [Provider; 4] = [
        Provider::Anthropic,
        Provider::VertexAi,
        Provider::VertexAiRegional,
        Provider::Default,
    ];

    /// Parse a provider name. Unknown names map to `Default`, never an error.
    pub(crate) fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "anthropic" => Provider::Anthropic,
            "vertex_ai" | "vertex" => Provider::VertexAi,
            "vertex_ai_regional" => Provider::VertexAiRegional,
            _ => Provider::Default,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::VertexAi => "vertex_ai",
            Provider::VertexAiRegional => "vertex_ai_regional",
            Provider::Default => "default",
        }
    }

    /// Key used in the on-disk cache. `Default` shares the Anthropic entry.
    pub(crate) fn cache_key(self) -> &'static str {
        match self {
            Provider::Default => Provider::Anthropic.as_str(),
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_providers() {
        assert_eq!(Provider::parse("anthropic"), Provider::Anthropic);
        assert_eq!(Provider::parse("vertex_ai"), Provider::VertexAi);
        assert_eq!(Provider::parse("vertex_ai_regional"), Provider::VertexAiRegional);
    }

    #[test]
    fn parse_is_case_and_separator_insensitive() {
        assert_eq!(Provider::parse("  Anthropic "), Provider::Anthropic);
        assert_eq!(Provider::parse("Vertex-AI"), Provider::VertexAi);
        assert_eq!(Provider::parse("VERTEX_AI_REGIONAL"), Provider::VertexAiRegional);
    }

    #[test]
    fn parse_unknown_maps_to_default() {
        assert_eq!(Provider::parse("invalid"), Provider::Default);
        assert_eq!(Provider::parse(""), Provider::Default);
        assert_eq!(Provider::parse("bedrock"), Provider::Default);
    }

    #[test]
    fn default_shares_anthropic_cache_key() {
        assert_eq!(Provider::Default.cache_key(), "anthropic");
        assert_eq!(Provider::VertexAi.cache_key(), "vertex_ai");
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for provider in Provider::ALL {
            if provider != Provider::Default {
                assert_eq!(Provider::parse(provider.as_str()), provider);
            }
        }
    }
}
