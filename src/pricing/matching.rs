use super::types::{PricingTable, RateSet};

/// Strip cloud-routing prefixes and revision suffixes so that
/// "vertex_ai/claude-3-5-sonnet-v2@20241022" and
/// "anthropic.claude-3-5-sonnet-20241022-v2:0" both land on
/// "claude-3-5-sonnet-20241022".
pub(super) fn normalize_model(model: &str) -> String {
    let mut name = model.trim();
    for prefix in ["anthropic/", "vertex_ai/", "anthropic."] {
        if let Some(stripped) = name.strip_prefix(prefix) {
            name = stripped;
        }
    }

    // Bedrock ":0" revisions
    if let Some(idx) = name.find(':') {
        name = &name[..idx];
    }

    let normalized = match name.split_once('@') {
        Some((base, date)) => format!("{}-{}", strip_version_suffix(base), date),
        None => strip_version_suffix(name).to_string(),
    };
    normalized.to_lowercase()
}

/// "claude-3-5-sonnet-20241022-v2" -> "claude-3-5-sonnet-20241022"
fn strip_version_suffix(name: &str) -> &str {
    if let Some(idx) = name.rfind("-v") {
        let digits = &name[idx + 2..];
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return &name[..idx];
        }
    }
    name
}

/// Model families a partial match must agree on
const MODEL_FAMILIES: [&str; 3] = ["opus", "sonnet", "haiku"];

fn model_family(name: &str) -> Option<&'static str> {
    MODEL_FAMILIES
        .into_iter()
        .find(|family| name.split('-').any(|part| part == *family))
}

/// Find the table entry for `model`: exact key, normalized key, `claude-`
/// prefixed key, then the longest key of the same family that contains or is
/// contained in the model name. Returns the matched key with its rates.
pub(crate) fn lookup_rates<'a>(model: &str, table: &'a PricingTable) -> Option<(&'a str, RateSet)> {
    if model.trim().is_empty() {
        return None;
    }

    if let Some((key, rates)) = table.get_key_value(model) {
        return Some((key.as_str(), *rates));
    }

    let normalized = normalize_model(model);
    if normalized.is_empty() {
        return None;
    }
    if let Some((key, rates)) = table.get_key_value(&normalized) {
        return Some((key.as_str(), *rates));
    }

    let with_prefix = format!("claude-{normalized}");
    if let Some((key, rates)) = table.get_key_value(&with_prefix) {
        return Some((key.as_str(), *rates));
    }

    // Partial matches only for Claude names that name a family
    if !normalized.starts_with("claude-") {
        return None;
    }
    let family = model_family(&normalized)?;

    let mut candidates: Vec<(&String, &RateSet)> = table
        .iter()
        .filter(|(name, _)| {
            let name_lower = name.to_lowercase();
            model_family(&name_lower) == Some(family)
                && (name_lower.contains(&normalized) || normalized.contains(&name_lower))
        })
        .collect();
    // Longest key first; newest snapshot wins a tie
    candidates.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| b.cmp(a)));

    candidates.first().map(|(name, rates)| (name.as_str(), **rates))
}
