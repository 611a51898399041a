use serde_json::{Value, json};

use crate::pricing::{CostBreakdown, PricingTable, ResolvedPricing, TokenUsage};

use super::format::cost_json_value;
use super::{CostRow, ProviderCost, total_cost};

fn usage_json(usage: &TokenUsage) -> Value {
    json!({
        "input_tokens": usage.input,
        "output_tokens": usage.output,
        "cache_creation_tokens": usage.cache_creation,
        "cache_read_tokens": usage.cache_read,
        "total_tokens": usage.total(),
    })
}

fn breakdown_json(cost: Option<CostBreakdown>) -> Value {
    let nan = f64::NAN;
    let c = |f: fn(&CostBreakdown) -> f64| cost_json_value(cost.as_ref().map_or(nan, f));
    json!({
        "input_cost": c(|b| b.input_cost),
        "output_cost": c(|b| b.output_cost),
        "cache_creation_cost": c(|b| b.cache_creation_cost),
        "cache_read_cost": c(|b| b.cache_read_cost),
        "total_cost": c(|b| b.total_cost),
    })
}

fn with_source(mut body: Value, pricing: &ResolvedPricing) -> Value {
    if let Some(obj) = body.as_object_mut() {
        obj.insert("provider".into(), json!(pricing.provider.as_str()));
        obj.insert("source".into(), json!(pricing.source));
        obj.insert("timestamp".into(), json!(pricing.timestamp.to_rfc3339()));
    }
    body
}

pub(crate) fn pricing_json(pricing: &ResolvedPricing, rows: &PricingTable) -> Result<String, serde_json::Error> {
    let body = with_source(json!({ "pricing": rows }), pricing);
    serde_json::to_string_pretty(&body)
}

/// Flat breakdown for a single model
pub(crate) fn cost_json(row: &CostRow<'_>, pricing: &ResolvedPricing) -> Result<String, serde_json::Error> {
    let mut body = breakdown_json(row.cost);
    if let Some(obj) = body.as_object_mut() {
        obj.insert("model".into(), json!(row.model));
        obj.insert("usage".into(), usage_json(&row.usage));
    }
    serde_json::to_string_pretty(&with_source(body, pricing))
}

/// Per-model breakdowns plus the total of every priced model
pub(crate) fn cost_report_json(
    rows: &[CostRow<'_>],
    pricing: &ResolvedPricing,
    valid: usize,
    skipped: usize,
) -> Result<String, serde_json::Error> {
    let models: Vec<Value> = rows
        .iter()
        .map(|row| {
            let mut entry = breakdown_json(row.cost);
            if let Some(obj) = entry.as_object_mut() {
                obj.insert("model".into(), json!(row.model));
                obj.insert("usage".into(), usage_json(&row.usage));
            }
            entry
        })
        .collect();

    let body = json!({
        "models": models,
        "total": breakdown_json(Some(total_cost(rows))),
        "valid": valid,
        "skipped": skipped,
    });
    serde_json::to_string_pretty(&with_source(body, pricing))
}

pub(crate) fn comparison_json(
    model: &str,
    usage: &TokenUsage,
    results: &[ProviderCost],
) -> Result<String, serde_json::Error> {
    let providers: Vec<Value> = results
        .iter()
        .map(|r| {
            let mut entry = breakdown_json(Some(r.cost));
            if let Some(obj) = entry.as_object_mut() {
                obj.insert("provider".into(), json!(r.provider.as_str()));
                obj.insert("source".into(), json!(r.source));
            }
            entry
        })
        .collect();

    serde_json::to_string_pretty(&json!({
        "model": model,
        "usage": usage_json(usage),
        "providers": providers,
    }))
}
