mod format;
mod json;
mod table;

use crate::pricing::{CostBreakdown, PricingSource, Provider, TokenUsage};

pub(crate) use json::{comparison_json, cost_json, cost_report_json, pricing_json};
pub(crate) use table::{
    print_comparison_table, print_cost_table, print_pricing_table, print_summary_line,
};

/// One priced model; `cost` is `None` when the model has no pricing
#[derive(Debug, Clone)]
pub(crate) struct CostRow<'a> {
    pub(crate) model: &'a str,
    pub(crate) usage: TokenUsage,
    pub(crate) cost: Option<CostBreakdown>,
}

/// Cost of one usage record under one provider
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProviderCost {
    pub(crate) provider: Provider,
    pub(crate) source: PricingSource,
    pub(crate) cost: CostBreakdown,
}

/// Sum of all priced rows
pub(crate) fn total_cost(rows: &[CostRow<'_>]) -> CostBreakdown {
    rows.iter().filter_map(|r| r.cost).sum()
}
