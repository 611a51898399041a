use comfy_table::{Cell, Color};

use crate::pricing::{PricingTable, ResolvedPricing, TokenUsage};

use super::format::{
    create_styled_table, format_cost, format_number, format_rate, header_cell, right_cell,
};
use super::{CostRow, ProviderCost, total_cost};

fn source_line(pricing: &ResolvedPricing, use_color: bool) -> String {
    let text = format!(
        "provider: {} | source: {} | as of {}",
        pricing.provider,
        pricing.source.as_str(),
        pricing.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    if use_color {
        format!("\x1b[36m{text}\x1b[0m")
    } else {
        text
    }
}

/// Per-model rates in dollars per million tokens
pub(crate) fn print_pricing_table(
    pricing: &ResolvedPricing,
    rows: &PricingTable,
    use_color: bool,
) {
    let c = use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Model", c),
        header_cell("Input/M", c),
        header_cell("Output/M", c),
        header_cell("Cache W/M", c),
        header_cell("Cache R/M", c),
    ]);

    for (model, rates) in rows {
        table.add_row(vec![
            Cell::new(model),
            right_cell(&format_rate(rates.input_cost_per_token), None, false),
            right_cell(&format_rate(rates.output_cost_per_token), None, false),
            right_cell(&format_rate(rates.cache_creation_cost_per_token), None, false),
            right_cell(&format_rate(rates.cache_read_cost_per_token), None, false),
        ]);
    }

    println!("\n  Pricing\n");
    println!("{table}");
    println!("\n  {}\n", source_line(pricing, use_color));
}

pub(crate) fn print_cost_table(rows: &[CostRow<'_>], pricing: &ResolvedPricing, use_color: bool) {
    let c = use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Model", c),
        header_cell("Input", c),
        header_cell("Output", c),
        header_cell("Cache W", c),
        header_cell("Cache R", c),
        header_cell("Input $", c),
        header_cell("Output $", c),
        header_cell("Cache W $", c),
        header_cell("Cache R $", c),
        header_cell("Total", c),
    ]);

    let missing = if c { Some(Color::Yellow) } else { None };
    let mut usage_total = TokenUsage::default();
    for row in rows {
        usage_total.add(&row.usage);
        let mut cells = vec![
            Cell::new(row.model),
            right_cell(&format_number(row.usage.input), None, false),
            right_cell(&format_number(row.usage.output), None, false),
            right_cell(&format_number(row.usage.cache_creation), None, false),
            right_cell(&format_number(row.usage.cache_read), None, false),
        ];
        match row.cost {
            Some(cost) => cells.extend([
                right_cell(&format_cost(cost.input_cost), None, false),
                right_cell(&format_cost(cost.output_cost), None, false),
                right_cell(&format_cost(cost.cache_creation_cost), None, false),
                right_cell(&format_cost(cost.cache_read_cost), None, false),
                right_cell(&format_cost(cost.total_cost), None, true),
            ]),
            None => cells.extend((0..5).map(|_| right_cell(&format_cost(f64::NAN), missing, false))),
        }
        table.add_row(cells);
    }

    if rows.len() > 1 {
        let total = total_cost(rows);
        let accent = if c { Some(Color::Green) } else { None };
        table.add_row(vec![
            Cell::new("TOTAL"),
            right_cell(&format_number(usage_total.input), accent, true),
            right_cell(&format_number(usage_total.output), accent, true),
            right_cell(&format_number(usage_total.cache_creation), accent, true),
            right_cell(&format_number(usage_total.cache_read), accent, true),
            right_cell(&format_cost(total.input_cost), accent, true),
            right_cell(&format_cost(total.output_cost), accent, true),
            right_cell(&format_cost(total.cache_creation_cost), accent, true),
            right_cell(&format_cost(total.cache_read_cost), accent, true),
            right_cell(&format_cost(total.total_cost), accent, true),
        ]);
    }

    println!("\n  Cost\n");
    println!("{table}");
    println!("\n  {}\n", source_line(pricing, use_color));
}

/// Line counts for usage-file reports
pub(crate) fn print_summary_line(valid: usize, skipped: usize) {
    println!(
        "  {} usage records ({} lines skipped)\n",
        format_number(valid as u64),
        format_number(skipped as u64)
    );
}

pub(crate) fn print_comparison_table(model: &str, results: &[ProviderCost], use_color: bool) {
    let c = use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Provider", c),
        header_cell("Source", c),
        header_cell("Input $", c),
        header_cell("Output $", c),
        header_cell("Cache W $", c),
        header_cell("Cache R $", c),
        header_cell("Total", c),
    ]);

    for r in results {
        table.add_row(vec![
            Cell::new(r.provider),
            Cell::new(r.source.as_str()),
            right_cell(&format_cost(r.cost.input_cost), None, false),
            right_cell(&format_cost(r.cost.output_cost), None, false),
            right_cell(&format_cost(r.cost.cache_creation_cost), None, false),
            right_cell(&format_cost(r.cost.cache_read_cost), None, false),
            right_cell(&format_cost(r.cost.total_cost), None, true),
        ]);
    }

    println!("\n  Cost by provider: {model}\n");
    println!("{table}");
}
