use chrono::TimeDelta;

use crate::cli::{Cli, Commands, CostArgs};
use crate::config::Config;
use crate::data::load_usage_file;
use crate::error::{AppError, PricingError};
use crate::output::{
    CostRow, ProviderCost, comparison_json, cost_json, cost_report_json, pricing_json,
    print_comparison_table, print_cost_table, print_pricing_table, print_summary_line,
};
use crate::pricing::{
    CostCalculator, DEFAULT_CACHE_TTL_HOURS, LiteLlmFetcher, PricingCache, PricingResolver,
    PricingTable, Provider, ResolvedPricing, TokenUsage,
};

pub(crate) fn build_calculator(cli: &Cli, config: &Config) -> CostCalculator {
    let cache = config
        .cache_path
        .clone()
        .or_else(PricingCache::default_path)
        .map(PricingCache::new);
    let ttl_hours = config
        .cache_ttl_hours
        .filter(|h| *h > 0)
        .unwrap_or(DEFAULT_CACHE_TTL_HOURS);

    let resolver = PricingResolver::new(cache, Box::new(LiteLlmFetcher::default()))
        .with_ttl(TimeDelta::hours(ttl_hours))
        .with_offline(cli.offline);
    CostCalculator::new(resolver, cli.provider())
}

pub(crate) fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let mut calculator = build_calculator(cli, config);
    if let Commands::Cost(args) = &cli.command
        && args.compare
    {
        return handle_compare(cli, &mut calculator, args);
    }

    let pricing = current_pricing(&calculator, cli.refresh);
    match &cli.command {
        Commands::Pricing { model } => handle_pricing(cli, &calculator, &pricing, model.as_deref()),
        Commands::Cost(args) => handle_cost(cli, &calculator, &pricing, args),
    }
}

fn current_pricing(calculator: &CostCalculator, refresh: bool) -> ResolvedPricing {
    if refresh {
        calculator.refresh()
    } else {
        calculator.pricing()
    }
}

fn handle_pricing(
    cli: &Cli,
    calculator: &CostCalculator,
    pricing: &ResolvedPricing,
    model: Option<&str>,
) -> Result<(), AppError> {
    let rows = match model {
        Some(model) => {
            let (key, rates) = calculator.rates_for(model)?;
            if key != model {
                tracing::info!("Matched \"{}\" to {}", model, key);
            }
            PricingTable::from([(key, rates)])
        }
        None => pricing.table.clone(),
    };

    if cli.json {
        println!("{}", pricing_json(pricing, &rows)?);
    } else {
        print_pricing_table(pricing, &rows, cli.use_color());
    }
    Ok(())
}

fn handle_cost(
    cli: &Cli,
    calculator: &CostCalculator,
    pricing: &ResolvedPricing,
    args: &CostArgs,
) -> Result<(), AppError> {
    if let Some(path) = &args.file {
        let summary = load_usage_file(path)?;
        if summary.models.is_empty() {
            println!("No usage records found in {}.", path.display());
            return Ok(());
        }

        let rows: Vec<CostRow<'_>> = summary
            .models
            .iter()
            .map(|(model, usage)| CostRow {
                model,
                usage: *usage,
                cost: match calculator.calculate(usage, model) {
                    Ok(cost) => Some(cost),
                    Err(e) => {
                        tracing::warn!("{}", e);
                        None
                    }
                },
            })
            .collect();

        if cli.json {
            println!(
                "{}",
                cost_report_json(&rows, pricing, summary.valid, summary.skipped)?
            );
        } else {
            print_cost_table(&rows, pricing, cli.use_color());
            print_summary_line(summary.valid, summary.skipped);
        }
        return Ok(());
    }

    // clap guarantees a model when no file is given
    let model = args.model.as_deref().unwrap_or_default();
    let usage = args.usage();
    let row = CostRow {
        model,
        usage,
        cost: Some(calculator.calculate(&usage, model)?),
    };

    if cli.json {
        println!("{}", cost_json(&row, pricing)?);
    } else {
        print_cost_table(std::slice::from_ref(&row), pricing, cli.use_color());
    }
    Ok(())
}

/// Same usage priced under each concrete provider
fn handle_compare(
    cli: &Cli,
    calculator: &mut CostCalculator,
    args: &CostArgs,
) -> Result<(), AppError> {
    let model = args.model.as_deref().unwrap_or_default();
    let usage = args.usage();
    let results = compare_providers(calculator, &usage, model, cli.refresh)?;

    if cli.json {
        println!("{}", comparison_json(model, &usage, &results)?);
    } else {
        print_comparison_table(model, &results, cli.use_color());
    }
    Ok(())
}

fn compare_providers(
    calculator: &mut CostCalculator,
    usage: &TokenUsage,
    model: &str,
    refresh: bool,
) -> Result<Vec<ProviderCost>, PricingError> {
    let mut results = Vec::new();
    for provider in Provider::ALL {
        if provider == Provider::Default {
            continue;
        }
        calculator.set_provider(provider);
        let pricing = current_pricing(calculator, refresh);
        let cost = calculator.calculate(usage, model)?;
        results.push(ProviderCost {
            provider,
            source: pricing.source,
            cost,
        });
    }
    Ok(results)
}
