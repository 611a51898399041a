mod app;
mod cli;
mod config;
mod data;
mod error;
mod output;
mod pricing;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;

fn init_logging(cli: &Cli) {
    let default_filter = if cli.debug {
        "ccprice=debug"
    } else if cli.json {
        "ccprice=warn"
    } else {
        "ccprice=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let loaded = Config::load();
    let cli = Cli::parse().with_config(&loaded.config);

    init_logging(&cli);
    if let Some(path) = &loaded.path {
        tracing::debug!("Loaded config from {}", path.display());
    }
    for e in &loaded.errors {
        tracing::warn!("{}", e);
    }

    if let Err(e) = app::run(&cli, &loaded.config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
