//! Pantry-Harvest main entry point
//!
//! This is the command-line interface for the recipe harvester.

use anyhow::Context;
use clap::Parser;
use pantry_harvest::config::{load_config_with_hash, validate, Config};
use pantry_harvest::crawler::{page_url, Coordinator};
use pantry_harvest::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pantry-Harvest: a polite recipe harvester
///
/// Walks a paginated recipe listing, extracts title, ingredients and steps
/// from each recipe page, and writes the complete recipes to a CSV dataset.
#[derive(Parser, Debug)]
#[command(name = "pantry-harvest")]
#[command(version)]
#[command(about = "A polite recipe harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the number of recipes to harvest
    #[arg(short, long, value_name = "COUNT")]
    target: Option<usize>,

    /// Override the dataset output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Validate config and show the harvest plan without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(target) = cli.target {
        config.crawler.target_count = target;
    }
    if let Some(output) = cli.output {
        config.output.dataset_path = output;
    }
    validate(&config).context("Invalid command-line override")?;

    if cli.dry_run {
        print_plan(&config)?;
        return Ok(());
    }

    let coordinator = Coordinator::new(config)?.with_config_hash(config_hash);
    match coordinator.run().await {
        Ok(report) => {
            tracing::info!("Harvest completed successfully");
            if !cli.quiet {
                print_report(&report);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pantry_harvest=info,warn"),
            1 => EnvFilter::new("pantry_harvest=debug,info"),
            2 => EnvFilter::new("pantry_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: shows what a run would do
fn print_plan(config: &Config) -> anyhow::Result<()> {
    let crawler = &config.crawler;
    let selectors = &config.selectors;

    println!("=== Pantry-Harvest Dry Run ===\n");

    println!("Listing:");
    println!("  URL: {}", crawler.listing_url);
    println!("  Links resolved against: {}", crawler.base_url()?);
    println!("  Page 2: {}", page_url(&crawler.listing_url, 2));
    println!("  Max pages: {}", crawler.max_pages);
    println!("  Page delay: {}ms", crawler.page_delay_ms);

    println!("\nHarvest:");
    println!("  Target recipes: {}", crawler.target_count);
    println!("  Request delay: {}ms", crawler.request_delay_ms);
    println!(
        "  Retries: {} (backoff {}ms)",
        crawler.max_retries, crawler.retry_backoff_ms
    );
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nSelectors:");
    println!(
        "  Links: {} (marker '{}')",
        selectors.links.len(),
        selectors.link_marker
    );
    println!("  Title: {}", selectors.title.join(", "));
    println!(
        "  Ingredients: {} + fallback {:?}",
        selectors.ingredients.len(),
        selectors.ingredient_fallback
    );
    println!(
        "  Steps: {} + fallback {:?}",
        selectors.steps.len(),
        selectors.step_fallback
    );

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path);
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
