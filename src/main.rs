//! Search-Quest main entry point
//!
//! This is the command-line interface for the Search-Quest runner.

use anyhow::Context;
use clap::Parser;
use search_quest::config::{load_config_with_hash, Config};
use search_quest::driver::{Driver, PassOutcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Search-Quest: an automated daily search quest runner
///
/// Search-Quest issues paced desktop and mobile searches until the daily
/// search quests report complete, rotating identities when searches stop
/// being credited.
#[derive(Parser, Debug)]
#[command(name = "search-quest")]
#[command(version = "1.0.0")]
#[command(about = "An automated daily search quest runner", long_about = None)]
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

    /// Run a single pass and exit instead of repeating on the interval
    #[arg(long, conflicts_with = "dry_run")]
    once: bool,

    /// Validate config and show what would run without sending any request
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let mut driver = Driver::from_config(&config).context("failed to set up driver")?;

    if cli.once {
        match driver.run_once().await {
            PassOutcome::Skipped => tracing::warn!("Pass skipped"),
            PassOutcome::Finished(indicator) => {
                tracing::info!("Pass finished with status {}", indicator)
            }
        }
        return Ok(());
    }

    tracing::info!(
        "Running every {} minutes, first pass in {}ms",
        config.driver.interval_minutes,
        config.driver.startup_delay_ms
    );
    driver.run().await.context("driver stopped")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("search_quest=info,warn"),
            1 => EnvFilter::new("search_quest=debug,info"),
            2 => EnvFilter::new("search_quest=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Search-Quest Dry Run ===\n");

    println!("Search:");
    println!("  Base URL: {}", config.search.base_url);
    println!(
        "  Delay between searches: {}-{}ms",
        config.search.min_delay_ms, config.search.max_delay_ms
    );

    println!("\nIdentity:");
    println!(
        "  Desktop: {}",
        config
            .identity
            .desktop_override
            .as_deref()
            .unwrap_or(&config.identity.desktop_user_agent)
    );
    println!(
        "  Mobile: {}",
        config
            .identity
            .mobile_override
            .as_deref()
            .unwrap_or(&config.identity.mobile_user_agent)
    );
    println!(
        "  Rotation source: {}",
        config
            .identity
            .updated_source_url
            .as_deref()
            .unwrap_or("(none, rotation disabled)")
    );

    println!("\nStatus:");
    println!("  Endpoint: {}", config.status.endpoint);
    println!("  Points per search: {}", config.status.points_per_search);

    println!("\nTrends:");
    println!("  Inline words: {}", config.trends.words.len());
    if let Some(file) = &config.trends.words_file {
        println!("  Words file: {}", file);
    }

    println!("\nDriver:");
    println!("  Interval: {} minutes", config.driver.interval_minutes);
    println!("  Offline retry: {}s", config.driver.online_wait_secs);

    println!("\n✓ Configuration is valid");
}
