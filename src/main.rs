//! ASL-Harvest main entry point
//!
//! This is the command-line interface for the ASL-Harvest course mirror.

use anyhow::Context;
use asl_harvest::config::{load_config_with_hash, Config};
use asl_harvest::crawler::{run_crawl, Coordinator};
use asl_harvest::output::print_report;
use asl_harvest::YtDlpBackend;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// ASL-Harvest: mirror the free StartASL classes to disk
///
/// Crawls the contents page, then saves every unit as a PDF or as a lesson
/// file plus its lesson, phrase and vocabulary videos. Runs with built-in
/// settings when no configuration file is given.
#[derive(Parser, Debug)]
#[command(name = "asl-harvest")]
#[command(version)]
#[command(about = "Mirror the StartASL classes to disk", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Fetch the contents page and show what would be mirrored, without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in settings");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(config).await
    } else {
        handle_crawl(config, cli.quiet).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("asl_harvest=info,warn"),
            1 => EnvFilter::new("asl_harvest=debug,info"),
            2 => EnvFilter::new("asl_harvest=trace,debug"),
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

/// Handles --dry-run: prints the class/unit plan with destination paths
async fn handle_dry_run(config: Config) -> anyhow::Result<()> {
    let backend = Arc::new(YtDlpBackend::new(&config.downloader));
    let coordinator = Coordinator::new(config, backend)?;
    let classes = coordinator
        .fetch_contents()
        .await
        .context("read contents page")?;
    let planner = coordinator.planner();

    println!("=== ASL-Harvest Dry Run ===\n");
    println!("Output root: {}\n", planner.root().display());

    for class in &classes {
        println!("{} ({} units)", class.name, class.units.len());
        for unit in &class.units {
            let destination = if asl_harvest::parse::is_pdf_url(&unit.url) {
                planner.pdf_file(&class.name, &unit.name)
            } else {
                planner.unit_dir(&class.name, &unit.name)
            };
            println!("  - {} -> {}", unit.url, destination.display());
        }
    }

    println!(
        "\n✓ Would process {} units in {} classes",
        classes.iter().map(|c| c.units.len()).sum::<usize>(),
        classes.len()
    );

    Ok(())
}

/// Handles the main crawl operation
///
/// Unit failures are part of the report, so a finished crawl always exits 0.
async fn handle_crawl(config: Config, quiet: bool) -> anyhow::Result<()> {
    tracing::info!("Mirroring {} into {}", config.site.contents_url, config.output.directory);

    let report = run_crawl(config).await.context("crawl failed")?;

    if !quiet {
        print_report(&report);
    }

    Ok(())
}
