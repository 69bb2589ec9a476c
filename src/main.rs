//! iplstats - IPL league statistics, charts and reports
//!
//! Loads the ball-by-ball and match-level IPL CSV files, aggregates league
//! statistics, renders SVG charts and writes Markdown and plain-text reports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing file, malformed data, failed write, etc.)
//!   2 - `--strict` and at least one analysis warning was raised

mod analysis;
mod chart;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod output;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use loader::Dataset;
use pipeline::{Pipeline, PipelineOptions};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("iplstats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .iplstats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to change data paths, chart sizes and the featured player.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the pipeline. Returns the exit code (0 or 2).
fn run(args: &Args) -> Result<i32> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);
    config.validate().context("Invalid configuration")?;

    let options = PipelineOptions::from_config(&config, !args.quiet);

    if args.dry_run {
        let dataset = options.loader().load().context("Failed to load input data")?;
        print_dry_run(&dataset);
        return Ok(0);
    }

    let ctx = Pipeline::new(options).run()?;

    if !args.quiet {
        println!("\nSummary:");
        println!("   Matches: {}", ctx.summary.overview.total_matches);
        println!("   Deliveries: {}", ctx.summary.overview.total_deliveries);
        let orphans = ctx.dataset.report.orphan_deliveries;
        if orphans > 0 {
            println!("   Excluded deliveries (unknown match): {}", orphans);
        }
        println!("   Charts: {}", ctx.charts.len());
        for path in ctx.reports.all() {
            println!("   Report: {}", path.display());
        }
        if !ctx.warnings().is_empty() {
            println!("   Warnings: {}", ctx.warnings().len());
        }
    }

    if args.strict && ctx.summary.has_warnings() {
        eprintln!(
            "\n{} analysis warning(s) raised with --strict. Failing (exit code 2).",
            ctx.warnings().len()
        );
        return Ok(2);
    }

    Ok(0)
}

/// Handle --dry-run: print the loaded tables, write nothing.
fn print_dry_run(dataset: &Dataset) {
    let report = &dataset.report;
    println!("\nDry run: data loaded and validated, nothing written.\n");

    for stats in [&report.matches, &report.deliveries] {
        println!(
            "   {}: {} rows read, {} kept, {} dropped, {} columns",
            stats.file, stats.rows_read, stats.rows_kept, stats.rows_dropped, stats.columns
        );
        for (column, count) in stats.columns_with_gaps() {
            println!("     {}: {} missing", column, count);
        }
    }
    if report.orphan_deliveries > 0 {
        println!(
            "   {} deliveries reference unknown matches and were excluded",
            report.orphan_deliveries
        );
    }

    let (matches, deliveries) = dataset.sample(5);
    println!("\n   First {} matches:", matches.len());
    for m in matches {
        let result = match (m.winner.as_deref(), m.margin()) {
            (Some(winner), Some(margin)) => format!("{} by {} ({})", winner, margin, m.method),
            (Some(winner), None) => format!("{} ({})", winner, m.method),
            (None, _) => "no result".to_string(),
        };
        println!(
            "     #{} {} {} vs {} at {} -> {}",
            m.id, m.season, m.team1, m.team2, m.venue, result
        );
    }
    println!("\n   First {} deliveries:", deliveries.len());
    for d in deliveries {
        println!(
            "     match {} inning {} over {}.{}: {} to {}, {} runs",
            d.match_id, d.inning, d.over, d.ball, d.bowler, d.batsman, d.total_runs
        );
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
