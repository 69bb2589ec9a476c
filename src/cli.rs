//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// iplstats - IPL league statistics, charts and reports
///
/// Reads matches.csv and deliveries.csv, computes league statistics,
/// renders SVG charts and writes Markdown and plain-text reports.
///
/// Examples:
///   iplstats
///   iplstats --data-dir ./ipl --output-dir ./out --json
///   iplstats --player "V Kohli" --top-n 15
///   iplstats --dry-run
///   iplstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing matches.csv and deliveries.csv
    ///
    /// Defaults to "data" (or the [data] section of .iplstats.toml).
    #[arg(long, value_name = "DIR", env = "IPLSTATS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to the matches file (overrides --data-dir)
    #[arg(long, value_name = "FILE", env = "IPLSTATS_MATCHES")]
    pub matches: Option<PathBuf>,

    /// Path to the deliveries file (overrides --data-dir)
    #[arg(long, value_name = "FILE", env = "IPLSTATS_DELIVERIES")]
    pub deliveries: Option<PathBuf>,

    /// Directory for charts and reports
    ///
    /// Defaults to "output". Created if it does not exist.
    #[arg(short, long, value_name = "DIR", env = "IPLSTATS_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .iplstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of players kept in the Man of the Match and six-hitter rankings
    #[arg(long, value_name = "N")]
    pub top_n: Option<usize>,

    /// Batsman to profile in the career report
    #[arg(long, value_name = "NAME")]
    pub player: Option<String>,

    /// Skip the featured-player career report
    #[arg(long)]
    pub no_player_report: bool,

    /// Also export the computed statistics as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with code 2 if any table came out empty or the player was not found
    #[arg(long)]
    pub strict: bool,

    /// Dry run: load and validate the data, print an overview, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .iplstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no progress bar)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.top_n == Some(0) {
            return Err("--top-n must be at least 1".to_string());
        }

        if let Some(ref player) = self.player {
            if player.trim().is_empty() {
                return Err("--player must not be empty".to_string());
            }
            if self.no_player_report {
                return Err("Cannot use both --player and --no-player-report".to_string());
            }
        }

        let explicit_files = self.matches.is_some() && self.deliveries.is_some();
        if let Some(ref dir) = self.data_dir {
            if !explicit_files && !dir.is_dir() {
                return Err(format!("Data directory does not exist: {}", dir.display()));
            }
        }

        if let Some(ref config) = self.config {
            if !config.is_file() {
                return Err(format!("Config file does not exist: {}", config.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
