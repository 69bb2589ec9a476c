//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.iplstats.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".iplstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input file locations.
    #[serde(default)]
    pub data: DataConfig,

    /// Output directory and artifacts.
    #[serde(default)]
    pub output: OutputConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report text settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Chart image settings.
    #[serde(default)]
    pub charts: ChartsConfig,
}

/// Input file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding `matches.csv` and `deliveries.csv`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Explicit matches file; overrides `data_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches_file: Option<String>,

    /// Explicit deliveries file; overrides `data_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliveries_file: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            matches_file: None,
            deliveries_file: None,
        }
    }
}

impl DataConfig {
    pub fn matches_path(&self) -> PathBuf {
        match &self.matches_file {
            Some(file) => PathBuf::from(file),
            None => Path::new(&self.data_dir).join("matches.csv"),
        }
    }

    pub fn deliveries_path(&self) -> PathBuf {
        match &self.deliveries_file {
            Some(file) => PathBuf::from(file),
            None => Path::new(&self.data_dir).join("deliveries.csv"),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for charts and reports.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Also write the summary as JSON.
    #[serde(default)]
    pub export_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            export_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "output".to_string()
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Rows kept in the player rankings.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Cities shown in the matches-per-city chart.
    #[serde(default = "default_city_chart_limit")]
    pub city_chart_limit: usize,

    /// Rows shown in team and venue ranking charts.
    #[serde(default = "default_ranking_chart_limit")]
    pub ranking_chart_limit: usize,

    /// Batsman profiled in the career report.
    #[serde(default = "default_featured_player")]
    pub featured_player: String,

    /// Write the featured-player career report.
    #[serde(default = "default_true")]
    pub player_report: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            city_chart_limit: default_city_chart_limit(),
            ranking_chart_limit: default_ranking_chart_limit(),
            featured_player: default_featured_player(),
            player_report: true,
        }
    }
}

fn default_top_n() -> usize {
    10
}

fn default_city_chart_limit() -> usize {
    20
}

fn default_ranking_chart_limit() -> usize {
    10
}

fn default_featured_player() -> String {
    "RG Sharma".to_string()
}

fn default_true() -> bool {
    true
}

/// Report text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_subtitle")]
    pub subtitle: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
        }
    }
}

fn default_title() -> String {
    "IPL Data Analysis Report".to_string()
}

fn default_subtitle() -> String {
    "Sponsorship & Marketing Insights".to_string()
}

/// Chart image settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    800
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments (and their environment variables) take precedence over
    /// config file settings. Only values the user actually supplied override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.data_dir {
            self.data.data_dir = dir.display().to_string();
            // A directory from the command line replaces file paths from the config
            self.data.matches_file = None;
            self.data.deliveries_file = None;
        }
        if let Some(ref file) = args.matches {
            self.data.matches_file = Some(file.display().to_string());
        }
        if let Some(ref file) = args.deliveries {
            self.data.deliveries_file = Some(file.display().to_string());
        }
        if let Some(ref dir) = args.output_dir {
            self.output.dir = dir.display().to_string();
        }
        if let Some(top_n) = args.top_n {
            self.analysis.top_n = top_n;
        }
        if let Some(ref player) = args.player {
            self.analysis.featured_player = player.clone();
        }

        // Flags only ever switch behavior on (or the player report off)
        if args.no_player_report {
            self.analysis.player_report = false;
        }
        if args.json {
            self.output.export_json = true;
        }
    }

    /// Check values that would make the run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.top_n == 0 {
            bail!("analysis.top_n must be at least 1");
        }
        if self.analysis.city_chart_limit == 0 || self.analysis.ranking_chart_limit == 0 {
            bail!("chart limits must be at least 1");
        }
        if self.charts.width < 200 || self.charts.height < 200 {
            bail!(
                "chart size {}x{} is too small (minimum 200x200)",
                self.charts.width,
                self.charts.height
            );
        }
        Ok(())
    }

    /// Featured player to profile, if the career report is enabled.
    pub fn featured_player(&self) -> Option<&str> {
        let name = self.analysis.featured_player.trim();
        if self.analysis.player_report && !name.is_empty() {
            Some(name)
        } else {
            None
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.matches_path(), PathBuf::from("data/matches.csv"));
        assert_eq!(config.output.dir, "output");
        assert_eq!(config.analysis.top_n, 10);
        assert_eq!(config.featured_player(), Some("RG Sharma"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[data]
data_dir = "ipl"
deliveries_file = "/tmp/balls.csv"

[analysis]
top_n = 5
featured_player = "V Kohli"

[charts]
width = 800
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.data.matches_path(), PathBuf::from("ipl/matches.csv"));
        assert_eq!(config.data.deliveries_path(), PathBuf::from("/tmp/balls.csv"));
        assert_eq!(config.analysis.top_n, 5);
        assert_eq!(config.analysis.city_chart_limit, 20);
        assert_eq!(config.featured_player(), Some("V Kohli"));
        assert_eq!(config.charts.width, 800);
        assert_eq!(config.charts.height, 800);
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config: Config = toml::from_str("[output]\ndir = \"reports\"\n").unwrap();
        let args = make_args(&[
            "iplstats",
            "--data-dir",
            "season_data",
            "--top-n",
            "3",
            "--no-player-report",
            "--json",
        ]);

        config.merge_with_args(&args);
        assert_eq!(config.data.data_dir, "season_data");
        assert_eq!(config.output.dir, "reports");
        assert_eq!(config.analysis.top_n, 3);
        assert!(config.output.export_json);
        assert_eq!(config.featured_player(), None);
    }

    #[test]
    fn test_cli_data_dir_overrides_config_files() {
        let toml_content = "[data]\nmatches_file = \"old/matches.csv\"\ndeliveries_file = \"old/deliveries.csv\"\n";

        let mut config: Config = toml::from_str(toml_content).unwrap();
        config.merge_with_args(&make_args(&["iplstats", "--data-dir", "new"]));
        assert_eq!(config.data.matches_path(), PathBuf::from("new/matches.csv"));
        assert_eq!(config.data.deliveries_path(), PathBuf::from("new/deliveries.csv"));

        let mut config: Config = toml::from_str(toml_content).unwrap();
        config.merge_with_args(&make_args(&[
            "iplstats",
            "--data-dir",
            "new",
            "--matches",
            "m.csv",
        ]));
        assert_eq!(config.data.matches_path(), PathBuf::from("m.csv"));
        assert_eq!(config.data.deliveries_path(), PathBuf::from("new/deliveries.csv"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.analysis.top_n = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.charts.height = 50;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[analysis]"));
        assert!(toml_str.contains("featured_player = \"RG Sharma\""));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.charts.width, 1200);
    }
}
