//! Report assembly.
//!
//! Builds the Markdown document (`generator`), the plain-text document
//! (`text`), the featured-player documents (`player`) and the optional JSON
//! export. Both league documents draw their facts from the helpers here so
//! they always cover the same content in the same order.

pub mod generator;
pub mod player;
pub mod text;

use crate::analysis::LeagueSummary;
use crate::chart::{ChartLimits, ChartSet};
use crate::error::OutputError;
use crate::models::AggregateTable;
use crate::output::write_new;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

/// Section headings after the title, in document order.
pub const SECTIONS: [&str; 8] = [
    "Executive Summary",
    "Data Overview",
    "Match Analysis",
    "Team Performance",
    "Player Analysis",
    "Venue Analysis",
    "Data Quality Notes",
    "Business Insights & Recommendations",
];

/// Everything a report needs besides the output directory.
pub struct ReportContext<'a> {
    pub summary: &'a LeagueSummary,
    pub charts: &'a ChartSet,
    pub title: &'a str,
    pub subtitle: &'a str,
    pub limits: ChartLimits,
    pub generated_at: DateTime<Local>,
}

impl ReportContext<'_> {
    pub fn generated_on(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Filename timestamp, `YYYYmmdd_HHMMSS`.
    pub fn stamp(&self) -> String {
        self.generated_at.format("%Y%m%d_%H%M%S").to_string()
    }
}

/// Paths of the files written by `write_reports`.
#[derive(Debug, Clone, Default)]
pub struct WrittenReports {
    pub markdown: PathBuf,
    pub text: PathBuf,
    pub json: Option<PathBuf>,
    pub player_markdown: Option<PathBuf>,
    pub player_text: Option<PathBuf>,
}

impl WrittenReports {
    pub fn all(&self) -> Vec<&Path> {
        let mut paths = vec![self.markdown.as_path(), self.text.as_path()];
        paths.extend(self.json.as_deref());
        paths.extend(self.player_markdown.as_deref());
        paths.extend(self.player_text.as_deref());
        paths
    }
}

/// Write every report for this run into `dir`. Existing files are never
/// overwritten.
pub fn write_reports(
    ctx: &ReportContext<'_>,
    dir: &Path,
    export_json: bool,
) -> Result<WrittenReports, OutputError> {
    let stamp = ctx.stamp();

    let markdown = generator::generate_markdown_report(ctx);
    let markdown_path = write_new(
        dir,
        &format!("ipl_analysis_report_{}", stamp),
        "md",
        markdown.as_bytes(),
    )?;
    info!("Markdown report saved to {}", markdown_path.display());

    let text = text::generate_text_report(ctx);
    let text_path = write_new(
        dir,
        &format!("ipl_analysis_text_{}", stamp),
        "txt",
        text.as_bytes(),
    )?;
    info!("Text report saved to {}", text_path.display());

    let json_path = if export_json {
        let json = generator::generate_json_report(ctx.summary).map_err(|e| OutputError::Render {
            path: dir.join(format!("ipl_analysis_data_{}.json", stamp)),
            message: e.to_string(),
        })?;
        let path = write_new(
            dir,
            &format!("ipl_analysis_data_{}", stamp),
            "json",
            json.as_bytes(),
        )?;
        info!("JSON data saved to {}", path.display());
        Some(path)
    } else {
        None
    };

    let mut written = WrittenReports {
        markdown: markdown_path,
        text: text_path,
        json: json_path,
        ..WrittenReports::default()
    };

    if let Some(section) = &ctx.summary.player {
        let stem = format!(
            "player_career_{}_{}",
            player::slug(&section.profile.player),
            stamp
        );
        let md = player::generate_player_markdown(section, ctx);
        let txt = player::generate_player_text(section, ctx);
        written.player_markdown = Some(write_new(dir, &stem, "md", md.as_bytes())?);
        written.player_text = Some(write_new(dir, &stem, "txt", txt.as_bytes())?);
        info!("Career report for {} saved", section.profile.player);
    }

    Ok(written)
}

/// Headline facts for the executive summary.
pub fn executive_summary(summary: &LeagueSummary) -> Vec<(String, String)> {
    let o = &summary.overview;
    let span = match (o.first_season, o.last_season) {
        (Some(first), Some(last)) if first != last => format!("{} - {}", first, last),
        (Some(first), _) => first.to_string(),
        _ => "N/A".to_string(),
    };
    let leader = |t: &AggregateTable| {
        t.first()
            .map(|r| format!("{} ({} {})", r.key, r.value, t.value_label.to_lowercase()))
            .unwrap_or_else(|| "N/A".to_string())
    };

    vec![
        ("Matches analysed".to_string(), o.total_matches.to_string()),
        ("Deliveries analysed".to_string(), o.total_deliveries.to_string()),
        ("Seasons".to_string(), span),
        ("Teams".to_string(), o.total_teams.to_string()),
        ("Most successful team".to_string(), leader(&summary.wins_by_team)),
        ("Biggest win by runs".to_string(), leader(&summary.max_run_margin)),
        ("Biggest win by wickets".to_string(), leader(&summary.max_wicket_margin)),
        ("Most Man of the Match awards".to_string(), leader(&summary.top_player_of_match)),
        ("Most sixes".to_string(), leader(&summary.top_six_hitters)),
        (
            "Toss winner also won the match".to_string(),
            format!("{:.1}%", summary.toss.toss_winner_won_pct),
        ),
    ]
}

/// Size and loader figures for the data overview.
pub fn overview_facts(summary: &LeagueSummary) -> Vec<(String, String)> {
    let o = &summary.overview;
    let load = &summary.load;
    vec![
        ("Total matches".to_string(), o.total_matches.to_string()),
        ("Total deliveries".to_string(), o.total_deliveries.to_string()),
        ("Teams".to_string(), o.total_teams.to_string()),
        ("Cities".to_string(), o.total_cities.to_string()),
        ("Venues".to_string(), o.total_venues.to_string()),
        ("Seasons covered".to_string(), o.seasons_covered.to_string()),
        (
            "Match rows read / kept / dropped".to_string(),
            format!(
                "{} / {} / {}",
                load.matches.rows_read, load.matches.rows_kept, load.matches.rows_dropped
            ),
        ),
        (
            "Delivery rows read / kept / dropped".to_string(),
            format!(
                "{} / {} / {}",
                load.deliveries.rows_read, load.deliveries.rows_kept, load.deliveries.rows_dropped
            ),
        ),
        (
            "Orphan deliveries excluded".to_string(),
            load.orphan_deliveries.to_string(),
        ),
        (
            "Columns (matches / deliveries)".to_string(),
            format!("{} / {}", load.matches.columns, load.deliveries.columns),
        ),
    ]
}

/// "column: count" entries for every column with empty cells.
pub fn missing_value_notes(summary: &LeagueSummary) -> Vec<String> {
    [("matches", &summary.load.matches), ("deliveries", &summary.load.deliveries)]
        .into_iter()
        .flat_map(|(name, stats)| {
            stats
                .columns_with_gaps()
                .into_iter()
                .map(move |(column, count)| format!("{}.{}: {} missing", name, column, count))
        })
        .collect()
}

/// One line per analysis warning, or "None.".
pub fn quality_notes(summary: &LeagueSummary) -> Vec<String> {
    if summary.warnings.is_empty() {
        vec!["None.".to_string()]
    } else {
        summary
            .warnings
            .iter()
            .map(|w| format!("Warning: {}", w))
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{context, sample_summary};
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stamp_format() {
        let summary = sample_summary(None);
        let charts = ChartSet::default();
        let ctx = context(&summary, &charts);
        assert_eq!(ctx.stamp(), "20240526_193000");
        assert_eq!(ctx.generated_on(), "2024-05-26 19:30:00");
    }

    #[test]
    fn test_executive_summary_and_overview() {
        let summary = sample_summary(None);
        let facts = executive_summary(&summary);
        let seasons = facts.iter().find(|(k, _)| k == "Seasons").unwrap();
        assert_eq!(seasons.1, "2017 - 2018");
        let runs = facts.iter().find(|(k, _)| k == "Biggest win by runs").unwrap();
        assert_eq!(runs.1, "Mumbai Indians (146 runs)");

        let overview = overview_facts(&summary);
        assert_eq!(overview[0].1, "2");
        assert_eq!(quality_notes(&summary), vec!["None.".to_string()]);
    }

    #[test]
    fn test_write_reports_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let summary = sample_summary(Some("RG Sharma"));
        let charts = ChartSet::default();
        let ctx = context(&summary, &charts);

        let first = write_reports(&ctx, dir.path(), true).unwrap();
        let second = write_reports(&ctx, dir.path(), false).unwrap();

        assert!(first.markdown.ends_with("ipl_analysis_report_20240526_193000.md"));
        assert!(second.markdown.ends_with("ipl_analysis_report_20240526_193000_1.md"));
        assert!(first.json.is_some());
        assert!(second.json.is_none());
        assert!(first
            .player_text
            .as_ref()
            .unwrap()
            .ends_with("player_career_rg_sharma_20240526_193000.txt"));
        assert_eq!(first.all().len(), 5);
        for path in first.all().into_iter().chain(second.all()) {
            assert!(path.is_file());
        }
    }
}
