//! Plain-text report generation.
//!
//! Same sections and figures as the Markdown report, without images. The
//! `Generated on:` line is the only part that changes between runs over the
//! same data.

use super::{
    executive_summary, missing_value_notes, overview_facts, quality_notes, ReportContext, SECTIONS,
};
use crate::models::AggregateTable;

const RULE_WIDTH: usize = 72;

/// Generate the complete text report.
pub fn generate_text_report(ctx: &ReportContext<'_>) -> String {
    let s = ctx.summary;
    let ranked = ctx.limits.rankings;
    let mut out = String::new();

    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&ctx.title.to_uppercase());
    out.push('\n');
    if !ctx.subtitle.is_empty() {
        out.push_str(ctx.subtitle);
        out.push('\n');
    }
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format!("Generated on: {}\n\n", ctx.generated_on()));

    out.push_str(&heading(0));
    out.push_str(&facts(&executive_summary(s)));

    out.push_str(&heading(1));
    out.push_str(&facts(&overview_facts(s)));
    let missing = missing_value_notes(s);
    if !missing.is_empty() {
        out.push_str("Missing values in the source files:\n");
        for note in missing {
            out.push_str(&format!("  {}\n", note));
        }
        out.push('\n');
    }

    out.push_str(&heading(2));
    out.push_str(&text_table(&s.max_run_margin, 1));
    out.push_str(&text_table(&s.max_wicket_margin, 1));
    out.push_str(&text_table(&s.toss.decisions, usize::MAX));
    out.push_str(&format!(
        "Toss winner won the match: {} of {} ({:.1}%)\n\n",
        s.toss.toss_winner_won, s.toss.matches, s.toss.toss_winner_won_pct
    ));
    out.push_str(&format!(
        "Matches decided by the Duckworth-Lewis method: {}\n\n",
        s.weather.total
    ));
    out.push_str(&text_table(&s.weather.by_season, usize::MAX));

    out.push_str(&heading(3));
    out.push_str(&text_table(&s.wins_by_team, usize::MAX));
    out.push_str(&text_table(&s.defending.teams, ranked));
    out.push_str(&text_table(&s.chasing.teams, ranked));

    out.push_str(&heading(4));
    out.push_str(&text_table(&s.top_player_of_match, usize::MAX));
    out.push_str(&text_table(&s.top_six_hitters, usize::MAX));
    if let Some(player) = &s.player {
        let p = &player.profile;
        out.push_str(&format!("Featured player: {}\n", p.player));
        out.push_str(&format!(
            "  Runs: {}  Matches: {}  Average: {}  Strike rate: {:.2}\n",
            p.career.runs,
            p.career.matches,
            p.career.average_display(),
            p.career.strike_rate()
        ));
        out.push_str(&format!(
            "  Centuries: {}  Half-centuries: {}\n\n",
            p.milestones.centuries, p.milestones.half_centuries
        ));
    }

    out.push_str(&heading(5));
    out.push_str(&text_table(&s.matches_by_city, ctx.limits.cities));
    out.push_str(&text_table(&s.defending.venues, ranked));
    out.push_str(&text_table(&s.chasing.venues, ranked));
    out.push_str(&text_table(&s.defending.team_venues, ranked));
    out.push_str(&text_table(&s.chasing.team_venues, ranked));

    out.push_str(&heading(6));
    for note in quality_notes(s) {
        out.push_str(&format!("{}\n", note));
    }
    out.push('\n');

    out.push_str(&heading(7));
    for (i, insight) in s.insights.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, insight));
    }
    out.push('\n');
    if !s.recommendations.is_empty() {
        out.push_str("Strategic recommendations:\n");
        for rec in &s.recommendations {
            out.push_str(&format!("  * {}\n", rec));
        }
        out.push('\n');
    }

    out
}

fn heading(index: usize) -> String {
    let title = SECTIONS[index].to_uppercase();
    format!("{}\n{}\n", title, "-".repeat(title.chars().count()))
}

fn facts(facts: &[(String, String)]) -> String {
    let mut out = String::new();
    for (label, value) in facts {
        out.push_str(&format!("{}: {}\n", label, value));
    }
    out.push('\n');
    out
}

/// Aligned two-column listing of the first `limit` rows.
pub(crate) fn text_table(table: &AggregateTable, limit: usize) -> String {
    let mut out = format!("{}\n", table.title);
    if table.is_empty() {
        out.push_str("  No data available.\n\n");
        return out;
    }

    let rows: Vec<_> = table.rows.iter().take(limit).collect();
    let width = rows
        .iter()
        .map(|r| r.key.chars().count())
        .chain(std::iter::once(table.key_label.chars().count()))
        .max()
        .unwrap_or(0);

    out.push_str(&format!(
        "  {:<width$}  {}\n",
        table.key_label,
        table.value_label,
        width = width
    ));
    for row in rows {
        out.push_str(&format!("  {:<width$}  {}\n", row.key, row.value, width = width));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{context, sample_summary};
    use super::*;
    use crate::chart::ChartSet;
    use chrono::{Duration, Local};

    #[test]
    fn test_text_report_sections_in_order() {
        let summary = sample_summary(None);
        let charts = ChartSet::default();
        let text = generate_text_report(&context(&summary, &charts));

        assert!(text.contains("IPL DATA ANALYSIS REPORT"));
        let mut last = 0;
        for name in SECTIONS {
            let pos = text.find(&name.to_uppercase()).unwrap();
            assert!(pos > last);
            last = pos;
        }
        assert!(!text.contains(".svg"));
    }

    #[test]
    fn test_only_generated_line_differs_between_runs() {
        let summary = sample_summary(Some("RG Sharma"));
        let charts = ChartSet::default();
        let first = context(&summary, &charts);
        let mut second = context(&summary, &charts);
        second.generated_at = Local::now() + Duration::seconds(5);

        let a = generate_text_report(&first);
        let b = generate_text_report(&second);
        assert_ne!(a, b);

        let strip = |s: &str| -> Vec<String> {
            s.lines()
                .filter(|l| !l.starts_with("Generated on:"))
                .map(str::to_string)
                .collect()
        };
        assert_eq!(strip(&a), strip(&b));
    }

    #[test]
    fn test_text_table_alignment() {
        let table = AggregateTable::new("Matches per City", "City", "Matches").with_rows(vec![
            ("Mumbai".to_string(), 101),
            ("Kolkata".to_string(), 77),
        ]);
        let text = text_table(&table, 10);
        assert!(text.starts_with("Matches per City\n"));
        assert!(text.contains("  Mumbai   101\n"));
        assert!(text.contains("  Kolkata  77\n"));

        let empty = text_table(&AggregateTable::new("Six Hitters", "Player", "Sixes"), 10);
        assert!(empty.contains("No data available."));
    }
}
