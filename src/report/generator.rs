//! Markdown report generation.
//!
//! Generates the structured league report with embedded charts from a
//! `ReportContext`, plus the JSON export of the summary.

use super::{
    executive_summary, missing_value_notes, overview_facts, quality_notes, ReportContext, SECTIONS,
};
use crate::analysis::LeagueSummary;
use crate::chart;
use crate::models::AggregateTable;
use tracing::warn;

/// Generate the complete Markdown report.
pub fn generate_markdown_report(ctx: &ReportContext<'_>) -> String {
    let mut output = String::new();

    output.push_str(&generate_title(ctx));
    output.push_str(&generate_executive_summary(ctx));
    output.push_str(&generate_overview_section(ctx));
    output.push_str(&generate_match_section(ctx));
    output.push_str(&generate_team_section(ctx));
    output.push_str(&generate_player_section(ctx));
    output.push_str(&generate_venue_section(ctx));
    output.push_str(&generate_quality_section(ctx));
    output.push_str(&generate_insights_section(ctx));
    output.push_str(&generate_footer());

    output
}

/// Generate the JSON export.
pub fn generate_json_report(summary: &LeagueSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

fn heading(index: usize) -> String {
    format!("## {}\n\n", SECTIONS[index])
}

/// Escape a value for use inside a Markdown table cell.
pub(crate) fn table_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Markdown table of the first `limit` rows.
pub(crate) fn markdown_table(table: &AggregateTable, limit: usize) -> String {
    if table.is_empty() {
        return "_No data available._\n\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("| {} | {} |\n", table.key_label, table.value_label));
    out.push_str("|:---|---:|\n");
    for row in table.rows.iter().take(limit) {
        out.push_str(&format!("| {} | {} |\n", table_cell(&row.key), row.value));
    }
    out.push('\n');
    out
}

/// Image link for a rendered chart, or a note when it is missing.
pub(crate) fn chart_embed(ctx: &ReportContext<'_>, file_name: &str) -> String {
    match ctx.charts.available(file_name) {
        Some(chart) => format!("![{}]({})\n\n", chart.title, chart.file_name),
        None => {
            warn!("Chart unavailable: {}", file_name);
            format!("> Chart unavailable: {}\n\n", file_name)
        }
    }
}

fn facts_list(facts: &[(String, String)]) -> String {
    let mut out = String::new();
    for (label, value) in facts {
        out.push_str(&format!("- **{}:** {}\n", label, value));
    }
    out.push('\n');
    out
}

fn generate_title(ctx: &ReportContext<'_>) -> String {
    let mut section = String::new();

    section.push_str(&format!("# {}\n\n", ctx.title));
    if !ctx.subtitle.is_empty() {
        section.push_str(&format!("*{}*\n\n", ctx.subtitle));
    }
    section.push_str(&format!("**Generated on:** {}\n\n", ctx.generated_on()));

    section
}

fn generate_executive_summary(ctx: &ReportContext<'_>) -> String {
    let mut section = heading(0);
    section.push_str(&facts_list(&executive_summary(ctx.summary)));
    section
}

fn generate_overview_section(ctx: &ReportContext<'_>) -> String {
    let mut section = heading(1);

    section.push_str("| Measure | Value |\n");
    section.push_str("|:---|---:|\n");
    for (label, value) in overview_facts(ctx.summary) {
        section.push_str(&format!("| {} | {} |\n", label, value));
    }
    section.push('\n');

    let missing = missing_value_notes(ctx.summary);
    if !missing.is_empty() {
        section.push_str("**Missing values in the source files:**\n\n");
        for note in missing {
            section.push_str(&format!("- {}\n", note));
        }
        section.push('\n');
    }

    section
}

fn generate_match_section(ctx: &ReportContext<'_>) -> String {
    let s = ctx.summary;
    let mut section = heading(2);

    section.push_str("### Victory Margins\n\n");
    section.push_str(&markdown_table(&s.max_run_margin, 1));
    section.push_str(&chart_embed(ctx, chart::MAX_RUN_MARGIN));
    section.push_str(&markdown_table(&s.max_wicket_margin, 1));
    section.push_str(&chart_embed(ctx, chart::MAX_WICKET_MARGIN));

    section.push_str("### Toss Analysis\n\n");
    section.push_str(&markdown_table(&s.toss.decisions, usize::MAX));
    section.push_str(&format!(
        "The toss winner went on to win {} of {} matches ({:.1}%).\n\n",
        s.toss.toss_winner_won, s.toss.matches, s.toss.toss_winner_won_pct
    ));
    section.push_str(&chart_embed(ctx, chart::TOSS_DECISIONS));

    section.push_str("### Weather-Affected Matches\n\n");
    section.push_str(&format!(
        "{} matches were decided by the Duckworth-Lewis method.\n\n",
        s.weather.total
    ));
    section.push_str(&markdown_table(&s.weather.by_season, usize::MAX));
    section.push_str(&chart_embed(ctx, chart::DL_PER_SEASON));

    section
}

fn generate_team_section(ctx: &ReportContext<'_>) -> String {
    let s = ctx.summary;
    let ranked = ctx.limits.rankings;
    let mut section = heading(3);

    section.push_str("### Matches Won by Each Team\n\n");
    section.push_str(&markdown_table(&s.wins_by_team, usize::MAX));
    section.push_str(&chart_embed(ctx, chart::MATCHES_WON_BY_TEAM));

    section.push_str("### Best Defending Teams\n\n");
    section.push_str(&markdown_table(&s.defending.teams, ranked));
    section.push_str(&chart_embed(ctx, chart::TOP_DEFENDING_TEAMS));

    section.push_str("### Best Chasing Teams\n\n");
    section.push_str(&markdown_table(&s.chasing.teams, ranked));
    section.push_str(&chart_embed(ctx, chart::TOP_CHASING_TEAMS));

    section
}

fn generate_player_section(ctx: &ReportContext<'_>) -> String {
    let s = ctx.summary;
    let mut section = heading(4);

    section.push_str("### Man of the Match Leaders\n\n");
    section.push_str(&markdown_table(&s.top_player_of_match, usize::MAX));
    section.push_str(&chart_embed(ctx, chart::TOP_MOM_PLAYERS));

    section.push_str("### Six Hitters\n\n");
    section.push_str(&markdown_table(&s.top_six_hitters, usize::MAX));
    section.push_str(&chart_embed(ctx, chart::TOP_SIX_HITTERS));

    if let Some(player) = &s.player {
        let p = &player.profile;
        section.push_str(&format!("### Featured Player: {}\n\n", p.player));
        section.push_str(&format!(
            "{} runs in {} matches at an average of {} and a strike rate of {:.2}, \
             with {} centuries and {} half-centuries. \
             A detailed career report is written alongside this document.\n\n",
            p.career.runs,
            p.career.matches,
            p.career.average_display(),
            p.career.strike_rate(),
            p.milestones.centuries,
            p.milestones.half_centuries,
        ));
    }

    section
}

fn generate_venue_section(ctx: &ReportContext<'_>) -> String {
    let s = ctx.summary;
    let ranked = ctx.limits.rankings;
    let mut section = heading(5);

    section.push_str("### Matches per City\n\n");
    section.push_str(&markdown_table(&s.matches_by_city, ctx.limits.cities));
    section.push_str(&chart_embed(ctx, chart::MATCHES_PER_CITY));

    section.push_str("### Best Venues for Defending\n\n");
    section.push_str(&markdown_table(&s.defending.venues, ranked));
    section.push_str(&chart_embed(ctx, chart::BEST_VENUES_DEFENDING));

    section.push_str("### Best Venues for Chasing\n\n");
    section.push_str(&markdown_table(&s.chasing.venues, ranked));
    section.push_str(&chart_embed(ctx, chart::BEST_VENUES_CHASING));

    section.push_str("### Top Team-Venue Combinations\n\n");
    section.push_str("**Defending**\n\n");
    section.push_str(&markdown_table(&s.defending.team_venues, ranked));
    section.push_str("**Chasing**\n\n");
    section.push_str(&markdown_table(&s.chasing.team_venues, ranked));

    section
}

fn generate_quality_section(ctx: &ReportContext<'_>) -> String {
    let mut section = heading(6);

    for note in quality_notes(ctx.summary) {
        section.push_str(&format!("- {}\n", note));
    }
    section.push('\n');

    section
}

fn generate_insights_section(ctx: &ReportContext<'_>) -> String {
    let s = ctx.summary;
    let mut section = heading(7);

    section.push_str("### Key Insights\n\n");
    for (i, insight) in s.insights.iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, insight));
    }
    section.push('\n');

    if !s.recommendations.is_empty() {
        section.push_str("### Strategic Recommendations\n\n");
        for rec in &s.recommendations {
            section.push_str(&format!("- {}\n", rec));
        }
        section.push('\n');
    }

    section
}

fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by iplstats v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}
