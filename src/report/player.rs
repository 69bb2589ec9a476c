//! Featured-player career reports.

use super::generator::{chart_embed, markdown_table, table_cell};
use super::text::text_table;
use super::ReportContext;
use crate::analysis::player::{BattingLine, LabeledLine};
use crate::analysis::PlayerSection;
use crate::chart;

/// Lowercase file-name form of a player name: "RG Sharma" -> "rg_sharma".
pub fn slug(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        "player".to_string()
    } else {
        out
    }
}

fn span(first: Option<u16>, last: Option<u16>) -> String {
    match (first, last) {
        (Some(first), Some(last)) if first != last => format!("{} - {}", first, last),
        (Some(first), _) => first.to_string(),
        _ => "N/A".to_string(),
    }
}

fn career_facts(section: &PlayerSection) -> Vec<(String, String)> {
    let p = &section.profile;
    let c = &p.consistency;
    vec![
        ("Career span".to_string(), span(p.first_season(), p.last_season())),
        ("Seasons played".to_string(), p.seasons.len().to_string()),
        ("Matches batted".to_string(), p.career.matches.to_string()),
        ("Runs".to_string(), p.career.runs.to_string()),
        ("Balls faced".to_string(), p.career.balls.to_string()),
        ("Dismissals".to_string(), p.career.dismissals.to_string()),
        ("Average".to_string(), p.career.average_display()),
        ("Strike rate".to_string(), format!("{:.2}", p.career.strike_rate())),
        ("Centuries".to_string(), p.milestones.centuries.to_string()),
        ("Half-centuries".to_string(), p.milestones.half_centuries.to_string()),
        (
            "Highest scores".to_string(),
            p.milestones
                .highest_scores
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        ("Man of the Match awards".to_string(), p.mom_awards.to_string()),
        ("Mean score".to_string(), format!("{:.2}", c.mean)),
        ("Median score".to_string(), format!("{:.1}", c.median)),
        ("Standard deviation".to_string(), format!("{:.2}", c.std_dev)),
        (
            "Coefficient of variation".to_string(),
            format!("{:.1}%", c.coefficient_of_variation),
        ),
        ("Scores of 50+".to_string(), c.scores_50_plus.to_string()),
        ("Scores of 30+".to_string(), c.scores_30_plus.to_string()),
        ("Ducks".to_string(), c.ducks.to_string()),
    ]
}

fn line_cells(line: &BattingLine) -> [String; 5] {
    [
        line.matches.to_string(),
        line.runs.to_string(),
        line.balls.to_string(),
        line.average_display(),
        format!("{:.2}", line.strike_rate()),
    ]
}

const LINE_HEADERS: [&str; 5] = ["Matches", "Runs", "Balls", "Average", "Strike Rate"];

fn markdown_lines(label: &str, lines: &[LabeledLine]) -> String {
    if lines.is_empty() {
        return "_No data available._\n\n".to_string();
    }
    let mut out = format!("| {} | {} |\n", label, LINE_HEADERS.join(" | "));
    out.push_str("|:---|---:|---:|---:|---:|---:|\n");
    for l in lines {
        out.push_str(&format!(
            "| {} | {} |\n",
            table_cell(&l.label),
            line_cells(&l.line).join(" | ")
        ));
    }
    out.push('\n');
    out
}

fn text_lines(label: &str, lines: &[LabeledLine]) -> String {
    if lines.is_empty() {
        return "  No data available.\n\n".to_string();
    }
    let width = lines
        .iter()
        .map(|l| l.label.chars().count())
        .chain(std::iter::once(label.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = format!("  {:<width$}", label, width = width);
    for h in LINE_HEADERS {
        out.push_str(&format!("  {:>11}", h));
    }
    out.push('\n');
    for l in lines {
        out.push_str(&format!("  {:<width$}", l.label, width = width));
        for cell in line_cells(&l.line) {
            out.push_str(&format!("  {:>11}", cell));
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Career report in Markdown, with the four player charts.
pub fn generate_player_markdown(section: &PlayerSection, ctx: &ReportContext<'_>) -> String {
    let p = &section.profile;
    let mut out = String::new();

    out.push_str(&format!("# {}: IPL Career Analysis\n\n", p.player));
    out.push_str("*Comprehensive Performance Analysis & Career Insights*\n\n");
    out.push_str(&format!("**Generated on:** {}\n\n", ctx.generated_on()));

    out.push_str("## Career Summary\n\n");
    for (label, value) in career_facts(section) {
        out.push_str(&format!("- **{}:** {}\n", label, value));
    }
    out.push('\n');

    out.push_str("## Season-wise Performance\n\n");
    out.push_str(&markdown_lines("Season", &p.by_season));
    out.push_str(&chart_embed(ctx, chart::PLAYER_SEASON_RUNS));

    out.push_str("## Performance by Team\n\n");
    out.push_str(&markdown_lines("Team", &p.by_team));
    out.push_str(&chart_embed(ctx, chart::PLAYER_TEAM_RUNS));

    out.push_str("## Innings Analysis\n\n");
    out.push_str(&markdown_lines("Innings", &p.by_innings));

    out.push_str("## Phase Analysis\n\n");
    out.push_str(&markdown_lines("Phase", &p.by_phase));
    out.push_str(&chart_embed(ctx, chart::PLAYER_PHASE_RUNS));

    out.push_str("## Dismissal Patterns\n\n");
    out.push_str(&markdown_table(&p.dismissals, usize::MAX));
    out.push_str(&chart_embed(ctx, chart::PLAYER_DISMISSALS));

    out.push_str("## Key Insights\n\n");
    if section.insights.is_empty() {
        out.push_str("No standout patterns for the configured thresholds.\n\n");
    } else {
        for (i, insight) in section.insights.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, insight));
        }
        out.push('\n');
    }

    out
}

/// Career report in plain text.
pub fn generate_player_text(section: &PlayerSection, ctx: &ReportContext<'_>) -> String {
    let p = &section.profile;
    let mut out = String::new();

    let title = format!("{}: IPL CAREER ANALYSIS", p.player.to_uppercase());
    out.push_str(&format!("{}\n{}\n", title, "=".repeat(title.chars().count())));
    out.push_str(&format!("Generated on: {}\n\n", ctx.generated_on()));

    out.push_str("CAREER SUMMARY\n");
    for (label, value) in career_facts(section) {
        out.push_str(&format!("  {}: {}\n", label, value));
    }
    out.push('\n');

    out.push_str("SEASON-WISE PERFORMANCE\n");
    out.push_str(&text_lines("Season", &p.by_season));
    out.push_str("PERFORMANCE BY TEAM\n");
    out.push_str(&text_lines("Team", &p.by_team));
    out.push_str("INNINGS ANALYSIS\n");
    out.push_str(&text_lines("Innings", &p.by_innings));
    out.push_str("PHASE ANALYSIS\n");
    out.push_str(&text_lines("Phase", &p.by_phase));
    out.push_str("DISMISSAL PATTERNS\n");
    out.push_str(&text_table(&p.dismissals, usize::MAX));

    out.push_str("KEY INSIGHTS\n");
    for (i, insight) in section.insights.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, insight));
    }

    out
}
