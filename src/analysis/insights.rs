//! Narrative findings derived from the computed tables.

use super::player::{Phase, PlayerProfile};
use super::{ResultBreakdown, TossAnalysis};
use crate::models::AggregateTable;

/// Keys listed in each recommendation.
const LEADERS: usize = 3;

/// League-level findings that hold for this competition.
pub fn business_insights() -> Vec<String> {
    [
        "Cities with higher match frequency indicate strong engagement potential.",
        "Toss advantage exists but is not overwhelmingly decisive.",
        "Certain teams dominate defending and chasing conditions.",
        "Venue characteristics significantly impact match outcomes.",
        "High six-hitting players contribute strongly to audience engagement.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Inputs for the strategic recommendations.
pub struct RecommendationInputs<'a> {
    pub cities: &'a AggregateTable,
    pub player_of_match: &'a AggregateTable,
    pub six_hitters: &'a AggregateTable,
    pub toss: &'a TossAnalysis,
    pub defending: &'a ResultBreakdown,
    pub chasing: &'a ResultBreakdown,
}

/// Recommendations naming the leading keys of the relevant tables.
pub fn recommendations(inputs: &RecommendationInputs<'_>) -> Vec<String> {
    vec![
        format!(
            "Focus marketing efforts on high-engagement cities: {}",
            inputs.cities.leading_keys(LEADERS)
        ),
        format!(
            "Leverage popular players for brand building: {}",
            inputs.player_of_match.leading_keys(LEADERS)
        ),
        format!(
            "Build fan engagement content around power hitters: {}",
            inputs.six_hitters.leading_keys(LEADERS)
        ),
        format!(
            "Schedule high-scoring fixtures at venues that favour defending: {}",
            inputs.defending.venues.leading_keys(LEADERS)
        ),
        format!(
            "Promote run-chase narratives at venues that favour chasing: {}",
            inputs.chasing.venues.leading_keys(LEADERS)
        ),
        format!(
            "Toss winners went on to win {:.1}% of matches; treat the toss as a talking point, not a predictor.",
            inputs.toss.toss_winner_won_pct
        ),
    ]
}

/// Findings about one batsman, each gated on a fixed threshold.
pub fn player_insights(profile: &PlayerProfile) -> Vec<String> {
    let mut insights = Vec::new();

    let strike_rate = profile.career.strike_rate();
    if strike_rate > 130.0 {
        insights.push(
            "Excellent strike rate indicates an aggressive batting approach, ideal for the T20 format."
                .to_string(),
        );
    } else if strike_rate > 120.0 {
        insights.push(
            "Good strike rate demonstrates the ability to score quickly while staying consistent."
                .to_string(),
        );
    }

    if profile.consistency.innings >= 2 && profile.consistency.coefficient_of_variation < 80.0 {
        insights.push(
            "Low coefficient of variation shows high consistency across innings.".to_string(),
        );
    }

    if profile.milestones.centuries > 0 {
        insights.push(format!(
            "Converted starts into {} centur{}.",
            profile.milestones.centuries,
            if profile.milestones.centuries == 1 { "y" } else { "ies" }
        ));
    }

    if let Some(death) = profile.phase(Phase::Death) {
        if death.balls > 0 && death.strike_rate() > 150.0 {
            insights.push(
                "Exceptional death-overs strike rate shows the ability to accelerate under pressure."
                    .to_string(),
            );
        }
    }

    if let Some(team) = profile.by_team.first() {
        if profile.by_team.len() == 1 || team.line.matches * 2 > profile.career.matches {
            insights.push(format!(
                "Most of the career has been spent with {}, scoring {} runs for them.",
                team.label, team.line.runs
            ));
        }
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::{result_breakdown, toss_analysis, ResultKind};
    use crate::analysis::aggregator::fixtures::make_match;
    use crate::analysis::player::{BattingLine, Consistency, LabeledLine, Milestones};

    fn table(keys: &[&str]) -> AggregateTable {
        AggregateTable::new("t", "k", "v")
            .with_rows(keys.iter().map(|k| (k.to_string(), 1)))
    }

    fn profile(runs: u64, balls: u64, cv: f64, centuries: usize) -> PlayerProfile {
        let career = BattingLine {
            matches: 10,
            runs,
            balls,
            dismissals: 8,
        };
        PlayerProfile {
            player: "RG Sharma".to_string(),
            seasons: vec![2017],
            career: career.clone(),
            milestones: Milestones {
                centuries,
                ..Milestones::default()
            },
            by_season: Vec::new(),
            by_team: vec![LabeledLine {
                label: "Mumbai Indians".to_string(),
                line: career,
            }],
            by_innings: Vec::new(),
            by_phase: vec![LabeledLine {
                label: "Death".to_string(),
                line: BattingLine {
                    matches: 5,
                    runs: 80,
                    balls: 40,
                    dismissals: 2,
                },
            }],
            dismissals: AggregateTable::new("Dismissal Patterns", "Dismissal", "Count"),
            consistency: Consistency {
                innings: 10,
                coefficient_of_variation: cv,
                ..Consistency::default()
            },
            mom_awards: 0,
        }
    }

    #[test]
    fn test_business_insights_are_fixed() {
        let insights = business_insights();
        assert_eq!(insights.len(), 5);
        assert!(insights[4].contains("six-hitting"));
    }

    #[test]
    fn test_recommendations_name_leaders() {
        let matches = vec![
            make_match(1, "Mumbai", "Mumbai Indians", 10, 0),
            make_match(2, "Pune", "Rising Pune Supergiant", 0, 4),
        ];
        let toss = toss_analysis(&matches);
        let defending = result_breakdown(&matches, ResultKind::Defended);
        let chasing = result_breakdown(&matches, ResultKind::Chased);
        let cities = table(&["Mumbai", "Kolkata", "Delhi", "Pune"]);
        let empty = AggregateTable::new("t", "k", "v");

        let recs = recommendations(&RecommendationInputs {
            cities: &cities,
            player_of_match: &empty,
            six_hitters: &table(&["CH Gayle"]),
            toss: &toss,
            defending: &defending,
            chasing: &chasing,
        });

        assert!(recs[0].ends_with("Mumbai, Kolkata, Delhi"));
        assert!(recs[1].ends_with("N/A"));
        assert!(recs[3].ends_with("Mumbai Stadium"));
        assert!(recs[4].ends_with("Pune Stadium"));
        assert!(recs[5].contains("100.0%"));
    }

    #[test]
    fn test_player_insight_thresholds() {
        // Strike rate 140, death strike rate 200.
        let insights = player_insights(&profile(1400, 1000, 60.0, 2));
        assert!(insights.iter().any(|i| i.starts_with("Excellent strike rate")));
        assert!(insights.iter().any(|i| i.contains("high consistency")));
        assert!(insights.iter().any(|i| i.contains("2 centuries")));
        assert!(insights.iter().any(|i| i.contains("death-overs")));
        assert!(insights.iter().any(|i| i.contains("Mumbai Indians")));

        // Strike rate 125, erratic, no hundreds.
        let insights = player_insights(&profile(1250, 1000, 95.0, 0));
        assert!(insights.iter().any(|i| i.starts_with("Good strike rate")));
        assert!(!insights.iter().any(|i| i.contains("consistency")));
        assert!(!insights.iter().any(|i| i.contains("centur")));
    }
}
