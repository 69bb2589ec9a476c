//! League statistics.
//!
//! `aggregator` holds one function per grouped statistic, `player` builds the
//! featured batsman's career profile and `insights` turns both into prose.
//! `summarize` runs all of them over a loaded dataset.

pub mod aggregator;
pub mod insights;
pub mod player;

pub use aggregator::*;
pub use player::{player_profile, PlayerProfile};

use crate::error::AnalysisWarning;
use crate::loader::{Dataset, LoadReport};
use crate::models::AggregateTable;
use insights::RecommendationInputs;
use serde::Serialize;
use tracing::{info, warn};

/// Knobs for a summary run.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// Row limit for the player rankings.
    pub top_n: usize,
    /// Batsman to profile, if any.
    pub featured_player: Option<String>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            featured_player: None,
        }
    }
}

/// Weather-affected (Duckworth-Lewis) matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub total: u64,
    pub by_season: AggregateTable,
}

/// Featured batsman section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSection {
    pub profile: PlayerProfile,
    pub insights: Vec<String>,
}

/// Every statistic of a run, ready for charting and reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueSummary {
    pub overview: DatasetOverview,
    pub load: LoadReport,
    pub max_run_margin: AggregateTable,
    pub max_wicket_margin: AggregateTable,
    pub matches_by_city: AggregateTable,
    pub wins_by_team: AggregateTable,
    pub toss: TossAnalysis,
    pub top_player_of_match: AggregateTable,
    pub top_six_hitters: AggregateTable,
    pub weather: WeatherSummary,
    pub defending: ResultBreakdown,
    pub chasing: ResultBreakdown,
    pub player: Option<PlayerSection>,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<AnalysisWarning>,
}

impl LeagueSummary {
    /// Tables that feed a chart or a report section, in report order.
    pub fn tables(&self) -> Vec<&AggregateTable> {
        vec![
            &self.max_run_margin,
            &self.max_wicket_margin,
            &self.toss.decisions,
            &self.weather.by_season,
            &self.wins_by_team,
            &self.defending.teams,
            &self.chasing.teams,
            &self.top_player_of_match,
            &self.top_six_hitters,
            &self.matches_by_city,
            &self.defending.venues,
            &self.chasing.venues,
            &self.defending.team_venues,
            &self.chasing.team_venues,
        ]
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Compute the full summary for a dataset.
pub fn summarize(dataset: &Dataset, settings: &AnalysisSettings) -> LeagueSummary {
    info!(
        "Aggregating {} matches and {} deliveries",
        dataset.matches.len(),
        dataset.deliveries.len()
    );
    let matches = &dataset.matches;

    let matches_by_city = matches_by_city(matches);
    let top_player_of_match = top_player_of_match(matches, settings.top_n);
    let top_six_hitters = top_six_hitters(&dataset.deliveries, settings.top_n);
    let toss = toss_analysis(matches);
    let defending = result_breakdown(matches, ResultKind::Defended);
    let chasing = result_breakdown(matches, ResultKind::Chased);

    let recommendations = insights::recommendations(&RecommendationInputs {
        cities: &matches_by_city,
        player_of_match: &top_player_of_match,
        six_hitters: &top_six_hitters,
        toss: &toss,
        defending: &defending,
        chasing: &chasing,
    });

    let mut summary = LeagueSummary {
        overview: dataset_overview(dataset),
        load: dataset.report.clone(),
        max_run_margin: max_margin(matches, MarginKind::Runs),
        max_wicket_margin: max_margin(matches, MarginKind::Wickets),
        matches_by_city,
        wins_by_team: wins_by_team(matches),
        toss,
        top_player_of_match,
        top_six_hitters,
        weather: WeatherSummary {
            total: weather_matches_total(matches),
            by_season: weather_matches_by_season(matches),
        },
        defending,
        chasing,
        player: None,
        insights: insights::business_insights(),
        recommendations,
        warnings: Vec::new(),
    };

    let mut warnings: Vec<AnalysisWarning> = summary
        .tables()
        .into_iter()
        .filter(|t| t.is_empty())
        .map(|t| AnalysisWarning::EmptyResult {
            table: t.title.clone(),
        })
        .collect();

    if let Some(name) = settings.featured_player.as_deref() {
        match player_profile(dataset, name) {
            Some(profile) => {
                let insights = insights::player_insights(&profile);
                summary.player = Some(PlayerSection { profile, insights });
            }
            None => warnings.push(AnalysisWarning::PlayerNotFound {
                player: name.to_string(),
            }),
        }
    }

    for warning in &warnings {
        warn!("{}", warning);
    }
    summary.warnings = warnings;
    summary
}

#[cfg(test)]
mod tests {
    use super::aggregator::fixtures::{make_delivery, make_match};
    use super::*;

    fn dataset(with_deliveries: bool) -> Dataset {
        let mut m1 = make_match(1, "Mumbai", "Mumbai Indians", 146, 0);
        m1.player_of_match = Some("RG Sharma".to_string());
        let m2 = make_match(2, "Chennai", "Chennai Super Kings", 0, 6);
        let deliveries = if with_deliveries {
            vec![
                make_delivery(1, "RG Sharma", 6),
                make_delivery(1, "RG Sharma", 4),
                make_delivery(2, "MS Dhoni", 6),
            ]
        } else {
            Vec::new()
        };
        Dataset::from_records(vec![m1, m2], deliveries)
    }

    #[test]
    fn test_summarize_full_dataset() {
        let settings = AnalysisSettings {
            top_n: 10,
            featured_player: Some("RG Sharma".to_string()),
        };
        let summary = summarize(&dataset(true), &settings);

        assert_eq!(summary.overview.total_matches, 2);
        assert_eq!(summary.max_run_margin.first().unwrap().value, 146);
        assert_eq!(summary.top_six_hitters.len(), 2);
        assert_eq!(summary.insights.len(), 5);
        assert!(!summary.recommendations.is_empty());

        let player = summary.player.as_ref().unwrap();
        assert_eq!(player.profile.career.runs, 10);
        assert!(!summary.has_warnings());
    }

    #[test]
    fn test_summarize_warns_on_empty_tables() {
        let summary = summarize(&dataset(false), &AnalysisSettings::default());

        assert!(summary.top_six_hitters.is_empty());
        assert!(summary.warnings.contains(&AnalysisWarning::EmptyResult {
            table: "Top Players with Most Sixes".to_string(),
        }));
        assert!(summary.player.is_none());
    }

    #[test]
    fn test_summarize_warns_on_unknown_player() {
        let settings = AnalysisSettings {
            top_n: 5,
            featured_player: Some("Nobody".to_string()),
        };
        let summary = summarize(&dataset(true), &settings);

        assert!(summary.player.is_none());
        assert!(summary.warnings.contains(&AnalysisWarning::PlayerNotFound {
            player: "Nobody".to_string(),
        }));
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let data = dataset(true);
        let settings = AnalysisSettings::default();
        assert_eq!(summarize(&data, &settings), summarize(&data, &settings));
    }
}
