//! Grouped statistics over match and delivery records.
//!
//! Every function here is a single grouping + reduction pass that borrows its
//! inputs and returns a fresh `AggregateTable`. Ties keep the order in which
//! keys were first encountered.

use crate::loader::Dataset;
use crate::models::{AggregateTable, DeliveryRecord, MatchRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Which victory margin to maximise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginKind {
    Runs,
    Wickets,
}

/// Defending (won batting first) or chasing (won batting second).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Defended,
    Chased,
}

impl ResultKind {
    fn applies_to(self, record: &MatchRecord) -> bool {
        match self {
            ResultKind::Defended => record.win_by_runs > 0,
            ResultKind::Chased => record.win_by_wickets > 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ResultKind::Defended => "Defending",
            ResultKind::Chased => "Chasing",
        }
    }
}

/// Grouping key for defend/chase rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Team,
    Venue,
    TeamAndVenue,
}

/// Count occurrences of each key, most frequent first.
///
/// The sort is stable, so keys with equal counts stay in first-seen order.
pub fn value_counts<'a, I>(keys: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, u64)> = Vec::new();

    for key in keys {
        match positions.get(key) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    counts
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect()
}

/// The single largest victory by runs or wickets, keyed by the winning team.
///
/// Empty when no match was won by that kind of margin.
pub fn max_margin(matches: &[MatchRecord], kind: MarginKind) -> AggregateTable {
    let (title, unit) = match kind {
        MarginKind::Runs => ("Maximum Run Margin Victory", "Runs"),
        MarginKind::Wickets => ("Maximum Wicket Margin Victory", "Wickets"),
    };

    let mut best: Option<(&str, u32)> = None;
    for record in matches {
        let Some(winner) = record.winner.as_deref() else {
            continue;
        };
        let margin = match kind {
            MarginKind::Runs => record.win_by_runs,
            MarginKind::Wickets => record.win_by_wickets,
        };
        if margin == 0 {
            continue;
        }
        // Strictly greater: the first match with the top margin wins ties.
        if best.map_or(true, |(_, m)| margin > m) {
            best = Some((winner, margin));
        }
    }

    AggregateTable::new(title, "Team", unit)
        .with_rows(best.map(|(team, margin)| (team.to_string(), margin as u64)))
}

/// Number of matches hosted by each city.
pub fn matches_by_city(matches: &[MatchRecord]) -> AggregateTable {
    AggregateTable::new("Matches per City", "City", "Matches")
        .with_rows(value_counts(matches.iter().filter_map(|m| m.city.as_deref())))
}

/// Number of matches won by each team.
pub fn wins_by_team(matches: &[MatchRecord]) -> AggregateTable {
    AggregateTable::new("Matches Won by Each Team", "Team", "Wins")
        .with_rows(value_counts(matches.iter().filter_map(|m| m.winner.as_deref())))
}

/// How often toss winners chose to bat or field.
pub fn toss_decision_distribution(matches: &[MatchRecord]) -> AggregateTable {
    AggregateTable::new("Toss Decision Distribution", "Decision", "Matches")
        .with_rows(value_counts(matches.iter().map(|m| m.toss_decision.as_str())))
}

/// Toss decisions plus how often winning the toss meant winning the match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TossAnalysis {
    pub decisions: AggregateTable,
    pub matches: u64,
    pub toss_winner_won: u64,
    /// Percentage of all matches won by the toss winner.
    pub toss_winner_won_pct: f64,
}

pub fn toss_analysis(matches: &[MatchRecord]) -> TossAnalysis {
    let total = matches.len() as u64;
    let won = matches.iter().filter(|m| m.toss_winner_won()).count() as u64;
    let pct = if total == 0 {
        0.0
    } else {
        won as f64 * 100.0 / total as f64
    };

    TossAnalysis {
        decisions: toss_decision_distribution(matches),
        matches: total,
        toss_winner_won: won,
        toss_winner_won_pct: pct,
    }
}

/// Players with the most man-of-the-match awards.
pub fn top_player_of_match(matches: &[MatchRecord], n: usize) -> AggregateTable {
    let mut counts = value_counts(matches.iter().filter_map(|m| m.player_of_match.as_deref()));
    counts.truncate(n);
    AggregateTable::new("Top Players - Man of the Match Awards", "Player", "Awards")
        .with_rows(counts)
}

/// Batsmen with the most sixes.
pub fn top_six_hitters(deliveries: &[DeliveryRecord], n: usize) -> AggregateTable {
    let mut counts = value_counts(
        deliveries
            .iter()
            .filter(|d| d.is_six())
            .map(|d| d.batsman.as_str()),
    );
    counts.truncate(n);
    AggregateTable::new("Top Players with Most Sixes", "Player", "Sixes").with_rows(counts)
}

/// Weather-affected (D/L) matches per season, every season listed in order.
pub fn weather_matches_by_season(matches: &[MatchRecord]) -> AggregateTable {
    let mut per_season: BTreeMap<u16, u64> = BTreeMap::new();
    for record in matches {
        let slot = per_season.entry(record.season).or_insert(0);
        if record.is_weather_affected() {
            *slot += 1;
        }
    }

    AggregateTable::new("D/L Applied Per Season", "Season", "Matches").with_rows(
        per_season
            .into_iter()
            .map(|(season, count)| (season.to_string(), count)),
    )
}

pub fn weather_matches_total(matches: &[MatchRecord]) -> u64 {
    matches.iter().filter(|m| m.is_weather_affected()).count() as u64
}

/// Ranking of successful defences or chases under the given grouping.
pub fn successful_results(
    matches: &[MatchRecord],
    kind: ResultKind,
    grouping: Grouping,
) -> AggregateTable {
    let keys: Vec<String> = matches
        .iter()
        .filter(|m| kind.applies_to(m))
        .filter_map(|m| {
            let winner = m.winner.as_deref()?;
            Some(match grouping {
                Grouping::Team => winner.to_string(),
                Grouping::Venue => m.venue.clone(),
                Grouping::TeamAndVenue => format!("{} @ {}", winner, m.venue),
            })
        })
        .collect();

    let (title, key_label, value_label) = match grouping {
        Grouping::Team => (format!("Top {} Teams", kind.label()), "Team", "Wins"),
        Grouping::Venue => (
            format!("Best Venues for {}", kind.label()),
            "Venue",
            "Matches",
        ),
        Grouping::TeamAndVenue => (
            format!("Top {} Teams by Venue", kind.label()),
            "Team @ Venue",
            "Wins",
        ),
    };

    AggregateTable::new(title, key_label, value_label)
        .with_rows(value_counts(keys.iter().map(String::as_str)))
}

/// Defend or chase rankings under every grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBreakdown {
    pub teams: AggregateTable,
    pub venues: AggregateTable,
    pub team_venues: AggregateTable,
}

pub fn result_breakdown(matches: &[MatchRecord], kind: ResultKind) -> ResultBreakdown {
    ResultBreakdown {
        teams: successful_results(matches, kind, Grouping::Team),
        venues: successful_results(matches, kind, Grouping::Venue),
        team_venues: successful_results(matches, kind, Grouping::TeamAndVenue),
    }
}

/// Size and coverage of the loaded data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub total_matches: usize,
    pub total_deliveries: usize,
    pub total_teams: usize,
    pub total_cities: usize,
    pub total_venues: usize,
    pub seasons_covered: usize,
    pub first_season: Option<u16>,
    pub last_season: Option<u16>,
}

pub fn dataset_overview(dataset: &Dataset) -> DatasetOverview {
    let matches = &dataset.matches;
    let teams: BTreeSet<&str> = matches
        .iter()
        .flat_map(|m| [m.team1.as_str(), m.team2.as_str()])
        .collect();
    let cities: BTreeSet<&str> = matches.iter().filter_map(|m| m.city.as_deref()).collect();
    let venues: BTreeSet<&str> = matches.iter().map(|m| m.venue.as_str()).collect();
    let seasons: BTreeSet<u16> = matches.iter().map(|m| m.season).collect();

    DatasetOverview {
        total_matches: matches.len(),
        total_deliveries: dataset.deliveries.len(),
        total_teams: teams.len(),
        total_cities: cities.len(),
        total_venues: venues.len(),
        seasons_covered: seasons.len(),
        first_season: seasons.first().copied(),
        last_season: seasons.last().copied(),
    }
}
