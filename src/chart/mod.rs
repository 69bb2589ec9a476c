//! Chart catalogue and rendering.
//!
//! Each league statistic maps to one SVG file with a stable name. The
//! featured-player charts are added when a player profile is available.

mod renderer;

pub use renderer::{ChartRenderer, RenderedChart};

use crate::analysis::{LeagueSummary, PlayerProfile};
use crate::models::AggregateTable;
use std::collections::BTreeMap;

/// Shape of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Vertical bars in row order.
    Bar,
    /// Share of the total per row.
    Pie,
    /// Horizontal bars, first row on top.
    RankedBar,
}

pub const MAX_RUN_MARGIN: &str = "max_run_margin.svg";
pub const MAX_WICKET_MARGIN: &str = "max_wicket_margin.svg";
pub const MATCHES_PER_CITY: &str = "matches_per_city.svg";
pub const MATCHES_WON_BY_TEAM: &str = "matches_won_by_team.svg";
pub const TOSS_DECISIONS: &str = "toss_decision_distribution.svg";
pub const TOP_MOM_PLAYERS: &str = "top_mom_players.svg";
pub const TOP_SIX_HITTERS: &str = "top_six_hitters.svg";
pub const DL_PER_SEASON: &str = "dl_per_season.svg";
pub const TOP_DEFENDING_TEAMS: &str = "top_defending_teams.svg";
pub const TOP_CHASING_TEAMS: &str = "top_chasing_teams.svg";
pub const BEST_VENUES_DEFENDING: &str = "best_venues_defending.svg";
pub const BEST_VENUES_CHASING: &str = "best_venues_chasing.svg";

pub const PLAYER_SEASON_RUNS: &str = "player_season_runs.svg";
pub const PLAYER_TEAM_RUNS: &str = "player_team_runs.svg";
pub const PLAYER_PHASE_RUNS: &str = "player_phase_runs.svg";
pub const PLAYER_DISMISSALS: &str = "player_dismissals.svg";

/// Row caps applied to long tables before drawing.
#[derive(Debug, Clone, Copy)]
pub struct ChartLimits {
    pub cities: usize,
    pub rankings: usize,
}

/// One chart to draw.
#[derive(Debug, Clone)]
pub struct ChartJob {
    pub file_name: &'static str,
    pub kind: ChartKind,
    pub table: AggregateTable,
}

impl ChartJob {
    fn new(file_name: &'static str, kind: ChartKind, table: AggregateTable) -> Self {
        Self {
            file_name,
            kind,
            table,
        }
    }
}

/// The twelve league charts, in report order.
pub fn league_charts(summary: &LeagueSummary, limits: ChartLimits) -> Vec<ChartJob> {
    use ChartKind::*;
    let ranked = limits.rankings;
    vec![
        ChartJob::new(MAX_RUN_MARGIN, Bar, summary.max_run_margin.clone()),
        ChartJob::new(MAX_WICKET_MARGIN, Bar, summary.max_wicket_margin.clone()),
        ChartJob::new(TOSS_DECISIONS, Pie, summary.toss.decisions.clone()),
        ChartJob::new(DL_PER_SEASON, Bar, summary.weather.by_season.clone()),
        ChartJob::new(MATCHES_WON_BY_TEAM, Bar, summary.wins_by_team.clone()),
        ChartJob::new(TOP_DEFENDING_TEAMS, RankedBar, summary.defending.teams.head(ranked)),
        ChartJob::new(TOP_CHASING_TEAMS, RankedBar, summary.chasing.teams.head(ranked)),
        ChartJob::new(TOP_MOM_PLAYERS, RankedBar, summary.top_player_of_match.clone()),
        ChartJob::new(TOP_SIX_HITTERS, RankedBar, summary.top_six_hitters.clone()),
        ChartJob::new(MATCHES_PER_CITY, Bar, summary.matches_by_city.head(limits.cities)),
        ChartJob::new(BEST_VENUES_DEFENDING, RankedBar, summary.defending.venues.head(ranked)),
        ChartJob::new(BEST_VENUES_CHASING, RankedBar, summary.chasing.venues.head(ranked)),
    ]
}

/// The four career charts for a featured player.
pub fn player_charts(profile: &PlayerProfile) -> Vec<ChartJob> {
    let name = &profile.player;
    vec![
        ChartJob::new(
            PLAYER_SEASON_RUNS,
            ChartKind::Bar,
            PlayerProfile::runs_table(&profile.by_season, &format!("{} - Runs by Season", name), "Season"),
        ),
        ChartJob::new(
            PLAYER_TEAM_RUNS,
            ChartKind::RankedBar,
            PlayerProfile::runs_table(&profile.by_team, &format!("{} - Runs by Team", name), "Team"),
        ),
        ChartJob::new(
            PLAYER_PHASE_RUNS,
            ChartKind::Bar,
            PlayerProfile::runs_table(&profile.by_phase, &format!("{} - Runs by Phase", name), "Phase"),
        ),
        ChartJob::new(
            PLAYER_DISMISSALS,
            ChartKind::Pie,
            AggregateTable {
                title: format!("{} - Dismissal Patterns", name),
                ..profile.dismissals.clone()
            },
        ),
    ]
}

/// Charts that were written during this run, by file name.
#[derive(Debug, Clone, Default)]
pub struct ChartSet {
    charts: BTreeMap<String, RenderedChart>,
}

impl ChartSet {
    pub fn insert(&mut self, chart: RenderedChart) {
        self.charts.insert(chart.file_name.clone(), chart);
    }

    /// The chart written under `file_name`, if it still exists on disk.
    pub fn available(&self, file_name: &str) -> Option<&RenderedChart> {
        self.charts
            .get(file_name)
            .filter(|chart| chart.path.is_file())
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    /// Charts that only show the "No data available" placeholder.
    pub fn placeholders(&self) -> impl Iterator<Item = &RenderedChart> {
        self.charts.values().filter(|chart| chart.placeholder)
    }
}
