//! Career profile of a single batsman.
//!
//! Builds innings-level scores from the delivery table, then rolls them up
//! by season, team, innings and phase of play.

use super::aggregator::value_counts;
use crate::loader::Dataset;
use crate::models::AggregateTable;
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

/// Phase of a T20 innings, by over number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Overs 1-6.
    Powerplay,
    /// Overs 7-15.
    Middle,
    /// Overs 16-20.
    Death,
}

impl Phase {
    pub fn from_over(over: u8) -> Self {
        match over {
            0..=6 => Phase::Powerplay,
            7..=15 => Phase::Middle,
            _ => Phase::Death,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Powerplay => write!(f, "Powerplay"),
            Phase::Middle => write!(f, "Middle"),
            Phase::Death => write!(f, "Death"),
        }
    }
}

/// Runs, balls and dismissals over some slice of a career.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BattingLine {
    pub matches: usize,
    pub runs: u64,
    pub balls: u64,
    pub dismissals: u64,
}

impl BattingLine {
    /// Runs per dismissal; `None` if never dismissed.
    pub fn average(&self) -> Option<f64> {
        if self.dismissals == 0 {
            None
        } else {
            Some(self.runs as f64 / self.dismissals as f64)
        }
    }

    /// Runs per hundred balls faced.
    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            0.0
        } else {
            self.runs as f64 * 100.0 / self.balls as f64
        }
    }

    /// Average formatted to two decimals, or "-" when undefined.
    pub fn average_display(&self) -> String {
        self.average()
            .map(|a| format!("{:.2}", a))
            .unwrap_or_else(|| "-".to_string())
    }
}

/// A batting line with its grouping label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledLine {
    pub label: String,
    pub line: BattingLine,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Milestones {
    pub centuries: usize,
    pub half_centuries: usize,
    /// Up to five best innings scores, highest first.
    pub highest_scores: Vec<u64>,
}

/// Spread of innings scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Consistency {
    pub innings: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; zero with fewer than two innings.
    pub std_dev: f64,
    /// Standard deviation as a percentage of the mean.
    pub coefficient_of_variation: f64,
    pub scores_50_plus: usize,
    pub scores_30_plus: usize,
    pub ducks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub player: String,
    pub seasons: Vec<u16>,
    pub career: BattingLine,
    pub milestones: Milestones,
    pub by_season: Vec<LabeledLine>,
    pub by_team: Vec<LabeledLine>,
    pub by_innings: Vec<LabeledLine>,
    pub by_phase: Vec<LabeledLine>,
    pub dismissals: AggregateTable,
    pub consistency: Consistency,
    pub mom_awards: u64,
}

impl PlayerProfile {
    pub fn first_season(&self) -> Option<u16> {
        self.seasons.first().copied()
    }

    pub fn last_season(&self) -> Option<u16> {
        self.seasons.last().copied()
    }

    pub fn phase(&self, phase: Phase) -> Option<&BattingLine> {
        let label = phase.to_string();
        self.by_phase
            .iter()
            .find(|l| l.label == label)
            .map(|l| &l.line)
    }

    /// Runs per label as a chartable table.
    pub fn runs_table(lines: &[LabeledLine], title: &str, key_label: &str) -> AggregateTable {
        AggregateTable::new(title, key_label, "Runs")
            .with_rows(lines.iter().map(|l| (l.label.clone(), l.line.runs)))
    }
}

/// One batting innings.
struct Innings {
    match_id: u32,
    inning: u8,
    season: u16,
    team: String,
    runs: u64,
    balls: u64,
    dismissed: bool,
}

#[derive(Default)]
struct LineAcc {
    matches: HashSet<u32>,
    runs: u64,
    balls: u64,
    dismissals: u64,
}

impl LineAcc {
    fn add(&mut self, match_id: u32, runs: u64, balls: u64, dismissals: u64) {
        self.matches.insert(match_id);
        self.runs += runs;
        self.balls += balls;
        self.dismissals += dismissals;
    }

    fn finish(self) -> BattingLine {
        BattingLine {
            matches: self.matches.len(),
            runs: self.runs,
            balls: self.balls,
            dismissals: self.dismissals,
        }
    }
}

/// Career profile for `player`, or `None` if they never batted.
pub fn player_profile(dataset: &Dataset, player: &str) -> Option<PlayerProfile> {
    let seasons: HashMap<u32, u16> = dataset.matches.iter().map(|m| (m.id, m.season)).collect();

    let mut innings: Vec<Innings> = Vec::new();
    let mut innings_index: HashMap<(u32, u8), usize> = HashMap::new();
    let mut phases: BTreeMap<Phase, LineAcc> = BTreeMap::new();
    let mut dismissal_kinds: Vec<&str> = Vec::new();

    for d in &dataset.deliveries {
        let batting = d.batsman == player;
        let dismissed = d.player_dismissed.as_deref() == Some(player);
        if !batting && !dismissed {
            continue;
        }
        let Some(&season) = seasons.get(&d.match_id) else {
            continue;
        };

        let idx = *innings_index
            .entry((d.match_id, d.inning))
            .or_insert_with(|| {
                innings.push(Innings {
                    match_id: d.match_id,
                    inning: d.inning,
                    season,
                    team: d.batting_team.clone(),
                    runs: 0,
                    balls: 0,
                    dismissed: false,
                });
                innings.len() - 1
            });

        let runs = if batting { d.batsman_runs as u64 } else { 0 };
        let balls = u64::from(batting && d.counts_as_ball_faced());
        let entry = &mut innings[idx];
        entry.runs += runs;
        entry.balls += balls;
        if dismissed {
            entry.dismissed = true;
            dismissal_kinds.push(d.dismissal_kind.as_deref().unwrap_or("unknown"));
        }

        phases
            .entry(Phase::from_over(d.over))
            .or_default()
            .add(d.match_id, runs, balls, u64::from(dismissed));
    }

    if innings.is_empty() {
        return None;
    }

    let mut career = LineAcc::default();
    let mut by_season: BTreeMap<u16, LineAcc> = BTreeMap::new();
    let mut by_team: BTreeMap<&str, LineAcc> = BTreeMap::new();
    let mut by_innings: BTreeMap<u8, LineAcc> = BTreeMap::new();

    for inn in &innings {
        let out = u64::from(inn.dismissed);
        career.add(inn.match_id, inn.runs, inn.balls, out);
        by_season
            .entry(inn.season)
            .or_default()
            .add(inn.match_id, inn.runs, inn.balls, out);
        by_team
            .entry(inn.team.as_str())
            .or_default()
            .add(inn.match_id, inn.runs, inn.balls, out);
        if inn.inning <= 2 {
            by_innings
                .entry(inn.inning)
                .or_default()
                .add(inn.match_id, inn.runs, inn.balls, out);
        }
    }

    let mut team_lines: Vec<LabeledLine> = by_team
        .into_iter()
        .map(|(team, acc)| LabeledLine {
            label: team.to_string(),
            line: acc.finish(),
        })
        .collect();
    team_lines.sort_by_key(|l| std::cmp::Reverse(l.line.runs));

    let scores: Vec<u64> = innings.iter().map(|i| i.runs).collect();

    let mom_awards = dataset
        .matches
        .iter()
        .filter(|m| m.player_of_match.as_deref() == Some(player))
        .count() as u64;

    Some(PlayerProfile {
        player: player.to_string(),
        seasons: innings
            .iter()
            .map(|i| i.season)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
        career: career.finish(),
        milestones: milestones(&scores),
        by_season: by_season
            .into_iter()
            .map(|(season, acc)| LabeledLine {
                label: season.to_string(),
                line: acc.finish(),
            })
            .collect(),
        by_team: team_lines,
        by_innings: by_innings
            .into_iter()
            .map(|(inning, acc)| LabeledLine {
                label: match inning {
                    1 => "1st Innings".to_string(),
                    _ => "2nd Innings".to_string(),
                },
                line: acc.finish(),
            })
            .collect(),
        by_phase: phases
            .into_iter()
            .map(|(phase, acc)| LabeledLine {
                label: phase.to_string(),
                line: acc.finish(),
            })
            .collect(),
        dismissals: AggregateTable::new("Dismissal Patterns", "Dismissal", "Count")
            .with_rows(value_counts(dismissal_kinds)),
        consistency: consistency(&innings),
        mom_awards,
    })
}

fn milestones(scores: &[u64]) -> Milestones {
    let mut sorted = scores.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.truncate(5);

    Milestones {
        centuries: scores.iter().filter(|&&s| s >= 100).count(),
        half_centuries: scores.iter().filter(|&&s| (50..100).contains(&s)).count(),
        highest_scores: sorted,
    }
}

fn consistency(innings: &[Innings]) -> Consistency {
    let scores: Vec<f64> = innings.iter().map(|i| i.runs as f64).collect();
    if scores.is_empty() {
        return Consistency::default();
    }

    let mean = scores.iter().mean();
    let median = Data::new(scores.clone()).median();
    let std_dev = if scores.len() < 2 {
        0.0
    } else {
        scores.iter().std_dev()
    };
    let coefficient_of_variation = if mean > 0.0 {
        std_dev / mean * 100.0
    } else {
        0.0
    };

    Consistency {
        innings: scores.len(),
        mean,
        median,
        std_dev,
        coefficient_of_variation,
        scores_50_plus: innings.iter().filter(|i| i.runs >= 50).count(),
        scores_30_plus: innings.iter().filter(|i| i.runs >= 30).count(),
        ducks: innings.iter().filter(|i| i.runs == 0 && i.dismissed).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::fixtures::{make_delivery, make_match};
    use crate::models::DeliveryRecord;

    fn ball(match_id: u32, inning: u8, over: u8, batsman: &str, runs: u32) -> DeliveryRecord {
        DeliveryRecord {
            inning,
            over,
            ..make_delivery(match_id, batsman, runs)
        }
    }

    fn out(mut d: DeliveryRecord, player: &str, kind: &str) -> DeliveryRecord {
        d.player_dismissed = Some(player.to_string());
        d.dismissal_kind = Some(kind.to_string());
        d
    }

    fn dataset() -> Dataset {
        let mut m1 = make_match(1, "Mumbai", "Mumbai Indians", 20, 0);
        m1.player_of_match = Some("RG Sharma".to_string());
        let mut m2 = make_match(2, "Chennai", "Chennai Super Kings", 0, 5);
        m2.season = 2018;
        let m3 = make_match(3, "Delhi", "Mumbai Indians", 0, 4);

        let mut deliveries = Vec::new();
        // Match 1: 100 off 20 balls in the first innings, not out.
        for i in 0..10 {
            deliveries.push(ball(1, 1, 1 + i, "RG Sharma", 6));
            deliveries.push(ball(1, 1, 1 + i, "RG Sharma", 4));
        }
        // Match 2: 40 off 10 in the second innings, then caught.
        for _ in 0..10 {
            deliveries.push(ball(2, 2, 17, "RG Sharma", 4));
        }
        deliveries.push(out(ball(2, 2, 18, "RG Sharma", 0), "RG Sharma", "caught"));
        // Match 3: run out at the non-striker's end without facing.
        deliveries.push(out(ball(3, 1, 2, "Q de Kock", 1), "RG Sharma", "run out"));
        // Another batsman and a wide.
        deliveries.push(ball(3, 1, 2, "Q de Kock", 4));
        let mut wide = ball(3, 1, 3, "RG Sharma", 0);
        wide.wide_runs = 1;
        deliveries.push(wide);

        Dataset::from_records(vec![m1, m2, m3], deliveries)
    }

    #[test]
    fn test_unknown_player_has_no_profile() {
        assert!(player_profile(&dataset(), "Nobody").is_none());
    }

    #[test]
    fn test_career_totals() {
        let profile = player_profile(&dataset(), "RG Sharma").unwrap();

        assert_eq!(profile.career.matches, 3);
        assert_eq!(profile.career.runs, 140);
        // 20 + 11 balls; the wide does not count.
        assert_eq!(profile.career.balls, 31);
        assert_eq!(profile.career.dismissals, 2);
        assert_eq!(profile.career.average(), Some(70.0));
        assert_eq!(profile.seasons, vec![2017, 2018]);
        assert_eq!(profile.mom_awards, 1);
    }

    #[test]
    fn test_milestones_and_consistency() {
        let profile = player_profile(&dataset(), "RG Sharma").unwrap();

        assert_eq!(profile.milestones.centuries, 1);
        assert_eq!(profile.milestones.half_centuries, 0);
        assert_eq!(profile.milestones.highest_scores, vec![100, 40, 0]);

        let c = &profile.consistency;
        assert_eq!(c.innings, 3);
        assert!((c.mean - 140.0 / 3.0).abs() < 1e-9);
        assert!((c.median - 40.0).abs() < 1e-9);
        assert!(c.std_dev > 0.0);
        assert_eq!(c.scores_50_plus, 1);
        assert_eq!(c.scores_30_plus, 2);
        assert_eq!(c.ducks, 1);
    }

    #[test]
    fn test_breakdowns() {
        let profile = player_profile(&dataset(), "RG Sharma").unwrap();

        let seasons: Vec<_> = profile.by_season.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(seasons, vec!["2017", "2018"]);
        assert_eq!(profile.by_season[1].line.runs, 40);

        let death = profile.phase(Phase::Death).unwrap();
        assert_eq!(death.runs, 40);
        assert_eq!(death.dismissals, 1);
        assert!((death.strike_rate() - 40.0 * 100.0 / 11.0).abs() < 1e-9);

        assert_eq!(profile.by_innings[0].label, "1st Innings");
        assert_eq!(profile.by_innings[0].line.runs, 100);
        assert_eq!(profile.by_innings[1].line.dismissals, 1);

        assert_eq!(profile.dismissals.len(), 2);
        assert_eq!(profile.dismissals.total(), 2);
    }

    #[test]
    fn test_phase_from_over() {
        assert_eq!(Phase::from_over(1), Phase::Powerplay);
        assert_eq!(Phase::from_over(6), Phase::Powerplay);
        assert_eq!(Phase::from_over(7), Phase::Middle);
        assert_eq!(Phase::from_over(15), Phase::Middle);
        assert_eq!(Phase::from_over(16), Phase::Death);
    }

    #[test]
    fn test_batting_line_rates() {
        let line = BattingLine {
            matches: 2,
            runs: 90,
            balls: 60,
            dismissals: 0,
        };
        assert_eq!(line.average(), None);
        assert_eq!(line.average_display(), "-");
        assert!((line.strike_rate() - 150.0).abs() < 1e-9);
        assert_eq!(BattingLine::default().strike_rate(), 0.0);
    }
}
