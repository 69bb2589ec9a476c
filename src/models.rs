//! Data models for the league statistics pipeline.
//!
//! This module contains the row types loaded from the input CSVs and the
//! aggregate table type that every statistic produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a match result was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResultMethod {
    /// Played to completion (or decided without a revised target).
    #[default]
    Normal,
    /// Target revised by the Duckworth-Lewis method after a weather interruption.
    DuckworthLewis,
}

impl fmt::Display for ResultMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultMethod::Normal => write!(f, "Normal"),
            ResultMethod::DuckworthLewis => write!(f, "D/L"),
        }
    }
}

/// Margin of victory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum WinMargin {
    /// The side batting first won (defended a target).
    Runs(u32),
    /// The side batting second won (chased a target).
    Wickets(u32),
}

impl fmt::Display for WinMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinMargin::Runs(n) => write!(f, "{} runs", n),
            WinMargin::Wickets(n) => write!(f, "{} wickets", n),
        }
    }
}

/// One row of `matches.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: u32,
    pub season: u16,
    pub city: Option<String>,
    pub date: Option<String>,
    pub team1: String,
    pub team2: String,
    pub toss_winner: String,
    pub toss_decision: String,
    /// None for abandoned / no-result matches.
    pub winner: Option<String>,
    pub win_by_runs: u32,
    pub win_by_wickets: u32,
    pub method: ResultMethod,
    pub player_of_match: Option<String>,
    pub venue: String,
}

impl MatchRecord {
    /// Returns the margin of victory, if the match had a winner by runs or wickets.
    pub fn margin(&self) -> Option<WinMargin> {
        if self.win_by_runs > 0 {
            Some(WinMargin::Runs(self.win_by_runs))
        } else if self.win_by_wickets > 0 {
            Some(WinMargin::Wickets(self.win_by_wickets))
        } else {
            None
        }
    }

    pub fn toss_winner_won(&self) -> bool {
        self.winner.as_deref() == Some(self.toss_winner.as_str())
    }

    pub fn is_weather_affected(&self) -> bool {
        self.method == ResultMethod::DuckworthLewis
    }
}

/// One row of `deliveries.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub match_id: u32,
    pub inning: u8,
    pub batting_team: String,
    pub bowling_team: String,
    pub over: u8,
    pub ball: u8,
    pub batsman: String,
    pub bowler: String,
    pub batsman_runs: u32,
    pub total_runs: u32,
    /// Zero when the input has no `wide_runs` column.
    pub wide_runs: u32,
    pub player_dismissed: Option<String>,
    pub dismissal_kind: Option<String>,
}

impl DeliveryRecord {
    pub fn is_six(&self) -> bool {
        self.batsman_runs == 6
    }

    /// Wides are not counted as balls faced by the batsman.
    pub fn counts_as_ball_faced(&self) -> bool {
        self.wide_runs == 0
    }
}

/// A single grouped measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub key: String,
    pub value: u64,
}

/// A grouping key mapped to a numeric measure, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTable {
    /// Human-readable name, also used in warnings and chart captions.
    pub title: String,
    /// Column header for the grouping key.
    pub key_label: String,
    /// Column header for the measure.
    pub value_label: String,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn new(
        title: impl Into<String>,
        key_label: impl Into<String>,
        value_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            key_label: key_label.into(),
            value_label: value_label.into(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from already-ordered `(key, value)` pairs.
    pub fn with_rows(mut self, rows: impl IntoIterator<Item = (String, u64)>) -> Self {
        self.rows = rows
            .into_iter()
            .map(|(key, value)| AggregateRow { key, value })
            .collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn first(&self) -> Option<&AggregateRow> {
        self.rows.first()
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.value).sum()
    }

    pub fn max_value(&self) -> u64 {
        self.rows.iter().map(|r| r.value).max().unwrap_or(0)
    }

    /// Copy of this table keeping only the first `n` rows.
    pub fn head(&self, n: usize) -> AggregateTable {
        AggregateTable {
            rows: self.rows.iter().take(n).cloned().collect(),
            ..self.clone()
        }
    }

    /// Keys of the first `n` rows joined with ", ", or "N/A" when empty.
    pub fn leading_keys(&self, n: usize) -> String {
        if self.rows.is_empty() {
            return "N/A".to_string();
        }
        self.rows
            .iter()
            .take(n)
            .map(|r| r.key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
