//! CSV loading and validation.
//!
//! Reads `matches.csv` and `deliveries.csv` into typed records. Only
//! column-presence and type checks happen here: rows missing a required
//! field are dropped and counted, malformed values abort the load, and
//! deliveries pointing at unknown matches are filtered out.

mod schema;

pub use schema::{DELIVERY_COLUMNS, MATCH_COLUMNS};

use crate::error::DataFormatError;
use crate::models::{DeliveryRecord, MatchRecord, ResultMethod};
use csv::StringRecord;
use schema::{ColumnIndex, Field};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Row and column figures for one loaded file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableStats {
    pub file: String,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
    pub columns: usize,
    /// Empty-cell counts per header column, in header order.
    pub missing_values: Vec<(String, usize)>,
}

impl TableStats {
    /// Columns with at least one empty cell.
    pub fn columns_with_gaps(&self) -> Vec<&(String, usize)> {
        self.missing_values.iter().filter(|(_, n)| *n > 0).collect()
    }
}

/// What the loader saw while reading both files.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub matches: TableStats,
    pub deliveries: TableStats,
    /// Deliveries removed because their match id is not in the matches file.
    pub orphan_deliveries: usize,
}

/// Both input tables, validated and cross-checked.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub matches: Vec<MatchRecord>,
    pub deliveries: Vec<DeliveryRecord>,
    pub report: LoadReport,
}

impl Dataset {
    /// Build a dataset from in-memory records, applying the same
    /// referential-integrity filter as a file load.
    #[cfg(test)]
    pub fn from_records(matches: Vec<MatchRecord>, deliveries: Vec<DeliveryRecord>) -> Self {
        let matches_stats = TableStats {
            file: "<memory>".to_string(),
            rows_read: matches.len(),
            rows_kept: matches.len(),
            columns: MATCH_COLUMNS.len(),
            ..TableStats::default()
        };
        let deliveries_stats = TableStats {
            file: "<memory>".to_string(),
            rows_read: deliveries.len(),
            rows_kept: deliveries.len(),
            columns: DELIVERY_COLUMNS.len(),
            ..TableStats::default()
        };
        Self::assemble(matches, deliveries, matches_stats, deliveries_stats)
    }

    fn assemble(
        matches: Vec<MatchRecord>,
        deliveries: Vec<DeliveryRecord>,
        matches_stats: TableStats,
        mut deliveries_stats: TableStats,
    ) -> Self {
        let (deliveries, orphans) = retain_known_matches(&matches, deliveries);
        if orphans > 0 {
            warn!(
                "Excluded {} deliveries referencing unknown match ids",
                orphans
            );
            deliveries_stats.rows_kept = deliveries.len();
        }

        Self {
            matches,
            deliveries,
            report: LoadReport {
                matches: matches_stats,
                deliveries: deliveries_stats,
                orphan_deliveries: orphans,
            },
        }
    }

    /// The first `n` rows of each table.
    pub fn sample(&self, n: usize) -> (&[MatchRecord], &[DeliveryRecord]) {
        let m = n.min(self.matches.len());
        let d = n.min(self.deliveries.len());
        (&self.matches[..m], &self.deliveries[..d])
    }
}

/// Loads the two input files.
#[derive(Debug, Clone)]
pub struct DataLoader {
    matches_path: PathBuf,
    deliveries_path: PathBuf,
}

impl DataLoader {
    pub fn new(matches_path: impl Into<PathBuf>, deliveries_path: impl Into<PathBuf>) -> Self {
        Self {
            matches_path: matches_path.into(),
            deliveries_path: deliveries_path.into(),
        }
    }

    /// Loader for `<dir>/matches.csv` and `<dir>/deliveries.csv`.
    #[allow(dead_code)] // Convenience constructor used by tests
    pub fn from_dir(dir: &Path) -> Self {
        Self::new(dir.join("matches.csv"), dir.join("deliveries.csv"))
    }

    pub fn load(&self) -> Result<Dataset, DataFormatError> {
        info!("Loading matches from {}", self.matches_path.display());
        let (matches, matches_stats) = load_matches(&self.matches_path)?;

        info!("Loading deliveries from {}", self.deliveries_path.display());
        let (deliveries, deliveries_stats) = load_deliveries(&self.deliveries_path)?;

        info!(
            "Loaded {} matches and {} deliveries",
            matches.len(),
            deliveries.len()
        );

        Ok(Dataset::assemble(
            matches,
            deliveries,
            matches_stats,
            deliveries_stats,
        ))
    }
}

/// Split deliveries into those with a known match id and a count of the rest.
fn retain_known_matches(
    matches: &[MatchRecord],
    deliveries: Vec<DeliveryRecord>,
) -> (Vec<DeliveryRecord>, usize) {
    let known: HashSet<u32> = matches.iter().map(|m| m.id).collect();
    let before = deliveries.len();
    let kept: Vec<DeliveryRecord> = deliveries
        .into_iter()
        .filter(|d| known.contains(&d.match_id))
        .collect();
    let orphans = before - kept.len();
    (kept, orphans)
}

/// Unwraps a required field or skips the row.
macro_rules! required {
    ($field:expr) => {
        match $field {
            Field::Value(v) => v,
            Field::Empty => return Ok(None),
        }
    };
}

fn optional<T>(field: Field<T>) -> Option<T> {
    match field {
        Field::Value(v) => Some(v),
        Field::Empty => None,
    }
}

fn load_matches(path: &Path) -> Result<(Vec<MatchRecord>, TableStats), DataFormatError> {
    read_table(path, MATCH_COLUMNS, parse_match)
}

fn load_deliveries(path: &Path) -> Result<(Vec<DeliveryRecord>, TableStats), DataFormatError> {
    read_table(path, DELIVERY_COLUMNS, parse_delivery)
}

/// Shared read loop: header validation, missing-value counts, row parsing.
fn read_table<T>(
    path: &Path,
    required: &[&str],
    parse: fn(&ColumnIndex, &StringRecord, usize) -> Result<Option<T>, DataFormatError>,
) -> Result<(Vec<T>, TableStats), DataFormatError> {
    let file = path.display().to_string();
    let csv_err = |source: csv::Error| DataFormatError::Csv {
        file: file.clone(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    let index = ColumnIndex::new(&file, &headers, required)?;

    let mut stats = TableStats {
        file: file.clone(),
        columns: headers.len(),
        missing_values: headers.iter().map(|h| (h.trim().to_string(), 0)).collect(),
        ..TableStats::default()
    };

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 2);
        stats.rows_read += 1;

        for (col, value) in record.iter().enumerate() {
            let value = value.trim();
            if value.is_empty() || value.eq_ignore_ascii_case("NA") {
                if let Some(slot) = stats.missing_values.get_mut(col) {
                    slot.1 += 1;
                }
            }
        }

        match parse(&index, &record, row)? {
            Some(parsed) => rows.push(parsed),
            None => {
                debug!("{}: dropping row {} with a missing required field", file, row);
                stats.rows_dropped += 1;
            }
        }
    }

    stats.rows_kept = rows.len();
    Ok((rows, stats))
}

fn parse_match(
    index: &ColumnIndex,
    record: &StringRecord,
    row: usize,
) -> Result<Option<MatchRecord>, DataFormatError> {
    let id = required!(index.number::<u32>(record, row, "id")?);
    let season = required!(index.number::<u16>(record, row, "season")?);
    let win_by_runs = required!(index.number::<u32>(record, row, "win_by_runs")?);
    let win_by_wickets = required!(index.number::<u32>(record, row, "win_by_wickets")?);
    let dl_applied = required!(index.flag(record, row, "dl_applied")?);

    Ok(Some(MatchRecord {
        id,
        season,
        city: optional(index.string(record, "city")),
        date: optional(index.string(record, "date")),
        team1: required!(index.string(record, "team1")),
        team2: required!(index.string(record, "team2")),
        toss_winner: required!(index.string(record, "toss_winner")),
        toss_decision: required!(index.string(record, "toss_decision")),
        winner: optional(index.string(record, "winner")),
        win_by_runs,
        win_by_wickets,
        method: if dl_applied {
            ResultMethod::DuckworthLewis
        } else {
            ResultMethod::Normal
        },
        player_of_match: optional(index.string(record, "player_of_match")),
        venue: required!(index.string(record, "venue")),
    }))
}

fn parse_delivery(
    index: &ColumnIndex,
    record: &StringRecord,
    row: usize,
) -> Result<Option<DeliveryRecord>, DataFormatError> {
    let match_id = required!(index.number::<u32>(record, row, "match_id")?);
    let inning = required!(index.number::<u8>(record, row, "inning")?);
    let over = required!(index.number::<u8>(record, row, "over")?);
    let ball = required!(index.number::<u8>(record, row, "ball")?);
    let batsman_runs = required!(index.number::<u32>(record, row, "batsman_runs")?);
    let total_runs = required!(index.number::<u32>(record, row, "total_runs")?);
    let wide_runs = if index.has("wide_runs") {
        optional(index.number::<u32>(record, row, "wide_runs")?).unwrap_or(0)
    } else {
        0
    };

    Ok(Some(DeliveryRecord {
        match_id,
        inning,
        batting_team: required!(index.string(record, "batting_team")),
        bowling_team: required!(index.string(record, "bowling_team")),
        over,
        ball,
        batsman: required!(index.string(record, "batsman")),
        bowler: required!(index.string(record, "bowler")),
        batsman_runs,
        total_runs,
        wide_runs,
        player_dismissed: optional(index.string(record, "player_dismissed")),
        dismissal_kind: optional(index.string(record, "dismissal_kind")),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MATCH_HEADER: &str = "id,season,city,date,team1,team2,toss_winner,toss_decision,result,dl_applied,winner,win_by_runs,win_by_wickets,player_of_match,venue";
    const DELIVERY_HEADER: &str = "match_id,inning,batting_team,bowling_team,over,ball,batsman,non_striker,bowler,wide_runs,batsman_runs,total_runs,player_dismissed,dismissal_kind";

    fn csv_body(header: &str, rows: &[&str]) -> String {
        let mut body = format!("{}\n", header);
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        body
    }

    fn write_files(dir: &TempDir, matches: &[&str], deliveries: &[&str]) -> DataLoader {
        std::fs::write(dir.path().join("matches.csv"), csv_body(MATCH_HEADER, matches)).unwrap();
        std::fs::write(
            dir.path().join("deliveries.csv"),
            csv_body(DELIVERY_HEADER, deliveries),
        )
        .unwrap();
        DataLoader::from_dir(dir.path())
    }

    #[test]
    fn test_load_valid_files() {
        let dir = TempDir::new().unwrap();
        let loader = write_files(
            &dir,
            &[
                "1,2017,Hyderabad,2017-04-05,SRH,RCB,RCB,field,normal,0,SRH,35,0,Yuvraj Singh,Uppal",
                "2,2017,Pune,2017-04-06,MI,RPS,RPS,field,normal,1,RPS,0,7,SPD Smith,MCA Stadium",
            ],
            &[
                "1,1,SRH,RCB,1,1,DA Warner,S Dhawan,TS Mills,0,6,6,,",
                "2,2,RPS,MI,1,1,AM Rahane,MA Agarwal,TG Southee,1,0,1,,",
            ],
        );

        let dataset = loader.load().unwrap();
        assert_eq!(dataset.matches.len(), 2);
        assert_eq!(dataset.deliveries.len(), 2);
        assert_eq!(dataset.matches[1].method, ResultMethod::DuckworthLewis);
        assert_eq!(dataset.deliveries[1].wide_runs, 1);
        assert_eq!(dataset.report.matches.columns, 15);
        assert_eq!(dataset.report.orphan_deliveries, 0);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("matches.csv"),
            "id,season,city\n1,2017,Hyderabad\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("deliveries.csv"), format!("{}\n", DELIVERY_HEADER)).unwrap();

        let err = DataLoader::from_dir(dir.path()).load().unwrap_err();
        match err {
            DataFormatError::MissingColumn { file, column } => {
                assert!(file.ends_with("matches.csv"));
                assert_eq!(column, "team1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rows_missing_required_fields_are_dropped() {
        let dir = TempDir::new().unwrap();
        let loader = write_files(
            &dir,
            &[
                "1,2017,Hyderabad,,SRH,RCB,RCB,field,normal,0,SRH,35,0,Yuvraj Singh,Uppal",
                // No venue.
                "2,2017,Pune,,MI,RPS,RPS,field,normal,0,RPS,0,7,SPD Smith,",
                // No-result match: winner and player_of_match are optional.
                "3,2017,,,GL,KKR,KKR,field,no result,0,,0,0,,Eden Gardens",
            ],
            &[],
        );

        let dataset = loader.load().unwrap();
        let stats = &dataset.report.matches;
        assert_eq!(stats.rows_read, 3);
        assert_eq!(stats.rows_dropped, 1);
        assert_eq!(stats.rows_kept, 2);
        assert_eq!(dataset.matches.len(), stats.rows_read - stats.rows_dropped);
        assert_eq!(dataset.matches[1].winner, None);
        assert_eq!(dataset.matches[1].city, None);

        let gaps: Vec<_> = stats.columns_with_gaps().into_iter().map(|(c, _)| c.as_str()).collect();
        assert!(gaps.contains(&"venue"));
        assert!(gaps.contains(&"winner"));
    }

    #[test]
    fn test_malformed_number_names_file_and_column() {
        let dir = TempDir::new().unwrap();
        let loader = write_files(
            &dir,
            &["1,2017,Hyderabad,,SRH,RCB,RCB,field,normal,0,SRH,lots,0,Yuvraj Singh,Uppal"],
            &[],
        );

        let err = loader.load().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("matches.csv"));
        assert!(msg.contains("win_by_runs"));
        assert!(msg.contains("'lots'"));
    }

    #[test]
    fn test_orphan_deliveries_are_excluded() {
        let dir = TempDir::new().unwrap();
        let loader = write_files(
            &dir,
            &["1,2017,Hyderabad,,SRH,RCB,RCB,field,normal,0,SRH,35,0,Yuvraj Singh,Uppal"],
            &[
                "1,1,SRH,RCB,1,1,DA Warner,S Dhawan,TS Mills,0,6,6,,",
                "99,1,XI,YI,1,1,Ghost,Other,Nobody,0,6,6,,",
            ],
        );

        let dataset = loader.load().unwrap();
        assert_eq!(dataset.deliveries.len(), 1);
        assert_eq!(dataset.report.orphan_deliveries, 1);
        assert_eq!(dataset.report.deliveries.rows_read, 2);
        assert_eq!(dataset.report.deliveries.rows_kept, 1);
        assert!(dataset.deliveries.iter().all(|d| d.match_id == 1));
    }

    #[test]
    fn test_missing_file_is_csv_error() {
        let dir = TempDir::new().unwrap();
        let err = DataLoader::from_dir(dir.path()).load().unwrap_err();
        assert!(matches!(err, DataFormatError::Csv { .. }));
    }

    #[test]
    fn test_sample_is_bounded() {
        let dataset = Dataset::from_records(Vec::new(), Vec::new());
        let (m, d) = dataset.sample(5);
        assert!(m.is_empty());
        assert!(d.is_empty());
    }
}
