//! Column schema for the two input files and typed field access.

use crate::error::DataFormatError;
use csv::StringRecord;
use std::collections::HashMap;
use std::str::FromStr;

pub const MATCH_COLUMNS: &[&str] = &[
    "id",
    "season",
    "city",
    "team1",
    "team2",
    "toss_winner",
    "toss_decision",
    "winner",
    "win_by_runs",
    "win_by_wickets",
    "dl_applied",
    "player_of_match",
    "venue",
];

pub const DELIVERY_COLUMNS: &[&str] = &[
    "match_id",
    "inning",
    "batting_team",
    "bowling_team",
    "over",
    "ball",
    "batsman",
    "bowler",
    "batsman_runs",
    "total_runs",
    "player_dismissed",
    "dismissal_kind",
];

/// Outcome of reading one field of one row.
pub enum Field<T> {
    Value(T),
    Empty,
}

/// Header lookup for one file; resolves column names to record positions.
pub struct ColumnIndex {
    file: String,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Index the header row, failing on the first required column that is absent.
    pub fn new(file: &str, headers: &StringRecord, required: &[&str]) -> Result<Self, DataFormatError> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();

        if let Some(missing) = required.iter().find(|c| !positions.contains_key(**c)) {
            return Err(DataFormatError::MissingColumn {
                file: file.to_string(),
                column: missing.to_string(),
            });
        }

        Ok(Self {
            file: file.to_string(),
            positions,
        })
    }

    pub fn has(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Trimmed text of a column, `None` when empty or the column is absent.
    pub fn text<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        let pos = *self.positions.get(column)?;
        let value = record.get(pos)?.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("NA") {
            None
        } else {
            Some(value)
        }
    }

    pub fn string(&self, record: &StringRecord, column: &str) -> Field<String> {
        match self.text(record, column) {
            Some(v) => Field::Value(v.to_string()),
            None => Field::Empty,
        }
    }

    /// Parse a numeric column. Empty is not an error; garbage is.
    pub fn number<T: FromStr>(
        &self,
        record: &StringRecord,
        row: usize,
        column: &str,
    ) -> Result<Field<T>, DataFormatError> {
        let Some(raw) = self.text(record, column) else {
            return Ok(Field::Empty);
        };
        // Some exports write integers as floats ("3.0").
        let cleaned = raw.strip_suffix(".0").unwrap_or(raw);
        cleaned
            .parse::<T>()
            .map(Field::Value)
            .map_err(|_| self.malformed(row, column, raw, "an unsigned integer"))
    }

    /// Parse a 0/1 or true/false flag.
    pub fn flag(&self, record: &StringRecord, row: usize, column: &str) -> Result<Field<bool>, DataFormatError> {
        let Some(raw) = self.text(record, column) else {
            return Ok(Field::Empty);
        };
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(Field::Value(true)),
            "0" | "false" => Ok(Field::Value(false)),
            _ => Err(self.malformed(row, column, raw, "0/1 or true/false")),
        }
    }

    fn malformed(&self, row: usize, column: &str, value: &str, expected: &'static str) -> DataFormatError {
        DataFormatError::MalformedValue {
            file: self.file.clone(),
            row,
            column: column.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> StringRecord {
        StringRecord::from(vec!["id", " season ", "city"])
    }

    #[test]
    fn test_missing_required_column() {
        let err = ColumnIndex::new("matches.csv", &headers(), &["id", "winner"])
            .err()
            .unwrap();
        assert!(matches!(
            err,
            DataFormatError::MissingColumn { ref column, .. } if column == "winner"
        ));
    }

    #[test]
    fn test_header_names_are_trimmed() {
        let index = ColumnIndex::new("matches.csv", &headers(), &["season"]).unwrap();
        assert!(index.has("season"));
    }

    #[test]
    fn test_number_parsing() {
        let index = ColumnIndex::new("matches.csv", &headers(), &[]).unwrap();
        let record = StringRecord::from(vec!["7", "2017.0", ""]);

        assert!(matches!(index.number::<u32>(&record, 1, "id").unwrap(), Field::Value(7)));
        assert!(matches!(
            index.number::<u16>(&record, 1, "season").unwrap(),
            Field::Value(2017)
        ));
        assert!(matches!(index.number::<u32>(&record, 1, "city").unwrap(), Field::Empty));

        let bad = StringRecord::from(vec!["seven", "2017", ""]);
        let err = index.number::<u32>(&bad, 3, "id").err().unwrap();
        assert!(err.to_string().contains("row 3"));
        assert!(err.to_string().contains("'seven'"));
    }

    #[test]
    fn test_flag_parsing() {
        let index = ColumnIndex::new("m.csv", &StringRecord::from(vec!["dl_applied"]), &[]).unwrap();
        let yes = StringRecord::from(vec!["1"]);
        let no = StringRecord::from(vec!["FALSE"]);
        let bad = StringRecord::from(vec!["maybe"]);

        assert!(matches!(index.flag(&yes, 1, "dl_applied").unwrap(), Field::Value(true)));
        assert!(matches!(index.flag(&no, 1, "dl_applied").unwrap(), Field::Value(false)));
        assert!(index.flag(&bad, 1, "dl_applied").is_err());
    }
}
