//! Error and warning taxonomy.
//!
//! Input problems are `DataFormatError`, output problems are `OutputError`.
//! Both are fatal and bubble up to `main`. `AnalysisWarning` is the only
//! non-fatal kind: it is collected during aggregation and surfaced in the
//! reports.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// A problem with one of the input CSV files.
#[derive(Error, Debug)]
pub enum DataFormatError {
    /// A required column is absent from the header row.
    #[error("{file}: missing required column '{column}'")]
    MissingColumn { file: String, column: String },

    /// A field is present but cannot be parsed as the expected type.
    #[error("{file}: row {row}: column '{column}' has malformed value '{value}' (expected {expected})")]
    MalformedValue {
        file: String,
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    /// The file cannot be opened or is not valid CSV.
    #[error("{file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
}

/// A problem writing a generated artifact.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },
}

impl OutputError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OutputError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Non-fatal conditions raised while aggregating.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// An aggregate came out with zero rows.
    #[error("no data for '{table}'")]
    EmptyResult { table: String },

    /// The featured player never batted in the loaded data.
    #[error("player '{player}' not found in deliveries")]
    PlayerNotFound { player: String },
}
