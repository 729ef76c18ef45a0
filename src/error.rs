use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors that stop a schedule from being produced or written.
///
/// Unfillable slots and validator conflicts are not errors; they are normal
/// outcomes reported through `Generated::unfilled` and `validator::Conflict`.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("The {0} table is empty")]
    EmptyTable(&'static str),

    #[error("Subject table has {subjects} rows but teacher table has {teachers}")]
    PairLengthMismatch { subjects: usize, teachers: usize },

    #[error("Start date {0} leaves no room for a five-day week")]
    DateOutOfRange(chrono::NaiveDate),

    #[error("Cannot read workbook {path}: {reason}")]
    Workbook { path: PathBuf, reason: String },

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Cannot write {path}: {reason}")]
    Export { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}
