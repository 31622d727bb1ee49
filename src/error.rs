//! Error type shared by the parsing and aggregation layers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("row {row} has {width} fields, column {index} ({column}) is out of range")]
    RowTooShort {
        row: usize,
        column: &'static str,
        index: usize,
        width: usize,
    },

    #[error("{region} ({date}): {attribute} is not a number")]
    MissingValue {
        region: String,
        date: String,
        attribute: &'static str,
    },

    #[error("{region} ({date}): total cases is zero, death ratio is undefined")]
    DivisionByZero { region: String, date: String },

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
