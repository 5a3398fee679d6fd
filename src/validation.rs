use crate::types::chart_request::ChartKind;
use chrono::NaiveDate;
use thiserror::Error;

/// Invalid request parameters coming from the presentation layer.
///
/// A validation failure only rejects the request that produced it; the canonical
/// dataset that was loaded earlier stays usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Unknown source '{source_label}', available sources are: {}", available.join(", "))]
    UnknownSource {
        source_label: String,
        available: Vec<String>,
    },

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Could not resolve '{0}' to a calendar date")]
    DateParsing(String),

    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("Variable '{0}' is not a column of the loaded table")]
    ColumnNotInTable(String),

    #[error("A {kind} chart needs {expected} variable(s), got {found}")]
    VariableCount {
        kind: ChartKind,
        expected: &'static str,
        found: usize,
    },

    #[error("Histogram bin count must be at least 1, got {0}")]
    InvalidBinCount(usize),
}
