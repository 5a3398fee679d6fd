use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn the uploaded inputs into a dataset.
///
/// A load is atomic: when any input fails, no table is produced for any source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No input files were provided")]
    NoInputs,

    #[error("Source '{0}' was provided more than once")]
    DuplicateSource(String),

    #[error("Failed to read input file '{path}' for source '{source_label}'")]
    Io {
        source_label: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse the input for source '{source_label}' as delimited text")]
    CsvParse {
        source_label: String,
        #[source]
        source: PolarsError,
    },

    #[error("Input for source '{source_label}' has no '{column}' column")]
    MissingTimestampColumn { source_label: String, column: String },

    #[error("Could not parse column '{column}' of source '{source_label}' as date-times")]
    TimestampParse {
        source_label: String,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Source '{source_label}' has {count} non-numeric value(s) in column '{column}'")]
    ValueParse {
        source_label: String,
        column: String,
        count: usize,
    },

    #[error("Source '{source_label}' has {count} row(s) without a value in '{column}'")]
    NullTimestamps {
        source_label: String,
        column: String,
        count: usize,
    },

    #[error("Failed to merge the source tables")]
    Merge(#[source] PolarsError),
}
