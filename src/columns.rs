//! Column names of the canonical table and helpers to pull typed values out of a `DataFrame`.

use crate::error::SolarError;
use crate::types::variable::Variable;
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_SOURCE: &str = "source";

// Helper columns used while resampling
pub(crate) const COL_YEAR: &str = "year";
pub(crate) const COL_MONTH: &str = "month";

/// Retrieves a column by name from a DataFrame.
pub(crate) fn get_column<'a>(df: &'a DataFrame, col: &str) -> Result<&'a Column, SolarError> {
    df.column(col)
        .map_err(|e| SolarError::ColumnNotFound(col.to_string(), e))
}

/// Values of a measurement column, `None` where missing.
pub(crate) fn float_values(
    df: &DataFrame,
    variable: Variable,
) -> Result<Vec<Option<f64>>, SolarError> {
    let column = get_column(df, variable.column_name())?;
    Ok(column.f64()?.into_iter().collect())
}

/// Source label of every row.
pub(crate) fn source_labels(df: &DataFrame) -> Result<Vec<String>, SolarError> {
    let column = get_column(df, COL_SOURCE)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|label| label.unwrap_or_default().to_string())
        .collect())
}

/// Observation time of every row.
pub(crate) fn timestamps(df: &DataFrame) -> Result<Vec<NaiveDateTime>, SolarError> {
    let dt_col: &DatetimeChunked = get_column(df, COL_TIMESTAMP)?.datetime()?;
    let time_unit = dt_col.time_unit();

    dt_col
        .into_iter()
        .map(|value| {
            value
                .and_then(|v| to_naive(v, time_unit))
                .ok_or_else(|| SolarError::UnexpectedData {
                    column: COL_TIMESTAMP.to_string(),
                    message: format!("invalid or missing timestamp {:?}", value),
                })
        })
        .collect()
}

fn to_naive(value: i64, time_unit: TimeUnit) -> Option<NaiveDateTime> {
    match time_unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
    }
    .map(|dt| dt.naive_utc())
}

/// Measurement column `name` with NaN and infinite values turned into nulls, so they count
/// as missing.
pub(crate) fn finite_or_null(name: &str) -> Expr {
    when(col(name).is_finite())
        .then(col(name))
        .otherwise(lit(NULL).cast(DataType::Float64))
        .alias(name)
}

/// Fails with a validation error if any of the variables is not a column of `df`.
pub(crate) fn ensure_columns(df: &DataFrame, variables: &[Variable]) -> Result<(), SolarError> {
    for variable in variables {
        if df.column(variable.column_name()).is_err() {
            return Err(crate::ValidationError::ColumnNotInTable(
                variable.column_name().to_string(),
            )
            .into());
        }
    }
    Ok(())
}
