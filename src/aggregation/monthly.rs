use crate::columns::{
    ensure_columns, get_column, source_labels, COL_MONTH, COL_SOURCE, COL_TIMESTAMP, COL_YEAR,
};
use crate::error::SolarError;
use crate::types::traits::types::Month;
use crate::types::variable::Variable;
use log::debug;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean of the requested variables for one calendar month of one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMean {
    pub month: Month,
    pub source: String,
    /// `None` when every value of the variable is missing in that month.
    pub means: BTreeMap<Variable, Option<f64>>,
}

impl MonthlyMean {
    pub fn get(&self, variable: Variable) -> Option<f64> {
        self.means.get(&variable).copied().flatten()
    }
}

/// Resamples `df` to calendar months.
///
/// Rows are grouped by the year and month of their timestamp and by source; each group
/// yields one [`MonthlyMean`]. Records are sorted chronologically, then by source label.
/// Months without any row produce no record, and an empty frame produces an empty vector.
///
/// # Errors
///
/// Returns [`crate::ValidationError::ColumnNotInTable`] for a variable that is not a column
/// of `df`.
pub fn monthly_means(
    df: &DataFrame,
    variables: &[Variable],
) -> Result<Vec<MonthlyMean>, SolarError> {
    ensure_columns(df, variables)?;

    let aggs: Vec<Expr> = variables
        .iter()
        .map(|variable| col(variable.column_name()).mean())
        .collect();

    let grouped = df
        .clone()
        .lazy()
        .with_columns([
            col(COL_TIMESTAMP)
                .dt()
                .year()
                .cast(DataType::Int32)
                .alias(COL_YEAR),
            col(COL_TIMESTAMP)
                .dt()
                .month()
                .cast(DataType::UInt32)
                .alias(COL_MONTH),
        ])
        .group_by([col(COL_YEAR), col(COL_MONTH), col(COL_SOURCE)])
        .agg(aggs)
        .sort_by_exprs(
            [col(COL_YEAR), col(COL_MONTH), col(COL_SOURCE)],
            SortMultipleOptions::default(),
        )
        .collect()?;

    let years = get_column(&grouped, COL_YEAR)?.i32()?;
    let months = get_column(&grouped, COL_MONTH)?.u32()?;
    let sources = source_labels(&grouped)?;
    let columns = variables
        .iter()
        .map(|variable| -> Result<_, SolarError> {
            Ok((*variable, get_column(&grouped, variable.column_name())?.f64()?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(grouped.height());
    for (idx, source) in sources.into_iter().enumerate() {
        let (Some(year), Some(month)) = (years.get(idx), months.get(idx)) else {
            continue;
        };
        let means = columns
            .iter()
            .map(|(variable, values)| (*variable, values.get(idx)))
            .collect();
        records.push(MonthlyMean {
            month: Month(year, month),
            source,
            means,
        });
    }
    debug!("Resampled {} rows into {} monthly records", df.height(), records.len());

    Ok(records)
}
