//! Group-wise mean imputation.
//!
//! Filling happens in two explicit steps: [`GroupMeans::compute`] aggregates one mean per
//! (source, variable) group, then [`impute_group_means`] applies those means to the missing
//! cells of their own group only. Rows of different sources are never averaged together.

use crate::cleaning::warning::{ImputationReport, ImputationWarning};
use crate::columns::{ensure_columns, finite_or_null, get_column, source_labels, COL_SOURCE};
use crate::error::SolarError;
use crate::types::variable::Variable;
use log::{debug, info, warn};
use polars::prelude::*;
use std::collections::HashMap;

/// Per-group statistics used to fill one (source, variable) group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStat {
    /// Mean over the observed values; `None` when the group has no observed value.
    pub mean: Option<f64>,
    /// Number of missing cells in the group.
    pub missing: usize,
}

/// Lookup from (source, variable) to the statistics needed to fill that group.
#[derive(Debug, Clone, Default)]
pub struct GroupMeans {
    sources: Vec<String>,
    stats: HashMap<(String, Variable), GroupStat>,
}

impl GroupMeans {
    /// Aggregates the mean and the missing count of every variable, per source.
    ///
    /// Sources are listed in order of first appearance. NaN and infinite values count as
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ValidationError::ColumnNotInTable`] if a variable is not a column of `df`.
    pub fn compute(df: &DataFrame, variables: &[Variable]) -> Result<Self, SolarError> {
        ensure_columns(df, variables)?;

        let aggs: Vec<Expr> = variables
            .iter()
            .flat_map(|variable| {
                let name = variable.column_name();
                [
                    col(name).mean().alias(name),
                    col(name)
                        .null_count()
                        .cast(DataType::UInt64)
                        .alias(missing_alias(*variable)),
                ]
            })
            .collect();

        let finite: Vec<Expr> = variables
            .iter()
            .map(|variable| finite_or_null(variable.column_name()))
            .collect();

        let grouped = df
            .clone()
            .lazy()
            .with_columns(finite)
            .group_by_stable([col(COL_SOURCE)])
            .agg(aggs)
            .collect()?;

        let sources = source_labels(&grouped)?;
        let mut stats = HashMap::new();
        for variable in variables {
            let means = get_column(&grouped, variable.column_name())?.f64()?;
            let missing = get_column(&grouped, &missing_alias(*variable))?.u64()?;
            for (idx, source) in sources.iter().enumerate() {
                stats.insert(
                    (source.clone(), *variable),
                    GroupStat {
                        mean: means.get(idx),
                        missing: missing.get(idx).unwrap_or(0) as usize,
                    },
                );
            }
        }
        debug!(
            "Computed group means for {} source(s) and {} variable(s)",
            sources.len(),
            variables.len()
        );

        Ok(Self { sources, stats })
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn get(&self, source: &str, variable: Variable) -> Option<GroupStat> {
        self.stats.get(&(source.to_string(), variable)).copied()
    }

    /// The fill value of a group, `None` if it is unknown or the group has no observations.
    pub fn mean(&self, source: &str, variable: Variable) -> Option<f64> {
        self.get(source, variable).and_then(|stat| stat.mean)
    }
}

fn missing_alias(variable: Variable) -> String {
    format!("{}__missing", variable.column_name())
}

/// Result of [`impute_group_means`]: the new frame and what happened to it.
#[derive(Debug, Clone)]
pub struct Imputation {
    pub frame: DataFrame,
    pub report: ImputationReport,
}

/// Replaces every missing value of the target variables with the mean of its source group.
///
/// NaN and infinite cells are treated as missing and filled like empty ones, so the result
/// never contains a non-finite value in a target column.
///
/// Groups without any observed value keep their missing cells and produce one
/// [`ImputationWarning`] each. The input frame is not modified. Running this on an already
/// imputed frame changes no cell.
///
/// # Errors
///
/// Returns [`crate::ValidationError::ColumnNotInTable`] if a target variable is not a column of
/// `df`, and [`SolarError::DataFrameProcessing`] if Polars fails.
pub fn impute_group_means(
    df: &DataFrame,
    variables: &[Variable],
) -> Result<Imputation, SolarError> {
    let means = GroupMeans::compute(df, variables)?;

    let mut report = ImputationReport::default();
    let mut fills = Vec::with_capacity(variables.len());

    for variable in variables {
        let mut fill = lit(NULL).cast(DataType::Float64);
        for source in means.sources() {
            let Some(stat) = means.get(source, *variable) else {
                continue;
            };
            if stat.missing == 0 {
                continue;
            }
            match stat.mean {
                Some(mean) => {
                    report.filled += stat.missing;
                    fill = when(col(COL_SOURCE).eq(lit(source.as_str())))
                        .then(lit(mean))
                        .otherwise(fill);
                }
                None => {
                    let warning = ImputationWarning {
                        source: source.clone(),
                        variable: *variable,
                        unresolved: stat.missing,
                    };
                    warn!("{}", warning);
                    report.warnings.push(warning);
                }
            }
        }
        let name = variable.column_name();
        fills.push(finite_or_null(name).fill_null(fill).alias(name));
    }

    let frame = df.clone().lazy().with_columns(fills).collect()?;
    info!(
        "Imputed {} missing value(s) across {} variable(s), {} warning(s)",
        report.filled,
        variables.len(),
        report.warnings.len()
    );

    Ok(Imputation { frame, report })
}
