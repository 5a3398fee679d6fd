use crate::columns::{ensure_columns, float_values};
use crate::error::SolarError;
use crate::types::variable::Variable;
use ordered_float::OrderedFloat;
use polars::prelude::DataFrame;
use serde::Serialize;

/// Descriptive statistics of one variable over a view.
///
/// Statistics are over observed values only; `missing` counts the rest. `std` is the sample
/// standard deviation and needs two observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSummary {
    pub variable: Variable,
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Summarises each of `variables` over all rows of `df`.
pub fn summary_statistics(
    df: &DataFrame,
    variables: &[Variable],
) -> Result<Vec<VariableSummary>, SolarError> {
    ensure_columns(df, variables)?;
    variables
        .iter()
        .map(|variable| -> Result<VariableSummary, SolarError> {
            let values = float_values(df, *variable)?;
            Ok(summarise(*variable, &values))
        })
        .collect()
}

fn summarise(variable: Variable, values: &[Option<f64>]) -> VariableSummary {
    let observed: Vec<f64> = values.iter().flatten().copied().collect();
    let count = observed.len();

    let mean = (count > 0).then(|| observed.iter().sum::<f64>() / count as f64);
    let std = mean.filter(|_| count > 1).map(|mean| {
        let squares: f64 = observed.iter().map(|v| (v - mean).powi(2)).sum();
        (squares / (count - 1) as f64).sqrt()
    });

    VariableSummary {
        variable,
        count,
        missing: values.len() - count,
        mean,
        std,
        min: observed.iter().copied().map(OrderedFloat).min().map(|v| v.0),
        max: observed.iter().copied().map(OrderedFloat).max().map(|v| v.0),
    }
}
