use crate::columns::{ensure_columns, float_values};
use crate::error::SolarError;
use crate::types::variable::Variable;
use log::debug;
use polars::prelude::DataFrame;
use serde::Serialize;

/// Minimum number of rows where both variables are observed for a correlation to be defined.
pub const MIN_PAIRED_OBSERVATIONS: usize = 2;

/// Symmetric matrix of Pearson correlation coefficients.
///
/// `values[i][j]` is the correlation between `variables[i]` and `variables[j]`; `None` marks
/// an undefined coefficient (too few paired observations, or a constant variable).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub variables: Vec<Variable>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient between two variables, `None` if undefined or not part of the matrix.
    pub fn get(&self, a: Variable, b: Variable) -> Option<f64> {
        let i = self.variables.iter().position(|v| *v == a)?;
        let j = self.variables.iter().position(|v| *v == b)?;
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Computes the Pearson correlation between every pair of `variables` over all rows of `df`,
/// regardless of source.
///
/// Each pair uses the rows where both values are present. The diagonal is 1.0 for every
/// variable with at least one observed value.
///
/// # Errors
///
/// Returns [`crate::ValidationError::ColumnNotInTable`] for a variable that is not a column
/// of `df`.
pub fn correlation_matrix(
    df: &DataFrame,
    variables: &[Variable],
) -> Result<CorrelationMatrix, SolarError> {
    ensure_columns(df, variables)?;
    let columns = variables
        .iter()
        .map(|variable| float_values(df, *variable))
        .collect::<Result<Vec<_>, _>>()?;

    let n = variables.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        values[i][i] = columns[i].iter().any(Option::is_some).then_some(1.0);
        for j in (i + 1)..n {
            let r = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    debug!("Correlated {} variable(s) over {} rows", n, df.height());

    Ok(CorrelationMatrix {
        variables: variables.to_vec(),
        values,
    })
}

/// Pearson coefficient over pairwise complete observations.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pairs.len() < MIN_PAIRED_OBSERVATIONS {
        return None;
    }

    let count = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / count;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / count;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
