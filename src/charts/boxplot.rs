use crate::types::variable::Variable;
use ordered_float::OrderedFloat;
use serde::Serialize;

/// Input of a box plot: one group of observed values per variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxplotData {
    pub groups: Vec<BoxGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGroup {
    pub variable: Variable,
    pub values: Vec<f64>,
}

/// Five-number summary of a [`BoxGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxGroup {
    /// Quartiles use linear interpolation between the closest ranks. `None` for an empty group.
    pub fn summary(&self) -> Option<BoxSummary> {
        let mut sorted: Vec<f64> = self
            .values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by_key(|v| OrderedFloat(*v));

        Some(BoxSummary {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

// `sorted` must be non-empty and ascending
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
