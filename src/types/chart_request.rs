//! Chart kinds and the validated request the presentation layer sends for each chart.

use crate::types::variable::Variable;
use crate::validation::ValidationError;
use bon::bon;
use serde::Serialize;
use std::fmt;

/// Default number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// The chart types the dashboard can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// A variable over time, one series per source.
    Line,
    /// Distribution of one variable.
    Histogram,
    /// One variable against another, coloured by source.
    Scatter,
    /// Spread of one or more variables.
    Boxplot,
    /// Correlation matrix between two or more variables.
    Heatmap,
    /// Scatter plot with a third variable driving the marker size.
    Bubble,
}

impl ChartKind {
    fn name(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Histogram => "histogram",
            ChartKind::Scatter => "scatter",
            ChartKind::Boxplot => "boxplot",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Bubble => "bubble",
        }
    }

    /// Inclusive bounds on the number of variables the chart needs, plus a
    /// human-readable description of them for error messages.
    fn variable_bounds(&self) -> (usize, Option<usize>, &'static str) {
        match self {
            ChartKind::Line | ChartKind::Histogram => (1, Some(1), "exactly 1"),
            ChartKind::Scatter => (2, Some(2), "exactly 2"),
            ChartKind::Bubble => (3, Some(3), "exactly 3"),
            ChartKind::Boxplot => (1, None, "at least 1"),
            ChartKind::Heatmap => (2, None, "at least 2"),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A validated chart request: which chart to shape and from which variables.
///
/// Variable order is meaningful: scatter uses `[x, y]`, bubble uses `[x, y, size]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    kind: ChartKind,
    variables: Vec<Variable>,
    bins: usize,
}

#[bon]
impl ChartRequest {
    /// Builds a chart request, checking the variable count for the chart kind.
    ///
    /// * `.kind(ChartKind)`: **Required.** The chart to prepare.
    /// * `.variables(Vec<Variable>)`: **Required.** The variables the chart plots.
    /// * `.bins(usize)`: Optional. Histogram bin count. Defaults to `20`; ignored by other kinds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::VariableCount`] when the number of variables does not fit
    /// the chart kind, and [`ValidationError::InvalidBinCount`] for a zero bin count.
    ///
    /// # Examples
    ///
    /// ```
    /// use solarscope::{ChartKind, ChartRequest, Variable};
    ///
    /// let request = ChartRequest::builder()
    ///     .kind(ChartKind::Scatter)
    ///     .variables(vec![Variable::Ghi, Variable::Tamb])
    ///     .build()?;
    /// assert_eq!(request.variables(), &[Variable::Ghi, Variable::Tamb]);
    ///
    /// let too_few = ChartRequest::builder()
    ///     .kind(ChartKind::Bubble)
    ///     .variables(vec![Variable::Ghi])
    ///     .build();
    /// assert!(too_few.is_err());
    /// # Ok::<(), solarscope::ValidationError>(())
    /// ```
    #[builder]
    pub fn new(
        kind: ChartKind,
        variables: Vec<Variable>,
        bins: Option<usize>,
    ) -> Result<Self, ValidationError> {
        let (min, max, expected) = kind.variable_bounds();
        let found = variables.len();
        if found < min || max.is_some_and(|max| found > max) {
            return Err(ValidationError::VariableCount {
                kind,
                expected,
                found,
            });
        }

        let bins = bins.unwrap_or(DEFAULT_HISTOGRAM_BINS);
        if bins == 0 {
            return Err(ValidationError::InvalidBinCount(bins));
        }

        Ok(Self {
            kind,
            variables,
            bins,
        })
    }

    /// Parses variable names coming from a selection widget before building the request.
    pub fn from_names(kind: ChartKind, names: &[&str]) -> Result<Self, ValidationError> {
        let variables = names
            .iter()
            .map(|name| name.parse::<Variable>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::builder().kind(kind).variables(variables).build()
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn bins(&self) -> usize {
        self.bins
    }
}
