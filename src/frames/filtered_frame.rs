// filtered_frame.rs

//! Contains the `FilteredFrame` structure: a read-only view of the canonical table that
//! feeds the aggregations and the chart preparation.

use crate::aggregation::correlation::{correlation_matrix, CorrelationMatrix};
use crate::aggregation::monthly::{monthly_means, MonthlyMean};
use crate::aggregation::summary::{summary_statistics, VariableSummary};
use crate::charts::chart_data::{prepare_chart, ChartData};
use crate::columns::source_labels;
use crate::error::SolarError;
use crate::filtering::FilterCriteria;
use crate::types::chart_request::ChartRequest;
use crate::types::variable::Variable;
use chrono::NaiveDate;
use log::info;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::fmt;

/// Informational state of a filter that matched no rows.
///
/// Not an error: the empty view stays valid and every aggregation and chart accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyResultNotice {
    pub sources: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for EmptyResultNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No observations for {} between {} and {}",
            if self.sources.is_empty() {
                "the selected sources".to_string()
            } else {
                self.sources.join(", ")
            },
            self.start,
            self.end
        )
    }
}

/// Rows of a [`crate::CanonicalFrame`] matching a [`FilterCriteria`], in original order.
///
/// Obtained via [`crate::CanonicalFrame::filter`].
#[derive(Debug, Clone)]
pub struct FilteredFrame {
    frame: DataFrame,
    criteria: FilterCriteria,
}

impl FilteredFrame {
    pub(crate) fn new(frame: DataFrame, criteria: FilterCriteria) -> Self {
        let view = Self { frame, criteria };
        if let Some(notice) = view.empty_notice() {
            info!("{}", notice);
        }
        view
    }

    /// The rows of the view, e.g. for tabular display.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// The criteria this view was derived with.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// `Some` when the filter matched nothing.
    pub fn empty_notice(&self) -> Option<EmptyResultNotice> {
        self.is_empty().then(|| EmptyResultNotice {
            sources: self.criteria.sources().to_vec(),
            start: self.criteria.start(),
            end: self.criteria.end(),
        })
    }

    /// Source label of every row.
    pub fn source_labels(&self) -> Result<Vec<String>, SolarError> {
        source_labels(&self.frame)
    }

    /// Per month and source means of `variables`, chronologically. See [`monthly_means`].
    pub fn monthly_means(&self, variables: &[Variable]) -> Result<Vec<MonthlyMean>, SolarError> {
        monthly_means(&self.frame, variables)
    }

    /// Pearson correlations between `variables` over all rows. See [`correlation_matrix`].
    pub fn correlation_matrix(
        &self,
        variables: &[Variable],
    ) -> Result<CorrelationMatrix, SolarError> {
        correlation_matrix(&self.frame, variables)
    }

    /// Descriptive statistics per variable. See [`summary_statistics`].
    pub fn summary(&self, variables: &[Variable]) -> Result<Vec<VariableSummary>, SolarError> {
        summary_statistics(&self.frame, variables)
    }

    /// Shapes the data one chart needs. See [`prepare_chart`].
    pub fn chart(&self, request: &ChartRequest) -> Result<ChartData, SolarError> {
        prepare_chart(&self.frame, request)
    }
}
