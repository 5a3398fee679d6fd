//! Shapes a filtered view into the data one chart needs.
//!
//! Each [`ChartKind`] has its own payload. Rows where a plotted variable is missing are left
//! out of the payload; rendering is up to the presentation layer.

use crate::aggregation::correlation::{correlation_matrix, CorrelationMatrix};
use crate::charts::boxplot::{BoxGroup, BoxplotData};
use crate::charts::histogram::HistogramData;
use crate::columns::{ensure_columns, float_values, source_labels, timestamps};
use crate::error::SolarError;
use crate::types::chart_request::{ChartKind, ChartRequest};
use crate::types::variable::Variable;
use chrono::NaiveDateTime;
use log::debug;
use polars::prelude::DataFrame;
use serde::Serialize;

/// A variable over time. `x`, `y` and `series` have equal length; `series` holds the source
/// label of each point and separates the lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineData {
    pub variable: Variable,
    pub x: Vec<NaiveDateTime>,
    pub y: Vec<f64>,
    pub series: Vec<String>,
}

/// One variable against another, points coloured by source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterData {
    pub x_variable: Variable,
    pub y_variable: Variable,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub series: Vec<String>,
}

/// A scatter plot whose marker size follows a third variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleData {
    pub x_variable: Variable,
    pub y_variable: Variable,
    pub size_variable: Variable,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub size: Vec<f64>,
    pub series: Vec<String>,
}

/// The prepared input of one chart, tagged with its kind when serialised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartData {
    Line(LineData),
    Histogram(HistogramData),
    Scatter(ScatterData),
    Boxplot(BoxplotData),
    Heatmap(CorrelationMatrix),
    Bubble(BubbleData),
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Line(_) => ChartKind::Line,
            ChartData::Histogram(_) => ChartKind::Histogram,
            ChartData::Scatter(_) => ChartKind::Scatter,
            ChartData::Boxplot(_) => ChartKind::Boxplot,
            ChartData::Heatmap(_) => ChartKind::Heatmap,
            ChartData::Bubble(_) => ChartKind::Bubble,
        }
    }

    /// Serialises the payload for a browser-side renderer.
    pub fn to_json(&self) -> Result<String, SolarError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Prepares the data for `request` from the rows of `df`.
///
/// An empty frame yields an empty payload of the requested kind, never an error.
///
/// # Errors
///
/// Returns [`crate::ValidationError::ColumnNotInTable`] when a requested variable is not a
/// column of `df`.
pub fn prepare_chart(df: &DataFrame, request: &ChartRequest) -> Result<ChartData, SolarError> {
    let variables = request.variables();
    ensure_columns(df, variables)?;
    debug!(
        "Preparing {} chart of {:?} from {} rows",
        request.kind(),
        variables,
        df.height()
    );

    let data = match request.kind() {
        ChartKind::Line => {
            let variable = variables[0];
            let mut line = LineData {
                variable,
                x: Vec::new(),
                y: Vec::new(),
                series: Vec::new(),
            };
            let rows = timestamps(df)?
                .into_iter()
                .zip(float_values(df, variable)?)
                .zip(source_labels(df)?);
            for ((x, y), source) in rows {
                if let Some(y) = y {
                    line.x.push(x);
                    line.y.push(y);
                    line.series.push(source);
                }
            }
            ChartData::Line(line)
        }
        ChartKind::Histogram => ChartData::Histogram(HistogramData {
            variable: variables[0],
            values: observed(df, variables[0])?,
            bins: request.bins(),
        }),
        ChartKind::Scatter => {
            let (x_variable, y_variable) = (variables[0], variables[1]);
            let mut scatter = ScatterData {
                x_variable,
                y_variable,
                x: Vec::new(),
                y: Vec::new(),
                series: Vec::new(),
            };
            let rows = float_values(df, x_variable)?
                .into_iter()
                .zip(float_values(df, y_variable)?)
                .zip(source_labels(df)?);
            for ((x, y), source) in rows {
                if let (Some(x), Some(y)) = (x, y) {
                    scatter.x.push(x);
                    scatter.y.push(y);
                    scatter.series.push(source);
                }
            }
            ChartData::Scatter(scatter)
        }
        ChartKind::Bubble => {
            let (x_variable, y_variable, size_variable) = (variables[0], variables[1], variables[2]);
            let mut bubble = BubbleData {
                x_variable,
                y_variable,
                size_variable,
                x: Vec::new(),
                y: Vec::new(),
                size: Vec::new(),
                series: Vec::new(),
            };
            let rows = float_values(df, x_variable)?
                .into_iter()
                .zip(float_values(df, y_variable)?)
                .zip(float_values(df, size_variable)?)
                .zip(source_labels(df)?);
            for (((x, y), size), source) in rows {
                if let (Some(x), Some(y), Some(size)) = (x, y, size) {
                    bubble.x.push(x);
                    bubble.y.push(y);
                    bubble.size.push(size);
                    bubble.series.push(source);
                }
            }
            ChartData::Bubble(bubble)
        }
        ChartKind::Boxplot => {
            let groups = variables
                .iter()
                .map(|variable| -> Result<BoxGroup, SolarError> {
                    Ok(BoxGroup {
                        variable: *variable,
                        values: observed(df, *variable)?,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            ChartData::Boxplot(BoxplotData { groups })
        }
        ChartKind::Heatmap => ChartData::Heatmap(correlation_matrix(df, variables)?),
    };

    Ok(data)
}

fn observed(df: &DataFrame, variable: Variable) -> Result<Vec<f64>, SolarError> {
    Ok(float_values(df, variable)?.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::canonical;
    use crate::{FilterCriteria, FilteredFrame, Year};
    use std::error::Error;

    fn full_view() -> Result<FilteredFrame, Box<dyn Error>> {
        let dataset = canonical()?;
        let criteria = dataset.default_criteria()?.ok_or("dataset has rows")?;
        Ok(dataset.filter(&criteria)?)
    }

    fn request(kind: ChartKind, variables: &[Variable]) -> Result<ChartRequest, Box<dyn Error>> {
        Ok(ChartRequest::builder()
            .kind(kind)
            .variables(variables.to_vec())
            .build()?)
    }

    #[test]
    fn test_line_series_per_source() -> Result<(), Box<dyn Error>> {
        let view = full_view()?;
        let ChartData::Line(line) = view.chart(&request(ChartKind::Line, &[Variable::Ghi])?)?
        else {
            panic!("expected line data");
        };

        assert_eq!(line.x.len(), 7);
        assert_eq!(line.y, [100.0, 200.0, 300.0, 40.0, 60.0, 10.0, 20.0]);
        assert_eq!(line.series[0], "Benin");
        assert_eq!(line.series[6], "Togo");
        assert_eq!(line.x[0].to_string(), "2021-08-09 00:00:00");
        Ok(())
    }

    #[test]
    fn test_line_skips_missing_values() -> Result<(), Box<dyn Error>> {
        let view = full_view()?;
        let ChartData::Line(line) = view.chart(&request(ChartKind::Line, &[Variable::Tamb])?)?
        else {
            panic!("expected line data");
        };
        // Sierra Leone's Tamb stayed missing after imputation.
        assert_eq!(line.y.len(), 5);
        assert!(line.series.iter().all(|s| s != "Sierra Leone"));
        Ok(())
    }

    #[test]
    fn test_scatter_pairs_complete_rows() -> Result<(), Box<dyn Error>> {
        let view = full_view()?;
        let chart = view.chart(&request(ChartKind::Scatter, &[Variable::Ghi, Variable::Tamb])?)?;
        let ChartData::Scatter(scatter) = chart else {
            panic!("expected scatter data");
        };
        assert_eq!(scatter.x_variable, Variable::Ghi);
        assert_eq!(scatter.x.len(), 5);
        assert_eq!(scatter.x.len(), scatter.y.len());
        assert_eq!(scatter.series.len(), scatter.y.len());
        Ok(())
    }

    #[test]
    fn test_bubble_uses_third_variable_for_size() -> Result<(), Box<dyn Error>> {
        let view = full_view()?;
        let chart = view.chart(&request(
            ChartKind::Bubble,
            &[Variable::Ghi, Variable::Tamb, Variable::Rh],
        )?)?;
        let ChartData::Bubble(bubble) = chart else {
            panic!("expected bubble data");
        };
        assert_eq!(bubble.size_variable, Variable::Rh);
        assert_eq!(bubble.size[0], 80.0);
        assert_eq!(bubble.size.len(), bubble.x.len());
        Ok(())
    }

    #[test]
    fn test_histogram_and_boxplot() -> Result<(), Box<dyn Error>> {
        let view = full_view()?;
        let hist = ChartRequest::builder()
            .kind(ChartKind::Histogram)
            .variables(vec![Variable::Ghi])
            .bins(4)
            .build()?;
        let ChartData::Histogram(histogram) = view.chart(&hist)? else {
            panic!("expected histogram data");
        };
        assert_eq!(histogram.bins, 4);
        assert_eq!(histogram.values.len(), 7);

        let chart = view.chart(&request(ChartKind::Boxplot, &[Variable::Ghi, Variable::Ws])?)?;
        let ChartData::Boxplot(boxplot) = chart else {
            panic!("expected boxplot data");
        };
        assert_eq!(boxplot.groups.len(), 2);
        assert_eq!(boxplot.groups[0].summary().map(|s| s.median), Some(60.0));
        Ok(())
    }

    #[test]
    fn test_heatmap_is_correlation_matrix() -> Result<(), Box<dyn Error>> {
        let view = full_view()?;
        let variables = [Variable::Ghi, Variable::Dni, Variable::ModA];
        let chart = view.chart(&request(ChartKind::Heatmap, &variables)?)?;
        assert_eq!(chart.kind(), ChartKind::Heatmap);
        assert_eq!(chart, ChartData::Heatmap(view.correlation_matrix(&variables)?));
        Ok(())
    }

    #[test]
    fn test_empty_view_gives_empty_payload() -> Result<(), Box<dyn Error>> {
        let dataset = canonical()?;
        let view = dataset.filter(&FilterCriteria::new(["Benin"], Year(2020), Year(2020))?)?;

        let ChartData::Histogram(histogram) =
            view.chart(&request(ChartKind::Histogram, &[Variable::Ghi])?)?
        else {
            panic!("expected histogram data");
        };
        assert!(histogram.is_empty());
        assert!(histogram.bin_counts().is_empty());

        let ChartData::Line(line) = view.chart(&request(ChartKind::Line, &[Variable::Ghi])?)?
        else {
            panic!("expected line data");
        };
        assert!(line.x.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_column_is_rejected() -> Result<(), Box<dyn Error>> {
        let view = full_view()?;
        let result = view.chart(&request(ChartKind::Line, &[Variable::Precipitation])?);
        assert!(matches!(
            result,
            Err(SolarError::Validation(
                crate::ValidationError::ColumnNotInTable(_)
            ))
        ));
        Ok(())
    }

    #[test]
    fn test_json_is_tagged_with_kind() -> Result<(), Box<dyn Error>> {
        let view = full_view()?;
        let json = view
            .chart(&request(ChartKind::Scatter, &[Variable::Dni, Variable::Dhi])?)?
            .to_json()?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["kind"], "scatter");
        assert_eq!(value["x_variable"], "DNI");
        Ok(())
    }
}
