//! demos/graph_monthly.rs
//!
//! Loads the country exports given on the command line and plots the monthly mean GHI of
//! every country, one line per country.
//!
//! To run this example:
//! cargo run --example graph_monthly --features examples -- Benin=data/benin.csv Togo=data/togo.csv

use plotlars::{Legend, Plot, Text, TimeSeriesPlot};
use polars::prelude::*;
use solarscope::{MonthlyMean, SolarData, SourceInput, Variable};
use std::collections::BTreeSet;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let inputs = std::env::args()
        .skip(1)
        .map(|arg| -> Result<SourceInput, Box<dyn Error>> {
            let (label, path) = arg
                .split_once('=')
                .ok_or_else(|| format!("expected LABEL=PATH, got {arg}"))?;
            Ok(SourceInput::from_path(label, path)?)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let dataset = SolarData::new().load(&inputs)?;
    let Some(criteria) = dataset.default_criteria()? else {
        println!("Nothing to plot.");
        return Ok(());
    };
    let records = dataset.filter(&criteria)?.monthly_means(&[Variable::Ghi])?;

    let table = to_wide_frame(&records, dataset.sources(), Variable::Ghi)?;
    plot_monthly(&table, dataset.sources());
    Ok(())
}

/// One row per month, one column per source.
fn to_wide_frame(
    records: &[MonthlyMean],
    sources: &[String],
    variable: Variable,
) -> PolarsResult<DataFrame> {
    let months: BTreeSet<_> = records.iter().map(|r| r.month).collect();
    let mut columns = vec![Column::new(
        "month".into(),
        months.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
    )];
    for source in sources {
        let values: Vec<Option<f64>> = months
            .iter()
            .map(|month| {
                records
                    .iter()
                    .find(|r| r.month == *month && r.source == *source)
                    .and_then(|r| r.get(variable))
            })
            .collect();
        columns.push(Column::new(source.as_str().into(), values));
    }
    DataFrame::new(columns)
}

fn plot_monthly(data: &DataFrame, sources: &[String]) {
    let Some((first, rest)) = sources.split_first() else {
        return;
    };
    TimeSeriesPlot::builder()
        .data(data)
        .x("month")
        .y(first.as_str())
        .additional_series(rest.iter().map(String::as_str).collect())
        .plot_title(Text::from("Monthly mean GHI").size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("month")
        .y_title("GHI (W/m²)")
        .build()
        .plot();
}
