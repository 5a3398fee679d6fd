//! demos/explore.rs
//!
//! Loads one CSV export per country, cleans it and prints what the dashboard would show:
//! the imputation report, monthly means, correlations and a chart payload.
//!
//! To run this example with your own files:
//! cargo run --example explore -- Benin=data/benin.csv Togo=data/togo.csv
//!
//! Without arguments a small built-in dataset is used.

use solarscope::{ChartKind, ChartRequest, SolarData, SourceInput, Variable};
use std::error::Error;

const BENIN: &str = "\
Timestamp,GHI,DNI,DHI,ModA,ModB,Tamb,RH,WS,BP
2021-08-09 00:00,0,0,0,0,0,26.2,93.4,0.0,998
2021-08-09 12:00,,410.5,250.1,702.0,690.3,31.0,70.1,2.1,996
2021-09-02 12:00,812.4,520.2,261.7,790.0,781.2,30.4,68.0,2.4,997
";

const TOGO: &str = "\
Timestamp,GHI,DNI,DHI,ModA,ModB,Tamb,RH,WS,BP
2021-10-25 00:00,0,0,0,0,0,24.8,94.1,0.3,977
2021-10-25 12:00,790.2,600.0,190.4,770.1,760.5,32.9,61.2,1.8,975
";

fn inputs_from_args() -> Result<Vec<SourceInput>, Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        return Ok(vec![
            SourceInput::from_bytes("Benin", BENIN),
            SourceInput::from_bytes("Togo", TOGO),
        ]);
    }
    args.iter()
        .map(|arg| {
            let (label, path) = arg
                .split_once('=')
                .ok_or_else(|| format!("expected LABEL=PATH, got {arg}"))?;
            Ok(SourceInput::from_path(label, path)?)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let data = SolarData::new();
    let dataset = data.load(&inputs_from_args()?)?;

    println!("Sources: {:?}", dataset.sources());
    println!("Variables: {:?}", dataset.variables());
    let report = dataset.imputation_report();
    println!("Imputed {} value(s)", report.filled);
    for warning in &report.warnings {
        println!("Warning: {warning}");
    }

    let Some(criteria) = dataset.default_criteria()? else {
        println!("The dataset has no rows.");
        return Ok(());
    };
    let view = dataset.filter(&criteria)?;
    println!("{}", view.frame());

    for record in view.monthly_means(&[Variable::Ghi, Variable::Tamb])? {
        println!(
            "{} {:<12} GHI={:?} Tamb={:?}",
            record.month,
            record.source,
            record.get(Variable::Ghi),
            record.get(Variable::Tamb)
        );
    }

    let matrix = view.correlation_matrix(&[Variable::Ghi, Variable::Dni, Variable::Tamb])?;
    println!("Correlation GHI/Tamb: {:?}", matrix.get(Variable::Ghi, Variable::Tamb));

    let scatter = ChartRequest::from_names(ChartKind::Scatter, &["GHI", "ModA"])?;
    println!("{}", view.chart(&scatter)?.to_json()?);

    Ok(())
}
