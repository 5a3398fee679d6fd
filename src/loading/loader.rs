use crate::columns::{finite_or_null, COL_SOURCE, COL_TIMESTAMP};
use crate::loading::error::LoadError;
use crate::loading::options::LoadOptions;
use crate::types::source_input::SourceInput;
use crate::types::variable::Variable;
use log::{debug, info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;

/// Cell contents read as missing values, next to empty cells.
const MISSING_MARKERS: [&str; 9] = [
    "NA", "N/A", "n/a", "#N/A", "NaN", "nan", "-NaN", "null", "NULL",
];

/// Parses the per-source inputs and merges them into one observation table.
pub struct TableLoader<'a> {
    options: &'a LoadOptions,
}

impl<'a> TableLoader<'a> {
    pub fn new(options: &'a LoadOptions) -> TableLoader<'a> {
        TableLoader { options }
    }

    /// Parses every input, stamps its rows with the source label and concatenates the
    /// results in the order the inputs were given.
    ///
    /// The merged frame has a `timestamp` Datetime column, a `source` String column and
    /// one Float64 column per known variable found in at least one input. A source that
    /// lacks a variable another source has gets an all-null column for it.
    ///
    /// Nothing is returned unless every input loads.
    pub fn merge(&self, inputs: &[SourceInput]) -> Result<DataFrame, LoadError> {
        if inputs.is_empty() {
            return Err(LoadError::NoInputs);
        }

        let mut seen = HashSet::new();
        for input in inputs {
            if !seen.insert(input.label()) {
                return Err(LoadError::DuplicateSource(input.label().to_string()));
            }
        }

        let raw_frames = inputs
            .iter()
            .map(|input| Ok((input.label(), self.csv_to_dataframe(input)?)))
            .collect::<Result<Vec<_>, LoadError>>()?;

        let variables: Vec<Variable> = Variable::ALL
            .iter()
            .copied()
            .filter(|variable| {
                raw_frames
                    .iter()
                    .any(|(_, df)| df.column(variable.column_name()).is_ok())
            })
            .collect();
        debug!("Variables found across all sources: {:?}", variables);

        let frames = raw_frames
            .into_iter()
            .map(|(label, df)| self.to_observations(label, df, &variables))
            .collect::<Result<Vec<_>, LoadError>>()?;

        let merged = concat(frames, UnionArgs::default())
            .and_then(|lazy| lazy.collect())
            .map_err(LoadError::Merge)?;
        info!(
            "Merged {} source(s) into {} rows and {} columns",
            inputs.len(),
            merged.height(),
            merged.width()
        );
        Ok(merged)
    }

    /// Parses raw delimited bytes (with header) into a DataFrame.
    fn csv_to_dataframe(&self, input: &SourceInput) -> Result<DataFrame, LoadError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(self.options.delimiter())
                    .with_null_values(Some(NullValues::AllColumns(
                        MISSING_MARKERS.iter().map(|marker| (*marker).into()).collect(),
                    ))),
            )
            .into_reader_with_file_handle(Cursor::new(input.bytes().to_vec()))
            .finish()
            .map_err(|e| {
                warn!("Failed to parse input for source {}: {}", input.label(), e);
                LoadError::CsvParse {
                    source_label: input.label().to_string(),
                    source: e,
                }
            })?;
        info!(
            "Parsed {} rows and {} columns for source {}",
            df.height(),
            df.width(),
            input.label()
        );
        Ok(df)
    }

    /// Reshapes one parsed input into the canonical column layout.
    fn to_observations(
        &self,
        label: &str,
        df: DataFrame,
        variables: &[Variable],
    ) -> Result<LazyFrame, LoadError> {
        let ts_name = self.options.timestamp_column();
        let ts_dtype = df
            .column(ts_name)
            .map_err(|_| LoadError::MissingTimestampColumn {
                source_label: label.to_string(),
                column: ts_name.to_string(),
            })?
            .dtype()
            .clone();

        let timestamp = match ts_dtype {
            DataType::String => col(ts_name).str().to_datetime(
                Some(TimeUnit::Milliseconds),
                None,
                StrptimeOptions::default(),
                lit("raise"),
            ),
            _ => col(ts_name).cast(DataType::Datetime(TimeUnit::Milliseconds, None)),
        };

        let mut exprs = vec![timestamp.alias(COL_TIMESTAMP), lit(label).alias(COL_SOURCE)];
        for variable in variables {
            let name = variable.column_name();
            let values = if df.column(name).is_ok() {
                ensure_numeric(label, &df, name)?;
                col(name).cast(DataType::Float64)
            } else {
                debug!("Source {} has no {} column, filling with nulls", label, name);
                lit(NULL).cast(DataType::Float64)
            };
            exprs.push(values.alias(name));
        }

        let finite: Vec<Expr> = variables
            .iter()
            .map(|variable| finite_or_null(variable.column_name()))
            .collect();

        let frame = df
            .lazy()
            .select(exprs)
            .with_columns(finite)
            .collect()
            .map_err(|e| LoadError::TimestampParse {
                source_label: label.to_string(),
                column: ts_name.to_string(),
                source: e,
            })?;

        let missing = frame
            .column(COL_TIMESTAMP)
            .map(|column| column.null_count())
            .unwrap_or(0);
        if missing > 0 {
            return Err(LoadError::NullTimestamps {
                source_label: label.to_string(),
                column: ts_name.to_string(),
                count: missing,
            });
        }

        Ok(frame.lazy())
    }
}

/// Fails when reading column `name` as floats would lose non-empty cells.
fn ensure_numeric(label: &str, df: &DataFrame, name: &str) -> Result<(), LoadError> {
    let Ok(column) = df.column(name) else {
        return Ok(());
    };
    let present = column.len() - column.null_count();
    let unparsed = match column.cast(&DataType::Float64) {
        Ok(values) => present - (values.len() - values.null_count()),
        Err(_) => present,
    };
    if unparsed > 0 {
        warn!(
            "Source {} has {} non-numeric value(s) in {}",
            label, unparsed, name
        );
        return Err(LoadError::ValueParse {
            source_label: label.to_string(),
            column: name.to_string(),
            count: unparsed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::source_labels;
    use std::error::Error;

    const BENIN: &str = "Timestamp,GHI,DNI,Comments\n\
        2021-08-09 00:01,1.5,2.0,\n\
        2021-08-09 00:02,,2.5,\n";
    const TOGO: &str = "Timestamp,GHI,DNI,WSgust\n\
        2021-10-25 00:01,3.0,4.0,1.1\n";

    fn inputs() -> Vec<SourceInput> {
        vec![
            SourceInput::from_bytes("Benin", BENIN),
            SourceInput::from_bytes("Togo", TOGO),
        ]
    }

    #[test]
    fn test_merge_stamps_sources_in_order() -> Result<(), Box<dyn Error>> {
        let options = LoadOptions::default();
        let merged = TableLoader::new(&options).merge(&inputs())?;

        assert_eq!(merged.height(), 3);
        assert_eq!(source_labels(&merged)?, ["Benin", "Benin", "Togo"]);
        assert_eq!(
            merged.get_column_names_str(),
            ["timestamp", "source", "GHI", "DNI", "WSgust"]
        );
        assert_eq!(
            merged.column("timestamp")?.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        Ok(())
    }

    #[test]
    fn test_variable_missing_in_one_source_is_null() -> Result<(), Box<dyn Error>> {
        let options = LoadOptions::default();
        let merged = TableLoader::new(&options).merge(&inputs())?;

        let gust: Vec<Option<f64>> = merged.column("WSgust")?.f64()?.into_iter().collect();
        assert_eq!(gust, [None, None, Some(1.1)]);
        let ghi: Vec<Option<f64>> = merged.column("GHI")?.f64()?.into_iter().collect();
        assert_eq!(ghi, [Some(1.5), None, Some(3.0)]);
        Ok(())
    }

    #[test]
    fn test_missing_timestamp_column_fails_whole_load() {
        let options = LoadOptions::default();
        let broken = vec![
            SourceInput::from_bytes("Benin", BENIN),
            SourceInput::from_bytes("Togo", "Time,GHI\n2021-10-25 00:01,3.0\n"),
        ];
        let result = TableLoader::new(&options).merge(&broken);
        assert!(matches!(
            result,
            Err(LoadError::MissingTimestampColumn { ref source_label, ref column })
                if source_label == "Togo" && column == "Timestamp"
        ));
    }

    #[test]
    fn test_unparseable_timestamp() {
        let options = LoadOptions::default();
        let broken = vec![SourceInput::from_bytes(
            "Togo",
            "Timestamp,GHI\nnot a date,3.0\n",
        )];
        let result = TableLoader::new(&options).merge(&broken);
        assert!(matches!(result, Err(LoadError::TimestampParse { .. })));
    }

    #[test]
    fn test_non_numeric_measurement_fails_load() {
        let options = LoadOptions::default();
        let broken = vec![
            SourceInput::from_bytes("Benin", BENIN),
            SourceInput::from_bytes(
                "Togo",
                "Timestamp,GHI,DNI\n2021-10-25 00:01,abc,1\n2021-10-25 00:02,10,2\n",
            ),
        ];
        let result = TableLoader::new(&options).merge(&broken);
        assert!(matches!(
            result,
            Err(LoadError::ValueParse { ref source_label, ref column, count: 1 })
                if source_label == "Togo" && column == "GHI"
        ));
    }

    #[test]
    fn test_missing_markers_and_nan_are_null() -> Result<(), Box<dyn Error>> {
        let options = LoadOptions::default();
        let input = SourceInput::from_bytes(
            "Togo",
            "Timestamp,GHI,DNI\n\
             2021-10-25 00:01,NaN,NA\n\
             2021-10-25 00:02,10,N/A\n\
             2021-10-25 00:03,,4\n",
        );
        let merged = TableLoader::new(&options).merge(&[input])?;

        let ghi: Vec<Option<f64>> = merged.column("GHI")?.f64()?.into_iter().collect();
        assert_eq!(ghi, [None, Some(10.0), None]);
        let dni: Vec<Option<f64>> = merged.column("DNI")?.f64()?.into_iter().collect();
        assert_eq!(dni, [None, None, Some(4.0)]);
        Ok(())
    }

    #[test]
    fn test_empty_input_is_a_parse_error() {
        let options = LoadOptions::default();
        let result = TableLoader::new(&options).merge(&[SourceInput::from_bytes("Togo", "")]);
        assert!(matches!(result, Err(LoadError::CsvParse { .. })));
    }

    #[test]
    fn test_no_inputs_and_duplicates() {
        let options = LoadOptions::default();
        let loader = TableLoader::new(&options);
        assert!(matches!(loader.merge(&[]), Err(LoadError::NoInputs)));

        let duplicated = vec![
            SourceInput::from_bytes("Togo", TOGO),
            SourceInput::from_bytes("Togo", TOGO),
        ];
        assert!(matches!(
            loader.merge(&duplicated),
            Err(LoadError::DuplicateSource(ref label)) if label == "Togo"
        ));
    }

    #[test]
    fn test_custom_delimiter_and_timestamp_header() -> Result<(), Box<dyn Error>> {
        let options = LoadOptions::builder()
            .delimiter(b';')
            .timestamp_column("Time")
            .build();
        let input = SourceInput::from_bytes("Sierra Leone", "Time;GHI\n2021-10-30 00:01;5\n");
        let merged = TableLoader::new(&options).merge(&[input])?;
        assert_eq!(merged.height(), 1);
        assert_eq!(merged.column("GHI")?.f64()?.get(0), Some(5.0));
        Ok(())
    }
}
