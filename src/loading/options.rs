use crate::types::variable::Variable;
use bon::Builder;

/// Default header of the timestamp column in the station exports.
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "Timestamp";

/// Settings for loading and cleaning the source tables.
///
/// Every field has a default, so `LoadOptions::default()` matches the station exports:
/// comma-separated, a `Timestamp` header, and the nine core variables as imputation
/// targets.
///
/// # Examples
///
/// ```
/// use solarscope::{LoadOptions, Variable};
///
/// let options = LoadOptions::builder()
///     .delimiter(b';')
///     .impute(vec![Variable::Ghi, Variable::WsGust])
///     .build();
/// assert_eq!(options.timestamp_column(), "Timestamp");
/// assert_eq!(options.delimiter(), b';');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Builder)]
pub struct LoadOptions {
    /// Field separator of the delimited input.
    #[builder(default = b',')]
    delimiter: u8,

    /// Header of the column holding the observation time.
    #[builder(default = DEFAULT_TIMESTAMP_COLUMN.to_string(), into)]
    timestamp_column: String,

    /// Columns whose missing values are filled with per-source means.
    #[builder(default = Variable::CORE.to_vec())]
    impute: Vec<Variable>,
}

impl LoadOptions {
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn timestamp_column(&self) -> &str {
        &self.timestamp_column
    }

    pub fn impute_targets(&self) -> &[Variable] {
        &self.impute
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}
