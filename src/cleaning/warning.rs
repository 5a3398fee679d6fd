use crate::types::variable::Variable;
use serde::Serialize;
use std::fmt;

/// A (source, variable) group with no observed values, so no mean could be computed.
///
/// The affected cells stay missing. This is reported, not raised: the rest of the
/// table is still imputed and usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImputationWarning {
    pub source: String,
    pub variable: Variable,
    /// Number of cells that stay missing.
    pub unresolved: usize,
}

impl fmt::Display for ImputationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Source '{}' has no values for '{}'; {} missing value(s) were left unfilled",
            self.source, self.variable, self.unresolved
        )
    }
}

/// Outcome of an imputation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImputationReport {
    /// Number of cells that received a group mean.
    pub filled: usize,
    pub warnings: Vec<ImputationWarning>,
}

impl ImputationReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
