mod aggregation;
mod charts;
mod cleaning;
mod columns;
mod error;
mod filtering;
mod frames;
mod loading;
mod solar_data;
mod types;
mod validation;

#[cfg(test)]
mod test_support;

pub use error::SolarError;
pub use loading::error::LoadError;
pub use validation::ValidationError;

pub use solar_data::*;

pub use columns::{COL_SOURCE, COL_TIMESTAMP};
pub use loading::options::*;
pub use types::source_input::SourceInput;
pub use types::variable::Variable;

pub use cleaning::imputer::*;
pub use cleaning::warning::*;

pub use filtering::*;
pub use frames::canonical_frame::CanonicalFrame;
pub use frames::filtered_frame::*;

pub use aggregation::correlation::*;
pub use aggregation::monthly::*;
pub use aggregation::summary::*;

pub use charts::boxplot::*;
pub use charts::chart_data::*;
pub use charts::histogram::*;
pub use types::chart_request::*;

pub use types::traits::any::any_date::AnyDate;
pub use types::traits::types::Month;
pub use types::traits::types::StartEndDate;
pub use types::traits::types::Year;
