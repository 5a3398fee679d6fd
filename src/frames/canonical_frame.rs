// canonical_frame.rs

//! Contains the `CanonicalFrame` structure: the merged and imputed observation table every
//! view is derived from.

use crate::cleaning::warning::ImputationReport;
use crate::columns::timestamps;
use crate::error::SolarError;
use crate::filtering::{FilterCriteria, SolarFrameFilterExt};
use crate::frames::filtered_frame::FilteredFrame;
use crate::types::traits::types::StartEndDate;
use crate::types::variable::Variable;
use log::info;
use polars::prelude::{DataFrame, IntoLazy};

/// The canonical dataset: every source merged into one table, missing values imputed.
///
/// The frame holds a `timestamp` column (Datetime), a `source` column (String) and one
/// Float64 column per measurement variable found in the inputs. It is never modified after
/// construction; [`CanonicalFrame::filter`] derives new [`FilteredFrame`]s from it.
///
/// Instances are obtained via [`crate::SolarData::load`] or [`crate::load_sources`].
#[derive(Debug, Clone)]
pub struct CanonicalFrame {
    frame: DataFrame,
    sources: Vec<String>,
    report: ImputationReport,
}

impl CanonicalFrame {
    pub(crate) fn new(frame: DataFrame, sources: Vec<String>, report: ImputationReport) -> Self {
        Self {
            frame,
            sources,
            report,
        }
    }

    /// The underlying table, e.g. for tabular display.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Source labels in the order the inputs were given.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Measurement variables that are columns of this table.
    pub fn variables(&self) -> Vec<Variable> {
        Variable::ALL
            .iter()
            .copied()
            .filter(|variable| self.frame.column(variable.column_name()).is_ok())
            .collect()
    }

    /// What imputation did while this dataset was built, including unresolved groups.
    pub fn imputation_report(&self) -> &ImputationReport {
        &self.report
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// First and last observation date, `None` for a table without rows.
    pub fn date_bounds(&self) -> Result<Option<StartEndDate>, SolarError> {
        let times = timestamps(&self.frame)?;
        let start = times.iter().min().map(|t| t.date());
        let end = times.iter().max().map(|t| t.date());
        Ok(start.zip(end).map(|(start, end)| StartEndDate { start, end }))
    }

    /// Criteria selecting every source over the full date range of the table, the
    /// initial state of the dashboard controls. `None` for a table without rows.
    pub fn default_criteria(&self) -> Result<Option<FilterCriteria>, SolarError> {
        match self.date_bounds()? {
            Some(bounds) => Ok(Some(FilterCriteria::new(
                self.sources.iter().cloned(),
                bounds.start,
                bounds.end,
            )?)),
            None => Ok(None),
        }
    }

    /// Derives the view of rows matching `criteria`, in their original order.
    ///
    /// No matching rows is not an error: the returned view is empty and reports an
    /// [`crate::EmptyResultNotice`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::ValidationError::UnknownSource`] if the criteria select a source this
    /// table does not contain.
    pub fn filter(&self, criteria: &FilterCriteria) -> Result<FilteredFrame, SolarError> {
        criteria.validate_sources(&self.sources)?;

        let frame = self
            .frame
            .clone()
            .lazy()
            .filter_criteria(criteria)
            .collect()?;
        info!(
            "Filter kept {} of {} rows for {:?} between {} and {}",
            frame.height(),
            self.frame.height(),
            criteria.sources(),
            criteria.start(),
            criteria.end()
        );

        Ok(FilteredFrame::new(frame, criteria.clone()))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::canonical;
    use crate::{FilterCriteria, SolarError, ValidationError, Variable, Year};
    use chrono::NaiveDate;
    use std::error::Error;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filter_by_source_and_date() -> Result<(), Box<dyn Error>> {
        let dataset = canonical()?;
        let criteria = FilterCriteria::new(["Benin"], date(2021, 8, 9), date(2021, 8, 31))?;
        let view = dataset.filter(&criteria)?;

        assert_eq!(view.height(), 2);
        assert!(view.source_labels()?.iter().all(|s| s == "Benin"));
        Ok(())
    }

    #[test]
    fn test_end_date_is_inclusive() -> Result<(), Box<dyn Error>> {
        let dataset = canonical()?;
        // The last Benin row is at 2021-09-02 12:00, inside an end bound of 2021-09-02.
        let criteria = FilterCriteria::new(["Benin"], date(2021, 9, 2), date(2021, 9, 2))?;
        assert_eq!(dataset.filter(&criteria)?.height(), 1);
        Ok(())
    }

    #[test]
    fn test_filter_excluding_all_rows_is_empty_not_error() -> Result<(), Box<dyn Error>> {
        let dataset = canonical()?;
        let criteria = FilterCriteria::new(["Togo"], Year(2019), Year(2019))?;
        let view = dataset.filter(&criteria)?;

        assert!(view.is_empty());
        let notice = view.empty_notice().expect("empty view must carry a notice");
        assert_eq!(notice.sources, ["Togo"]);
        Ok(())
    }

    #[test]
    fn test_filter_preserves_row_order() -> Result<(), Box<dyn Error>> {
        let dataset = canonical()?;
        let criteria = dataset.default_criteria()?.expect("dataset has rows");
        let view = dataset.filter(&criteria)?;

        assert_eq!(view.height(), dataset.height());
        assert!(view.frame().equals_missing(dataset.frame()));
        Ok(())
    }

    #[test]
    fn test_unknown_source_is_rejected() -> Result<(), Box<dyn Error>> {
        let dataset = canonical()?;
        let criteria = FilterCriteria::new(["Ghana"], Year(2021), Year(2021))?;
        let err = dataset.filter(&criteria).unwrap_err();
        assert!(matches!(
            err,
            SolarError::Validation(ValidationError::UnknownSource { ref source_label, .. })
                if source_label == "Ghana"
        ));
        Ok(())
    }

    #[test]
    fn test_date_bounds_and_variables() -> Result<(), Box<dyn Error>> {
        let dataset = canonical()?;
        let bounds = dataset.date_bounds()?.expect("dataset has rows");
        assert_eq!(bounds.start, date(2021, 8, 9));
        assert_eq!(bounds.end, date(2021, 10, 26));
        assert!(dataset.variables().contains(&Variable::Ghi));
        assert!(!dataset.variables().contains(&Variable::Precipitation));
        Ok(())
    }
}
