use crate::columns::{COL_SOURCE, COL_TIMESTAMP};
use crate::types::traits::any::any_date::AnyDate;
use crate::validation::ValidationError;
use chrono::NaiveDate;
use polars::prelude::{col, lit, LazyFrame};
use std::fmt::Debug;

/// Which rows of the canonical table a view should contain.
///
/// Holds the selected source labels and an inclusive date range that is compared with the
/// date part of each row's timestamp. Construction guarantees `start <= end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    sources: Vec<String>,
    start: NaiveDate,
    end: NaiveDate,
}

impl FilterCriteria {
    /// Creates filter criteria.
    ///
    /// `start` and `end` can be anything implementing [`AnyDate`]: a `NaiveDate`, a
    /// `"YYYY-MM-DD"` string, a [`crate::Month`] or a [`crate::Year`]. The start bound uses the
    /// first day of its range and the end bound the last day of its range, so
    /// `FilterCriteria::new(["Togo"], Month::new(1, 2022), Month::new(3, 2022))` covers
    /// January 1st through March 31st.
    ///
    /// Duplicate source labels are collapsed. Whether the labels exist is checked when the
    /// criteria are applied to a table, see [`crate::CanonicalFrame::filter`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DateParsing`] if a bound cannot be resolved to a date and
    /// [`ValidationError::InvalidDateRange`] if `start` is after `end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use solarscope::{FilterCriteria, Month, ValidationError};
    ///
    /// let criteria = FilterCriteria::new(["Benin", "Togo"], "2022-01-15", Month::new(2, 2022))?;
    /// assert_eq!(criteria.end().to_string(), "2022-02-28");
    ///
    /// let reversed = FilterCriteria::new(["Benin"], "2022-03-01", "2022-01-01");
    /// assert!(matches!(reversed, Err(ValidationError::InvalidDateRange { .. })));
    /// # Ok::<(), ValidationError>(())
    /// ```
    pub fn new<S: Into<String>>(
        sources: impl IntoIterator<Item = S>,
        start: impl AnyDate + Debug,
        end: impl AnyDate + Debug,
    ) -> Result<Self, ValidationError> {
        let start_desc = format!("{:?}", start);
        let end_desc = format!("{:?}", end);
        let start = start
            .get_date_range()
            .ok_or(ValidationError::DateParsing(start_desc))?
            .start;
        let end = end
            .get_date_range()
            .ok_or(ValidationError::DateParsing(end_desc))?
            .end;

        if start > end {
            return Err(ValidationError::InvalidDateRange { start, end });
        }

        let mut selected: Vec<String> = Vec::new();
        for source in sources {
            let source = source.into();
            if !selected.contains(&source) {
                selected.push(source);
            }
        }

        Ok(Self {
            sources: selected,
            start,
            end,
        })
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Checks that every selected source is one of `available`.
    pub fn validate_sources(&self, available: &[String]) -> Result<(), ValidationError> {
        match self.sources.iter().find(|s| !available.contains(s)) {
            Some(unknown) => Err(ValidationError::UnknownSource {
                source_label: unknown.clone(),
                available: available.to_vec(),
            }),
            None => Ok(()),
        }
    }
}

pub trait SolarFrameFilterExt {
    /// Keeps rows whose `source` is one of `sources`. An empty selection keeps nothing.
    fn filter_sources(self, sources: &[String]) -> LazyFrame;

    /// Keeps rows whose timestamp date lies in `[start_date, end_date]` (inclusive).
    /// Assumes the 'timestamp' column is a Datetime.
    fn filter_dates(self, start_date: NaiveDate, end_date: NaiveDate) -> LazyFrame;

    /// Applies both the source and the date part of `criteria`.
    fn filter_criteria(self, criteria: &FilterCriteria) -> LazyFrame;
}

impl SolarFrameFilterExt for LazyFrame {
    fn filter_sources(self, sources: &[String]) -> LazyFrame {
        let selected = sources.iter().fold(lit(false), |acc, source| {
            acc.or(col(COL_SOURCE).eq(lit(source.as_str())))
        });
        self.filter(selected)
    }

    fn filter_dates(self, start_date: NaiveDate, end_date: NaiveDate) -> LazyFrame {
        self.filter(
            col(COL_TIMESTAMP)
                .dt()
                .date()
                .gt_eq(lit(start_date))
                .and(col(COL_TIMESTAMP).dt().date().lt_eq(lit(end_date))),
        )
    }

    fn filter_criteria(self, criteria: &FilterCriteria) -> LazyFrame {
        self.filter_sources(criteria.sources())
            .filter_dates(criteria.start(), criteria.end())
    }
}
