use crate::types::traits::types::{Month, StartEndDate, Year};
use crate::types::traits::utils::days_in_month;
use chrono::NaiveDate;

/// Anything that resolves to an inclusive range of calendar dates.
///
/// Used by [`crate::FilterCriteria`] so that a filter can be expressed as
/// `NaiveDate`s, `"YYYY-MM-DD"` strings, whole months or whole years. A start bound
/// takes the beginning of the resolved range and an end bound takes its end.
pub trait AnyDate {
    fn get_date_range(self) -> Option<StartEndDate>;
}

impl AnyDate for NaiveDate {
    fn get_date_range(self) -> Option<StartEndDate> {
        Some(StartEndDate {
            start: self,
            end: self,
        })
    }
}

impl AnyDate for &str {
    fn get_date_range(self) -> Option<StartEndDate> {
        NaiveDate::parse_from_str(self, "%Y-%m-%d")
            .ok()?
            .get_date_range()
    }
}

impl AnyDate for String {
    fn get_date_range(self) -> Option<StartEndDate> {
        self.as_str().get_date_range()
    }
}

impl AnyDate for Year {
    fn get_date_range(self) -> Option<StartEndDate> {
        Some(StartEndDate {
            start: NaiveDate::from_ymd_opt(self.0, 1, 1)?,
            end: NaiveDate::from_ymd_opt(self.0, 12, 31)?,
        })
    }
}

impl AnyDate for Month {
    fn get_date_range(self) -> Option<StartEndDate> {
        let year = self.year();
        let month = self.month();
        Some(StartEndDate {
            start: NaiveDate::from_ymd_opt(year, month, 1)?,
            end: NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_range_covers_whole_month() {
        let range = Month::new(2, 2024).get_date_range().unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_string_dates() {
        let range = "2021-08-09".get_date_range().unwrap();
        assert_eq!(range.start, range.end);
        assert!("09/08/2021".get_date_range().is_none());
        assert!(Month::new(13, 2021).get_date_range().is_none());
    }
}
