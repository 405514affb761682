use crate::error::PipelineError;
use chrono::NaiveDate;
use std::fmt;

/// An inclusive range of calendar dates. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting a start that lies after the end.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidDateRange`] if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PipelineError> {
        if start > end {
            return Err(PipelineError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Formats a bound the way the archive API expects it.
    pub(crate) fn format_bound(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_single_day_range() {
        let range = DateRange::new(date(2010, 1, 1), date(2010, 1, 1)).unwrap();
        assert_eq!(range.start(), range.end());
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::new(date(2020, 12, 31), date(2010, 1, 1)).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDateRange { .. }));
    }

    #[test]
    fn formats_bounds_as_iso_dates() {
        assert_eq!(DateRange::format_bound(date(2010, 1, 5)), "2010-01-05");
    }
}
