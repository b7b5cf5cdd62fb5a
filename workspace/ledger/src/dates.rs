use chrono::{Datelike, NaiveDate};

use crate::error::{LedgerError, Result};

/// An inclusive span of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Builds a span, rejecting an end date before the start date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(LedgerError::InvalidSpan { start, end });
        }
        Ok(Self { start, end })
    }
}

/// First through last day of the month containing `as_of`. The fallbacks
/// keep the function total, though they cannot trigger for a valid date.
pub fn month_span(as_of: NaiveDate) -> DateSpan {
    let start = NaiveDate::from_ymd_opt(as_of.year(), as_of.month(), 1).unwrap_or(as_of);
    let next_month_start = NaiveDate::from_ymd_opt(as_of.year(), as_of.month() + 1, 1)
        .or_else(|| NaiveDate::from_ymd_opt(as_of.year() + 1, 1, 1));
    let end = next_month_start
        .and_then(|first| first.pred_opt())
        .unwrap_or(as_of);

    DateSpan { start, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_span_rejects_inverted_dates() {
        let result = DateSpan::new(date(2025, 8, 10), date(2025, 8, 1));
        assert_eq!(
            result,
            Err(LedgerError::InvalidSpan {
                start: date(2025, 8, 10),
                end: date(2025, 8, 1),
            })
        );
    }

    #[test]
    fn test_span_accepts_single_day() {
        let span = DateSpan::new(date(2025, 8, 10), date(2025, 8, 10)).unwrap();
        assert_eq!(span.start, span.end);
    }

    #[test]
    fn test_month_span_mid_month() {
        let span = month_span(date(2025, 8, 19));
        assert_eq!(span.start, date(2025, 8, 1));
        assert_eq!(span.end, date(2025, 8, 31));
    }

    #[test]
    fn test_month_span_december_wraps_year() {
        let span = month_span(date(2025, 12, 5));
        assert_eq!(span.start, date(2025, 12, 1));
        assert_eq!(span.end, date(2025, 12, 31));
    }

    #[test]
    fn test_month_span_leap_february() {
        let span = month_span(date(2024, 2, 29));
        assert_eq!(span.start, date(2024, 2, 1));
        assert_eq!(span.end, date(2024, 2, 29));
    }
}
