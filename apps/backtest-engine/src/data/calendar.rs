//! Business-day calendar helpers.
//!
//! The engine treats every Monday through Friday as a trading day; exchange
//! holidays are not modeled.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Whether the date falls on a weekday.
#[must_use]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// All business days between `start` and `end`, inclusive.
///
/// Returns an empty vector when `start > end` or the range contains only
/// weekend days.
#[must_use]
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        if is_business_day(current) {
            days.push(current);
        }
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekend_is_not_business_day() {
        // 2024-01-06 is a Saturday, 2024-01-07 a Sunday
        assert!(!is_business_day(date(2024, 1, 6)));
        assert!(!is_business_day(date(2024, 1, 7)));
        assert!(is_business_day(date(2024, 1, 8)));
    }

    #[test]
    fn test_business_days_spans_weekend() {
        // Fri 2024-01-05 through Tue 2024-01-09
        let days = business_days(date(2024, 1, 5), date(2024, 1, 9));
        assert_eq!(
            days,
            vec![date(2024, 1, 5), date(2024, 1, 8), date(2024, 1, 9)]
        );
    }

    #[test]
    fn test_business_days_empty_for_inverted_range() {
        assert!(business_days(date(2024, 1, 9), date(2024, 1, 5)).is_empty());
    }

    #[test]
    fn test_business_days_weekend_only_range() {
        assert!(business_days(date(2024, 1, 6), date(2024, 1, 7)).is_empty());
    }
}
