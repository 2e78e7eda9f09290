//! Expiration date calendar: weekly Fridays and monthly third Fridays.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// First Friday strictly after `date`.
#[must_use]
pub fn next_friday(date: NaiveDate) -> NaiveDate {
    let mut offset = (Weekday::Fri.num_days_from_monday() + 7
        - date.weekday().num_days_from_monday())
        % 7;
    if offset == 0 {
        offset = 7;
    }
    date.checked_add_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// Third Friday of the given month, the standard monthly expiration.
#[must_use]
pub fn third_friday(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let to_friday = (Weekday::Fri.num_days_from_monday() + 7
        - first.weekday().num_days_from_monday())
        % 7;
    first.checked_add_days(Days::new(u64::from(to_friday) + 14))
}

/// Upcoming expirations as of `as_of`: the next `weekly_count` Fridays plus
/// the next `monthly_count` third-Friday monthlies, deduplicated and sorted.
/// Every returned date is strictly after `as_of`.
#[must_use]
pub fn expiration_dates(as_of: NaiveDate, weekly_count: u32, monthly_count: u32) -> Vec<NaiveDate> {
    let mut dates = BTreeSet::new();

    let mut friday = next_friday(as_of);
    for _ in 0..weekly_count {
        dates.insert(friday);
        friday = next_friday(friday);
    }

    let mut year = as_of.year();
    let mut month = as_of.month();
    let mut collected = 0;
    while collected < monthly_count {
        if let Some(monthly) = third_friday(year, month) {
            if monthly > as_of {
                dates.insert(monthly);
                collected += 1;
            }
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }

    dates.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_friday_from_weekday() {
        // 2024-01-02 is a Tuesday
        assert_eq!(next_friday(date(2024, 1, 2)), date(2024, 1, 5));
    }

    #[test]
    fn test_next_friday_from_friday_skips_to_next_week() {
        assert_eq!(next_friday(date(2024, 1, 5)), date(2024, 1, 12));
    }

    #[test]
    fn test_third_friday_known_months() {
        assert_eq!(third_friday(2024, 1), Some(date(2024, 1, 19)));
        assert_eq!(third_friday(2024, 6), Some(date(2024, 6, 21)));
        assert_eq!(third_friday(2024, 12), Some(date(2024, 12, 20)));
    }

    #[test]
    fn test_expirations_sorted_unique_and_future() {
        let as_of = date(2024, 1, 2);
        let dates = expiration_dates(as_of, 8, 12);

        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert!(dates.iter().all(|d| *d > as_of));
        // 8 weeklies + 12 monthlies, with overlapping third Fridays deduped
        assert!(dates.len() > 12 && dates.len() <= 20);
    }

    #[test]
    fn test_expirations_dedupe_third_friday_weekly_overlap() {
        // 2024-01-19 is both a weekly Friday and the January monthly
        let dates = expiration_dates(date(2024, 1, 2), 8, 12);
        let count = dates.iter().filter(|d| **d == date(2024, 1, 19)).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_expirations_cross_year_boundary() {
        let dates = expiration_dates(date(2024, 11, 25), 8, 12);
        assert!(dates.iter().any(|d| d.year() == 2025));
    }
}
