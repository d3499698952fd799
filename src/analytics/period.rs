use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar resolution used to bucket transactions.
///
/// Weeks start on Monday; months are calendar months.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Truncates a date to the start of the period containing it.
    pub fn truncate(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                let delta = date.weekday().num_days_from_monday() as i64;
                date - Duration::days(delta)
            }
            Granularity::Month => date.with_day(1).unwrap(),
        }
    }

    /// Returns the start of the period after the one starting at `start`.
    pub fn advance(&self, start: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => start + Duration::days(1),
            Granularity::Week => start + Duration::weeks(1),
            Granularity::Month => shift_month(start, 1),
        }
    }

    /// Period starts covering the half-open range `[start, end)`.
    pub fn periods_covering(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut starts = Vec::new();
        let mut cursor = self.truncate(start);
        while cursor < end {
            starts.push(cursor);
            cursor = self.advance(cursor);
        }
        starts
    }
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_truncates_to_monday() {
        // 2024-01-17 is a Wednesday.
        assert_eq!(
            Granularity::Week.truncate(date(2024, 1, 17)),
            date(2024, 1, 15)
        );
        // Mondays are already aligned.
        assert_eq!(
            Granularity::Week.truncate(date(2024, 1, 15)),
            date(2024, 1, 15)
        );
    }

    #[test]
    fn month_truncates_to_first() {
        assert_eq!(
            Granularity::Month.truncate(date(2024, 2, 29)),
            date(2024, 2, 1)
        );
    }

    #[test]
    fn advance_handles_year_rollover() {
        assert_eq!(
            Granularity::Month.advance(date(2024, 12, 1)),
            date(2025, 1, 1)
        );
        assert_eq!(
            Granularity::Day.advance(date(2024, 12, 31)),
            date(2025, 1, 1)
        );
    }

    #[test]
    fn periods_partition_the_window() {
        let starts = Granularity::Month.periods_covering(date(2024, 1, 15), date(2024, 4, 1));
        assert_eq!(
            starts,
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]
        );
        for pair in starts.windows(2) {
            assert_eq!(Granularity::Month.advance(pair[0]), pair[1]);
        }
    }
}
