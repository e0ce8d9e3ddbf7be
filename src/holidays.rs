//! Ontario statutory holiday calendar
//!
//! Deterministic, pure logic. No IO, no wall-clock. The OEB off-peak rules
//! treat statutory holidays like weekends, so the classifier only needs a
//! membership test.
//!
//! The set covers the nine Ontario statutory holidays: New Year's Day,
//! Family Day, Good Friday, Victoria Day, Canada Day, Labour Day,
//! Thanksgiving, Christmas Day and Boxing Day. Optional observances such as
//! the Civic Holiday are not statutory and are not included. Holidays
//! falling on a weekend also mark the following weekday (observed date),
//! chained so the Christmas/Boxing Day pair never collapses onto one day.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Membership test used by the peak classifier
///
/// Implemented by [`OntarioHolidays`] for production and by plain date sets
/// in tests.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// The Ontario statutory holiday calendar with observed-date semantics
#[derive(Debug, Clone, Copy, Default)]
pub struct OntarioHolidays;

impl OntarioHolidays {
    pub fn new() -> Self {
        Self
    }

    /// All statutory holidays of `year`, actual and observed dates
    pub fn for_year(year: i32) -> BTreeSet<NaiveDate> {
        let good_friday = easter_sunday(year) - Duration::days(2);
        let actual = [
            date(year, 1, 1),                            // New Year's Day
            nth_weekday(year, 2, Weekday::Mon, 3),       // Family Day
            good_friday,                                 // Good Friday
            monday_before(date(year, 5, 25)),            // Victoria Day
            date(year, 7, 1),                            // Canada Day
            nth_weekday(year, 9, Weekday::Mon, 1),       // Labour Day
            nth_weekday(year, 10, Weekday::Mon, 2),      // Thanksgiving
            date(year, 12, 25),                          // Christmas Day
            date(year, 12, 26),                          // Boxing Day
        ];

        let mut holidays: BTreeSet<NaiveDate> = actual.into_iter().collect();
        for day in actual {
            if day.weekday() == Weekday::Sat || day.weekday() == Weekday::Sun {
                let mut observed = day + Duration::days(1);
                while observed.weekday() == Weekday::Sat
                    || observed.weekday() == Weekday::Sun
                    || holidays.contains(&observed)
                {
                    observed += Duration::days(1);
                }
                holidays.insert(observed);
            }
        }
        holidays
    }
}

impl HolidayCalendar for OntarioHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        Self::for_year(date.year()).contains(&date)
    }
}

impl HolidayCalendar for BTreeSet<NaiveDate> {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.contains(&date)
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    // All inputs are fixed calendar dates; only invalid literals could fail.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// The `n`-th given weekday of a month (n is 1-based)
fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> NaiveDate {
    let first = date(year, month, 1);
    let offset = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    first + Duration::days(i64::from(offset + (n - 1) * 7))
}

/// The Monday strictly before the given date
fn monday_before(day: NaiveDate) -> NaiveDate {
    let mut candidate = day - Duration::days(1);
    while candidate.weekday() != Weekday::Mon {
        candidate -= Duration::days(1);
    }
    candidate
}

/// Easter Sunday by the anonymous Gregorian computus
fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    date(year, month as u32, day as u32)
}
