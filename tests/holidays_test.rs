use chrono::{Datelike, NaiveDate, Weekday};
use gridtariff::holidays::{HolidayCalendar, OntarioHolidays};

fn day(year: i32, month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, d).unwrap()
}

#[test]
fn statutory_holidays_2024() {
    let calendar = OntarioHolidays::new();
    for date in [
        day(2024, 1, 1),   // New Year's Day
        day(2024, 2, 19),  // Family Day
        day(2024, 3, 29),  // Good Friday
        day(2024, 5, 20),  // Victoria Day
        day(2024, 7, 1),   // Canada Day
        day(2024, 9, 2),   // Labour Day
        day(2024, 10, 14), // Thanksgiving
        day(2024, 12, 25), // Christmas Day
        day(2024, 12, 26), // Boxing Day
    ] {
        assert!(calendar.is_holiday(date), "{} should be a holiday", date);
    }
}

#[test]
fn optional_observances_are_excluded() {
    let calendar = OntarioHolidays::new();
    // Civic Holiday (first Monday of August) is not statutory in Ontario.
    assert!(!calendar.is_holiday(day(2024, 8, 5)));
    // Remembrance Day is not an Ontario statutory holiday either.
    assert!(!calendar.is_holiday(day(2024, 11, 11)));
}

#[test]
fn observed_dates_for_weekend_holidays() {
    let calendar = OntarioHolidays::new();

    // Canada Day 2023 fell on a Saturday; the Monday after is observed.
    assert!(calendar.is_holiday(day(2023, 7, 1)));
    assert!(calendar.is_holiday(day(2023, 7, 3)));
    assert!(!calendar.is_holiday(day(2023, 7, 4)));

    // New Year's Day 2022 fell on a Saturday.
    assert!(calendar.is_holiday(day(2022, 1, 3)));

    // Christmas/Boxing Day 2021 fell on Sat/Sun; both shift past the weekend.
    assert!(calendar.is_holiday(day(2021, 12, 27)));
    assert!(calendar.is_holiday(day(2021, 12, 28)));
}

#[test]
fn movable_holidays_always_fall_on_expected_weekdays() {
    for year in 2020..=2030 {
        let holidays = OntarioHolidays::for_year(year);
        let family_day = holidays
            .iter()
            .find(|d| d.month() == 2)
            .copied()
            .expect("Family Day");
        assert_eq!(family_day.weekday(), Weekday::Mon);
        assert!((15..=21).contains(&family_day.day()));

        let victoria_day = holidays
            .iter()
            .find(|d| d.month() == 5)
            .copied()
            .expect("Victoria Day");
        assert_eq!(victoria_day.weekday(), Weekday::Mon);
        assert!((18..=24).contains(&victoria_day.day()));

        let good_friday = holidays
            .iter()
            .find(|d| d.month() == 3 || d.month() == 4)
            .copied()
            .expect("Good Friday");
        assert_eq!(good_friday.weekday(), Weekday::Fri);
    }
}
