//! Active pricing-period classification
//!
//! Pure rules: given a local date/time, the holiday calendar, the sector and
//! the configured tariff plan, decide which pricing period applies right now.
//! The result is never cached; reads recompute it because it changes with the
//! clock, not with the feed.
//!
//! Per OEB rules, weekends and statutory holidays are 24-hour off-peak under
//! the time-of-use plan. During summer (May 1st through October 31st) the
//! morning and evening windows are mid-peak and the afternoon is on-peak;
//! winter flips the two. The ultra-low-overnight plan has a fixed overnight
//! window every day of the year, with no seasonal variation.

use crate::holidays::HolidayCalendar;
use crate::sector::Sector;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Tariff plan selected for the configured company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffPlan {
    TimeOfUse,
    UltraLowOvernight,
}

impl TariffPlan {
    /// Stable snake_case label exposed in attributes
    pub const fn as_str(self) -> &'static str {
        match self {
            TariffPlan::TimeOfUse => "time_of_use",
            TariffPlan::UltraLowOvernight => "ultra_low_overnight",
        }
    }
}

/// Pricing season; only the time-of-use plan varies with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    /// Summer runs May 1st through October 31st, inclusive on both ends
    pub fn of(date: NaiveDate) -> Self {
        let year = date.year();
        let summer_start = NaiveDate::from_ymd_opt(year, 5, 1).unwrap_or(date);
        let summer_end = NaiveDate::from_ymd_opt(year, 10, 31).unwrap_or(date);
        if date >= summer_start && date <= summer_end {
            Season::Summer
        } else {
            Season::Winter
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Winter => "winter",
        }
    }
}

/// Currently active pricing-period label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakState {
    OffPeak,
    MidPeak,
    OnPeak,
    /// Natural gas has no time-varying tariff
    NoPeak,
    UloOffPeak,
    UloMidPeak,
    UloOnPeak,
    UloOvernight,
}

impl PeakState {
    /// Stable snake_case label exposed in attributes
    pub const fn as_str(self) -> &'static str {
        match self {
            PeakState::OffPeak => "off_peak",
            PeakState::MidPeak => "mid_peak",
            PeakState::OnPeak => "on_peak",
            PeakState::NoPeak => "no_peak",
            PeakState::UloOffPeak => "ulo_off_peak",
            PeakState::UloMidPeak => "ulo_mid_peak",
            PeakState::UloOnPeak => "ulo_on_peak",
            PeakState::UloOvernight => "ulo_overnight",
        }
    }

    /// Descriptive field name holding this period's rate, if any
    ///
    /// `NoPeak` has no rate field of its own; natural-gas reads resolve to
    /// `gas_supply_charge` at the snapshot layer instead.
    pub const fn rate_field(self) -> Option<&'static str> {
        match self {
            PeakState::OnPeak => Some("time_of_use_on_peak_price"),
            PeakState::MidPeak => Some("time_of_use_mid_peak_price"),
            PeakState::OffPeak => Some("time_of_use_off_peak_price"),
            PeakState::UloOnPeak => Some("ultra_low_overnight_on_peak_rate"),
            PeakState::UloMidPeak => Some("ultra_low_overnight_mid_peak_rate"),
            PeakState::UloOffPeak => Some("ultra_low_overnight_off_peak_rate"),
            PeakState::UloOvernight => Some("ultra_low_overnight_overnight_rate"),
            PeakState::NoPeak => None,
        }
    }
}

impl std::fmt::Display for PeakState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the active pricing period for a local wall-clock instant
pub fn classify(
    now: NaiveDateTime,
    holidays: &dyn HolidayCalendar,
    sector: Sector,
    plan: TariffPlan,
) -> PeakState {
    if sector == Sector::NaturalGas {
        return PeakState::NoPeak;
    }
    match plan {
        TariffPlan::TimeOfUse => time_of_use_peak(now, holidays),
        TariffPlan::UltraLowOvernight => ultra_low_overnight_peak(now, holidays),
    }
}

fn is_holiday_or_weekend(now: NaiveDateTime, holidays: &dyn HolidayCalendar) -> bool {
    holidays.is_holiday(now.date()) || now.weekday().num_days_from_monday() >= 5
}

fn time_of_use_peak(now: NaiveDateTime, holidays: &dyn HolidayCalendar) -> PeakState {
    if is_holiday_or_weekend(now, holidays) {
        return PeakState::OffPeak;
    }

    let is_summer = Season::of(now.date()) == Season::Summer;
    let hour = now.hour();
    if (7..11).contains(&hour) || (17..19).contains(&hour) {
        return if is_summer {
            PeakState::MidPeak
        } else {
            PeakState::OnPeak
        };
    }
    if (11..17).contains(&hour) {
        return if is_summer {
            PeakState::OnPeak
        } else {
            PeakState::MidPeak
        };
    }
    PeakState::OffPeak
}

fn ultra_low_overnight_peak(now: NaiveDateTime, holidays: &dyn HolidayCalendar) -> PeakState {
    // The overnight window applies every day, holidays and weekends included.
    let hour = now.hour();
    if hour < 7 || hour >= 23 {
        return PeakState::UloOvernight;
    }
    if is_holiday_or_weekend(now, holidays) {
        return PeakState::UloOffPeak;
    }
    if (16..21).contains(&hour) {
        return PeakState::UloOnPeak;
    }
    PeakState::UloMidPeak
}

/// Peak-classification capability, resolvable fresh on every read
pub trait PeakCalculator: Send + Sync {
    /// Active pricing period at the given local instant
    fn active_peak(&self, now: NaiveDateTime) -> PeakState;
}

/// OEB classification rules bound to a sector and tariff plan
pub struct OntarioPeakCalculator<C: HolidayCalendar + Send + Sync> {
    holidays: C,
    sector: Sector,
    plan: TariffPlan,
}

impl<C: HolidayCalendar + Send + Sync> OntarioPeakCalculator<C> {
    pub fn new(holidays: C, sector: Sector, plan: TariffPlan) -> Self {
        Self {
            holidays,
            sector,
            plan,
        }
    }
}

impl<C: HolidayCalendar + Send + Sync> PeakCalculator for OntarioPeakCalculator<C> {
    fn active_peak(&self, now: NaiveDateTime) -> PeakState {
        classify(now, &self.holidays, self.sector, self.plan)
    }
}
