//! Date rules used by the lender: leap years, daily rates, payday
//! resolution and per-month day counts.
//!
//! Leap years follow the plain "divisible by four" rule. Centurial years such
//! as 2100 are treated as leap years, which is only correct for the handful of
//! years a fixed-rate product spans.

use chrono::{Datelike, NaiveDate};

use crate::error::{MortgageError, Result};

/// Latest day of the month a payment may be scheduled on.
pub const MAX_PAY_DAY: u32 = 28;

/// Twelve month lengths, January first unless rotated.
pub type CalendarTable = [u32; 12];

/// How the day count of a stub period treats a date on the 1st of a month.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemainingDays {
    /// The 1st of a month has no remaining days.
    #[default]
    ZeroOnFirst,
    /// The 1st of a month counts the whole month.
    FullMonth,
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0
}

/// Convert an annual percentage rate into a fractional daily rate for `year`.
pub fn daily_rate(annual_rate: f64, year: i32) -> f64 {
    let days_in_year = if is_leap_year(year) { 366. } else { 365. };
    annual_rate * 0.01 / days_in_year
}

/// Resolve the first payment date on or after `day_one` falling on `pay_day`.
pub fn first_pay_date(day_one: NaiveDate, pay_day: u32) -> Result<NaiveDate> {
    if pay_day == 0 || pay_day > MAX_PAY_DAY {
        return Err(MortgageError::InvalidPayDay { pay_day });
    }

    let yr = day_one.year();
    let mon = day_one.month();

    let date = if day_one.day() <= pay_day {
        NaiveDate::from_ymd_opt(yr, mon, pay_day)
    } else if mon == 12 {
        NaiveDate::from_ymd_opt(yr + 1, 1, pay_day)
    } else {
        NaiveDate::from_ymd_opt(yr, mon + 1, pay_day)
    };

    date.ok_or_else(|| {
        MortgageError::InvalidDate(format!("no payday {} after {}", pay_day, day_one))
    })
}

/// Days from `date` (inclusive) up to the 1st of the following month (exclusive).
pub fn remaining_days_in_month(date: NaiveDate, rule: RemainingDays) -> Result<u32> {
    if date.day() == 1 && rule == RemainingDays::ZeroOnFirst {
        return Ok(0);
    }

    let next_first = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .ok_or_else(|| MortgageError::InvalidDate(format!("no month follows {}", date)))?;

    Ok(next_first.signed_duration_since(date).num_days() as u32)
}

pub fn month_lengths(year: i32) -> CalendarTable {
    let feb_days = if is_leap_year(year) { 29 } else { 28 };
    [31, feb_days, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
}

/// Rotate a year of month lengths so it begins with the month after
/// `start_month`.
///
/// Starting after February, the following year's table is used so the
/// February reached by the rotation is the one that actually comes next.
pub fn rotate_to_start(start_month: u32, start_year: i32) -> CalendarTable {
    let mut table = if start_month <= 2 {
        month_lengths(start_year)
    } else {
        month_lengths(start_year + 1)
    };
    table.rotate_left(start_month as usize % 12);
    table
}
