//! Day counting for settlements.
//!
//! Benefits accrue on inclusive calendar days, capped at the 360-day
//! commercial year (180 for the bonus semester).

use chrono::{Datelike, NaiveDate};

/// Maximum severance days in one year.
pub const SEVERANCE_DAY_CAP: u32 = 360;

/// Maximum bonus days in one semester.
pub const BONUS_DAY_CAP: u32 = 180;

/// Inclusive day count from `from` to `to`; zero when `to` precedes `from`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::inclusive_days;
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
/// assert_eq!(inclusive_days(d(1, 1), d(1, 1)), 1);
/// assert_eq!(inclusive_days(d(1, 1), d(1, 31)), 31);
/// assert_eq!(inclusive_days(d(2, 1), d(1, 31)), 0);
/// ```
pub fn inclusive_days(from: NaiveDate, to: NaiveDate) -> i64 {
    if to < from {
        0
    } else {
        (to - from).num_days() + 1
    }
}

/// First day of the legal semester containing `date` (Jan 1 or Jul 1).
pub fn semester_start(date: NaiveDate) -> NaiveDate {
    let month = if date.month() <= 6 { 1 } else { 7 };
    NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
}

/// First day of the calendar year containing `date`.
pub fn year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Severance days: from the later of contract start and January 1, capped at 360.
pub fn severance_day_count(start: NaiveDate, retirement: NaiveDate) -> u32 {
    capped(inclusive_days(start.max(year_start(retirement)), retirement), SEVERANCE_DAY_CAP)
}

/// Bonus days: from the later of contract start and the semester start, capped at 180.
pub fn bonus_day_count(start: NaiveDate, retirement: NaiveDate) -> u32 {
    capped(inclusive_days(start.max(semester_start(retirement)), retirement), BONUS_DAY_CAP)
}

fn capped(days: i64, cap: u32) -> u32 {
    u32::try_from(days).unwrap_or(0).min(cap)
}
