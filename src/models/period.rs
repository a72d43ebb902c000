//! Payroll period model.
//!
//! A period is one (month, year) payroll cycle. Months may be given as a
//! number or by their Spanish name, the way payroll clerks label them.

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Spanish month names in calendar order.
pub const MONTH_NAMES: [&str; 12] = [
    "ENERO",
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
];

/// A (month, year) payroll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl Period {
    /// Creates a period, rejecting months outside 1-12.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::validation(
                "month",
                format!("{} is not a calendar month", month),
            ));
        }
        Ok(Self { year, month })
    }

    /// Creates a period from a month label and a year.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Period;
    ///
    /// let by_name = Period::from_label("marzo", 2026).unwrap();
    /// let by_number = Period::from_label("3", 2026).unwrap();
    /// assert_eq!(by_name, by_number);
    /// assert_eq!(by_name.to_string(), "2026-03");
    /// ```
    pub fn from_label(month: &str, year: i32) -> EngineResult<Self> {
        Self::new(year, parse_month(month)?)
    }

    /// The period containing today's date.
    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    /// The period containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Spanish name of the month.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month as usize).saturating_sub(1) % 12]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Parses a month given as a number or a Spanish name (case-insensitive).
pub fn parse_month(label: &str) -> EngineResult<u32> {
    let trimmed = label.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        if (1..=12).contains(&number) {
            return Ok(number);
        }
    }

    let upper = trimmed.to_uppercase();
    MONTH_NAMES
        .iter()
        .position(|name| *name == upper || (upper == "SETIEMBRE" && *name == "SEPTIEMBRE"))
        .map(|index| index as u32 + 1)
        .ok_or_else(|| {
            EngineError::validation("month", format!("'{}' is not a recognised month", label))
        })
}
