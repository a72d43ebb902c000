//! Request types for the payroll API.
//!
//! Months may be sent as a number (`3`) or a Spanish name (`"MARZO"`). When
//! a month is given without a year, the current year is used; when neither
//! is given, the period is the current month.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    NewPayment, PaymentKind, Period, PeriodOverrides, RetirementReason, SeveranceOverrides,
    parse_month,
};

/// Author recorded when a request names none.
pub const DEFAULT_AUTHOR: &str = "api";

/// A month given by number or by Spanish name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthLabel {
    /// Calendar month number, 1-12.
    Number(u32),
    /// Spanish month name, case-insensitive.
    Name(String),
}

impl MonthLabel {
    /// The month number.
    pub fn month(&self) -> EngineResult<u32> {
        match self {
            MonthLabel::Number(n) => parse_month(&n.to_string()),
            MonthLabel::Name(name) => parse_month(name),
        }
    }
}

/// Builds a period from optional month and year inputs.
fn resolve_period(month: Option<&MonthLabel>, year: Option<i32>) -> EngineResult<Option<Period>> {
    match (month, year) {
        (None, None) => Ok(None),
        (Some(label), year) => {
            let year = year.unwrap_or_else(|| Utc::now().year());
            Ok(Some(Period::new(year, label.month()?)?))
        }
        (None, Some(_)) => Err(EngineError::validation(
            "month",
            "a month is required when a year is given",
        )),
    }
}

/// Request body for `POST /payroll/calculate` and `POST /payroll/entries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// The employee to calculate.
    pub employee_id: String,
    /// Days worked in the period, 0-30.
    pub days_worked: u32,
    /// Month of the period.
    #[serde(default)]
    pub month: Option<MonthLabel>,
    /// Year of the period.
    #[serde(default)]
    pub year: Option<i32>,
    /// Ordinary hours worked on Sundays.
    #[serde(default)]
    pub sunday_hours: Decimal,
    /// Ordinary hours worked on public holidays.
    #[serde(default)]
    pub holiday_hours: Decimal,
    /// Overtime hours worked on Sundays.
    #[serde(default)]
    pub sunday_overtime_hours: Decimal,
    /// Daytime overtime hours on working days.
    #[serde(default)]
    pub daytime_overtime_hours: Decimal,
    /// Sales commissions.
    #[serde(default)]
    pub commissions: Decimal,
    /// Other salary earnings.
    #[serde(default)]
    pub other_earnings: Decimal,
    /// Other deductions.
    #[serde(default)]
    pub other_deductions: Decimal,
    /// Who is saving the payroll.
    #[serde(default)]
    pub author: Option<String>,
}

impl PayrollRequest {
    /// The per-period inputs for the calculator.
    pub fn overrides(&self) -> EngineResult<PeriodOverrides> {
        Ok(PeriodOverrides {
            sunday_hours: self.sunday_hours,
            holiday_hours: self.holiday_hours,
            sunday_overtime_hours: self.sunday_overtime_hours,
            daytime_overtime_hours: self.daytime_overtime_hours,
            commissions: self.commissions,
            other_earnings: self.other_earnings,
            other_deductions: self.other_deductions,
            period: resolve_period(self.month.as_ref(), self.year)?,
        })
    }

    /// The author, or [`DEFAULT_AUTHOR`].
    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or(DEFAULT_AUTHOR)
    }
}

/// Request body for `POST /payroll/entries/{id}/payments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Amount paid.
    pub amount: Decimal,
    /// Date of payment; defaults to today.
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
    /// Kind of payment; defaults to installment.
    #[serde(default)]
    pub kind: Option<PaymentKind>,
    /// Free-text note.
    #[serde(default)]
    pub note: Option<String>,
    /// Who registered the payment.
    #[serde(default)]
    pub author: Option<String>,
}

impl PaymentRequest {
    /// Splits the request into the payment and its author.
    pub fn into_parts(self) -> (NewPayment, String) {
        let author = self.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        (
            NewPayment {
                amount: self.amount,
                paid_on: self.paid_on,
                kind: self.kind,
                note: self.note,
            },
            author,
        )
    }
}

/// Query string for `GET /payroll/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// The employee whose history is requested.
    pub employee_id: String,
    /// Month filter, number or Spanish name.
    #[serde(default)]
    pub month: Option<String>,
    /// Year filter; requires a month.
    #[serde(default)]
    pub year: Option<i32>,
}

impl HistoryQuery {
    /// The period filter, if any.
    pub fn period(&self) -> EngineResult<Option<Period>> {
        let label = self.month.clone().map(MonthLabel::Name);
        resolve_period(label.as_ref(), self.year)
    }
}

/// Query string for `GET /severance/records`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeQuery {
    /// The employee whose records are requested.
    pub employee_id: String,
}

/// Request body for `POST /severance/calculate` and `POST /severance/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveranceRequest {
    /// The departing employee.
    pub employee_id: String,
    /// Last day of employment.
    pub retirement_date: NaiveDate,
    /// Why the relationship ended.
    pub reason: RetirementReason,
    /// Optional bases and day counts.
    #[serde(default)]
    pub overrides: SeveranceOverrides,
    /// Store the settlement in the severance audit.
    #[serde(default)]
    pub record: bool,
    /// Who requested the settlement.
    #[serde(default)]
    pub author: Option<String>,
}

impl SeveranceRequest {
    /// The author to record under, when recording was requested.
    pub fn record_as(&self) -> Option<&str> {
        self.record
            .then(|| self.author.as_deref().unwrap_or(DEFAULT_AUTHOR))
    }
}

/// Request body for `POST /payroll/periods/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePeriodRequest {
    /// Month to generate.
    pub month: MonthLabel,
    /// Year to generate; defaults to the current year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Who ran the generation.
    #[serde(default)]
    pub author: Option<String>,
}

impl GeneratePeriodRequest {
    /// The period to generate.
    pub fn period(&self) -> EngineResult<Period> {
        let year = self.year.unwrap_or_else(|| Utc::now().year());
        Period::new(year, self.month.month()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_by_name_or_number() {
        let by_name: PayrollRequest = serde_json::from_str(
            r#"{"employee_id": "emp_001", "days_worked": 30, "month": "marzo", "year": 2026}"#,
        )
        .unwrap();
        let by_number: PayrollRequest = serde_json::from_str(
            r#"{"employee_id": "emp_001", "days_worked": 30, "month": 3, "year": 2026}"#,
        )
        .unwrap();

        let expected = Some(Period::new(2026, 3).unwrap());
        assert_eq!(by_name.overrides().unwrap().period, expected);
        assert_eq!(by_number.overrides().unwrap().period, expected);
        assert_eq!(by_name.author(), DEFAULT_AUTHOR);
    }

    #[test]
    fn test_period_defaults_and_errors() {
        assert_eq!(resolve_period(None, None).unwrap(), None);
        assert!(resolve_period(None, Some(2026)).is_err());
        assert!(resolve_period(Some(&MonthLabel::Number(13)), Some(2026)).is_err());
        assert!(resolve_period(Some(&MonthLabel::Name("BRUMARIO".into())), None).is_err());
    }

    #[test]
    fn test_decimal_amounts_accept_strings_and_numbers() {
        let request: PayrollRequest = serde_json::from_str(
            r#"{"employee_id": "e", "days_worked": 30, "sunday_hours": "8", "commissions": 250000}"#,
        )
        .unwrap();
        let overrides = request.overrides().unwrap();
        assert_eq!(overrides.sunday_hours, Decimal::from(8));
        assert_eq!(overrides.commissions, Decimal::from(250000));
    }

    #[test]
    fn test_severance_request_defaults() {
        let request: SeveranceRequest = serde_json::from_str(
            r#"{"employee_id": "e", "retirement_date": "2026-06-30", "reason": "unjust_dismissal"}"#,
        )
        .unwrap();
        assert_eq!(request.overrides, SeveranceOverrides::default());
        assert_eq!(request.record_as(), None);
    }

    #[test]
    fn test_payment_request_parts() {
        let request: PaymentRequest =
            serde_json::from_str(r#"{"amount": "500000", "kind": "supplement"}"#).unwrap();
        let (payment, author) = request.into_parts();
        assert_eq!(payment.kind, Some(PaymentKind::Supplement));
        assert_eq!(author, DEFAULT_AUTHOR);
    }
}
