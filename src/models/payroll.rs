//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and its associated
//! structures that capture every output of a period calculation: earnings,
//! deductions, totals, employer costs, and the audit trace.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Period;

/// Optional inputs that vary from one period to the next.
///
/// Every amount defaults to zero and the period defaults to the current month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodOverrides {
    /// Ordinary hours worked on Sundays.
    pub sunday_hours: Decimal,
    /// Ordinary hours worked on public holidays.
    pub holiday_hours: Decimal,
    /// Daytime overtime hours worked on Sundays.
    pub sunday_overtime_hours: Decimal,
    /// Daytime overtime hours on working days.
    pub daytime_overtime_hours: Decimal,
    /// Sales commissions.
    pub commissions: Decimal,
    /// Other salary earnings.
    pub other_earnings: Decimal,
    /// Other deductions (loans, advances).
    pub other_deductions: Decimal,
    /// The period the result belongs to.
    pub period: Option<Period>,
}

/// Hours behind each shift differential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedHours {
    /// Ordinary Sunday hours.
    pub sunday: Decimal,
    /// Ordinary holiday hours.
    pub holiday: Decimal,
    /// Sunday daytime overtime hours.
    pub sunday_overtime: Decimal,
    /// Working-day daytime overtime hours.
    pub daytime_overtime: Decimal,
}

impl WorkedHours {
    /// Hour counts in a fixed order, for comparisons.
    pub fn components(&self) -> [Decimal; 4] {
        [
            self.sunday,
            self.holiday,
            self.sunday_overtime,
            self.daytime_overtime,
        ]
    }
}

/// Earnings for one period, each component rounded to whole pesos.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    /// Proportional base salary.
    pub base_pay: Decimal,
    /// Proportional transport subsidy.
    pub transport_subsidy: Decimal,
    /// Working-day daytime overtime.
    pub daytime_overtime: Decimal,
    /// Sunday differential.
    pub sunday: Decimal,
    /// Holiday differential.
    pub holiday: Decimal,
    /// Sunday overtime differential.
    pub sunday_overtime: Decimal,
    /// Commissions.
    pub commissions: Decimal,
    /// Other earnings.
    pub other: Decimal,
}

impl Earnings {
    /// Earnings components in a fixed order.
    pub fn components(&self) -> [Decimal; 8] {
        [
            self.base_pay,
            self.transport_subsidy,
            self.daytime_overtime,
            self.sunday,
            self.holiday,
            self.sunday_overtime,
            self.commissions,
            self.other,
        ]
    }

    /// Sum of all earnings.
    pub fn total(&self) -> Decimal {
        self.components().iter().sum()
    }
}

/// Employee deductions for one period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    /// Health contribution.
    pub health: Decimal,
    /// Pension contribution.
    pub pension: Decimal,
    /// Fondo de solidaridad pensional.
    pub solidarity_fund: Decimal,
    /// Other deductions.
    pub other: Decimal,
}

impl Deductions {
    /// Deduction components in a fixed order.
    pub fn components(&self) -> [Decimal; 4] {
        [self.health, self.pension, self.solidarity_fund, self.other]
    }

    /// Sum of all deductions.
    pub fn total(&self) -> Decimal {
        self.components().iter().sum()
    }
}

/// Aggregated totals for a period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Gross earnings.
    pub gross: Decimal,
    /// Base for health and pension withholding.
    pub contribution_base: Decimal,
    /// Total deductions.
    pub deductions: Decimal,
    /// Net pay (gross minus deductions).
    pub net: Decimal,
}

/// Employer-side costs. Recorded but not part of net pay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerCosts {
    /// Whether employer health, SENA and ICBF are exempt.
    pub exempt: bool,
    /// Employer health contribution.
    pub health: Decimal,
    /// Employer pension contribution.
    pub pension: Decimal,
    /// ARL percentage applied.
    pub arl_rate: Decimal,
    /// Occupational-risk insurance.
    pub arl: Decimal,
    /// Caja de compensación familiar.
    pub family_fund: Decimal,
    /// SENA.
    pub sena: Decimal,
    /// ICBF.
    pub icbf: Decimal,
    /// Severance provision.
    pub severance_provision: Decimal,
    /// Severance-interest provision.
    pub severance_interest_provision: Decimal,
    /// Bonus provision.
    pub bonus_provision: Decimal,
    /// Vacation provision.
    pub vacation_provision: Decimal,
}

impl EmployerCosts {
    /// Sum of every employer cost.
    pub fn total(&self) -> Decimal {
        self.health
            + self.pension
            + self.arl
            + self.family_fund
            + self.sena
            + self.icbf
            + self.severance_provision
            + self.severance_interest_provision
            + self.bonus_provision
            + self.vacation_provision
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Legal reference for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag decisions that zero out a component or otherwise need a
/// second look; they never stop the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a payroll calculation for one employee and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The employee the calculation is for.
    pub employee_id: String,
    /// The period the calculation is for.
    pub period: Period,
    /// Days worked, base-30.
    pub days_worked: u32,
    /// Configuration used.
    pub configuration_id: i64,
    /// Monthly salary used.
    pub base_salary: Decimal,
    /// Ordinary hourly rate (salary / standard monthly hours).
    pub hour_rate: Decimal,
    /// Hours behind each differential.
    pub hours: WorkedHours,
    /// Earnings breakdown.
    pub earnings: Earnings,
    /// Deductions breakdown.
    pub deductions: Deductions,
    /// Totals.
    pub totals: PayrollTotals,
    /// Employer-side costs.
    pub employer_costs: EmployerCosts,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_overrides_deserialize_with_defaults() {
        let overrides: PeriodOverrides =
            serde_json::from_str(r#"{ "sunday_hours": "8" }"#).unwrap();
        assert_eq!(overrides.sunday_hours, dec("8"));
        assert_eq!(overrides.commissions, Decimal::ZERO);
        assert!(overrides.period.is_none());
    }

    #[test]
    fn test_earnings_total_sums_every_component() {
        let earnings = Earnings {
            base_pay: dec("1300000"),
            transport_subsidy: dec("162000"),
            daytime_overtime: dec("100"),
            sunday: dec("200"),
            holiday: dec("300"),
            sunday_overtime: dec("400"),
            commissions: dec("500"),
            other: dec("600"),
        };
        assert_eq!(earnings.total(), dec("1464100"));
    }

    #[test]
    fn test_deductions_total() {
        let deductions = Deductions {
            health: dec("52000"),
            pension: dec("52000"),
            solidarity_fund: dec("0"),
            other: dec("10000"),
        };
        assert_eq!(deductions.total(), dec("114000"));
    }

    #[test]
    fn test_employer_costs_total() {
        let costs = EmployerCosts {
            exempt: true,
            pension: dec("156000"),
            arl_rate: dec("0.522"),
            arl: dec("6786"),
            family_fund: dec("58480"),
            ..Default::default()
        };
        assert_eq!(costs.total(), dec("221266"));
    }
}
