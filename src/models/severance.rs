//! Severance settlement models.
//!
//! A [`SeveranceResult`] is the liquidación definitiva for one employee:
//! every component carries its day-count, formula, and legal reference.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditTrace, ContractType};

/// Why the employment relationship ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetirementReason {
    /// Renuncia voluntaria.
    VoluntaryResignation,
    /// Terminación con justa causa.
    JustCauseTermination,
    /// Despido sin justa causa.
    UnjustDismissal,
    /// Mutuo acuerdo.
    MutualAgreement,
}

impl RetirementReason {
    /// Storage label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RetirementReason::VoluntaryResignation => "voluntary_resignation",
            RetirementReason::JustCauseTermination => "just_cause_termination",
            RetirementReason::UnjustDismissal => "unjust_dismissal",
            RetirementReason::MutualAgreement => "mutual_agreement",
        }
    }
}

/// Optional inputs for a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeveranceOverrides {
    /// Base salary entered by hand; wins over everything else.
    pub manual_base_salary: Option<Decimal>,
    /// Whether the salary is fixed. Variable salaries use the 12-month average.
    pub salary_is_fixed: bool,
    /// Average monthly salary over the last 12 months.
    pub twelve_month_average: Option<Decimal>,
    /// Forces the transport subsidy in or out of the benefits base.
    pub include_transport_subsidy: Option<bool>,
    /// Pending vacation days.
    pub vacation_days: Option<u32>,
    /// Bonus days.
    pub bonus_days: Option<u32>,
    /// Severance days.
    pub severance_days: Option<u32>,
    /// Unpaid salary days in the final month.
    pub pending_salary_days: Option<u32>,
}

impl Default for SeveranceOverrides {
    fn default() -> Self {
        Self {
            manual_base_salary: None,
            salary_is_fixed: true,
            twelve_month_average: None,
            include_transport_subsidy: None,
            vacation_days: None,
            bonus_days: None,
            severance_days: None,
            pending_salary_days: None,
        }
    }
}

/// The salary figures a settlement is built on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceBases {
    /// Monthly salary used (manual, average, or contract salary).
    pub base_salary: Decimal,
    /// Whether the base came from a variable-salary average.
    pub variable_salary: bool,
    /// Whether the transport subsidy is part of the benefits base.
    pub transport_subsidy_included: bool,
    /// Transport subsidy added to the benefits base.
    pub transport_subsidy: Decimal,
    /// Base for severance, interest, and bonus.
    pub benefits_base: Decimal,
}

/// One settlement component with its traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceComponent {
    /// Days the component is computed on.
    pub days: Decimal,
    /// Value, rounded to whole pesos.
    pub value: Decimal,
    /// The formula with its figures substituted.
    pub formula: String,
    /// Legal reference.
    pub clause_ref: String,
}

/// Unpaid salary for the final month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSalary {
    /// Days owed.
    pub days: u32,
    /// floor(base / 30).
    pub daily_rate: Decimal,
    /// daily_rate × days.
    pub gross: Decimal,
    /// Proportional transport subsidy.
    pub transport_subsidy: Decimal,
    /// Health withheld.
    pub health: Decimal,
    /// Pension withheld.
    pub pension: Decimal,
    /// gross + subsidy − health − pension.
    pub net: Decimal,
    /// The formula with its figures substituted.
    pub formula: String,
}

/// A complete termination settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// Employee.
    pub employee_id: String,
    /// Employee name, for documents.
    pub employee_name: String,
    /// Contract type.
    pub contract_type: ContractType,
    /// Contract start.
    pub start_date: NaiveDate,
    /// Last day worked.
    pub retirement_date: NaiveDate,
    /// Why the relationship ended.
    pub reason: RetirementReason,
    /// Inclusive days between start and retirement.
    pub tenure_days: i64,
    /// Configuration used.
    pub configuration_id: i64,
    /// Salary bases.
    pub bases: SeveranceBases,
    /// Cesantías.
    pub severance: SeveranceComponent,
    /// Intereses sobre cesantías.
    pub severance_interest: SeveranceComponent,
    /// Prima de servicios.
    pub bonus: SeveranceComponent,
    /// Vacaciones.
    pub vacation: SeveranceComponent,
    /// Indemnización.
    pub indemnity: SeveranceComponent,
    /// Final-month salary.
    pub pending_salary: PendingSalary,
    /// Decisions that shaped the result.
    pub notes: Vec<String>,
    /// Grand total.
    pub total: Decimal,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_serialization() {
        let json = serde_json::to_string(&RetirementReason::UnjustDismissal).unwrap();
        assert_eq!(json, "\"unjust_dismissal\"");
        let reason: RetirementReason = serde_json::from_str("\"mutual_agreement\"").unwrap();
        assert_eq!(reason, RetirementReason::MutualAgreement);
        assert_eq!(reason.as_str(), "mutual_agreement");
    }

    #[test]
    fn test_overrides_default_to_fixed_salary() {
        let overrides: SeveranceOverrides = serde_json::from_str("{}").unwrap();
        assert!(overrides.salary_is_fixed);
        assert!(overrides.manual_base_salary.is_none());
        assert_eq!(overrides, SeveranceOverrides::default());
    }
}
