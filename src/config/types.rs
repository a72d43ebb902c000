//! Configuration types for payroll rule sets.
//!
//! A [`RuleSet`] is the legal parameter set for one payroll year. It is
//! deserialized from YAML, persisted as an immutable row, and wrapped in a
//! [`Configuration`] once activated.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Employee and employer social-security percentages.
///
/// All values are percentages (e.g. `4` means 4%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRates {
    /// Health withheld from the employee.
    pub employee_health: Decimal,
    /// Pension withheld from the employee.
    pub employee_pension: Decimal,
    /// Health paid by the employer when not exempt.
    pub employer_health: Decimal,
    /// Pension paid by the employer.
    pub employer_pension: Decimal,
    /// Contribution base above which the solidarity fund applies, in minimum wages.
    pub solidarity_threshold_multiple: Decimal,
    /// Solidarity-fund percentage applied to the contribution base.
    pub solidarity_rate: Decimal,
}

/// Parafiscal percentages paid by the employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParafiscalRates {
    /// Caja de compensación familiar, applied to gross.
    pub family_fund: Decimal,
    /// SENA, applied to the contribution base when not exempt.
    pub sena: Decimal,
    /// ICBF, applied to the contribution base when not exempt.
    pub icbf: Decimal,
}

/// Social-benefit provision percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRates {
    /// Cesantías.
    pub severance: Decimal,
    /// Intereses sobre cesantías.
    pub severance_interest: Decimal,
    /// Prima de servicios.
    pub bonus: Decimal,
    /// Vacaciones.
    pub vacation: Decimal,
}

/// Shift-differential surcharges.
///
/// Each value is the surcharge over the ordinary hourly rate, so `80` pays
/// 180% of the hourly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferentialRates {
    /// Ordinary hours worked on Sunday.
    pub sunday: Decimal,
    /// Ordinary hours worked on a public holiday.
    pub holiday: Decimal,
    /// Daytime overtime worked on Sunday.
    pub sunday_overtime: Decimal,
    /// Daytime overtime on a working day.
    pub daytime_overtime: Decimal,
}

/// A complete payroll rule set.
///
/// # Example
///
/// ```
/// use payroll_engine::config::RuleSet;
///
/// let yaml = r#"
/// name: "Vigencia 2026"
/// effective_from: 2026-01-01
/// minimum_wage: "1750905"
/// transport_subsidy: "249095"
/// uvt: "52374"
/// contributions:
///   employee_health: "4"
///   employee_pension: "4"
///   employer_health: "8.5"
///   employer_pension: "12"
///   solidarity_threshold_multiple: "4"
///   solidarity_rate: "1"
/// parafiscal: { family_fund: "4", sena: "2", icbf: "3" }
/// provisions: { severance: "8.33", severance_interest: "1", bonus: "8.33", vacation: "4.17" }
/// differentials: { sunday: "80", holiday: "80", sunday_overtime: "105", daytime_overtime: "25" }
/// standard_monthly_hours: "220"
/// "#;
///
/// let rules: RuleSet = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(rules.minimum_wage.to_string(), "1750905");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Human-readable name, also used as the normative version label.
    pub name: String,
    /// First date on which the rule set applies.
    pub effective_from: NaiveDate,
    /// Salario mínimo mensual legal vigente.
    pub minimum_wage: Decimal,
    /// Monthly transport subsidy.
    pub transport_subsidy: Decimal,
    /// Unidad de valor tributario.
    pub uvt: Decimal,
    /// Social-security percentages.
    pub contributions: ContributionRates,
    /// Parafiscal percentages.
    pub parafiscal: ParafiscalRates,
    /// Provision percentages.
    pub provisions: ProvisionRates,
    /// Shift-differential surcharges.
    pub differentials: DifferentialRates,
    /// Hours in an ordinary working month, used to derive the hourly rate.
    pub standard_monthly_hours: Decimal,
}

/// An activated, persisted rule set.
///
/// Exactly one configuration has `superseded_at == None` at any instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Store identifier.
    pub id: i64,
    /// When this configuration became effective in the store.
    pub activated_at: DateTime<Utc>,
    /// When a newer configuration replaced this one.
    pub superseded_at: Option<DateTime<Utc>>,
    /// The rule values.
    #[serde(flatten)]
    pub rules: RuleSet,
}

impl Configuration {
    /// Returns true while no newer configuration has replaced this one.
    pub fn is_effective(&self) -> bool {
        self.superseded_at.is_none()
    }
}
