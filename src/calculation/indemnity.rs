//! Indemnity for dismissal without just cause.
//!
//! Only unjust dismissals outside an active probation window are indemnified.
//! Indefinite contracts use a tiered days-per-year table; fixed-term contracts
//! pay the salary for the remainder of the term.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

use crate::config::RuleSet;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, ContractType, Employee, RetirementReason, SeveranceComponent};

use super::day_count::inclusive_days;
use super::rounding::round_currency;

/// Legal reference for indemnity.
pub const INDEMNITY_CLAUSE: &str = "CST Art. 64";

/// Legal reference for the probation period.
pub const PROBATION_CLAUSE: &str = "CST Art. 76-80";

/// Salary, in minimum wages, up to which the higher indemnity tier applies.
pub const INDEMNITY_TIER_MULTIPLE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

const DAYS_360: Decimal = Decimal::from_parts(360, 0, 0, false, 0);
const DAYS_30: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Days of salary per year of service for indefinite contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndemnityTier {
    /// Days for the first year.
    pub first_year_days: u32,
    /// Days for each year after the first.
    pub additional_year_days: u32,
}

/// Tier for salaries up to ten minimum wages.
pub const LOWER_SALARY_TIER: IndemnityTier = IndemnityTier {
    first_year_days: 30,
    additional_year_days: 20,
};

/// Tier for salaries above ten minimum wages.
pub const HIGHER_SALARY_TIER: IndemnityTier = IndemnityTier {
    first_year_days: 20,
    additional_year_days: 15,
};

/// The result of calculating indemnity.
#[derive(Debug, Clone)]
pub struct IndemnityResult {
    /// The component; zero when not applicable.
    pub component: SeveranceComponent,
    /// Decision note explaining a zero or the path taken.
    pub note: String,
    /// Set when probation blocked the indemnity.
    pub warning: Option<AuditWarning>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// floor(salary / 30).
pub fn daily_rate(base_salary: Decimal) -> Decimal {
    (base_salary / DAYS_30).round_dp_with_strategy(0, RoundingStrategy::ToNegativeInfinity)
}

/// Indemnity days for an indefinite contract.
///
/// Up to 360 days of tenure the first-year days are prorated; beyond that,
/// the additional-year days are prorated on the excess.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{LOWER_SALARY_TIER, indefinite_indemnity_days};
/// use rust_decimal::Decimal;
///
/// // 30 + 20 × 40 / 360
/// let days = indefinite_indemnity_days(400, LOWER_SALARY_TIER);
/// assert_eq!(days.round_dp(4), Decimal::new(322222, 4));
/// ```
pub fn indefinite_indemnity_days(tenure_days: i64, tier: IndemnityTier) -> Decimal {
    let tenure = Decimal::from(tenure_days.max(0));
    let first = Decimal::from(tier.first_year_days);
    if tenure <= DAYS_360 {
        first * tenure / DAYS_360
    } else {
        first + Decimal::from(tier.additional_year_days) * (tenure - DAYS_360) / DAYS_360
    }
}

fn component(days: Decimal, value: Decimal, formula: String) -> SeveranceComponent {
    SeveranceComponent {
        days,
        value,
        formula,
        clause_ref: INDEMNITY_CLAUSE.to_string(),
    }
}

/// Calculates the indemnity owed on termination.
///
/// # Arguments
///
/// * `employee` - The employee leaving
/// * `retirement_date` - Last day worked
/// * `reason` - Why the relationship ended
/// * `base_salary` - Monthly salary used for the daily rate and the tier
/// * `rules` - Effective rule set
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// `ValidationError` when a fixed-term contract reaches the indemnity path
/// without an end date.
///
/// # Legal Reference
///
/// CST Art. 64. An active probation window (CST Art. 76-80) blocks the
/// indemnity entirely.
pub fn calculate_indemnity(
    employee: &Employee,
    retirement_date: chrono::NaiveDate,
    reason: RetirementReason,
    base_salary: Decimal,
    rules: &RuleSet,
    step_number: u32,
) -> EngineResult<IndemnityResult> {
    let daily = daily_rate(base_salary);
    let tenure_days = inclusive_days(employee.start_date, retirement_date);

    let step = |output: serde_json::Value, reasoning: String| AuditStep {
        step_number,
        rule_id: "indemnity".to_string(),
        rule_name: "Unjust Dismissal Indemnity".to_string(),
        clause_ref: INDEMNITY_CLAUSE.to_string(),
        input: serde_json::json!({
            "reason": reason.as_str(),
            "contract_type": employee.contract_type.as_str(),
            "tenure_days": tenure_days,
            "daily_rate": daily.to_string(),
            "probation": employee.probation,
            "probation_end_date": employee.probation_end_date.map(|d| d.to_string()),
            "end_date": employee.end_date.map(|d| d.to_string())
        }),
        output,
        reasoning,
    };

    if employee.in_probation_on(retirement_date) {
        let note = format!(
            "Retirement on {} falls inside the probation window ending {}; no indemnity ({})",
            retirement_date,
            employee
                .probation_end_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            PROBATION_CLAUSE
        );
        warn!(employee_id = %employee.id, %retirement_date, "Indemnity blocked by probation");
        return Ok(IndemnityResult {
            component: component(Decimal::ZERO, Decimal::ZERO, "Probation period".to_string()),
            warning: Some(AuditWarning {
                code: "PROBATION_NO_INDEMNITY".to_string(),
                message: note.clone(),
                severity: "medium".to_string(),
            }),
            audit_step: step(
                serde_json::json!({ "applies": false, "amount": "0" }),
                note.clone(),
            ),
            note,
        });
    }

    if reason != RetirementReason::UnjustDismissal {
        let note = format!("No indemnity for {}", reason.as_str().replace('_', " "));
        info!(employee_id = %employee.id, reason = reason.as_str(), "Indemnity not applicable");
        return Ok(IndemnityResult {
            component: component(Decimal::ZERO, Decimal::ZERO, "Not applicable".to_string()),
            warning: None,
            audit_step: step(
                serde_json::json!({ "applies": false, "amount": "0" }),
                note.clone(),
            ),
            note,
        });
    }

    let (days, formula, note) = match employee.contract_type {
        ContractType::Indefinite => {
            let lower = base_salary <= rules.minimum_wage * INDEMNITY_TIER_MULTIPLE;
            let tier = if lower {
                LOWER_SALARY_TIER
            } else {
                HIGHER_SALARY_TIER
            };
            let days = indefinite_indemnity_days(tenure_days, tier);
            let formula = if tenure_days <= 360 {
                format!(
                    "${} × ({} × {} / 360)",
                    daily, tier.first_year_days, tenure_days
                )
            } else {
                format!(
                    "${} × {} + ${} × ({} × {} / 360)",
                    daily,
                    tier.first_year_days,
                    daily,
                    tier.additional_year_days,
                    tenure_days - 360
                )
            };
            let note = format!(
                "Indefinite contract, salary {} 10 minimum wages: {} days first year, {} days after",
                if lower { "≤" } else { ">" },
                tier.first_year_days,
                tier.additional_year_days
            );
            (days, formula, note)
        }
        ContractType::FixedTerm => {
            let end_date = employee.end_date.ok_or_else(|| {
                EngineError::validation(
                    "end_date",
                    "fixed-term contract has no end date; indemnity cannot be computed",
                )
            })?;
            let remaining = (end_date - retirement_date).num_days().max(0);
            let note = if remaining == 0 {
                format!("Fixed term ended on {}; no remaining days to indemnify", end_date)
            } else {
                format!("Fixed-term contract: {} days remaining until {}", remaining, end_date)
            };
            (
                Decimal::from(remaining),
                format!("${} × {} remaining days", daily, remaining),
                note,
            )
        }
        ContractType::Other => {
            let note = "Contract type has no statutory indemnity table; indemnity set to zero"
                .to_string();
            warn!(employee_id = %employee.id, "Indemnity zero for contract type 'other'");
            return Ok(IndemnityResult {
                component: component(Decimal::ZERO, Decimal::ZERO, "Not applicable".to_string()),
                warning: None,
                audit_step: step(
                    serde_json::json!({ "applies": false, "amount": "0" }),
                    note.clone(),
                ),
                note,
            });
        }
    };

    let value = round_currency(daily * days);
    info!(
        employee_id = %employee.id,
        tenure_days,
        indemnity = %value,
        "Indemnity calculated"
    );

    Ok(IndemnityResult {
        component: component(days.round_dp(4).normalize(), value, formula.clone()),
        warning: None,
        audit_step: step(
            serde_json::json!({
                "applies": true,
                "days": days.round_dp(4).normalize().to_string(),
                "amount": value.to_string()
            }),
            format!("{} = ${}", formula, value),
        ),
        note,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::test_support::{create_test_employee, date, dec, test_rules};
    use chrono::Duration;

    // ==========================================================================
    // Indefinite contracts
    // ==========================================================================

    #[test]
    fn test_indefinite_200_days_lower_tier() {
        let rules = test_rules();
        let mut employee = create_test_employee(dec("1500000"));
        employee.start_date = date(2026, 1, 1);
        let retirement = employee.start_date + Duration::days(199);

        let result = calculate_indemnity(
            &employee,
            retirement,
            RetirementReason::UnjustDismissal,
            dec("1500000"),
            &rules,
            1,
        )
        .unwrap();

        // daily 50,000 × (30 × 200 / 360)
        let expected = round_currency(dec("50000") * (dec("30") * dec("200") / dec("360")));
        assert_eq!(result.component.value, expected);
        assert_eq!(result.component.value, dec("833333"));
    }

    #[test]
    fn test_indefinite_400_days_lower_tier() {
        let rules = test_rules();
        let mut employee = create_test_employee(dec("1500000"));
        employee.start_date = date(2025, 1, 1);
        let retirement = employee.start_date + Duration::days(399);

        let result = calculate_indemnity(
            &employee,
            retirement,
            RetirementReason::UnjustDismissal,
            dec("1500000"),
            &rules,
            1,
        )
        .unwrap();

        // 50,000 × 30 + 50,000 × (20 × 40 / 360) = 1,500,000 + 111,111.1
        assert_eq!(result.component.value, dec("1611111"));
        assert!(result.component.formula.contains("× 30 +"));
    }

    #[test]
    fn test_indefinite_higher_tier_above_ten_minimum_wages() {
        let rules = test_rules();
        let mut employee = create_test_employee(dec("15000000"));
        employee.start_date = date(2025, 1, 1);
        let retirement = employee.start_date + Duration::days(399);

        let result = calculate_indemnity(
            &employee,
            retirement,
            RetirementReason::UnjustDismissal,
            dec("15000000"),
            &rules,
            1,
        )
        .unwrap();

        // daily 500,000 × 20 + 500,000 × (15 × 40 / 360)
        assert_eq!(result.component.value, dec("10833333"));
    }

    // ==========================================================================
    // Fixed-term contracts
    // ==========================================================================

    #[test]
    fn test_fixed_term_pays_remaining_days() {
        let rules = test_rules();
        let mut employee = create_test_employee(dec("1500000"));
        employee.contract_type = ContractType::FixedTerm;
        let retirement = date(2026, 3, 1);
        employee.end_date = Some(retirement + Duration::days(90));

        let result = calculate_indemnity(
            &employee,
            retirement,
            RetirementReason::UnjustDismissal,
            dec("1500000"),
            &rules,
            1,
        )
        .unwrap();

        assert_eq!(result.component.value, dec("4500000"));
        assert_eq!(result.component.days, dec("90"));
    }

    #[test]
    fn test_fixed_term_past_end_date_pays_nothing() {
        let rules = test_rules();
        let mut employee = create_test_employee(dec("1500000"));
        employee.contract_type = ContractType::FixedTerm;
        employee.end_date = Some(date(2026, 2, 1));

        let result = calculate_indemnity(
            &employee,
            date(2026, 3, 1),
            RetirementReason::UnjustDismissal,
            dec("1500000"),
            &rules,
            1,
        )
        .unwrap();

        assert_eq!(result.component.value, Decimal::ZERO);
        assert!(result.note.contains("ended"));
    }

    #[test]
    fn test_fixed_term_without_end_date_is_validation_error() {
        let rules = test_rules();
        let mut employee = create_test_employee(dec("1500000"));
        employee.contract_type = ContractType::FixedTerm;

        let result = calculate_indemnity(
            &employee,
            date(2026, 3, 1),
            RetirementReason::UnjustDismissal,
            dec("1500000"),
            &rules,
            1,
        );

        match result {
            Err(EngineError::ValidationError { field, .. }) => assert_eq!(field, "end_date"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    // ==========================================================================
    // Exclusions
    // ==========================================================================

    #[test]
    fn test_probation_blocks_indemnity() {
        let rules = test_rules();
        let mut employee = create_test_employee(dec("1500000"));
        employee.start_date = date(2026, 1, 1);
        employee.probation = true;
        employee.probation_end_date = Some(date(2026, 2, 28));

        let result = calculate_indemnity(
            &employee,
            date(2026, 2, 28),
            RetirementReason::UnjustDismissal,
            dec("1500000"),
            &rules,
            1,
        )
        .unwrap();

        assert_eq!(result.component.value, Decimal::ZERO);
        assert_eq!(
            result.warning.map(|w| w.code),
            Some("PROBATION_NO_INDEMNITY".to_string())
        );
    }

    #[test]
    fn test_resignation_has_no_indemnity() {
        let rules = test_rules();
        let employee = create_test_employee(dec("1500000"));

        let result = calculate_indemnity(
            &employee,
            date(2026, 3, 1),
            RetirementReason::VoluntaryResignation,
            dec("1500000"),
            &rules,
            1,
        )
        .unwrap();

        assert_eq!(result.component.value, Decimal::ZERO);
        assert!(result.note.contains("voluntary resignation"));
    }

    #[test]
    fn test_daily_rate_is_floored() {
        assert_eq!(daily_rate(dec("1750905")), dec("58363"));
        assert_eq!(daily_rate(dec("1500000")), dec("50000"));
    }
}
