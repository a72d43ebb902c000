//! Social-benefit components of a settlement.
//!
//! Severance (cesantías), interest on severance, service bonus (prima) and
//! vacation, each computed proportionally to the days accrued.

use rust_decimal::Decimal;

use crate::models::{AuditStep, SeveranceComponent};

use super::rounding::round_currency;

/// Legal reference for severance.
pub const SEVERANCE_CLAUSE: &str = "CST Art. 249";

/// Legal reference for interest on severance.
pub const SEVERANCE_INTEREST_CLAUSE: &str = "Ley 52 de 1975 Art. 1";

/// Legal reference for the service bonus.
pub const BONUS_CLAUSE: &str = "CST Art. 306";

/// Legal reference for compensated vacation.
pub const VACATION_CLAUSE: &str = "CST Art. 189";

/// Annual interest rate on severance.
pub const SEVERANCE_INTEREST_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

const DAYS_360: Decimal = Decimal::from_parts(360, 0, 0, false, 0);
const DAYS_720: Decimal = Decimal::from_parts(720, 0, 0, false, 0);

/// The result of calculating one benefit component.
#[derive(Debug, Clone)]
pub struct BenefitResult {
    /// The rounded component with its formula.
    pub component: SeveranceComponent,
    /// The unrounded value, for chained formulas.
    pub exact: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn benefit(
    rule_id: &str,
    rule_name: &str,
    clause_ref: &str,
    days: u32,
    exact: Decimal,
    formula: String,
    step_number: u32,
) -> BenefitResult {
    let value = round_currency(exact);
    let audit_step = AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        clause_ref: clause_ref.to_string(),
        input: serde_json::json!({ "days": days }),
        output: serde_json::json!({
            "exact": exact.round_dp(4).normalize().to_string(),
            "value": value.to_string()
        }),
        reasoning: format!("{} = ${}", formula, value),
    };

    BenefitResult {
        component: SeveranceComponent {
            days: Decimal::from(days),
            value,
            formula,
            clause_ref: clause_ref.to_string(),
        },
        exact,
        audit_step,
    }
}

/// Severance: `base × days / 360`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_severance_pay;
/// use rust_decimal::Decimal;
///
/// let result = calculate_severance_pay(Decimal::from(1_800_000), 90, 1);
/// assert_eq!(result.component.value, Decimal::from(450_000));
/// ```
pub fn calculate_severance_pay(benefits_base: Decimal, days: u32, step_number: u32) -> BenefitResult {
    let exact = benefits_base * Decimal::from(days) / DAYS_360;
    benefit(
        "severance",
        "Severance (Cesantías)",
        SEVERANCE_CLAUSE,
        days,
        exact,
        format!("${} × {} / 360", benefits_base.normalize(), days),
        step_number,
    )
}

/// Interest on severance: `severance × 12% × days / 360`.
pub fn calculate_severance_interest(
    severance: Decimal,
    days: u32,
    step_number: u32,
) -> BenefitResult {
    let exact = severance * SEVERANCE_INTEREST_RATE * Decimal::from(days) / DAYS_360;
    benefit(
        "severance_interest",
        "Interest on Severance",
        SEVERANCE_INTEREST_CLAUSE,
        days,
        exact,
        format!(
            "${} × 12% × {} / 360",
            severance.round_dp(2).normalize(),
            days
        ),
        step_number,
    )
}

/// Service bonus: `base × days / 360`.
pub fn calculate_bonus(benefits_base: Decimal, days: u32, step_number: u32) -> BenefitResult {
    let exact = benefits_base * Decimal::from(days) / DAYS_360;
    benefit(
        "bonus",
        "Service Bonus (Prima)",
        BONUS_CLAUSE,
        days,
        exact,
        format!("${} × {} / 360", benefits_base.normalize(), days),
        step_number,
    )
}

/// Vacation: `salary × days / 720`. The subsidy is never part of this base.
pub fn calculate_vacation(base_salary: Decimal, days: u32, step_number: u32) -> BenefitResult {
    let exact = base_salary * Decimal::from(days) / DAYS_720;
    benefit(
        "vacation",
        "Compensated Vacation",
        VACATION_CLAUSE,
        days,
        exact,
        format!("${} × {} / 720", base_salary.normalize(), days),
        step_number,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::test_support::dec;

    #[test]
    fn test_full_year_severance_equals_one_month() {
        let result = calculate_severance_pay(dec("1462000"), 360, 1);
        assert_eq!(result.component.value, dec("1462000"));
        assert_eq!(result.component.clause_ref, SEVERANCE_CLAUSE);
        assert_eq!(result.component.formula, "$1462000 × 360 / 360");
    }

    #[test]
    fn test_interest_uses_unrounded_severance() {
        // 1,000,000 × 100 / 360 = 277,777.78; × 12% × 100/360 = 9,259.26
        let severance = calculate_severance_pay(dec("1000000"), 100, 1);
        let interest = calculate_severance_interest(severance.exact, 100, 2);
        assert_eq!(severance.component.value, dec("277778"));
        assert_eq!(interest.component.value, dec("9259"));
    }

    #[test]
    fn test_full_semester_bonus_is_half_month() {
        let result = calculate_bonus(dec("1462000"), 180, 3);
        assert_eq!(result.component.value, dec("731000"));
    }

    #[test]
    fn test_vacation_over_720() {
        // 15 days of vacation per 360 worked
        let result = calculate_vacation(dec("1300000"), 360, 4);
        assert_eq!(result.component.value, dec("650000"));
        assert_eq!(result.audit_step.rule_id, "vacation");
    }
}
