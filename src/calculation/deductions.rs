//! Contribution base and employee social-security deductions.

use rust_decimal::Decimal;

use crate::config::RuleSet;
use crate::error::EngineResult;
use crate::models::{AuditStep, Deductions};

use super::rounding::{percent_of, round_currency, validate_amount};

/// Legal reference for the contribution base.
pub const CONTRIBUTION_BASE_CLAUSE: &str = "Ley 100 de 1993 Art. 18; CST Art. 132";

/// Legal reference for health withholding.
pub const HEALTH_CLAUSE: &str = "Ley 100 de 1993 Art. 204";

/// Legal reference for pension withholding.
pub const PENSION_CLAUSE: &str = "Ley 100 de 1993 Art. 20";

/// Legal reference for the solidarity fund.
pub const SOLIDARITY_FUND_CLAUSE: &str = "Ley 100 de 1993 Art. 27";

/// Share of an integral salary that is subject to contributions.
pub const INTEGRAL_SALARY_FACTOR: Decimal = Decimal::from_parts(70, 0, 0, false, 2);

/// The result of determining the contribution base.
#[derive(Debug, Clone)]
pub struct ContributionBaseResult {
    /// Base for health and pension.
    pub contribution_base: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of calculating employee deductions.
#[derive(Debug, Clone)]
pub struct DeductionsResult {
    /// Deduction breakdown.
    pub deductions: Deductions,
    /// One audit step per withholding rule.
    pub audit_steps: Vec<AuditStep>,
}

/// Determines the contribution base.
///
/// The base is gross minus the transport subsidy. For an integral salary it
/// is 70% of gross.
pub fn calculate_contribution_base(
    gross: Decimal,
    transport_subsidy: Decimal,
    integral_salary: bool,
    step_number: u32,
) -> ContributionBaseResult {
    let (contribution_base, reasoning) = if integral_salary {
        let base = gross * INTEGRAL_SALARY_FACTOR;
        (
            base,
            format!("Integral salary: ${} × 70% = ${}", gross, base.normalize()),
        )
    } else {
        let base = gross - transport_subsidy;
        (
            base,
            format!(
                "Gross ${} − transport subsidy ${} = ${}",
                gross, transport_subsidy, base
            ),
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "contribution_base".to_string(),
        rule_name: "Contribution Base".to_string(),
        clause_ref: CONTRIBUTION_BASE_CLAUSE.to_string(),
        input: serde_json::json!({
            "gross": gross.to_string(),
            "transport_subsidy": transport_subsidy.to_string(),
            "integral_salary": integral_salary
        }),
        output: serde_json::json!({
            "contribution_base": contribution_base.normalize().to_string()
        }),
        reasoning,
    };

    ContributionBaseResult {
        contribution_base,
        audit_step,
    }
}

/// Calculates health, pension, solidarity fund, and other deductions.
///
/// # Arguments
///
/// * `contribution_base` - Base from [`calculate_contribution_base`]
/// * `other_deductions` - Extra deductions entered for the period
/// * `rules` - Effective rule set
/// * `step_number` - The first step number to use
///
/// # Returns
///
/// `ValidationError` if `other_deductions` is negative or above [`MAX_AMOUNT`](super::MAX_AMOUNT).
///
/// # Legal Reference
///
/// Ley 100 de 1993: Art. 204 (health), Art. 20 (pension), Art. 27
/// (solidarity fund above the configured threshold).
pub fn calculate_deductions(
    contribution_base: Decimal,
    other_deductions: Decimal,
    rules: &RuleSet,
    step_number: u32,
) -> EngineResult<DeductionsResult> {
    validate_amount("other_deductions", other_deductions)?;

    let contributions = &rules.contributions;
    let health = round_currency(percent_of(contribution_base, contributions.employee_health));
    let pension = round_currency(percent_of(contribution_base, contributions.employee_pension));

    let threshold = rules.minimum_wage * contributions.solidarity_threshold_multiple;
    let solidarity_applies = contribution_base > threshold;
    let solidarity_fund = if solidarity_applies {
        round_currency(percent_of(contribution_base, contributions.solidarity_rate))
    } else {
        Decimal::ZERO
    };

    let other = round_currency(other_deductions);

    let mut audit_steps = vec![
        AuditStep {
            step_number,
            rule_id: "employee_health".to_string(),
            rule_name: "Employee Health Contribution".to_string(),
            clause_ref: HEALTH_CLAUSE.to_string(),
            input: serde_json::json!({
                "contribution_base": contribution_base.normalize().to_string(),
                "rate_pct": contributions.employee_health.normalize().to_string()
            }),
            output: serde_json::json!({ "amount": health.to_string() }),
            reasoning: format!(
                "${} × {}% = ${}",
                contribution_base.normalize(),
                contributions.employee_health.normalize(),
                health
            ),
        },
        AuditStep {
            step_number: step_number + 1,
            rule_id: "employee_pension".to_string(),
            rule_name: "Employee Pension Contribution".to_string(),
            clause_ref: PENSION_CLAUSE.to_string(),
            input: serde_json::json!({
                "contribution_base": contribution_base.normalize().to_string(),
                "rate_pct": contributions.employee_pension.normalize().to_string()
            }),
            output: serde_json::json!({ "amount": pension.to_string() }),
            reasoning: format!(
                "${} × {}% = ${}",
                contribution_base.normalize(),
                contributions.employee_pension.normalize(),
                pension
            ),
        },
    ];

    audit_steps.push(AuditStep {
        step_number: step_number + 2,
        rule_id: "solidarity_fund".to_string(),
        rule_name: "Pension Solidarity Fund".to_string(),
        clause_ref: SOLIDARITY_FUND_CLAUSE.to_string(),
        input: serde_json::json!({
            "contribution_base": contribution_base.normalize().to_string(),
            "threshold": threshold.normalize().to_string(),
            "rate_pct": contributions.solidarity_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "applies": solidarity_applies,
            "amount": solidarity_fund.to_string()
        }),
        reasoning: if solidarity_applies {
            format!(
                "Base ${} > {} × minimum wage (${}): ${} × {}% = ${}",
                contribution_base.normalize(),
                contributions.solidarity_threshold_multiple.normalize(),
                threshold.normalize(),
                contribution_base.normalize(),
                contributions.solidarity_rate.normalize(),
                solidarity_fund
            )
        } else {
            format!(
                "Base ${} ≤ threshold ${} - not applicable",
                contribution_base.normalize(),
                threshold.normalize()
            )
        },
    });

    let deductions = Deductions {
        health,
        pension,
        solidarity_fund,
        other,
    };

    Ok(DeductionsResult {
        deductions,
        audit_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::test_support::{dec, test_rules};

    #[test]
    fn test_contribution_base_excludes_subsidy() {
        let result = calculate_contribution_base(dec("1462000"), dec("162000"), false, 1);
        assert_eq!(result.contribution_base, dec("1300000"));
    }

    #[test]
    fn test_integral_salary_base_is_seventy_percent() {
        let result = calculate_contribution_base(dec("20000000"), dec("0"), true, 1);
        assert_eq!(result.contribution_base, dec("14000000"));
        assert!(result.audit_step.reasoning.contains("70%"));
    }

    #[test]
    fn test_health_and_pension_at_four_percent() {
        let rules = test_rules();
        let result = calculate_deductions(dec("1300000"), dec("0"), &rules, 5).unwrap();

        assert_eq!(result.deductions.health, dec("52000"));
        assert_eq!(result.deductions.pension, dec("52000"));
        assert_eq!(result.deductions.solidarity_fund, Decimal::ZERO);
        assert_eq!(result.audit_steps.len(), 3);
        assert_eq!(result.audit_steps[2].step_number, 7);
    }

    #[test]
    fn test_solidarity_fund_only_above_threshold() {
        let rules = test_rules();

        // threshold = 4 × 1,300,000 = 5,200,000
        let at_threshold = calculate_deductions(dec("5200000"), dec("0"), &rules, 1).unwrap();
        assert_eq!(at_threshold.deductions.solidarity_fund, Decimal::ZERO);

        let above = calculate_deductions(dec("6000000"), dec("0"), &rules, 1).unwrap();
        assert_eq!(above.deductions.solidarity_fund, dec("60000"));
    }

    #[test]
    fn test_other_deductions_are_rounded() {
        let rules = test_rules();
        let result = calculate_deductions(dec("1300000"), dec("15000.6"), &rules, 1).unwrap();
        assert_eq!(result.deductions.other, dec("15001"));
        assert_eq!(result.deductions.total(), dec("119001"));
    }

    #[test]
    fn test_negative_other_deductions_rejected() {
        let rules = test_rules();
        assert!(calculate_deductions(dec("1300000"), dec("-1"), &rules, 1).is_err());
    }
}
