//! Proportional base pay and transport subsidy.
//!
//! Colombian payroll uses a 30-day month for every period regardless of the
//! calendar, so both the salary and the subsidy are paid per thirtieth.

use rust_decimal::Decimal;

use crate::config::RuleSet;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Employee};

use super::rounding::{round_currency, validate_amount};

/// Legal reference for salary.
pub const BASE_PAY_CLAUSE: &str = "CST Art. 127";

/// Legal reference for the transport subsidy.
pub const TRANSPORT_SUBSIDY_CLAUSE: &str = "Ley 15 de 1959";

/// Days in a payroll month.
pub const DAYS_PER_MONTH: u32 = 30;

const SUBSIDY_CEILING_MULTIPLE: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// The result of calculating base pay.
#[derive(Debug, Clone)]
pub struct BasePayResult {
    /// round(salary / 30 × days).
    pub base_pay: Decimal,
    /// salary / standard monthly hours, unrounded.
    pub hour_rate: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of calculating the transport subsidy.
#[derive(Debug, Clone)]
pub struct TransportSubsidyResult {
    /// Whether the employee qualifies this period.
    pub eligible: bool,
    /// Proportional subsidy, zero when not eligible.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates proportional base pay and the ordinary hourly rate.
///
/// # Arguments
///
/// * `employee` - The employee being paid
/// * `days_worked` - Days worked in the period, 1-30
/// * `rules` - Effective rule set
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// `ValidationError` if `days_worked` is outside 1-30.
///
/// # Legal Reference
///
/// CST Art. 127 defines salary; the hourly rate uses the rule set's
/// standard monthly hours.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_base_pay;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{ContractType, Employee};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let rules = ConfigLoader::load("./config/default.yaml").unwrap().into_rules();
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     full_name: "Ana Gómez".to_string(),
///     document_number: String::new(),
///     base_salary: Decimal::from(1_500_000),
///     contract_type: ContractType::Indefinite,
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     end_date: None,
///     high_risk: false,
///     integral_salary: false,
///     transport_subsidy_eligible: true,
///     probation: false,
///     probation_end_date: None,
/// };
///
/// let result = calculate_base_pay(&employee, 15, &rules, 1).unwrap();
/// assert_eq!(result.base_pay, Decimal::from(750_000));
/// ```
pub fn calculate_base_pay(
    employee: &Employee,
    days_worked: u32,
    rules: &RuleSet,
    step_number: u32,
) -> EngineResult<BasePayResult> {
    if !(1..=DAYS_PER_MONTH).contains(&days_worked) {
        return Err(EngineError::validation(
            "days_worked",
            format!("{} is outside 1-{}", days_worked, DAYS_PER_MONTH),
        ));
    }

    validate_amount("base_salary", employee.base_salary)?;

    let salary = employee.base_salary;
    let days = Decimal::from(days_worked);
    let base_pay = round_currency(salary / Decimal::from(DAYS_PER_MONTH) * days);
    let hour_rate = salary / rules.standard_monthly_hours;

    let audit_step = AuditStep {
        step_number,
        rule_id: "base_pay".to_string(),
        rule_name: "Proportional Base Pay".to_string(),
        clause_ref: BASE_PAY_CLAUSE.to_string(),
        input: serde_json::json!({
            "base_salary": salary.normalize().to_string(),
            "days_worked": days_worked,
            "standard_monthly_hours": rules.standard_monthly_hours.normalize().to_string()
        }),
        output: serde_json::json!({
            "base_pay": base_pay.to_string(),
            "hour_rate": hour_rate.round_dp(4).normalize().to_string()
        }),
        reasoning: format!(
            "${} / 30 × {} days = ${}; hourly rate ${} / {} h = ${}",
            salary.normalize(),
            days_worked,
            base_pay,
            salary.normalize(),
            rules.standard_monthly_hours.normalize(),
            hour_rate.round_dp(2).normalize()
        ),
    };

    Ok(BasePayResult {
        base_pay,
        hour_rate,
        audit_step,
    })
}

/// Returns true when the salary is within the subsidy ceiling (2 × minimum wage).
pub fn within_subsidy_ceiling(salary: Decimal, rules: &RuleSet) -> bool {
    salary <= rules.minimum_wage * SUBSIDY_CEILING_MULTIPLE
}

/// Calculates the proportional transport subsidy.
///
/// Paid only when the employee is eligible and earns at most twice the
/// minimum wage.
pub fn calculate_transport_subsidy(
    employee: &Employee,
    days_worked: u32,
    rules: &RuleSet,
    step_number: u32,
) -> TransportSubsidyResult {
    let under_ceiling = within_subsidy_ceiling(employee.base_salary, rules);
    let eligible = employee.transport_subsidy_eligible && under_ceiling;

    let amount = if eligible {
        round_currency(
            rules.transport_subsidy / Decimal::from(DAYS_PER_MONTH) * Decimal::from(days_worked),
        )
    } else {
        Decimal::ZERO
    };

    let reasoning = if !employee.transport_subsidy_eligible {
        "Employee is not flagged for transport subsidy".to_string()
    } else if !under_ceiling {
        format!(
            "Salary ${} exceeds 2 × minimum wage ${} - no subsidy",
            employee.base_salary.normalize(),
            (rules.minimum_wage * SUBSIDY_CEILING_MULTIPLE).normalize()
        )
    } else {
        format!(
            "${} / 30 × {} days = ${}",
            rules.transport_subsidy.normalize(),
            days_worked,
            amount
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "transport_subsidy".to_string(),
        rule_name: "Transport Subsidy".to_string(),
        clause_ref: TRANSPORT_SUBSIDY_CLAUSE.to_string(),
        input: serde_json::json!({
            "flagged_eligible": employee.transport_subsidy_eligible,
            "base_salary": employee.base_salary.normalize().to_string(),
            "minimum_wage": rules.minimum_wage.normalize().to_string(),
            "monthly_subsidy": rules.transport_subsidy.normalize().to_string(),
            "days_worked": days_worked
        }),
        output: serde_json::json!({
            "eligible": eligible,
            "amount": amount.to_string()
        }),
        reasoning,
    };

    TransportSubsidyResult {
        eligible,
        amount,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::test_support::{create_test_employee, dec, test_rules};

    #[test]
    fn test_full_month_base_pay() {
        let rules = test_rules();
        let employee = create_test_employee(dec("1300000"));

        let result = calculate_base_pay(&employee, 30, &rules, 1).unwrap();
        assert_eq!(result.base_pay, dec("1300000"));
        assert_eq!(result.hour_rate, dec("1300000") / dec("220"));
        assert_eq!(result.audit_step.rule_id, "base_pay");
    }

    #[test]
    fn test_partial_month_is_rounded() {
        let rules = test_rules();
        let employee = create_test_employee(dec("1750905"));

        // 1,750,905 / 30 × 7 = 408,544.5 → 408,545
        let result = calculate_base_pay(&employee, 7, &rules, 1).unwrap();
        assert_eq!(result.base_pay, dec("408545"));
    }

    #[test]
    fn test_days_outside_range_rejected() {
        let rules = test_rules();
        let employee = create_test_employee(dec("1300000"));

        assert!(calculate_base_pay(&employee, 0, &rules, 1).is_err());
        assert!(calculate_base_pay(&employee, 31, &rules, 1).is_err());
    }

    #[test]
    fn test_subsidy_paid_at_ceiling() {
        let rules = test_rules();
        let employee = create_test_employee(dec("2600000"));

        let result = calculate_transport_subsidy(&employee, 30, &rules, 2);
        assert!(result.eligible);
        assert_eq!(result.amount, dec("162000"));
    }

    #[test]
    fn test_subsidy_withheld_above_ceiling() {
        let rules = test_rules();
        let employee = create_test_employee(dec("2600001"));

        let result = calculate_transport_subsidy(&employee, 30, &rules, 2);
        assert!(!result.eligible);
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("exceeds"));
    }

    #[test]
    fn test_subsidy_withheld_when_not_flagged() {
        let rules = test_rules();
        let mut employee = create_test_employee(dec("1300000"));
        employee.transport_subsidy_eligible = false;

        let result = calculate_transport_subsidy(&employee, 30, &rules, 2);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_subsidy_is_proportional() {
        let rules = test_rules();
        let employee = create_test_employee(dec("1300000"));

        let result = calculate_transport_subsidy(&employee, 15, &rules, 2);
        assert_eq!(result.amount, dec("81000"));
    }
}
