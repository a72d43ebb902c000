//! Unpaid salary for the final, partial month.

use rust_decimal::Decimal;

use crate::config::RuleSet;
use crate::models::{AuditStep, PendingSalary};

use super::indemnity::daily_rate;
use super::rounding::{percent_of, round_currency};

/// Legal reference for pending salary.
pub const PENDING_SALARY_CLAUSE: &str = "CST Art. 65";

const DAYS_30: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// The result of calculating pending salary.
#[derive(Debug, Clone)]
pub struct PendingSalaryResult {
    /// The pending salary breakdown.
    pub pending: PendingSalary,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the salary owed for the days worked in the final month.
///
/// The gross uses the floored daily rate. Health and pension are withheld at
/// the employee rates on the gross only; the transport subsidy, when
/// included, is added after withholdings.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_pending_salary;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let rules = ConfigLoader::load("./config/default.yaml").unwrap().into_rules();
/// let result = calculate_pending_salary(Decimal::from(1_500_000), 10, false, &rules, 1);
/// assert_eq!(result.pending.gross, Decimal::from(500_000));
/// assert_eq!(result.pending.net, Decimal::from(460_000));
/// ```
pub fn calculate_pending_salary(
    base_salary: Decimal,
    days: u32,
    include_transport_subsidy: bool,
    rules: &RuleSet,
    step_number: u32,
) -> PendingSalaryResult {
    let daily = daily_rate(base_salary);
    let gross = daily * Decimal::from(days);
    let transport_subsidy = if include_transport_subsidy {
        round_currency(rules.transport_subsidy / DAYS_30 * Decimal::from(days))
    } else {
        Decimal::ZERO
    };
    let health = round_currency(percent_of(gross, rules.contributions.employee_health));
    let pension = round_currency(percent_of(gross, rules.contributions.employee_pension));
    let net = gross + transport_subsidy - health - pension;

    let formula = format!(
        "${} × {} + ${} − ${} − ${}",
        daily, days, transport_subsidy, health, pension
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "pending_salary".to_string(),
        rule_name: "Pending Salary".to_string(),
        clause_ref: PENDING_SALARY_CLAUSE.to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.to_string(),
            "days": days,
            "include_transport_subsidy": include_transport_subsidy
        }),
        output: serde_json::json!({
            "daily_rate": daily.to_string(),
            "gross": gross.to_string(),
            "transport_subsidy": transport_subsidy.to_string(),
            "health": health.to_string(),
            "pension": pension.to_string(),
            "net": net.to_string()
        }),
        reasoning: format!("{} = ${}", formula, net),
    };

    PendingSalaryResult {
        pending: PendingSalary {
            days,
            daily_rate: daily,
            gross,
            transport_subsidy,
            health,
            pension,
            net,
            formula,
        },
        audit_step,
    }
}
