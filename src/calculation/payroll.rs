//! Period payroll calculation.
//!
//! [`calculate_payroll`] chains the individual rules in legal order and
//! assembles a [`PayrollResult`] with the full audit trace. It is a pure
//! function of its inputs.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::config::Configuration;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Earnings, Employee, PayrollResult, PayrollTotals, Period,
    PeriodOverrides, WorkedHours,
};

use super::base_pay::{calculate_base_pay, calculate_transport_subsidy};
use super::deductions::{calculate_contribution_base, calculate_deductions};
use super::differentials::{DifferentialKind, calculate_differential};
use super::employer_costs::calculate_employer_costs;
use super::rounding::{checked_sum, round_currency, validate_amount};

/// Calculates one period of payroll for one employee.
///
/// # Arguments
///
/// * `employee` - The employee being paid
/// * `days_worked` - Days worked, base-30 (1-30)
/// * `configuration` - The effective configuration, if any
/// * `overrides` - Period-specific hours and amounts
///
/// # Returns
///
/// A [`PayrollResult`] or:
/// - `ConfigurationMissing` when `configuration` is `None`
/// - `ValidationError` for days outside 1-30, or hours and amounts that are
///   negative or above their caps
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_payroll;
/// use payroll_engine::config::{ConfigLoader, Configuration};
/// use payroll_engine::models::{ContractType, Employee, PeriodOverrides};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
///
/// let configuration = Configuration {
///     id: 1,
///     activated_at: Utc::now(),
///     superseded_at: None,
///     rules: ConfigLoader::load("./config/default.yaml").unwrap().into_rules(),
/// };
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     full_name: "Ana Gómez".to_string(),
///     document_number: String::new(),
///     base_salary: Decimal::from(1_750_905),
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
/// let result =
///     calculate_payroll(&employee, 30, Some(&configuration), &PeriodOverrides::default()).unwrap();
/// assert_eq!(result.totals.gross, Decimal::from(2_000_000));
/// assert_eq!(result.totals.net, result.totals.gross - result.totals.deductions);
/// ```
pub fn calculate_payroll(
    employee: &Employee,
    days_worked: u32,
    configuration: Option<&Configuration>,
    overrides: &PeriodOverrides,
) -> EngineResult<PayrollResult> {
    let start_time = Instant::now();
    let configuration = configuration.ok_or(EngineError::ConfigurationMissing)?;
    let rules = &configuration.rules;

    for (field, value) in [
        ("commissions", overrides.commissions),
        ("other_earnings", overrides.other_earnings),
        ("other_deductions", overrides.other_deductions),
    ] {
        validate_amount(field, value)?;
    }

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let base = calculate_base_pay(employee, days_worked, rules, step_number)?;
    steps.push(base.audit_step);
    step_number += 1;

    let subsidy = calculate_transport_subsidy(employee, days_worked, rules, step_number);
    steps.push(subsidy.audit_step);
    step_number += 1;

    let hours = WorkedHours {
        sunday: overrides.sunday_hours,
        holiday: overrides.holiday_hours,
        sunday_overtime: overrides.sunday_overtime_hours,
        daytime_overtime: overrides.daytime_overtime_hours,
    };

    let mut differential = |kind: DifferentialKind, hours: Decimal| -> EngineResult<Decimal> {
        let result = calculate_differential(kind, hours, base.hour_rate, rules, step_number)?;
        if hours > Decimal::ZERO {
            steps.push(result.audit_step);
            step_number += 1;
        }
        Ok(result.amount)
    };

    let daytime_overtime = differential(DifferentialKind::DaytimeOvertime, hours.daytime_overtime)?;
    let sunday = differential(DifferentialKind::Sunday, hours.sunday)?;
    let holiday = differential(DifferentialKind::Holiday, hours.holiday)?;
    let sunday_overtime = differential(DifferentialKind::SundayOvertime, hours.sunday_overtime)?;

    let earnings = Earnings {
        base_pay: base.base_pay,
        transport_subsidy: subsidy.amount,
        daytime_overtime,
        sunday,
        holiday,
        sunday_overtime,
        commissions: round_currency(overrides.commissions),
        other: round_currency(overrides.other_earnings),
    };
    let gross = checked_sum("gross", earnings.components())?;

    let contribution = calculate_contribution_base(
        gross,
        earnings.transport_subsidy,
        employee.integral_salary,
        step_number,
    );
    steps.push(contribution.audit_step);
    step_number += 1;
    let contribution_base = contribution.contribution_base;

    let deductions_result =
        calculate_deductions(contribution_base, overrides.other_deductions, rules, step_number)?;
    step_number += deductions_result.audit_steps.len() as u32;
    steps.extend(deductions_result.audit_steps);
    let deductions = deductions_result.deductions;

    let total_deductions = deductions.total();
    let net = gross - total_deductions;
    if net < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET".to_string(),
            message: format!(
                "Deductions ${} exceed gross ${}; net pay is ${}",
                total_deductions, gross, net
            ),
            severity: "high".to_string(),
        });
    }

    let employer = calculate_employer_costs(
        gross,
        contribution_base,
        earnings.base_pay,
        employee.high_risk,
        rules,
        step_number,
    );
    steps.extend(employer.audit_steps);

    let period = overrides.period.unwrap_or_else(Period::current);
    let duration_us = start_time.elapsed().as_micros() as u64;

    debug!(
        employee_id = %employee.id,
        period = %period,
        days_worked,
        gross = %gross,
        net = %net,
        duration_us,
        "Payroll calculated"
    );

    Ok(PayrollResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: employee.id.clone(),
        period,
        days_worked,
        configuration_id: configuration.id,
        base_salary: employee.base_salary,
        hour_rate: base.hour_rate,
        hours,
        earnings,
        deductions,
        totals: PayrollTotals {
            gross,
            contribution_base,
            deductions: total_deductions,
            net,
        },
        employer_costs: employer.costs,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::test_support::{create_test_employee, dec, test_configuration};
    use crate::calculation::{MAX_AMOUNT, MAX_PERIOD_HOURS};
    use proptest::prelude::*;

    // ==========================================================================
    // Reference scenario
    // ==========================================================================

    #[test]
    fn test_minimum_wage_full_month_scenario() {
        let configuration = test_configuration();
        let employee = create_test_employee(dec("1300000"));

        let result =
            calculate_payroll(&employee, 30, Some(&configuration), &PeriodOverrides::default())
                .unwrap();

        assert_eq!(result.earnings.base_pay, dec("1300000"));
        assert_eq!(result.earnings.transport_subsidy, dec("162000"));
        assert_eq!(result.totals.gross, dec("1462000"));
        assert_eq!(result.totals.contribution_base, dec("1300000"));
        assert_eq!(result.deductions.health, dec("52000"));
        assert_eq!(result.deductions.pension, dec("52000"));
        assert_eq!(result.totals.deductions, dec("104000"));
        assert_eq!(result.totals.net, dec("1358000"));
        assert_eq!(result.configuration_id, configuration.id);
    }

    #[test]
    fn test_missing_configuration_is_rejected() {
        let employee = create_test_employee(dec("1300000"));
        let result = calculate_payroll(&employee, 30, None, &PeriodOverrides::default());
        assert!(matches!(result, Err(EngineError::ConfigurationMissing)));
    }

    #[test]
    fn test_differentials_are_added_to_gross_and_base() {
        let configuration = test_configuration();
        let employee = create_test_employee(dec("2200000"));
        let overrides = PeriodOverrides {
            sunday_hours: dec("8"),
            holiday_hours: dec("8"),
            sunday_overtime_hours: dec("2"),
            daytime_overtime_hours: dec("4"),
            ..Default::default()
        };

        let result = calculate_payroll(&employee, 30, Some(&configuration), &overrides).unwrap();

        // hour rate = 2,200,000 / 220 = 10,000
        assert_eq!(result.earnings.sunday, dec("144000"));
        assert_eq!(result.earnings.holiday, dec("144000"));
        assert_eq!(result.earnings.sunday_overtime, dec("41000"));
        assert_eq!(result.earnings.daytime_overtime, dec("50000"));
        assert_eq!(result.earnings.transport_subsidy, dec("162000"));
        assert_eq!(result.totals.gross, dec("2741000"));
        assert_eq!(result.totals.contribution_base, dec("2579000"));
        assert_eq!(result.hours.sunday, dec("8"));
    }

    #[test]
    fn test_audit_steps_are_sequential() {
        let configuration = test_configuration();
        let employee = create_test_employee(dec("1300000"));
        let overrides = PeriodOverrides {
            sunday_hours: dec("4"),
            ..Default::default()
        };

        let result = calculate_payroll(&employee, 30, Some(&configuration), &overrides).unwrap();
        let numbers: Vec<u32> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.step_number)
            .collect();
        let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
        assert_eq!(numbers, expected);
        assert!(
            result
                .audit_trace
                .steps
                .iter()
                .any(|s| s.rule_id == "sunday_differential")
        );
    }

    #[test]
    fn test_integral_salary_contribution_base() {
        let configuration = test_configuration();
        let mut employee = create_test_employee(dec("20000000"));
        employee.integral_salary = true;

        let result =
            calculate_payroll(&employee, 30, Some(&configuration), &PeriodOverrides::default())
                .unwrap();

        assert_eq!(result.earnings.transport_subsidy, Decimal::ZERO);
        assert_eq!(result.totals.contribution_base, dec("14000000"));
        assert_eq!(result.deductions.health, dec("560000"));
        // 14,000,000 > 4 × 1,300,000
        assert_eq!(result.deductions.solidarity_fund, dec("140000"));
        assert!(!result.employer_costs.exempt);
    }

    #[test]
    fn test_negative_net_produces_warning() {
        let configuration = test_configuration();
        let employee = create_test_employee(dec("1300000"));
        let overrides = PeriodOverrides {
            other_deductions: dec("2000000"),
            ..Default::default()
        };

        let result = calculate_payroll(&employee, 30, Some(&configuration), &overrides).unwrap();
        assert!(result.totals.net < Decimal::ZERO);
        assert_eq!(result.audit_trace.warnings[0].code, "NEGATIVE_NET");
    }

    #[test]
    fn test_negative_commissions_rejected() {
        let configuration = test_configuration();
        let employee = create_test_employee(dec("1300000"));
        let overrides = PeriodOverrides {
            commissions: dec("-1"),
            ..Default::default()
        };

        let result = calculate_payroll(&employee, 30, Some(&configuration), &overrides);
        assert!(matches!(result, Err(EngineError::ValidationError { .. })));
    }

    #[test]
    fn test_oversized_inputs_are_validation_errors() {
        let configuration = test_configuration();
        let employee = create_test_employee(dec("1300000"));
        let huge_hours = dec("100000000000000000000000000");

        let cases: Vec<(&str, PeriodOverrides)> = vec![
            ("sunday_hours", PeriodOverrides { sunday_hours: huge_hours, ..Default::default() }),
            ("holiday_hours", PeriodOverrides { holiday_hours: dec("721"), ..Default::default() }),
            (
                "sunday_overtime_hours",
                PeriodOverrides { sunday_overtime_hours: huge_hours, ..Default::default() },
            ),
            (
                "daytime_overtime_hours",
                PeriodOverrides { daytime_overtime_hours: huge_hours, ..Default::default() },
            ),
            ("commissions", PeriodOverrides { commissions: Decimal::MAX, ..Default::default() }),
            (
                "other_earnings",
                PeriodOverrides { other_earnings: Decimal::MAX, ..Default::default() },
            ),
            (
                "other_deductions",
                PeriodOverrides { other_deductions: Decimal::MAX, ..Default::default() },
            ),
        ];

        for (expected, overrides) in cases {
            match calculate_payroll(&employee, 30, Some(&configuration), &overrides) {
                Err(EngineError::ValidationError { field, .. }) => assert_eq!(field, expected),
                other => panic!("{}: expected ValidationError, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_oversized_salary_is_validation_error() {
        let configuration = test_configuration();
        let employee = create_test_employee(Decimal::MAX);

        let result =
            calculate_payroll(&employee, 30, Some(&configuration), &PeriodOverrides::default());
        assert!(matches!(
            result,
            Err(EngineError::ValidationError { ref field, .. }) if field == "base_salary"
        ));
    }

    #[test]
    fn test_largest_accepted_inputs_do_not_overflow() {
        let configuration = test_configuration();
        let employee = create_test_employee(MAX_AMOUNT);
        let overrides = PeriodOverrides {
            sunday_hours: MAX_PERIOD_HOURS,
            holiday_hours: MAX_PERIOD_HOURS,
            sunday_overtime_hours: MAX_PERIOD_HOURS,
            daytime_overtime_hours: MAX_PERIOD_HOURS,
            commissions: MAX_AMOUNT,
            other_earnings: MAX_AMOUNT,
            ..Default::default()
        };

        let result = calculate_payroll(&employee, 30, Some(&configuration), &overrides).unwrap();
        assert_eq!(result.totals.net, result.totals.gross - result.totals.deductions);
    }

    #[test]
    fn test_explicit_period_is_kept() {
        let configuration = test_configuration();
        let employee = create_test_employee(dec("1300000"));
        let overrides = PeriodOverrides {
            period: Some(Period::new(2026, 3).unwrap()),
            ..Default::default()
        };

        let result = calculate_payroll(&employee, 30, Some(&configuration), &overrides).unwrap();
        assert_eq!(result.period.to_string(), "2026-03");
    }

    // ==========================================================================
    // Properties
    // ==========================================================================

    proptest! {
        #[test]
        fn prop_net_equals_gross_minus_deductions(
            salary in 1_000_000u64..30_000_000u64,
            days in 1u32..=30,
            sunday_hours in 0u32..40,
            commissions in 0u64..5_000_000u64,
            integral in any::<bool>(),
        ) {
            let configuration = test_configuration();
            let mut employee = create_test_employee(Decimal::from(salary));
            employee.integral_salary = integral;
            let overrides = PeriodOverrides {
                sunday_hours: Decimal::from(sunday_hours),
                commissions: Decimal::from(commissions),
                ..Default::default()
            };

            let result =
                calculate_payroll(&employee, days, Some(&configuration), &overrides).unwrap();

            prop_assert_eq!(result.totals.net, result.totals.gross - result.totals.deductions);
            prop_assert!(result.totals.gross >= result.earnings.base_pay);
        }

        #[test]
        fn prop_subsidy_iff_eligible_and_under_ceiling(
            salary in 500_000u64..5_000_000u64,
            eligible in any::<bool>(),
        ) {
            let configuration = test_configuration();
            let mut employee = create_test_employee(Decimal::from(salary));
            employee.transport_subsidy_eligible = eligible;

            let result = calculate_payroll(
                &employee,
                30,
                Some(&configuration),
                &PeriodOverrides::default(),
            )
            .unwrap();

            let expected = eligible && Decimal::from(salary) <= dec("2600000");
            prop_assert_eq!(result.earnings.transport_subsidy > Decimal::ZERO, expected);
        }
    }
}
