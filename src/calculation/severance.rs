//! Termination settlement (liquidación definitiva).
//!
//! [`calculate_severance`] resolves the salary bases, counts the accrued days
//! and chains the benefit, indemnity and pending-salary rules into one
//! [`SeveranceResult`]. Like payroll, it is a pure function of its inputs.

use std::time::Instant;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{Configuration, RuleSet};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Employee, RetirementReason, SeveranceBases,
    SeveranceOverrides, SeveranceResult,
};

use super::base_pay::{TRANSPORT_SUBSIDY_CLAUSE, within_subsidy_ceiling};
use super::benefits::{
    calculate_bonus, calculate_severance_interest, calculate_severance_pay, calculate_vacation,
};
use super::day_count::{
    BONUS_DAY_CAP, SEVERANCE_DAY_CAP, bonus_day_count, inclusive_days, severance_day_count,
};
use super::indemnity::calculate_indemnity;
use super::pending_salary::calculate_pending_salary;
use super::rounding::validate_amount;

/// Legal reference for the settlement base.
pub const SETTLEMENT_BASE_CLAUSE: &str = "CST Art. 253";

/// Upper bound on pending salary days.
pub const MAX_PENDING_SALARY_DAYS: u32 = 30;

/// Most vacation days accepted as an override: ten years of accrual.
pub const MAX_VACATION_DAYS: u32 = 3600;

fn validate_day_overrides(overrides: &SeveranceOverrides) -> EngineResult<()> {
    for (field, value, cap) in [
        ("severance_days", overrides.severance_days, SEVERANCE_DAY_CAP),
        ("bonus_days", overrides.bonus_days, BONUS_DAY_CAP),
        ("vacation_days", overrides.vacation_days, MAX_VACATION_DAYS),
    ] {
        if let Some(days) = value.filter(|d| *d > cap) {
            return Err(EngineError::validation(
                field,
                format!("{} exceeds the {}-day limit", days, cap),
            ));
        }
    }
    Ok(())
}

struct ResolvedBases {
    bases: SeveranceBases,
    audit_step: AuditStep,
}

fn resolve_bases(
    employee: &Employee,
    rules: &RuleSet,
    overrides: &SeveranceOverrides,
    notes: &mut Vec<String>,
    step_number: u32,
) -> EngineResult<ResolvedBases> {
    let (base_salary, variable_salary, source, field) = match overrides.manual_base_salary {
        Some(manual) => (
            manual,
            !overrides.salary_is_fixed,
            "manual override",
            "manual_base_salary",
        ),
        None if !overrides.salary_is_fixed => {
            let average = overrides.twelve_month_average.ok_or_else(|| {
                EngineError::validation(
                    "twelve_month_average",
                    "variable salary requires the 12-month average",
                )
            })?;
            (average, true, "12-month average", "twelve_month_average")
        }
        None => (employee.base_salary, false, "contract salary", "base_salary"),
    };

    if base_salary <= Decimal::ZERO {
        return Err(EngineError::validation(field, "must be positive"));
    }
    validate_amount(field, base_salary)?;

    let transport_subsidy_included = match overrides.include_transport_subsidy {
        Some(forced) => {
            notes.push(format!(
                "Transport subsidy {} the benefits base by override",
                if forced { "added to" } else { "excluded from" }
            ));
            forced
        }
        None => employee.transport_subsidy_eligible && within_subsidy_ceiling(base_salary, rules),
    };
    let transport_subsidy = if transport_subsidy_included {
        rules.transport_subsidy
    } else {
        Decimal::ZERO
    };
    let benefits_base = base_salary + transport_subsidy;

    let audit_step = AuditStep {
        step_number,
        rule_id: "settlement_base".to_string(),
        rule_name: "Settlement Base".to_string(),
        clause_ref: format!("{}; {}", SETTLEMENT_BASE_CLAUSE, TRANSPORT_SUBSIDY_CLAUSE),
        input: serde_json::json!({
            "contract_salary": employee.base_salary.to_string(),
            "manual_base_salary": overrides.manual_base_salary.map(|v| v.to_string()),
            "salary_is_fixed": overrides.salary_is_fixed,
            "twelve_month_average": overrides.twelve_month_average.map(|v| v.to_string()),
            "include_transport_subsidy": overrides.include_transport_subsidy
        }),
        output: serde_json::json!({
            "base_salary": base_salary.to_string(),
            "transport_subsidy": transport_subsidy.to_string(),
            "benefits_base": benefits_base.to_string()
        }),
        reasoning: format!(
            "Base ${} from {}; benefits base ${} + ${} = ${}",
            base_salary.normalize(),
            source,
            base_salary.normalize(),
            transport_subsidy.normalize(),
            benefits_base.normalize()
        ),
    };

    Ok(ResolvedBases {
        bases: SeveranceBases {
            base_salary,
            variable_salary,
            transport_subsidy_included,
            transport_subsidy,
            benefits_base,
        },
        audit_step,
    })
}

/// Calculates the termination settlement for an employee.
///
/// # Arguments
///
/// * `employee` - The employee leaving
/// * `retirement_date` - Last day worked
/// * `reason` - Why the relationship ended
/// * `configuration` - The effective configuration, if any
/// * `overrides` - Manual base, variable-salary average, and day counts
///
/// # Returns
///
/// A [`SeveranceResult`] or:
/// - `ConfigurationMissing` when `configuration` is `None`
/// - `ValidationError` when retirement precedes the start date, a variable
///   salary has no average, or a fixed-term dismissal has no end date
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_severance;
/// use payroll_engine::config::{ConfigLoader, Configuration};
/// use payroll_engine::models::{ContractType, Employee, RetirementReason, SeveranceOverrides};
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
/// let result = calculate_severance(
///     &employee,
///     NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
///     RetirementReason::VoluntaryResignation,
///     Some(&configuration),
///     &SeveranceOverrides::default(),
/// )
/// .unwrap();
/// assert_eq!(result.indemnity.value, Decimal::ZERO);
/// assert!(result.total > Decimal::ZERO);
/// ```
pub fn calculate_severance(
    employee: &Employee,
    retirement_date: NaiveDate,
    reason: RetirementReason,
    configuration: Option<&Configuration>,
    overrides: &SeveranceOverrides,
) -> EngineResult<SeveranceResult> {
    let start_time = Instant::now();
    let configuration = configuration.ok_or(EngineError::ConfigurationMissing)?;
    let rules = &configuration.rules;

    if retirement_date < employee.start_date {
        return Err(EngineError::validation(
            "retirement_date",
            format!(
                "retirement date {} precedes contract start {}",
                retirement_date, employee.start_date
            ),
        ));
    }

    validate_day_overrides(overrides)?;

    let tenure_days = inclusive_days(employee.start_date, retirement_date);
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut notes: Vec<String> = Vec::new();
    let mut step_number: u32 = 1;

    let resolved = resolve_bases(employee, rules, overrides, &mut notes, step_number)?;
    steps.push(resolved.audit_step);
    step_number += 1;
    let bases = resolved.bases;

    let severance_days = overrides
        .severance_days
        .unwrap_or_else(|| severance_day_count(employee.start_date, retirement_date));
    let bonus_days = overrides
        .bonus_days
        .unwrap_or_else(|| bonus_day_count(employee.start_date, retirement_date));
    let vacation_days = overrides.vacation_days.unwrap_or(severance_days);
    let pending_days = overrides
        .pending_salary_days
        .unwrap_or_else(|| retirement_date.day())
        .min(MAX_PENDING_SALARY_DAYS);

    let severance = calculate_severance_pay(bases.benefits_base, severance_days, step_number);
    steps.push(severance.audit_step);
    step_number += 1;

    let interest = calculate_severance_interest(severance.exact, severance_days, step_number);
    steps.push(interest.audit_step);
    step_number += 1;

    let bonus = calculate_bonus(bases.benefits_base, bonus_days, step_number);
    steps.push(bonus.audit_step);
    step_number += 1;

    let vacation = calculate_vacation(bases.base_salary, vacation_days, step_number);
    steps.push(vacation.audit_step);
    step_number += 1;

    let indemnity = calculate_indemnity(
        employee,
        retirement_date,
        reason,
        bases.base_salary,
        rules,
        step_number,
    )?;
    steps.push(indemnity.audit_step);
    step_number += 1;
    notes.push(indemnity.note);
    warnings.extend(indemnity.warning);

    let pending = calculate_pending_salary(
        bases.base_salary,
        pending_days,
        bases.transport_subsidy_included,
        rules,
        step_number,
    );
    steps.push(pending.audit_step);

    let total = severance.component.value
        + interest.component.value
        + bonus.component.value
        + vacation.component.value
        + indemnity.component.value
        + pending.pending.net;

    let duration_us = start_time.elapsed().as_micros() as u64;
    info!(
        employee_id = %employee.id,
        reason = reason.as_str(),
        %retirement_date,
        tenure_days,
        total = %total,
        "Severance calculated"
    );
    debug!(
        severance_days,
        bonus_days, vacation_days, pending_days, duration_us, "Severance day counts"
    );

    Ok(SeveranceResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        employee_id: employee.id.clone(),
        employee_name: employee.full_name.clone(),
        contract_type: employee.contract_type,
        start_date: employee.start_date,
        retirement_date,
        reason,
        tenure_days,
        configuration_id: configuration.id,
        bases,
        severance: severance.component,
        severance_interest: interest.component,
        bonus: bonus.component,
        vacation: vacation.component,
        indemnity: indemnity.component,
        pending_salary: pending.pending,
        notes,
        total,
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
    use crate::calculation::test_support::{
        create_test_employee, date, dec, test_configuration,
    };
    use crate::models::ContractType;

    fn settle(
        employee: &Employee,
        retirement: NaiveDate,
        reason: RetirementReason,
        overrides: &SeveranceOverrides,
    ) -> EngineResult<SeveranceResult> {
        let configuration = test_configuration();
        calculate_severance(employee, retirement, reason, Some(&configuration), overrides)
    }

    #[test]
    fn test_full_settlement_components_and_total() {
        // Minimum wage, started before the year: Jan 1 .. Jun 30
        let employee = create_test_employee(dec("1300000"));
        let result = settle(
            &employee,
            date(2026, 6, 30),
            RetirementReason::VoluntaryResignation,
            &SeveranceOverrides::default(),
        )
        .unwrap();

        assert!(result.bases.transport_subsidy_included);
        assert_eq!(result.bases.benefits_base, dec("1462000"));
        assert_eq!(result.severance.days, dec("181"));
        assert_eq!(result.bonus.days, dec("180"));
        assert_eq!(result.vacation.days, dec("181"));
        assert_eq!(result.bonus.value, dec("731000"));
        assert_eq!(result.indemnity.value, Decimal::ZERO);
        assert_eq!(result.pending_salary.days, 30);

        let expected = result.severance.value
            + result.severance_interest.value
            + result.bonus.value
            + result.vacation.value
            + result.indemnity.value
            + result.pending_salary.net;
        assert_eq!(result.total, expected);
        assert_eq!(result.configuration_id, 7);
        assert!(result.notes.iter().any(|n| n.contains("voluntary resignation")));
    }

    #[test]
    fn test_retirement_before_start_is_rejected() {
        let employee = create_test_employee(dec("1300000"));
        let result = settle(
            &employee,
            date(2020, 1, 1),
            RetirementReason::UnjustDismissal,
            &SeveranceOverrides::default(),
        );
        match result {
            Err(EngineError::ValidationError { field, .. }) => {
                assert_eq!(field, "retirement_date")
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_configuration_is_rejected() {
        let employee = create_test_employee(dec("1300000"));
        let result = calculate_severance(
            &employee,
            date(2026, 3, 1),
            RetirementReason::UnjustDismissal,
            None,
            &SeveranceOverrides::default(),
        );
        assert!(matches!(result, Err(EngineError::ConfigurationMissing)));
    }

    #[test]
    fn test_variable_salary_requires_average() {
        let employee = create_test_employee(dec("1300000"));
        let overrides = SeveranceOverrides {
            salary_is_fixed: false,
            ..SeveranceOverrides::default()
        };
        let result = settle(
            &employee,
            date(2026, 3, 1),
            RetirementReason::MutualAgreement,
            &overrides,
        );
        assert!(matches!(result, Err(EngineError::ValidationError { .. })));
    }

    #[test]
    fn test_variable_salary_uses_average() {
        let employee = create_test_employee(dec("1300000"));
        let overrides = SeveranceOverrides {
            salary_is_fixed: false,
            twelve_month_average: Some(dec("3000000")),
            ..SeveranceOverrides::default()
        };
        let result = settle(
            &employee,
            date(2026, 3, 31),
            RetirementReason::MutualAgreement,
            &overrides,
        )
        .unwrap();

        assert!(result.bases.variable_salary);
        assert_eq!(result.bases.base_salary, dec("3000000"));
        // Above two minimum wages: no subsidy in the base
        assert!(!result.bases.transport_subsidy_included);
        assert_eq!(result.severance.value, dec("750000"));
    }

    #[test]
    fn test_manual_base_and_forced_subsidy() {
        let employee = create_test_employee(dec("1300000"));
        let overrides = SeveranceOverrides {
            manual_base_salary: Some(dec("5000000")),
            include_transport_subsidy: Some(true),
            severance_days: Some(360),
            ..SeveranceOverrides::default()
        };
        let result = settle(
            &employee,
            date(2026, 3, 31),
            RetirementReason::JustCauseTermination,
            &overrides,
        )
        .unwrap();

        assert_eq!(result.bases.benefits_base, dec("5162000"));
        assert_eq!(result.severance.value, dec("5162000"));
        assert!(result.notes.iter().any(|n| n.contains("override")));
    }

    #[test]
    fn test_oversized_bases_are_validation_errors() {
        let employee = create_test_employee(dec("1300000"));
        let cases = [
            (
                "manual_base_salary",
                SeveranceOverrides {
                    manual_base_salary: Some(Decimal::MAX),
                    ..SeveranceOverrides::default()
                },
            ),
            (
                "twelve_month_average",
                SeveranceOverrides {
                    salary_is_fixed: false,
                    twelve_month_average: Some(Decimal::MAX),
                    ..SeveranceOverrides::default()
                },
            ),
        ];

        for (expected, overrides) in cases {
            match settle(
                &employee,
                date(2026, 3, 31),
                RetirementReason::UnjustDismissal,
                &overrides,
            ) {
                Err(EngineError::ValidationError { field, .. }) => assert_eq!(field, expected),
                other => panic!("{}: expected ValidationError, got {:?}", expected, other),
            }
        }

        let rich = create_test_employee(Decimal::MAX);
        assert!(matches!(
            settle(
                &rich,
                date(2026, 3, 31),
                RetirementReason::UnjustDismissal,
                &SeveranceOverrides::default(),
            ),
            Err(EngineError::ValidationError { ref field, .. }) if field == "base_salary"
        ));
    }

    #[test]
    fn test_day_overrides_above_limits_are_rejected() {
        let employee = create_test_employee(dec("1300000"));
        let cases = [
            (
                "severance_days",
                SeveranceOverrides {
                    severance_days: Some(u32::MAX),
                    ..SeveranceOverrides::default()
                },
            ),
            (
                "bonus_days",
                SeveranceOverrides {
                    bonus_days: Some(181),
                    ..SeveranceOverrides::default()
                },
            ),
            (
                "vacation_days",
                SeveranceOverrides {
                    vacation_days: Some(MAX_VACATION_DAYS + 1),
                    ..SeveranceOverrides::default()
                },
            ),
        ];

        for (expected, overrides) in cases {
            match settle(
                &employee,
                date(2026, 3, 31),
                RetirementReason::VoluntaryResignation,
                &overrides,
            ) {
                Err(EngineError::ValidationError { field, .. }) => assert_eq!(field, expected),
                other => panic!("{}: expected ValidationError, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_largest_accepted_inputs_do_not_overflow() {
        let employee = create_test_employee(dec("1300000"));
        let overrides = SeveranceOverrides {
            manual_base_salary: Some(crate::calculation::MAX_AMOUNT),
            severance_days: Some(SEVERANCE_DAY_CAP),
            bonus_days: Some(BONUS_DAY_CAP),
            vacation_days: Some(MAX_VACATION_DAYS),
            ..SeveranceOverrides::default()
        };

        let result = settle(
            &employee,
            date(2026, 3, 31),
            RetirementReason::UnjustDismissal,
            &overrides,
        )
        .unwrap();
        assert!(result.total > Decimal::ZERO);
    }

    #[test]
    fn test_unjust_dismissal_fixed_term_remaining_days() {
        let mut employee = create_test_employee(dec("1500000"));
        employee.contract_type = ContractType::FixedTerm;
        employee.end_date = Some(date(2026, 6, 29));

        let result = settle(
            &employee,
            date(2026, 3, 31),
            RetirementReason::UnjustDismissal,
            &SeveranceOverrides::default(),
        )
        .unwrap();

        // Mar 31 .. Jun 29 = 90 days at 50,000
        assert_eq!(result.indemnity.value, dec("4500000"));
    }

    #[test]
    fn test_probation_zeroes_indemnity_with_warning() {
        let mut employee = create_test_employee(dec("1500000"));
        employee.start_date = date(2026, 2, 1);
        employee.probation = true;
        employee.probation_end_date = Some(date(2026, 3, 31));

        let result = settle(
            &employee,
            date(2026, 3, 15),
            RetirementReason::UnjustDismissal,
            &SeveranceOverrides::default(),
        )
        .unwrap();

        assert_eq!(result.indemnity.value, Decimal::ZERO);
        assert_eq!(result.audit_trace.warnings.len(), 1);
        assert_eq!(result.audit_trace.warnings[0].code, "PROBATION_NO_INDEMNITY");
        // Severance still accrues during probation
        assert!(result.severance.value > Decimal::ZERO);
    }

    #[test]
    fn test_pending_days_default_to_day_of_month() {
        let employee = create_test_employee(dec("1300000"));
        let result = settle(
            &employee,
            date(2026, 4, 12),
            RetirementReason::VoluntaryResignation,
            &SeveranceOverrides::default(),
        )
        .unwrap();
        assert_eq!(result.pending_salary.days, 12);

        let overrides = SeveranceOverrides {
            pending_salary_days: Some(45),
            ..SeveranceOverrides::default()
        };
        let capped = settle(
            &employee,
            date(2026, 4, 12),
            RetirementReason::VoluntaryResignation,
            &overrides,
        )
        .unwrap();
        assert_eq!(capped.pending_salary.days, 30);
    }

    #[test]
    fn test_audit_trace_has_one_step_per_component() {
        let employee = create_test_employee(dec("1300000"));
        let result = settle(
            &employee,
            date(2026, 4, 12),
            RetirementReason::VoluntaryResignation,
            &SeveranceOverrides::default(),
        )
        .unwrap();

        let rule_ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "settlement_base",
                "severance",
                "severance_interest",
                "bonus",
                "vacation",
                "indemnity",
                "pending_salary"
            ]
        );
    }
}
