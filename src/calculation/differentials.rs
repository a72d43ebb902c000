//! Shift-differential pay.
//!
//! Sunday, holiday, and overtime hours are paid at the ordinary hourly rate
//! plus a surcharge. Each differential is computed and rounded on its own.

use rust_decimal::Decimal;

use crate::config::RuleSet;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::rounding::{HUNDRED, round_currency};

/// Legal reference for Sunday and holiday work.
pub const SUNDAY_HOLIDAY_CLAUSE: &str = "CST Art. 179";

/// Legal reference for overtime.
pub const OVERTIME_CLAUSE: &str = "CST Art. 168";

/// Most hours of one kind accepted for a single period.
pub const MAX_PERIOD_HOURS: Decimal = Decimal::from_parts(720, 0, 0, false, 0);

/// The kinds of differential hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferentialKind {
    /// Ordinary hours on a Sunday.
    Sunday,
    /// Ordinary hours on a public holiday.
    Holiday,
    /// Daytime overtime on a Sunday.
    SundayOvertime,
    /// Daytime overtime on a working day.
    DaytimeOvertime,
}

impl DifferentialKind {
    fn rule_id(&self) -> &'static str {
        match self {
            DifferentialKind::Sunday => "sunday_differential",
            DifferentialKind::Holiday => "holiday_differential",
            DifferentialKind::SundayOvertime => "sunday_overtime_differential",
            DifferentialKind::DaytimeOvertime => "daytime_overtime_differential",
        }
    }

    fn rule_name(&self) -> &'static str {
        match self {
            DifferentialKind::Sunday => "Sunday Differential",
            DifferentialKind::Holiday => "Holiday Differential",
            DifferentialKind::SundayOvertime => "Sunday Overtime Differential",
            DifferentialKind::DaytimeOvertime => "Daytime Overtime",
        }
    }

    fn hours_field(&self) -> &'static str {
        match self {
            DifferentialKind::Sunday => "sunday_hours",
            DifferentialKind::Holiday => "holiday_hours",
            DifferentialKind::SundayOvertime => "sunday_overtime_hours",
            DifferentialKind::DaytimeOvertime => "daytime_overtime_hours",
        }
    }

    fn clause(&self) -> &'static str {
        match self {
            DifferentialKind::Sunday | DifferentialKind::Holiday => SUNDAY_HOLIDAY_CLAUSE,
            DifferentialKind::SundayOvertime | DifferentialKind::DaytimeOvertime => {
                OVERTIME_CLAUSE
            }
        }
    }

    /// The surcharge percentage for this kind in `rules`.
    pub fn surcharge(&self, rules: &RuleSet) -> Decimal {
        match self {
            DifferentialKind::Sunday => rules.differentials.sunday,
            DifferentialKind::Holiday => rules.differentials.holiday,
            DifferentialKind::SundayOvertime => rules.differentials.sunday_overtime,
            DifferentialKind::DaytimeOvertime => rules.differentials.daytime_overtime,
        }
    }
}

/// The result of one differential calculation.
#[derive(Debug, Clone)]
pub struct DifferentialResult {
    /// round(hours × hour_rate × (1 + pct/100)).
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates pay for one kind of differential hours.
///
/// # Arguments
///
/// * `kind` - Which differential applies
/// * `hours` - Hours worked under it, 0 to [`MAX_PERIOD_HOURS`]
/// * `hour_rate` - Ordinary hourly rate
/// * `rules` - Effective rule set
/// * `step_number` - The step number for audit trail sequencing
///
/// # Legal Reference
///
/// CST Art. 179 (Sunday and holiday work) and CST Art. 168 (overtime).
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{DifferentialKind, calculate_differential};
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let rules = ConfigLoader::load("./config/default.yaml").unwrap().into_rules();
/// // 8 h × $10,000 × 1.80 = $144,000
/// let result = calculate_differential(
///     DifferentialKind::Sunday,
///     Decimal::from(8),
///     Decimal::from(10_000),
///     &rules,
///     3,
/// )
/// .unwrap();
/// assert_eq!(result.amount, Decimal::from(144_000));
/// ```
pub fn calculate_differential(
    kind: DifferentialKind,
    hours: Decimal,
    hour_rate: Decimal,
    rules: &RuleSet,
    step_number: u32,
) -> EngineResult<DifferentialResult> {
    if hours < Decimal::ZERO {
        return Err(EngineError::validation(
            kind.hours_field(),
            "must not be negative",
        ));
    }
    if hours > MAX_PERIOD_HOURS {
        return Err(EngineError::validation(
            kind.hours_field(),
            format!("must not exceed {} hours per period", MAX_PERIOD_HOURS),
        ));
    }

    let surcharge = kind.surcharge(rules);
    let multiplier = Decimal::ONE + surcharge / HUNDRED;
    let amount = hours
        .checked_mul(hour_rate)
        .and_then(|v| v.checked_mul(multiplier))
        .map(round_currency)
        .ok_or_else(|| EngineError::validation(kind.hours_field(), "amount is out of range"))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: kind.rule_id().to_string(),
        rule_name: kind.rule_name().to_string(),
        clause_ref: kind.clause().to_string(),
        input: serde_json::json!({
            "hours": hours.normalize().to_string(),
            "hour_rate": hour_rate.round_dp(4).normalize().to_string(),
            "surcharge_pct": surcharge.normalize().to_string()
        }),
        output: serde_json::json!({
            "multiplier": multiplier.normalize().to_string(),
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "{}h × ${} × {} = ${}",
            hours.normalize(),
            hour_rate.round_dp(2).normalize(),
            multiplier.normalize(),
            amount
        ),
    };

    Ok(DifferentialResult { amount, audit_step })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::test_support::{dec, test_rules};

    #[test]
    fn test_sunday_hours_at_180_percent() {
        let rules = test_rules();
        let rate = dec("1300000") / dec("220");

        // 8 × 5909.0909... × 1.8 = 85090.909... → 85091
        let result =
            calculate_differential(DifferentialKind::Sunday, dec("8"), rate, &rules, 1).unwrap();
        assert_eq!(result.amount, dec("85091"));
        assert_eq!(result.audit_step.clause_ref, SUNDAY_HOLIDAY_CLAUSE);
    }

    #[test]
    fn test_sunday_overtime_at_205_percent() {
        let rules = test_rules();

        let result = calculate_differential(
            DifferentialKind::SundayOvertime,
            dec("2"),
            dec("10000"),
            &rules,
            1,
        )
        .unwrap();
        assert_eq!(result.amount, dec("41000"));
    }

    #[test]
    fn test_daytime_overtime_at_125_percent() {
        let rules = test_rules();

        let result = calculate_differential(
            DifferentialKind::DaytimeOvertime,
            dec("4"),
            dec("10000"),
            &rules,
            1,
        )
        .unwrap();
        assert_eq!(result.amount, dec("50000"));
        assert_eq!(result.audit_step.clause_ref, OVERTIME_CLAUSE);
    }

    #[test]
    fn test_zero_hours_pays_nothing() {
        let rules = test_rules();
        let result =
            calculate_differential(DifferentialKind::Holiday, dec("0"), dec("10000"), &rules, 1)
                .unwrap();
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_negative_hours_rejected() {
        let rules = test_rules();
        let result =
            calculate_differential(DifferentialKind::Holiday, dec("-1"), dec("10000"), &rules, 1);
        match result {
            Err(EngineError::ValidationError { field, .. }) => assert_eq!(field, "holiday_hours"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_hours_above_period_cap_rejected() {
        let rules = test_rules();
        assert!(
            calculate_differential(DifferentialKind::Sunday, dec("720"), dec("10000"), &rules, 1)
                .is_ok()
        );

        for hours in [dec("720.5"), dec("100000000000000000000000000")] {
            match calculate_differential(DifferentialKind::Sunday, hours, dec("10000"), &rules, 1) {
                Err(EngineError::ValidationError { field, .. }) => {
                    assert_eq!(field, "sunday_hours")
                }
                other => panic!("Expected ValidationError, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_out_of_range_product_rejected() {
        let rules = test_rules();
        let result = calculate_differential(
            DifferentialKind::DaytimeOvertime,
            dec("700"),
            Decimal::MAX / dec("10"),
            &rules,
            1,
        );
        match result {
            Err(EngineError::ValidationError { field, .. }) => {
                assert_eq!(field, "daytime_overtime_hours")
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }
}
