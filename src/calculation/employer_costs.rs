//! Employer-side contributions, parafiscales, and benefit provisions.
//!
//! None of these reduce net pay. They are recorded with every version so the
//! ledger and the payslip show the full cost of the period.

use rust_decimal::Decimal;

use crate::config::RuleSet;
use crate::models::{AuditStep, EmployerCosts};

use super::rounding::{percent_of, round_currency};

/// Legal reference for the employer exemption.
pub const EMPLOYER_EXEMPTION_CLAUSE: &str = "Estatuto Tributario Art. 114-1";

/// Legal reference for occupational-risk insurance.
pub const ARL_CLAUSE: &str = "Decreto 1772 de 1994";

/// Legal reference for parafiscal contributions.
pub const PARAFISCAL_CLAUSE: &str = "Ley 21 de 1982; Ley 89 de 1988";

/// Legal reference for benefit provisions.
pub const PROVISIONS_CLAUSE: &str = "CST Arts. 186, 249, 306; Ley 52 de 1975";

/// ARL percentage for high-risk positions (class V).
pub const ARL_HIGH_RISK_RATE: Decimal = Decimal::from_parts(6960, 0, 0, false, 3);

/// ARL percentage for ordinary positions (class I).
pub const ARL_STANDARD_RATE: Decimal = Decimal::from_parts(522, 0, 0, false, 3);

/// Gross pay, in minimum wages, below which employer health, SENA and ICBF are exempt.
pub const EXEMPTION_CEILING_MULTIPLE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// The result of calculating employer costs.
#[derive(Debug, Clone)]
pub struct EmployerCostsResult {
    /// Cost breakdown.
    pub costs: EmployerCosts,
    /// The audit steps recording this calculation.
    pub audit_steps: Vec<AuditStep>,
}

/// Calculates employer contributions and provisions.
///
/// # Arguments
///
/// * `gross` - Gross earnings
/// * `contribution_base` - Base for social security
/// * `base_pay` - Proportional base pay (vacation provision base)
/// * `high_risk` - Whether the position is high risk
/// * `rules` - Effective rule set
/// * `step_number` - The first step number to use
///
/// # Legal Reference
///
/// Exemption per Estatuto Tributario Art. 114-1 when gross is under ten
/// minimum wages. ARL per Decreto 1772 de 1994. Provisions per CST.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_employer_costs;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let rules = ConfigLoader::load("./config/default.yaml").unwrap().into_rules();
/// let result = calculate_employer_costs(
///     Decimal::from(2_000_000),
///     Decimal::from(1_750_905),
///     Decimal::from(1_750_905),
///     false,
///     &rules,
///     10,
/// );
/// assert!(result.costs.exempt);
/// assert_eq!(result.costs.health, Decimal::ZERO);
/// ```
pub fn calculate_employer_costs(
    gross: Decimal,
    contribution_base: Decimal,
    base_pay: Decimal,
    high_risk: bool,
    rules: &RuleSet,
    step_number: u32,
) -> EmployerCostsResult {
    let ceiling = rules.minimum_wage * EXEMPTION_CEILING_MULTIPLE;
    let exempt = gross < ceiling;

    let contribution_on_base = |pct: Decimal| {
        if exempt {
            Decimal::ZERO
        } else {
            round_currency(percent_of(contribution_base, pct))
        }
    };

    let health = contribution_on_base(rules.contributions.employer_health);
    let sena = contribution_on_base(rules.parafiscal.sena);
    let icbf = contribution_on_base(rules.parafiscal.icbf);
    let pension = round_currency(percent_of(
        contribution_base,
        rules.contributions.employer_pension,
    ));

    let arl_rate = if high_risk {
        ARL_HIGH_RISK_RATE
    } else {
        ARL_STANDARD_RATE
    };
    let arl = round_currency(percent_of(contribution_base, arl_rate));
    let family_fund = round_currency(percent_of(gross, rules.parafiscal.family_fund));

    let provisions = &rules.provisions;
    let severance_provision = round_currency(percent_of(gross, provisions.severance));
    let severance_interest_provision =
        round_currency(percent_of(gross, provisions.severance_interest));
    let bonus_provision = round_currency(percent_of(gross, provisions.bonus));
    let vacation_provision = round_currency(percent_of(base_pay, provisions.vacation));

    let costs = EmployerCosts {
        exempt,
        health,
        pension,
        arl_rate,
        arl,
        family_fund,
        sena,
        icbf,
        severance_provision,
        severance_interest_provision,
        bonus_provision,
        vacation_provision,
    };

    let audit_steps = vec![
        AuditStep {
            step_number,
            rule_id: "employer_contributions".to_string(),
            rule_name: "Employer Contributions".to_string(),
            clause_ref: format!("{}; {}; {}", EMPLOYER_EXEMPTION_CLAUSE, ARL_CLAUSE, PARAFISCAL_CLAUSE),
            input: serde_json::json!({
                "gross": gross.to_string(),
                "contribution_base": contribution_base.normalize().to_string(),
                "exemption_ceiling": ceiling.normalize().to_string(),
                "high_risk": high_risk
            }),
            output: serde_json::json!({
                "exempt": exempt,
                "health": health.to_string(),
                "pension": pension.to_string(),
                "arl_rate_pct": arl_rate.to_string(),
                "arl": arl.to_string(),
                "family_fund": family_fund.to_string(),
                "sena": sena.to_string(),
                "icbf": icbf.to_string()
            }),
            reasoning: if exempt {
                format!(
                    "Gross ${} < ${} (10 × minimum wage): health, SENA and ICBF exempt; pension ${}, ARL {}% = ${}, caja ${}",
                    gross, ceiling.normalize(), pension, arl_rate, arl, family_fund
                )
            } else {
                format!(
                    "Gross ${} ≥ ${}: health ${}, pension ${}, ARL {}% = ${}, caja ${}, SENA ${}, ICBF ${}",
                    gross, ceiling.normalize(), health, pension, arl_rate, arl, family_fund, sena, icbf
                )
            },
        },
        AuditStep {
            step_number: step_number + 1,
            rule_id: "benefit_provisions".to_string(),
            rule_name: "Benefit Provisions".to_string(),
            clause_ref: PROVISIONS_CLAUSE.to_string(),
            input: serde_json::json!({
                "gross": gross.to_string(),
                "base_pay": base_pay.to_string()
            }),
            output: serde_json::json!({
                "severance": severance_provision.to_string(),
                "severance_interest": severance_interest_provision.to_string(),
                "bonus": bonus_provision.to_string(),
                "vacation": vacation_provision.to_string()
            }),
            reasoning: format!(
                "Severance {}%, interest {}%, bonus {}% of gross ${}; vacation {}% of base pay ${}",
                provisions.severance.normalize(),
                provisions.severance_interest.normalize(),
                provisions.bonus.normalize(),
                gross,
                provisions.vacation.normalize(),
                base_pay
            ),
        },
    ];

    EmployerCostsResult { costs, audit_steps }
}
