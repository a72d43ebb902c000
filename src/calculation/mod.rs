//! Calculation logic for the payroll engine.
//!
//! Each rule lives in its own module and returns its value together with an
//! [`AuditStep`](crate::models::AuditStep). Two entry points chain them:
//! [`calculate_payroll`] for one period of pay (base pay, transport subsidy,
//! shift differentials, social-security deductions, employer costs) and
//! [`calculate_severance`] for a termination settlement (severance, interest,
//! bonus, vacation, indemnity, pending salary).

mod base_pay;
mod benefits;
mod day_count;
mod deductions;
mod differentials;
mod employer_costs;
mod indemnity;
mod payroll;
mod pending_salary;
mod rounding;
mod severance;

#[cfg(test)]
pub(crate) mod test_support;

pub use base_pay::{
    BASE_PAY_CLAUSE, BasePayResult, DAYS_PER_MONTH, TRANSPORT_SUBSIDY_CLAUSE,
    TransportSubsidyResult, calculate_base_pay, calculate_transport_subsidy,
    within_subsidy_ceiling,
};
pub use benefits::{
    BONUS_CLAUSE, BenefitResult, SEVERANCE_CLAUSE, SEVERANCE_INTEREST_CLAUSE,
    SEVERANCE_INTEREST_RATE, VACATION_CLAUSE, calculate_bonus, calculate_severance_interest,
    calculate_severance_pay, calculate_vacation,
};
pub use day_count::{
    BONUS_DAY_CAP, SEVERANCE_DAY_CAP, bonus_day_count, inclusive_days, semester_start,
    severance_day_count, year_start,
};
pub use deductions::{
    CONTRIBUTION_BASE_CLAUSE, ContributionBaseResult, DeductionsResult, HEALTH_CLAUSE,
    INTEGRAL_SALARY_FACTOR, PENSION_CLAUSE, SOLIDARITY_FUND_CLAUSE, calculate_contribution_base,
    calculate_deductions,
};
pub use differentials::{
    DifferentialKind, DifferentialResult, MAX_PERIOD_HOURS, OVERTIME_CLAUSE,
    SUNDAY_HOLIDAY_CLAUSE, calculate_differential,
};
pub use employer_costs::{
    ARL_CLAUSE, ARL_HIGH_RISK_RATE, ARL_STANDARD_RATE, EMPLOYER_EXEMPTION_CLAUSE,
    EXEMPTION_CEILING_MULTIPLE, EmployerCostsResult, PARAFISCAL_CLAUSE, PROVISIONS_CLAUSE,
    calculate_employer_costs,
};
pub use indemnity::{
    HIGHER_SALARY_TIER, INDEMNITY_CLAUSE, INDEMNITY_TIER_MULTIPLE, IndemnityResult, IndemnityTier,
    LOWER_SALARY_TIER, PROBATION_CLAUSE, calculate_indemnity, daily_rate,
    indefinite_indemnity_days,
};
pub use payroll::calculate_payroll;
pub use pending_salary::{PENDING_SALARY_CLAUSE, PendingSalaryResult, calculate_pending_salary};
pub use rounding::{
    HUNDRED, MAX_AMOUNT, checked_sum, percent_of, round_currency, validate_amount, within_cent,
};
pub use severance::{
    MAX_PENDING_SALARY_DAYS, MAX_VACATION_DAYS, SETTLEMENT_BASE_CLAUSE, calculate_severance,
};
