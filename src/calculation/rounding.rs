//! Currency rounding and input bounds.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// One hundred, for percentage conversions.
pub const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Largest amount accepted as input: 10^15 pesos.
///
/// Every product the calculators form from bounded inputs stays far inside
/// `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Rejects an input amount that is negative or above [`MAX_AMOUNT`].
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{MAX_AMOUNT, validate_amount};
/// use rust_decimal::Decimal;
///
/// assert!(validate_amount("commissions", Decimal::from(250_000)).is_ok());
/// assert!(validate_amount("commissions", Decimal::NEGATIVE_ONE).is_err());
/// assert!(validate_amount("commissions", MAX_AMOUNT + Decimal::ONE).is_err());
/// ```
pub fn validate_amount(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::validation(field, "must not be negative"));
    }
    if value > MAX_AMOUNT {
        return Err(EngineError::validation(
            field,
            format!("must not exceed {}", MAX_AMOUNT),
        ));
    }
    Ok(())
}

/// Sums `values`, reporting overflow as a validation error on `field`.
pub fn checked_sum(field: &str, values: impl IntoIterator<Item = Decimal>) -> EngineResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| EngineError::validation(field, "amount is out of range"))
}

/// Rounds to whole pesos, half away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("10.5").unwrap()), Decimal::from(11));
/// assert_eq!(round_currency(Decimal::from_str("-10.5").unwrap()), Decimal::from(-11));
/// assert_eq!(round_currency(Decimal::from_str("10.49").unwrap()), Decimal::from(10));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// `value × pct / 100`, unrounded.
pub fn percent_of(value: Decimal, pct: Decimal) -> Decimal {
    value * pct / HUNDRED
}

/// True when `a` and `b` differ by less than one cent.
pub fn within_cent(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < Decimal::new(1, 2)
}
