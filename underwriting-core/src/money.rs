//! Fixed-point money helpers
//!
//! All amounts are [`Decimal`]; nothing in the pipeline touches binary
//! floating point. Rounding is half-up (away from zero for the non-negative
//! values this module accepts).

use crate::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// One lakh (100,000 currency units), the granularity of approved limits
pub const LAKH: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Number of fractional digits in API-facing monetary values
pub const CURRENCY_DP: u32 = 2;

/// Round a non-negative amount to the nearest multiple of `unit`, half-up.
pub fn round_to_unit(amount: Decimal, unit: Decimal) -> Result<Decimal> {
    if amount < Decimal::ZERO {
        return Err(Error::InvalidArgument(format!(
            "cannot round negative amount {}",
            amount
        )));
    }
    if unit <= Decimal::ZERO {
        return Err(Error::InvalidArgument(format!(
            "rounding unit must be positive, got {}",
            unit
        )));
    }

    let units = amount
        .checked_div(unit)
        .ok_or_else(|| Error::Calculation(format!("{} / {} overflowed", amount, unit)))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    units
        .checked_mul(unit)
        .map(|v| v.normalize())
        .ok_or_else(|| Error::Calculation(format!("{} * {} overflowed", units, unit)))
}

/// Round a non-negative amount to the nearest lakh, half-up.
pub fn round_to_lakh(amount: Decimal) -> Result<Decimal> {
    round_to_unit(amount, LAKH)
}

/// Round to cents, half-up, always carrying exactly two fractional digits.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_DP);
    rounded
}
