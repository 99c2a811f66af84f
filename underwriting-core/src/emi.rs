//! EMI (equated monthly installment) calculation

use crate::money::round_currency;
use crate::{Error, Result};
use rust_decimal::{Decimal, MathematicalOps};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Amortizing installment calculator with monthly compounding
#[derive(Debug, Clone, Copy, Default)]
pub struct EmiCalculator;

impl EmiCalculator {
    /// Create new calculator
    pub fn new() -> Self {
        Self
    }

    /// Monthly rate for an annual percentage rate: `(R / 100) / 12`
    pub fn monthly_rate(annual_rate: Decimal) -> Decimal {
        annual_rate / HUNDRED / MONTHS_PER_YEAR
    }

    /// Installment rounded to cents
    pub fn monthly_installment(
        &self,
        principal: Decimal,
        annual_rate: Decimal,
        tenure: u32,
    ) -> Result<Decimal> {
        self.exact_installment(principal, annual_rate, tenure)
            .map(round_currency)
    }

    /// Installment at full decimal precision.
    ///
    /// `P * r * (1+r)^N / ((1+r)^N - 1)`, or `P / N` when `r == 0`.
    pub fn exact_installment(
        &self,
        principal: Decimal,
        annual_rate: Decimal,
        tenure: u32,
    ) -> Result<Decimal> {
        if principal <= Decimal::ZERO {
            return Err(Error::InvalidArgument(format!(
                "principal must be positive, got {}",
                principal
            )));
        }
        if tenure == 0 {
            return Err(Error::InvalidArgument("tenure must be positive".to_string()));
        }
        if annual_rate < Decimal::ZERO {
            return Err(Error::InvalidArgument(format!(
                "interest rate must be non-negative, got {}",
                annual_rate
            )));
        }

        let months = Decimal::from(tenure);
        let rate = Self::monthly_rate(annual_rate);

        if rate.is_zero() {
            return Ok(principal / months);
        }

        let overflow = || {
            Error::Calculation(format!(
                "EMI overflowed for principal {} at {}% over {} months",
                principal, annual_rate, tenure
            ))
        };

        let compound = (Decimal::ONE + rate)
            .checked_powu(u64::from(tenure))
            .ok_or_else(overflow)?;
        let denominator = compound - Decimal::ONE;
        if denominator.is_zero() {
            // rate too small to register at 28 digits; amortize without interest
            return Ok(principal / months);
        }

        principal
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(compound))
            .and_then(|v| v.checked_div(denominator))
            .ok_or_else(overflow)
    }
}
