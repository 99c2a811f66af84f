//! Underwriting policy configuration

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Scoring weights, score cutoffs, rate floors and limits used by the
/// underwriting pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Weight of the on-time payment ratio component
    pub payment_history_weight: Decimal,

    /// Weight of the historical loan count component
    pub loan_count_weight: Decimal,

    /// Weight of the current-year activity component
    pub current_year_activity_weight: Decimal,

    /// Weight of the loan volume component
    pub loan_volume_weight: Decimal,

    /// Loan count at which the loan count component reaches zero
    pub max_loan_count: u32,

    /// Points deducted from the activity component per loan originated this year
    pub current_year_penalty: Decimal,

    /// Scores strictly above this are approved at the requested rate
    pub prime_score_cutoff: u8,

    /// Scores in (standard_score_cutoff, prime_score_cutoff] get the standard rate floor
    pub standard_score_cutoff: u8,

    /// Scores at or below this are rejected
    pub min_score_cutoff: u8,

    /// Minimum annual rate (%) for the standard tier
    pub standard_rate_floor: Decimal,

    /// Minimum annual rate (%) for the subprime tier
    pub subprime_rate_floor: Decimal,

    /// Maximum share of monthly income that all EMIs together may take
    pub max_debt_to_income: Decimal,

    /// Approved limit as a multiple of monthly income
    pub limit_income_multiplier: Decimal,

    /// Rounding granularity for approved limits
    pub limit_rounding_unit: Decimal,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            payment_history_weight: Decimal::new(40, 2),       // 0.40
            loan_count_weight: Decimal::new(20, 2),            // 0.20
            current_year_activity_weight: Decimal::new(20, 2), // 0.20
            loan_volume_weight: Decimal::new(20, 2),           // 0.20
            max_loan_count: 10,
            current_year_penalty: Decimal::from(20),
            prime_score_cutoff: 50,
            standard_score_cutoff: 30,
            min_score_cutoff: 10,
            standard_rate_floor: Decimal::from(12),
            subprime_rate_floor: Decimal::from(16),
            max_debt_to_income: Decimal::new(50, 2), // 0.50
            limit_income_multiplier: Decimal::from(36),
            limit_rounding_unit: Decimal::from(100_000),
        }
    }
}

impl PolicyConfig {
    /// Check the policy for internal consistency
    pub fn validate(&self) -> Result<()> {
        let weights = [
            self.payment_history_weight,
            self.loan_count_weight,
            self.current_year_activity_weight,
            self.loan_volume_weight,
        ];

        if weights.iter().any(|w| *w < Decimal::ZERO) {
            return Err(Error::InvalidConfig("Scoring weights must be non-negative".to_string()));
        }

        let total: Decimal = weights.iter().sum();
        if total != Decimal::ONE {
            return Err(Error::InvalidConfig(format!(
                "Scoring weights must sum to 1, got {}",
                total
            )));
        }

        if self.max_loan_count == 0 {
            return Err(Error::InvalidConfig("max_loan_count must be positive".to_string()));
        }

        if self.current_year_penalty < Decimal::ZERO {
            return Err(Error::InvalidConfig(
                "current_year_penalty must be non-negative".to_string(),
            ));
        }

        if !(self.prime_score_cutoff > self.standard_score_cutoff
            && self.standard_score_cutoff > self.min_score_cutoff
            && self.prime_score_cutoff <= 100)
        {
            return Err(Error::InvalidConfig(format!(
                "Score cutoffs must be strictly descending within 0-100: {}/{}/{}",
                self.prime_score_cutoff, self.standard_score_cutoff, self.min_score_cutoff
            )));
        }

        if self.standard_rate_floor < Decimal::ZERO || self.subprime_rate_floor < Decimal::ZERO {
            return Err(Error::InvalidConfig("Rate floors must be non-negative".to_string()));
        }

        if self.max_debt_to_income <= Decimal::ZERO || self.max_debt_to_income > Decimal::ONE {
            return Err(Error::InvalidConfig(format!(
                "max_debt_to_income must be in (0, 1], got {}",
                self.max_debt_to_income
            )));
        }

        if self.limit_income_multiplier <= Decimal::ZERO || self.limit_rounding_unit <= Decimal::ZERO {
            return Err(Error::InvalidConfig(
                "Limit multiplier and rounding unit must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(PolicyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let config = PolicyConfig {
            loan_volume_weight: dec!(0.25),
            ..PolicyConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_cutoffs_must_descend() {
        let config = PolicyConfig {
            standard_score_cutoff: 50,
            ..PolicyConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: PolicyConfig =
            serde_json::from_str(r#"{"standard_rate_floor": "13.5"}"#).unwrap();
        assert_eq!(config.standard_rate_floor, dec!(13.5));
        assert_eq!(config.subprime_rate_floor, dec!(16));
    }
}
