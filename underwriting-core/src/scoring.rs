//! Credit scoring engine

use crate::{CreditScore, CustomerProfile, Error, LoanHistoryEntry, PolicyConfig, Result, ScoreBreakdown};
use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

const MAX_COMPONENT: Decimal = Decimal::ONE_HUNDRED;

/// Weighted composite credit scorer
#[derive(Debug, Clone)]
pub struct CreditScorer {
    config: PolicyConfig,
}

impl CreditScorer {
    /// Create new scorer
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// Score a customer from their standing and loan history.
    ///
    /// `as_of` fixes the year used by the activity component.
    pub fn score(
        &self,
        profile: &CustomerProfile,
        history: &[LoanHistoryEntry],
        as_of: NaiveDate,
    ) -> Result<(CreditScore, ScoreBreakdown)> {
        validate_inputs(profile, history)?;

        if profile.current_debt > profile.approved_limit {
            debug!(
                current_debt = %profile.current_debt,
                approved_limit = %profile.approved_limit,
                "Current debt exceeds approved limit, score forced to 0"
            );
            return Ok((
                CreditScore::ZERO,
                ScoreBreakdown {
                    over_limit: true,
                    ..ScoreBreakdown::default()
                },
            ));
        }

        let breakdown = ScoreBreakdown {
            payment_history: self.payment_history_component(history),
            loan_count: self.loan_count_component(history.len()),
            current_year_activity: self.current_year_component(history, as_of),
            loan_volume: self.loan_volume_component(history, profile.approved_limit)?,
            over_limit: false,
        };

        let weighted = [
            (breakdown.payment_history, self.config.payment_history_weight),
            (breakdown.loan_count, self.config.loan_count_weight),
            (breakdown.current_year_activity, self.config.current_year_activity_weight),
            (breakdown.loan_volume, self.config.loan_volume_weight),
        ]
        .iter()
        .try_fold(Decimal::ZERO, |total, (component, weight)| {
            component
                .checked_mul(*weight)
                .and_then(|part| total.checked_add(part))
        })
        .ok_or_else(|| Error::Calculation("weighted score overflow".to_string()))?;

        let value = clamp_component(weighted)
            .trunc()
            .to_u8()
            .ok_or_else(|| Error::Calculation(format!("score {} out of range", weighted)))?;

        debug!(
            score = value,
            payment_history = %breakdown.payment_history,
            loan_count = %breakdown.loan_count,
            current_year_activity = %breakdown.current_year_activity,
            loan_volume = %breakdown.loan_volume,
            "Credit score calculated"
        );

        Ok((CreditScore::new(value), breakdown))
    }

    /// Share of EMIs paid on time; 100 without history
    fn payment_history_component(&self, history: &[LoanHistoryEntry]) -> Decimal {
        let total_emis: u64 = history.iter().map(|l| u64::from(l.tenure)).sum();
        if total_emis == 0 {
            return MAX_COMPONENT;
        }

        let on_time: u64 = history
            .iter()
            .map(|l| u64::from(l.emis_paid_on_time.min(l.tenure)))
            .sum();

        Decimal::from(on_time) * MAX_COMPONENT / Decimal::from(total_emis)
    }

    /// Falls linearly from 100 with no loans to 0 at `max_loan_count`
    fn loan_count_component(&self, loan_count: usize) -> Decimal {
        let step = MAX_COMPONENT / Decimal::from(self.config.max_loan_count);
        clamp_component(MAX_COMPONENT - step * Decimal::from(loan_count))
    }

    /// 100 less a fixed penalty per loan originated in the evaluation year
    fn current_year_component(&self, history: &[LoanHistoryEntry], as_of: NaiveDate) -> Decimal {
        let this_year = history
            .iter()
            .filter(|l| l.approved_on.map_or(false, |d| d.year() == as_of.year()))
            .count();

        let penalty = self
            .config
            .current_year_penalty
            .checked_mul(Decimal::from(this_year))
            .unwrap_or(Decimal::MAX);

        clamp_component(MAX_COMPONENT - penalty.min(MAX_COMPONENT))
    }

    /// 100 less the historical volume as a percentage of the approved limit
    fn loan_volume_component(
        &self,
        history: &[LoanHistoryEntry],
        approved_limit: Decimal,
    ) -> Result<Decimal> {
        let volume = history
            .iter()
            .try_fold(Decimal::ZERO, |total, l| total.checked_add(l.loan_amount))
            .ok_or_else(|| Error::Calculation("historical loan volume overflow".to_string()))?;

        if volume.is_zero() {
            return Ok(MAX_COMPONENT);
        }
        if volume >= approved_limit {
            return Ok(Decimal::ZERO);
        }

        // volume < limit here, so the ratio stays below one
        let used = volume
            .checked_div(approved_limit)
            .and_then(|ratio| ratio.checked_mul(MAX_COMPONENT))
            .ok_or_else(|| Error::Calculation("loan volume ratio overflow".to_string()))?;

        Ok(clamp_component(MAX_COMPONENT - used))
    }
}

fn clamp_component(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(MAX_COMPONENT)
}

fn validate_inputs(profile: &CustomerProfile, history: &[LoanHistoryEntry]) -> Result<()> {
    if profile.approved_limit < Decimal::ZERO {
        return Err(Error::InvalidArgument(format!(
            "approved limit must be non-negative, got {}",
            profile.approved_limit
        )));
    }
    if profile.current_debt < Decimal::ZERO {
        return Err(Error::InvalidArgument(format!(
            "current debt must be non-negative, got {}",
            profile.current_debt
        )));
    }
    if let Some(entry) = history
        .iter()
        .find(|l| l.loan_amount < Decimal::ZERO || l.interest_rate < Decimal::ZERO)
    {
        return Err(Error::InvalidArgument(format!(
            "loan history entry has negative amount or rate: {} at {}%",
            entry.loan_amount, entry.interest_rate
        )));
    }
    Ok(())
}
