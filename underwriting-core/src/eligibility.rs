//! Eligibility evaluation
//!
//! Combines the credit score, the tiered rate policy and the debt-to-income
//! cap into a single [`EligibilityDecision`].

use crate::money::{round_currency, round_to_unit};
use crate::{
    CreditLimit, CreditScore, CreditScorer, CustomerProfile, Decision, EligibilityDecision,
    EmiCalculator, Error, LoanHistoryEntry, LoanRequest, PolicyConfig, RejectionReason, Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Approved limit for a monthly income under the default policy
pub fn compute_approved_limit(monthly_income: Decimal) -> Result<CreditLimit> {
    EligibilityEvaluator::default().approved_limit(monthly_income)
}

/// Evaluate a loan request under the default policy
pub fn evaluate_eligibility(
    profile: &CustomerProfile,
    history: &[LoanHistoryEntry],
    request: &LoanRequest,
    as_of: NaiveDate,
) -> Result<EligibilityDecision> {
    EligibilityEvaluator::default().evaluate(profile, history, request, as_of)
}

/// Eligibility evaluator
#[derive(Debug, Clone)]
pub struct EligibilityEvaluator {
    config: PolicyConfig,
    scorer: CreditScorer,
    calculator: EmiCalculator,
}

impl EligibilityEvaluator {
    /// Create new evaluator with a validated policy
    pub fn new(config: PolicyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scorer: CreditScorer::new(config.clone()),
            calculator: EmiCalculator::new(),
            config,
        })
    }

    /// Policy in effect
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Approved limit: income times the policy multiplier, rounded to the limit unit
    pub fn approved_limit(&self, monthly_income: Decimal) -> Result<CreditLimit> {
        if monthly_income < Decimal::ZERO {
            return Err(Error::InvalidArgument(format!(
                "monthly income must be non-negative, got {}",
                monthly_income
            )));
        }

        let raw = monthly_income
            .checked_mul(self.config.limit_income_multiplier)
            .ok_or_else(|| Error::Calculation(format!("limit overflowed for income {}", monthly_income)))?;

        round_to_unit(raw, self.config.limit_rounding_unit).map(CreditLimit::from_rounded)
    }

    /// Score the customer and decide on the request
    pub fn evaluate(
        &self,
        profile: &CustomerProfile,
        history: &[LoanHistoryEntry],
        request: &LoanRequest,
        as_of: NaiveDate,
    ) -> Result<EligibilityDecision> {
        let (score, _) = self.scorer.score(profile, history, as_of)?;
        self.decide(score, profile, history, request)
    }

    /// Decide on the request for an already computed score
    pub fn decide(
        &self,
        credit_score: CreditScore,
        profile: &CustomerProfile,
        history: &[LoanHistoryEntry],
        request: &LoanRequest,
    ) -> Result<EligibilityDecision> {
        if profile.monthly_income <= Decimal::ZERO {
            return Err(Error::InvalidArgument(format!(
                "monthly income must be positive, got {}",
                profile.monthly_income
            )));
        }

        let requested = request.interest_rate;

        let Some(corrected) = self.tier_rate(credit_score, requested) else {
            let monthly_installment =
                self.calculator
                    .monthly_installment(request.loan_amount, requested, request.tenure)?;
            return Ok(self.finish(
                request,
                credit_score,
                requested,
                monthly_installment,
                Decision::Rejected {
                    reason: RejectionReason::LowCreditScore,
                },
            ));
        };

        let monthly_installment =
            self.calculator
                .monthly_installment(request.loan_amount, corrected, request.tenure)?;

        let existing = self.existing_installments(history)?;
        let total_installments = existing
            .checked_add(monthly_installment)
            .ok_or_else(|| Error::Calculation("total installments overflow".to_string()))?;
        let cap = profile
            .monthly_income
            .checked_mul(self.config.max_debt_to_income)
            .ok_or_else(|| Error::Calculation("debt-to-income cap overflow".to_string()))?;

        debug!(
            customer_id = %request.customer_id,
            existing = %existing,
            new = %monthly_installment,
            cap = %cap,
            "Debt-to-income check"
        );

        let decision = if total_installments > cap {
            Decision::Rejected {
                reason: RejectionReason::DebtToIncomeExceeded,
            }
        } else {
            Decision::Approved {
                corrected_interest_rate: corrected,
            }
        };

        Ok(self.finish(request, credit_score, corrected, monthly_installment, decision))
    }

    /// Rate the loan may carry for a score, `None` when the score is too low
    fn tier_rate(&self, score: CreditScore, requested: Decimal) -> Option<Decimal> {
        let score = score.value();
        if score > self.config.prime_score_cutoff {
            Some(requested)
        } else if score > self.config.standard_score_cutoff {
            Some(requested.max(self.config.standard_rate_floor))
        } else if score > self.config.min_score_cutoff {
            Some(requested.max(self.config.subprime_rate_floor))
        } else {
            None
        }
    }

    /// Sum of the installments still being paid on active loans
    fn existing_installments(&self, history: &[LoanHistoryEntry]) -> Result<Decimal> {
        history
            .iter()
            .filter(|l| l.is_active && l.loan_amount > Decimal::ZERO)
            .try_fold(Decimal::ZERO, |total, l| {
                let installment = match l.monthly_payment {
                    Some(payment) => payment,
                    None => self
                        .calculator
                        .monthly_installment(l.loan_amount, l.interest_rate, l.tenure)?,
                };
                total.checked_add(installment).ok_or_else(|| {
                    Error::Calculation("existing installments overflow".to_string())
                })
            })
    }

    fn finish(
        &self,
        request: &LoanRequest,
        credit_score: CreditScore,
        corrected_interest_rate: Decimal,
        monthly_installment: Decimal,
        decision: Decision,
    ) -> EligibilityDecision {
        let result = EligibilityDecision {
            decision,
            credit_score,
            requested_interest_rate: request.interest_rate,
            corrected_interest_rate,
            monthly_installment: round_currency(monthly_installment),
        };

        info!(
            customer_id = %request.customer_id,
            credit_score = %credit_score,
            approved = result.approved(),
            reason = ?result.rejection_reason(),
            requested_rate = %request.interest_rate,
            corrected_rate = %corrected_interest_rate,
            "Eligibility evaluated"
        );

        result
    }
}

impl Default for EligibilityEvaluator {
    fn default() -> Self {
        let config = PolicyConfig::default();
        Self {
            scorer: CreditScorer::new(config.clone()),
            calculator: EmiCalculator::new(),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn profile(income: Decimal) -> CustomerProfile {
        CustomerProfile {
            monthly_income: income,
            approved_limit: dec!(1800000),
            current_debt: Decimal::ZERO,
        }
    }

    fn request(amount: Decimal, rate: Decimal, tenure: u32) -> LoanRequest {
        LoanRequest {
            customer_id: Uuid::new_v4(),
            loan_amount: amount,
            interest_rate: rate,
            tenure,
        }
    }

    fn active_loan(monthly_payment: Decimal) -> LoanHistoryEntry {
        LoanHistoryEntry {
            loan_amount: dec!(300000),
            tenure: 24,
            interest_rate: dec!(10),
            emis_paid_on_time: 6,
            is_active: true,
            monthly_payment: Some(monthly_payment),
            approved_on: None,
        }
    }

    #[test]
    fn test_approved_limit() {
        assert_eq!(compute_approved_limit(dec!(50000)).unwrap().amount(), dec!(1800000));
        // 36 * 42000 = 1,512,000 -> 1,500,000
        assert_eq!(compute_approved_limit(dec!(42000)).unwrap().amount(), dec!(1500000));
        // 36 * 12500 = 450,000 -> midpoint rounds up
        assert_eq!(compute_approved_limit(dec!(12500)).unwrap().amount(), dec!(500000));
        assert!(matches!(
            compute_approved_limit(dec!(-1)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_prime_tier_keeps_requested_rate() {
        let evaluator = EligibilityEvaluator::default();
        let decision = evaluator
            .decide(CreditScore::new(51), &profile(dec!(50000)), &[], &request(dec!(100000), dec!(8), 12))
            .unwrap();

        assert!(decision.approved());
        assert_eq!(decision.corrected_interest_rate, dec!(8));
    }

    #[test]
    fn test_standard_tier_corrects_rate() {
        let evaluator = EligibilityEvaluator::default();
        let decision = evaluator
            .decide(CreditScore::new(45), &profile(dec!(50000)), &[], &request(dec!(100000), dec!(8), 12))
            .unwrap();

        assert!(decision.approved());
        assert_eq!(decision.corrected_interest_rate, dec!(12));
        assert_eq!(decision.requested_interest_rate, dec!(8));
        assert_eq!(
            decision.decision,
            Decision::Approved {
                corrected_interest_rate: dec!(12)
            }
        );
        let expected = EmiCalculator::new()
            .monthly_installment(dec!(100000), dec!(12), 12)
            .unwrap();
        assert_eq!(decision.monthly_installment, expected);
    }

    #[test]
    fn test_boundary_scores_use_lower_band() {
        let evaluator = EligibilityEvaluator::default();
        let p = profile(dec!(50000));
        let r = request(dec!(100000), dec!(8), 12);

        let at_50 = evaluator.decide(CreditScore::new(50), &p, &[], &r).unwrap();
        assert_eq!(at_50.corrected_interest_rate, dec!(12));

        let at_30 = evaluator.decide(CreditScore::new(30), &p, &[], &r).unwrap();
        assert_eq!(at_30.corrected_interest_rate, dec!(16));

        let at_10 = evaluator.decide(CreditScore::new(10), &p, &[], &r).unwrap();
        assert_eq!(at_10.rejection_reason(), Some(RejectionReason::LowCreditScore));
    }

    #[test]
    fn test_rate_above_floor_not_corrected() {
        let evaluator = EligibilityEvaluator::default();
        let decision = evaluator
            .decide(CreditScore::new(20), &profile(dec!(50000)), &[], &request(dec!(100000), dec!(18.5), 12))
            .unwrap();

        assert!(decision.approved());
        assert_eq!(decision.corrected_interest_rate, dec!(18.5));
    }

    #[test]
    fn test_low_score_rejected_regardless_of_rate() {
        let evaluator = EligibilityEvaluator::default();
        for rate in [dec!(5), dec!(16), dec!(40)] {
            let decision = evaluator
                .decide(CreditScore::new(5), &profile(dec!(50000)), &[], &request(dec!(100000), rate, 12))
                .unwrap();

            assert!(!decision.approved());
            assert_eq!(decision.rejection_reason(), Some(RejectionReason::LowCreditScore));
            assert_eq!(decision.corrected_interest_rate, rate);
        }
    }

    #[test]
    fn test_debt_to_income_overrides_prime_tier() {
        let evaluator = EligibilityEvaluator::default();
        // existing 20,000 + new ~8,885 > 25,000
        let history = vec![active_loan(dec!(20000))];
        let decision = evaluator
            .decide(CreditScore::new(90), &profile(dec!(50000)), &history, &request(dec!(100000), dec!(12), 12))
            .unwrap();

        assert!(!decision.approved());
        assert_eq!(
            decision.rejection_reason(),
            Some(RejectionReason::DebtToIncomeExceeded)
        );
    }

    #[test]
    fn test_debt_to_income_at_cap_is_allowed() {
        let evaluator = EligibilityEvaluator::default();
        // 100,000 at 0% over 10 months = 10,000; 15,000 + 10,000 == 25,000
        let history = vec![active_loan(dec!(15000))];
        let decision = evaluator
            .decide(CreditScore::new(90), &profile(dec!(50000)), &history, &request(dec!(100000), Decimal::ZERO, 10))
            .unwrap();

        assert!(decision.approved());
    }

    #[test]
    fn test_closed_loans_do_not_count_towards_dti() {
        let evaluator = EligibilityEvaluator::default();
        let mut closed = active_loan(dec!(40000));
        closed.is_active = false;
        let decision = evaluator
            .decide(CreditScore::new(90), &profile(dec!(50000)), &[closed], &request(dec!(100000), dec!(12), 12))
            .unwrap();

        assert!(decision.approved());
    }

    #[test]
    fn test_missing_payment_is_recomputed() {
        let evaluator = EligibilityEvaluator::default();
        let mut loan = active_loan(Decimal::ZERO);
        loan.monthly_payment = None;
        loan.loan_amount = dec!(240000);
        loan.interest_rate = Decimal::ZERO;
        // recomputed 10,000 + new 10,000 = 20,000 <= 25,000
        let decision = evaluator
            .decide(CreditScore::new(90), &profile(dec!(50000)), &[loan], &request(dec!(100000), Decimal::ZERO, 10))
            .unwrap();
        assert!(decision.approved());
    }

    #[test]
    fn test_evaluate_end_to_end_standard_tier() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let history: Vec<_> = (0..5)
            .map(|_| LoanHistoryEntry {
                loan_amount: dec!(360000),
                tenure: 16,
                interest_rate: dec!(10),
                emis_paid_on_time: 6,
                is_active: false,
                monthly_payment: None,
                approved_on: NaiveDate::from_ymd_opt(2020, 1, 10),
            })
            .collect();
        let customer = CustomerProfile {
            monthly_income: dec!(50000),
            approved_limit: dec!(1800000),
            current_debt: Decimal::ZERO,
        };

        let decision =
            evaluate_eligibility(&customer, &history, &request(dec!(100000), dec!(8), 12), as_of).unwrap();

        assert_eq!(decision.credit_score.value(), 45);
        assert!(decision.approved());
        assert_eq!(decision.corrected_interest_rate, dec!(12));
    }

    #[test]
    fn test_non_positive_income_rejected() {
        let evaluator = EligibilityEvaluator::default();
        let result = evaluator.decide(
            CreditScore::new(90),
            &profile(Decimal::ZERO),
            &[],
            &request(dec!(100000), dec!(10), 12),
        );
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_huge_limit_and_history_evaluate_without_overflow() {
        let customer = CustomerProfile {
            monthly_income: dec!(1000000),
            approved_limit: "25000000000000000000000000000".parse().unwrap(),
            current_debt: Decimal::ZERO,
        };
        let history = vec![LoanHistoryEntry {
            loan_amount: "2000000000000000000000000000".parse().unwrap(),
            tenure: 12,
            interest_rate: dec!(10),
            emis_paid_on_time: 12,
            is_active: false,
            monthly_payment: None,
            approved_on: None,
        }];
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let decision = EligibilityEvaluator::default()
            .evaluate(&customer, &history, &request(dec!(100000), dec!(10), 12), as_of)
            .unwrap();

        // 40 + 18 + 20 + 0.2 * 92
        assert_eq!(decision.credit_score.value(), 96);
        assert!(decision.approved());
    }

    #[test]
    fn test_existing_installment_overflow_is_calculation_error() {
        let evaluator = EligibilityEvaluator::default();
        let history = vec![active_loan(Decimal::MAX), active_loan(Decimal::MAX)];
        let result = evaluator.decide(
            CreditScore::new(90),
            &profile(dec!(50000)),
            &history,
            &request(dec!(100000), dec!(10), 12),
        );

        assert!(matches!(result, Err(Error::Calculation(_))));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let config = PolicyConfig {
            max_debt_to_income: dec!(1.5),
            ..PolicyConfig::default()
        };
        assert!(EligibilityEvaluator::new(config).is_err());
    }
}
