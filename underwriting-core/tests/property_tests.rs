//! Property-based tests for underwriting invariants
//!
//! - Approved limits are the nearest lakh multiple of 36x income
//! - EMI is non-decreasing in the interest rate
//! - Zero-rate EMI is principal / tenure
//! - Credit scores stay within 0-100 and are 0 when over limit
//! - Tier correction never touches a rate already above the floor

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use underwriting_core::{
    compute_approved_limit, money::round_currency, CreditScore, CreditScorer, CustomerProfile,
    EligibilityEvaluator, EmiCalculator, LoanHistoryEntry, LoanRequest, PolicyConfig,
};
use uuid::Uuid;

/// Strategy for amounts with cents
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1u64..1_000_000_00u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Strategy for annual rates between 0% and 40% in basis points
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..4_000u32).prop_map(|bps| Decimal::new(i64::from(bps), 2))
}

fn history_entry_strategy() -> impl Strategy<Value = LoanHistoryEntry> {
    (
        amount_strategy(),
        1u32..360,
        0u32..400,
        rate_strategy(),
        2015i32..2026,
    )
        .prop_map(|(amount, tenure, on_time, rate, year)| LoanHistoryEntry {
            loan_amount: amount,
            tenure,
            interest_rate: rate,
            emis_paid_on_time: on_time,
            is_active: on_time < tenure,
            monthly_payment: None,
            approved_on: NaiveDate::from_ymd_opt(year, 6, 30),
        })
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: limit is the nearest multiple of 100,000 to 36 x income
    #[test]
    fn prop_approved_limit_nearest_lakh(income in 0u64..10_000_000_00u64) {
        let income = Decimal::new(income as i64, 2);
        let limit = compute_approved_limit(income).unwrap().amount();
        let lakh = dec!(100000);
        let raw = income * dec!(36);

        prop_assert!(limit >= Decimal::ZERO);
        prop_assert_eq!(limit % lakh, Decimal::ZERO);

        let distance = (limit - raw).abs();
        prop_assert!(distance <= lakh / dec!(2));
        // ties go up
        if distance == lakh / dec!(2) {
            prop_assert!(limit > raw);
        }
    }

    /// Property: EMI does not fall when the rate rises
    #[test]
    fn prop_emi_monotonic_in_rate(
        principal in amount_strategy(),
        tenure in 1u32..360,
        low in rate_strategy(),
        bump in 0u32..1_000u32,
    ) {
        let high = low + Decimal::new(i64::from(bump), 2);
        let calc = EmiCalculator::new();

        let emi_low = calc.monthly_installment(principal, low, tenure).unwrap();
        let emi_high = calc.monthly_installment(principal, high, tenure).unwrap();

        prop_assert!(emi_high >= emi_low, "{} at {}% vs {} at {}%", emi_high, high, emi_low, low);
    }

    /// Property: zero-rate EMI is straight division
    #[test]
    fn prop_zero_rate_emi(principal in amount_strategy(), tenure in 1u32..360) {
        let emi = EmiCalculator::new()
            .monthly_installment(principal, Decimal::ZERO, tenure)
            .unwrap();
        prop_assert_eq!(emi, round_currency(principal / Decimal::from(tenure)));
    }

    /// Property: score is always within 0-100
    #[test]
    fn prop_score_bounded(
        history in prop::collection::vec(history_entry_strategy(), 0..15),
        limit in amount_strategy(),
        debt in amount_strategy(),
    ) {
        let scorer = CreditScorer::new(PolicyConfig::default());
        let profile = CustomerProfile {
            monthly_income: dec!(50000),
            approved_limit: limit,
            current_debt: debt,
        };

        let (score, _) = scorer.score(&profile, &history, as_of()).unwrap();
        prop_assert!(score.value() <= 100);

        if debt > limit {
            prop_assert_eq!(score, CreditScore::ZERO);
        }
    }

    /// Property: a rate meeting the tier floor is never corrected
    #[test]
    fn prop_no_spurious_correction(score in 11u8..=100, rate in 1_600u32..4_000u32) {
        let rate = Decimal::new(i64::from(rate), 2);
        let evaluator = EligibilityEvaluator::default();
        let profile = CustomerProfile {
            monthly_income: dec!(10000000),
            approved_limit: dec!(360000000),
            current_debt: Decimal::ZERO,
        };
        let request = LoanRequest {
            customer_id: Uuid::new_v4(),
            loan_amount: dec!(100000),
            interest_rate: rate,
            tenure: 24,
        };

        let decision = evaluator
            .decide(CreditScore::new(score), &profile, &[], &request)
            .unwrap();

        prop_assert!(decision.approved());
        prop_assert_eq!(decision.corrected_interest_rate, rate);
    }
}

#[test]
fn test_documented_limit_scenario() {
    assert_eq!(
        compute_approved_limit(dec!(50000)).unwrap().amount(),
        dec!(1800000)
    );
}

#[test]
fn test_documented_emi_scenario() {
    assert_eq!(EmiCalculator::monthly_rate(dec!(10.5)), dec!(0.00875));
    let emi = EmiCalculator::new()
        .monthly_installment(dec!(500000), dec!(10.5), 36)
        .unwrap();
    assert_eq!(emi, dec!(16251.22));
}
