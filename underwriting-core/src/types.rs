//! Core types for the underwriting pipeline

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Financial standing of a customer at evaluation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// Monthly income
    pub monthly_income: Decimal,

    /// Approved credit limit
    pub approved_limit: Decimal,

    /// Sum of unpaid loan principal
    pub current_debt: Decimal,
}

/// A past or running loan of the customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanHistoryEntry {
    /// Principal
    pub loan_amount: Decimal,

    /// Tenure in months
    pub tenure: u32,

    /// Annual interest rate in percent
    pub interest_rate: Decimal,

    /// EMIs paid on time so far
    pub emis_paid_on_time: u32,

    /// Whether the loan still has EMIs outstanding
    pub is_active: bool,

    /// Stored monthly installment, recomputed from the terms when absent
    #[serde(default)]
    pub monthly_payment: Option<Decimal>,

    /// Origination date
    #[serde(default)]
    pub approved_on: Option<NaiveDate>,
}

/// Requested loan terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Customer the loan is for
    pub customer_id: Uuid,

    /// Principal
    pub loan_amount: Decimal,

    /// Requested annual interest rate in percent
    pub interest_rate: Decimal,

    /// Tenure in months
    pub tenure: u32,
}

/// Credit score (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditScore(u8);

impl CreditScore {
    /// Lowest possible score
    pub const ZERO: CreditScore = CreditScore(0);

    /// Create new credit score, clamped to 100
    pub fn new(score: u8) -> Self {
        Self(score.min(100))
    }

    /// Get raw score
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for CreditScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Approved credit limit, always a non-negative multiple of the rounding unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditLimit(Decimal);

impl CreditLimit {
    pub(crate) fn from_rounded(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Limit amount
    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<CreditLimit> for Decimal {
    fn from(limit: CreditLimit) -> Self {
        limit.0
    }
}

/// Why an application was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Credit score at or below the minimum cutoff
    LowCreditScore,

    /// Existing plus new EMIs exceed the allowed share of income
    DebtToIncomeExceeded,
}

impl RejectionReason {
    /// Message shown to the applicant
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::LowCreditScore => "Loan not approved due to low credit score",
            RejectionReason::DebtToIncomeExceeded => "Total EMIs exceed the allowed share of monthly income",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of an eligibility evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Decision {
    /// Loan may be granted at the given rate
    Approved {
        /// Rate after tier correction
        corrected_interest_rate: Decimal,
    },
    /// Loan must not be granted
    Rejected {
        /// Reason code
        reason: RejectionReason,
    },
}

/// Weighted components behind a credit score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// On-time payment component, 0-100 before weighting
    pub payment_history: Decimal,

    /// Loan count component, 0-100 before weighting
    pub loan_count: Decimal,

    /// Current-year activity component, 0-100 before weighting
    pub current_year_activity: Decimal,

    /// Loan volume component, 0-100 before weighting
    pub loan_volume: Decimal,

    /// Set when current debt exceeds the approved limit
    pub over_limit: bool,
}

/// Full result of evaluating one loan request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityDecision {
    /// Approval or rejection
    pub decision: Decision,

    /// Score the decision was based on
    pub credit_score: CreditScore,

    /// Rate the customer asked for
    pub requested_interest_rate: Decimal,

    /// Rate the loan would carry; equals the requested rate unless a tier floor applied
    pub corrected_interest_rate: Decimal,

    /// Monthly installment at the corrected rate, rounded to cents
    pub monthly_installment: Decimal,
}

impl EligibilityDecision {
    /// Whether the loan was approved
    pub fn approved(&self) -> bool {
        matches!(self.decision, Decision::Approved { .. })
    }

    /// Rejection reason, if rejected
    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match self.decision {
            Decision::Approved { .. } => None,
            Decision::Rejected { reason } => Some(reason),
        }
    }
}
