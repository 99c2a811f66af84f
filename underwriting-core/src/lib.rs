//! Underwriting core for the loan engine
//!
//! Credit scoring, EMI amortization and eligibility decisions for a single
//! loan application. Every operation is a pure function of its inputs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod eligibility;
pub mod emi;
pub mod error;
pub mod money;
pub mod scoring;
pub mod types;

pub use config::PolicyConfig;
pub use eligibility::{compute_approved_limit, evaluate_eligibility, EligibilityEvaluator};
pub use emi::EmiCalculator;
pub use error::{Error, Result};
pub use scoring::CreditScorer;
pub use types::*;
