use crate::errors::{LoanEngineError, Result};
use crate::metrics::{CUSTOMERS_REGISTERED, ELIGIBILITY_DECISIONS, EVALUATION_DURATION, LOANS_CREATED};
use crate::models::*;
use crate::store::LoanStore;
use chrono::{Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use underwriting_core::{
    CustomerProfile, EligibilityDecision, EligibilityEvaluator, LoanHistoryEntry, LoanRequest,
};
use uuid::Uuid;
use validator::Validate;

const APPROVED_MESSAGE: &str = "Loan approved successfully";

/// Customer and loan operations on top of the underwriting pipeline
pub struct LoanService {
    store: Arc<dyn LoanStore>,
    evaluator: EligibilityEvaluator,
}

impl LoanService {
    pub fn new(store: Arc<dyn LoanStore>, evaluator: EligibilityEvaluator) -> Self {
        Self { store, evaluator }
    }

    pub fn store(&self) -> &Arc<dyn LoanStore> {
        &self.store
    }

    /// Register a customer; the approved limit is derived from income
    pub async fn register_customer(
        &self,
        request: RegisterCustomerRequest,
    ) -> Result<RegisterCustomerResponse> {
        request.validate()?;

        let approved_limit = self.evaluator.approved_limit(request.monthly_income)?;

        let customer = Customer {
            customer_id: Uuid::new_v4(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            age: request.age,
            phone_number: request.phone_number,
            monthly_income: request.monthly_income,
            approved_limit: approved_limit.amount(),
            created_at: Utc::now(),
        };

        self.store.insert_customer(&customer).await?;
        CUSTOMERS_REGISTERED.inc();

        info!(
            customer_id = %customer.customer_id,
            approved_limit = %customer.approved_limit,
            "Customer registered"
        );

        Ok(RegisterCustomerResponse::from(&customer))
    }

    pub async fn check_eligibility(
        &self,
        request: LoanApplicationRequest,
    ) -> Result<EligibilityResponse> {
        let decision = self.evaluate(&request).await?;

        Ok(EligibilityResponse {
            customer_id: request.customer_id,
            approval: decision.approved(),
            interest_rate: request.interest_rate,
            corrected_interest_rate: decision.corrected_interest_rate,
            tenure: request.tenure,
            monthly_installment: decision.monthly_installment,
            credit_score: decision.credit_score.value(),
            rejection_reason: decision.rejection_reason(),
        })
    }

    /// Evaluate the application and persist the loan when approved
    pub async fn create_loan(&self, request: LoanApplicationRequest) -> Result<CreateLoanResponse> {
        let decision = self.evaluate(&request).await?;

        if let Some(reason) = decision.rejection_reason() {
            return Ok(CreateLoanResponse {
                loan_id: None,
                customer_id: request.customer_id,
                loan_approved: false,
                message: reason.message().to_string(),
                monthly_installment: decision.monthly_installment,
            });
        }

        let today = Utc::now().date_naive();
        let loan = Loan {
            loan_id: Uuid::new_v4(),
            customer_id: request.customer_id,
            loan_amount: request.loan_amount,
            tenure: i32::try_from(request.tenure)
                .map_err(|_| LoanEngineError::Validation("tenure out of range".to_string()))?,
            interest_rate: decision.corrected_interest_rate,
            monthly_payment: decision.monthly_installment,
            emis_paid_on_time: 0,
            date_of_approval: today,
            end_date: end_date(today, request.tenure),
            created_at: Utc::now(),
        };

        self.store.insert_loan(&loan).await?;
        LOANS_CREATED.inc();

        info!(
            loan_id = %loan.loan_id,
            customer_id = %loan.customer_id,
            amount = %loan.loan_amount,
            rate = %loan.interest_rate,
            "Loan created"
        );

        Ok(CreateLoanResponse {
            loan_id: Some(loan.loan_id),
            customer_id: loan.customer_id,
            loan_approved: true,
            message: APPROVED_MESSAGE.to_string(),
            monthly_installment: loan.monthly_payment,
        })
    }

    pub async fn get_loan(&self, loan_id: Uuid) -> Result<LoanDetailResponse> {
        let loan = self
            .store
            .get_loan(loan_id)
            .await?
            .ok_or(LoanEngineError::LoanNotFound(loan_id))?;

        let customer = self
            .store
            .get_customer(loan.customer_id)
            .await?
            .ok_or_else(|| {
                LoanEngineError::Internal(format!(
                    "loan {} references missing customer {}",
                    loan.loan_id, loan.customer_id
                ))
            })?;

        Ok(LoanDetailResponse {
            loan_id: loan.loan_id,
            customer: CustomerSummary {
                id: customer.customer_id,
                first_name: customer.first_name,
                last_name: customer.last_name,
                phone_number: customer.phone_number,
                age: customer.age,
            },
            loan_amount: loan.loan_amount,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_payment,
            tenure: loan.tenure,
        })
    }

    pub async fn loans_for_customer(&self, customer_id: Uuid) -> Result<Vec<LoanListItem>> {
        if self.store.get_customer(customer_id).await?.is_none() {
            warn!(customer_id = %customer_id, "Customer not found");
            return Err(LoanEngineError::CustomerNotFound(customer_id));
        }

        let loans = self.store.loans_for_customer(customer_id).await?;
        Ok(loans.iter().map(LoanListItem::from).collect())
    }

    async fn evaluate(&self, request: &LoanApplicationRequest) -> Result<EligibilityDecision> {
        request.validate()?;
        let timer = EVALUATION_DURATION.start_timer();

        let customer = self
            .store
            .get_customer(request.customer_id)
            .await?
            .ok_or(LoanEngineError::CustomerNotFound(request.customer_id))?;
        let loans = self.store.loans_for_customer(customer.customer_id).await?;

        let history: Vec<LoanHistoryEntry> = loans.iter().map(Loan::to_history_entry).collect();
        let profile = customer_profile(&customer, &loans)?;

        let decision = self.evaluator.evaluate(
            &profile,
            &history,
            &LoanRequest::from(request),
            Utc::now().date_naive(),
        )?;
        timer.observe_duration();

        let outcome = match decision.rejection_reason() {
            None => "approved",
            Some(underwriting_core::RejectionReason::LowCreditScore) => "low_credit_score",
            Some(underwriting_core::RejectionReason::DebtToIncomeExceeded) => {
                "debt_to_income_exceeded"
            }
        };
        ELIGIBILITY_DECISIONS.with_label_values(&[outcome]).inc();

        Ok(decision)
    }
}

/// Current debt is the principal of loans with EMIs outstanding
fn customer_profile(customer: &Customer, loans: &[Loan]) -> Result<CustomerProfile> {
    let current_debt = loans
        .iter()
        .filter(|l| l.is_active())
        .try_fold(Decimal::ZERO, |total, l| total.checked_add(l.loan_amount))
        .ok_or_else(|| {
            LoanEngineError::Underwriting(underwriting_core::Error::Calculation(format!(
                "current debt overflow for customer {}",
                customer.customer_id
            )))
        })?;

    Ok(CustomerProfile {
        monthly_income: customer.monthly_income,
        approved_limit: customer.approved_limit,
        current_debt,
    })
}

fn end_date(start: NaiveDate, tenure: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(tenure))
}
