use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use underwriting_core::{LoanHistoryEntry, LoanRequest, RejectionReason};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ===== Stored Records =====

/// Registered customer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub customer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub phone_number: String,
    pub monthly_income: Decimal,
    pub approved_limit: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Granted loan
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub loan_id: Uuid,
    pub customer_id: Uuid,
    pub loan_amount: Decimal,
    pub tenure: i32,
    pub interest_rate: Decimal,
    pub monthly_payment: Decimal,
    pub emis_paid_on_time: i32,
    pub date_of_approval: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    /// EMIs still to be paid
    pub fn repayments_left(&self) -> i32 {
        (self.tenure - self.emis_paid_on_time).max(0)
    }

    pub fn is_active(&self) -> bool {
        self.repayments_left() > 0
    }

    pub fn to_history_entry(&self) -> LoanHistoryEntry {
        LoanHistoryEntry {
            loan_amount: self.loan_amount,
            tenure: u32::try_from(self.tenure).unwrap_or(0),
            interest_rate: self.interest_rate,
            emis_paid_on_time: u32::try_from(self.emis_paid_on_time).unwrap_or(0),
            is_active: self.is_active(),
            monthly_payment: Some(self.monthly_payment),
            approved_on: Some(self.date_of_approval),
        }
    }
}

// ===== Requests =====

fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if !(7..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("phone_number"));
    }
    Ok(())
}

/// Largest monthly income a `NUMERIC(14, 2)` column holds
pub const MAX_MONTHLY_INCOME: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2);

/// Largest loan amount a `NUMERIC(16, 2)` column holds
pub const MAX_LOAN_AMOUNT: Decimal = Decimal::from_parts(0x6FC0_FFFF, 0x0023_86F2, 0, false, 2);

/// Amounts and rates are stored with two decimal places
const MONEY_SCALE: u32 = 2;

fn validate_money(value: &Decimal, max: Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("must_be_positive"));
    }
    if *value > max {
        return Err(ValidationError::new("amount_too_large"));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(ValidationError::new("too_many_decimal_places"));
    }
    Ok(())
}

fn validate_monthly_income(value: &Decimal) -> Result<(), ValidationError> {
    validate_money(value, MAX_MONTHLY_INCOME)
}

fn validate_loan_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_money(value, MAX_LOAN_AMOUNT)
}

fn validate_interest_rate(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("interest_rate_out_of_range"));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(ValidationError::new("too_many_decimal_places"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterCustomerRequest {
    #[validate(length(min = 1, max = 64))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub last_name: String,
    #[validate(range(min = 18, max = 120))]
    pub age: i32,
    #[validate(custom = "validate_monthly_income")]
    pub monthly_income: Decimal,
    #[validate(custom = "validate_phone_number")]
    pub phone_number: String,
}

/// Body of both `/check-eligibility` and `/create-loan`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoanApplicationRequest {
    pub customer_id: Uuid,
    #[validate(custom = "validate_loan_amount")]
    pub loan_amount: Decimal,
    #[validate(custom = "validate_interest_rate")]
    pub interest_rate: Decimal,
    #[validate(range(min = 1, max = 600))]
    pub tenure: u32,
}

impl From<&LoanApplicationRequest> for LoanRequest {
    fn from(req: &LoanApplicationRequest) -> Self {
        LoanRequest {
            customer_id: req.customer_id,
            loan_amount: req.loan_amount,
            interest_rate: req.interest_rate,
            tenure: req.tenure,
        }
    }
}

// ===== Responses =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCustomerResponse {
    pub customer_id: Uuid,
    pub name: String,
    pub age: i32,
    pub monthly_income: Decimal,
    pub approved_limit: Decimal,
    pub phone_number: String,
}

impl From<&Customer> for RegisterCustomerResponse {
    fn from(customer: &Customer) -> Self {
        RegisterCustomerResponse {
            customer_id: customer.customer_id,
            name: customer.full_name(),
            age: customer.age,
            monthly_income: customer.monthly_income,
            approved_limit: customer.approved_limit,
            phone_number: customer.phone_number.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityResponse {
    pub customer_id: Uuid,
    pub approval: bool,
    pub interest_rate: Decimal,
    pub corrected_interest_rate: Decimal,
    pub tenure: u32,
    pub monthly_installment: Decimal,
    pub credit_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionReason>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoanResponse {
    pub loan_id: Option<Uuid>,
    pub customer_id: Uuid,
    pub loan_approved: bool,
    pub message: String,
    pub monthly_installment: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub age: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanDetailResponse {
    pub loan_id: Uuid,
    pub customer: CustomerSummary,
    pub loan_amount: Decimal,
    pub interest_rate: Decimal,
    pub monthly_installment: Decimal,
    pub tenure: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanListItem {
    pub loan_id: Uuid,
    pub loan_amount: Decimal,
    pub interest_rate: Decimal,
    pub monthly_installment: Decimal,
    pub repayments_left: i32,
}

impl From<&Loan> for LoanListItem {
    fn from(loan: &Loan) -> Self {
        LoanListItem {
            loan_id: loan.loan_id,
            loan_amount: loan.loan_amount,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_payment,
            repayments_left: loan.repayments_left(),
        }
    }
}

// ===== Health Check =====
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub storage: String,
}
