pub mod memory;
pub mod postgres;

use crate::errors::Result;
use crate::models::{Customer, Loan};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::InMemoryLoanStore;
pub use postgres::PgLoanStore;

/// Persistence for customers and their loans
#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn insert_customer(&self, customer: &Customer) -> Result<()>;
    async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>>;
    async fn insert_loan(&self, loan: &Loan) -> Result<()>;
    async fn get_loan(&self, loan_id: Uuid) -> Result<Option<Loan>>;
    /// All loans of a customer, most recently approved first
    async fn loans_for_customer(&self, customer_id: Uuid) -> Result<Vec<Loan>>;
    async fn health_check(&self) -> Result<()>;
    fn backend_name(&self) -> &'static str;
}
