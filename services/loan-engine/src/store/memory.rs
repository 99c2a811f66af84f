use super::LoanStore;
use crate::errors::Result;
use crate::models::{Customer, Loan};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store for tests and demo deployments
#[derive(Default, Clone)]
pub struct InMemoryLoanStore {
    customers: Arc<RwLock<HashMap<Uuid, Customer>>>,
    loans: Arc<RwLock<HashMap<Uuid, Loan>>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoanStore for InMemoryLoanStore {
    async fn insert_customer(&self, customer: &Customer) -> Result<()> {
        self.customers
            .write()
            .await
            .insert(customer.customer_id, customer.clone());
        Ok(())
    }

    async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>> {
        Ok(self.customers.read().await.get(&customer_id).cloned())
    }

    async fn insert_loan(&self, loan: &Loan) -> Result<()> {
        self.loans.write().await.insert(loan.loan_id, loan.clone());
        Ok(())
    }

    async fn get_loan(&self, loan_id: Uuid) -> Result<Option<Loan>> {
        Ok(self.loans.read().await.get(&loan_id).cloned())
    }

    async fn loans_for_customer(&self, customer_id: Uuid) -> Result<Vec<Loan>> {
        let mut loans: Vec<Loan> = self
            .loans
            .read()
            .await
            .values()
            .filter(|l| l.customer_id == customer_id)
            .cloned()
            .collect();

        loans.sort_by(|a, b| {
            b.date_of_approval
                .cmp(&a.date_of_approval)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(loans)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
