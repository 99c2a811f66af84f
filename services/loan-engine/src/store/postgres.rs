use super::LoanStore;
use crate::errors::Result;
use crate::models::{Customer, Loan};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

pub struct PgLoanStore {
    pool: PgPool,
}

impl PgLoanStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        Ok(PgLoanStore { pool })
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LoanStore for PgLoanStore {
    async fn insert_customer(&self, customer: &Customer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (
                customer_id, first_name, last_name, age, phone_number,
                monthly_income, approved_limit, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(customer.customer_id)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(customer.age)
        .bind(&customer.phone_number)
        .bind(customer.monthly_income)
        .bind(customer.approved_limit)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers WHERE customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn insert_loan(&self, loan: &Loan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (
                loan_id, customer_id, loan_amount, tenure, interest_rate,
                monthly_payment, emis_paid_on_time, date_of_approval,
                end_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(loan.loan_id)
        .bind(loan.customer_id)
        .bind(loan.loan_amount)
        .bind(loan.tenure)
        .bind(loan.interest_rate)
        .bind(loan.monthly_payment)
        .bind(loan.emis_paid_on_time)
        .bind(loan.date_of_approval)
        .bind(loan.end_date)
        .bind(loan.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_loan(&self, loan_id: Uuid) -> Result<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans WHERE loan_id = $1
            "#,
        )
        .bind(loan_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    async fn loans_for_customer(&self, customer_id: Uuid) -> Result<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE customer_id = $1
            ORDER BY date_of_approval DESC, created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
