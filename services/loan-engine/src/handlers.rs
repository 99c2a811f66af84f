use crate::errors::LoanEngineError;
use crate::metrics;
use crate::models::{HealthResponse, LoanApplicationRequest, RegisterCustomerRequest};
use crate::services::LoanService;
use actix_web::{web, HttpResponse};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

// ===== API Info =====
pub async fn api_info() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Loan Engine API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "register": "/register (POST) - Register a new customer",
            "check-eligibility": "/check-eligibility (POST) - Check loan eligibility",
            "create-loan": "/create-loan (POST) - Process a new loan",
            "view-loan": "/view-loan/{loan_id} (GET) - View loan details",
            "view-loans": "/view-loans/{customer_id} (GET) - View all loans of a customer"
        }
    }))
}

// ===== Health Check =====
pub async fn health_check(service: web::Data<Arc<LoanService>>) -> HttpResponse {
    let store = service.store();
    let (status, storage) = match store.health_check().await {
        Ok(()) => ("healthy", "connected"),
        Err(e) => {
            error!("Storage health check failed: {}", e);
            ("degraded", "disconnected")
        }
    };

    let body = HealthResponse {
        status: status.to_string(),
        service: "loan-engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: format!("{} ({})", storage, store.backend_name()),
    };

    if status == "healthy" {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

// ===== Metrics =====
pub async fn metrics_endpoint() -> Result<HttpResponse, LoanEngineError> {
    let body = metrics::metrics_handler().map_err(|e| LoanEngineError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

// ===== Register Customer =====
pub async fn register_customer(
    service: web::Data<Arc<LoanService>>,
    request: web::Json<RegisterCustomerRequest>,
) -> Result<HttpResponse, LoanEngineError> {
    let response = service.register_customer(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

// ===== Check Eligibility =====
pub async fn check_eligibility(
    service: web::Data<Arc<LoanService>>,
    request: web::Json<LoanApplicationRequest>,
) -> Result<HttpResponse, LoanEngineError> {
    let response = service.check_eligibility(request.into_inner()).await?;
    info!(
        customer_id = %response.customer_id,
        approval = response.approval,
        "Loan eligibility checked"
    );
    Ok(HttpResponse::Ok().json(response))
}

// ===== Create Loan =====
pub async fn create_loan(
    service: web::Data<Arc<LoanService>>,
    request: web::Json<LoanApplicationRequest>,
) -> Result<HttpResponse, LoanEngineError> {
    let response = service.create_loan(request.into_inner()).await?;
    if response.loan_approved {
        Ok(HttpResponse::Created().json(response))
    } else {
        Ok(HttpResponse::Ok().json(response))
    }
}

// ===== View Loan =====
pub async fn view_loan(
    service: web::Data<Arc<LoanService>>,
    loan_id: web::Path<Uuid>,
) -> Result<HttpResponse, LoanEngineError> {
    let loan = service.get_loan(*loan_id).await?;
    Ok(HttpResponse::Ok().json(loan))
}

// ===== View Loans By Customer =====
pub async fn view_loans(
    service: web::Data<Arc<LoanService>>,
    customer_id: web::Path<Uuid>,
) -> Result<HttpResponse, LoanEngineError> {
    let loans = service.loans_for_customer(*customer_id).await?;
    Ok(HttpResponse::Ok().json(loans))
}

// ===== Configure Routes =====
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(api_info))
        .route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(metrics_endpoint))
        .route("/register", web::post().to(register_customer))
        .route("/check-eligibility", web::post().to(check_eligibility))
        .route("/create-loan", web::post().to(create_loan))
        .route("/view-loan/{loan_id}", web::get().to(view_loan))
        .route("/view-loans/{customer_id}", web::get().to(view_loans));
}
