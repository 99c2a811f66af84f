use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use loan_engine::{
    config::{Config, StorageBackend},
    handlers,
    services::LoanService,
    store::{InMemoryLoanStore, LoanStore, PgLoanStore},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use underwriting_core::EligibilityEvaluator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let _subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .json()
        .init();

    info!("Starting Loan Engine...");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!("Configuration loaded successfully");

    let store: Arc<dyn LoanStore> = match config.storage.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database");
            let store = PgLoanStore::connect(&config.database.url, config.database.max_connections)
                .await
                .map_err(|e| {
                    error!("Failed to create database pool: {}", e);
                    std::io::Error::new(
                        std::io::ErrorKind::Other,
                        format!("Database connection failed: {}", e),
                    )
                })?;

            store.migrate().await.map_err(|e| {
                error!("Database migration failed: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;

            info!("Database connection pool created successfully");
            Arc::new(store)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage, data will not survive a restart");
            Arc::new(InMemoryLoanStore::new())
        }
    };

    let evaluator = EligibilityEvaluator::new(config.policy.clone())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let service = Arc::new(LoanService::new(store, evaluator));
    let service_data = web::Data::new(service);

    let server_config = config.server.clone();

    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(service_data.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(handlers::configure_routes)
    })
    .workers(server_config.workers)
    .bind((server_config.host, server_config.port))?
    .run()
    .await
}
