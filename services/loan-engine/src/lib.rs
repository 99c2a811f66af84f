pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use errors::{LoanEngineError, Result};
pub use services::LoanService;
