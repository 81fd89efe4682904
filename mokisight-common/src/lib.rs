//! MokiSight Common Library
//!
//! Shared types and utilities for the MokiSight CRM dashboard:
//!
//! - [`model`] - Backend data model (`CustomerSummary`, `CustomerDetail`, `Segment`, ...)
//! - [`client`] - REST client (`CrmApi`, `HttpClient`)
//! - [`session`] - Auth token persistence
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod session;

// Re-export commonly used types at the crate root
pub use client::{CrmApi, HttpClient};
pub use config::{
    ApiConfig, AppConfig, LogFormat, LoggingConfig, UiConfig, default_config_path, load_config,
    parse_config, validate_base_url,
};
pub use error::{Error, Result};
pub use model::{
    Analytics, ChurnRiskLevel, CustomerDetail, CustomerPage, CustomerSummary, DeclineSummary,
    ErrorBody, LoginRequest, LoginResponse, MonthlyVisit, Segment, VisitInfo, WeeklySummary,
};
pub use session::TokenStore;

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// `RUST_LOG` takes precedence over `config.level`.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
