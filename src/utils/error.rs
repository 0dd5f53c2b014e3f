//! Error handling for the gateway
//!
//! This module defines the crate-level error type and its HTTP mapping.
//! Upstream faults are classified by the provider adapter; by the time an
//! error reaches this type it is terminal and crosses the component boundary.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The upstream client was never initialized (e.g. missing credential).
    /// Surfaced as 503 without touching the request or error counters.
    #[error("Model service not initialized. Please try again later.")]
    NotInitialized,

    /// Terminal generation failure after retry exhaustion, carrying the
    /// last attempt's fault description
    #[error("Text generation failed: {0}")]
    Generation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metrics registration or encoding errors
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON body carried by error responses
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description
    pub detail: String,
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Generation(_)
            | GatewayError::Config(_)
            | GatewayError::Metrics(_)
            | GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}
