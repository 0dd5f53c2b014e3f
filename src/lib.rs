//! # Textgen Gateway
//!
//! A network-facing gateway that accepts text-generation requests, forwards
//! them to a remote LLM provider, and returns normalized responses while
//! tolerating transient upstream failures.
//!
//! ## Features
//!
//! - **Resilient generation pipeline**: bounded retries with exponential
//!   backoff around every upstream call
//! - **Aggregate health model**: one composite record covering the upstream
//!   client, the service registry, and the metrics subsystem
//! - **Prometheus metrics**: request/error counters and a generation-time
//!   histogram, exposed in text format
//! - **Service discovery**: best-effort re-registration with a Consul-style
//!   registry on every successful generation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use textgen_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let gateway = Gateway::new(config).await?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod server;
pub mod services;
pub mod utils;

// Re-export main types
pub use crate::config::Config;
pub use crate::core::generation::{
    GenerationHandler, GenerationRequest, GenerationResult, TokenUsage,
};
pub use crate::core::health::{ComponentStatus, HealthAggregator, HealthRecord, SERVICE_NAME};
pub use crate::core::provider::{CompletionClient, GroqClient, UpstreamError};
pub use crate::core::retry::{RetryConfig, RetryPolicy};
pub use crate::monitoring::MetricsRegistry;
pub use crate::utils::error::{GatewayError, Result};

use tracing::info;

/// The gateway service: an HTTP front over the resilient generation pipeline
pub struct Gateway {
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");

        let server = server::HttpServer::new(&config)?;

        Ok(Self { server })
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!("Starting Textgen Gateway");

        self.server.start().await
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, env!("CARGO_PKG_NAME"));
        assert!(!VERSION.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_builds_from_default_config() {
        let gateway = Gateway::new(Config::default()).await.unwrap();

        // Without an API key the pipeline comes up degraded but serving
        let health = gateway.server.state().health.evaluate();
        assert_eq!(health.model_status, ComponentStatus::Unhealthy);
        assert_eq!(health.metrics_status, ComponentStatus::Healthy);
    }
}
