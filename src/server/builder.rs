//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use tracing::{error, info};

/// Server builder for easier configuration
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config)
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the server with environment-driven configuration
pub async fn run_server() -> Result<()> {
    info!("Starting LLM Text Generation Gateway");

    // Load .env before reading configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let server = ServerBuilder::new().with_config(config.clone()).build()?;

    // Best-effort registration at startup; per-success re-registration
    // keeps the registry converged afterwards
    if let Some(registry) = &server.state().registry {
        match registry.register().await {
            Ok(()) => info!("Registered service {} with registry", registry.service_id()),
            Err(e) => error!("Failed to register with registry: {}", e),
        }
    }

    info!(
        "Server starting at: http://{}:{}",
        config.server.host, config.server.port
    );
    info!("API Endpoints:");
    info!("   GET  /         - Liveness check");
    info!("   GET  /health   - Aggregate health record");
    info!("   GET  /metrics  - Prometheus metrics");
    info!("   POST /generate - Text generation");

    server.start().await
}
