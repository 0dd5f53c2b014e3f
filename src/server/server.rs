//! HTTP server core implementation
//!
//! Builds every subsystem from configuration, assembles the shared state,
//! and runs the actix server with fully-open CORS.

use crate::config::{Config, ServerConfig};
use crate::core::generation::GenerationHandler;
use crate::core::health::HealthAggregator;
use crate::core::provider::{CompletionClient, GroqClient};
use crate::core::retry::{RetryConfig, RetryPolicy};
use crate::monitoring::MetricsRegistry;
use crate::server::routes;
use crate::server::state::AppState;
use crate::services::registry::{ConsulRegistry, ServiceRegistry};
use crate::utils::error::Result;
use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, middleware::Logger, web};
use std::sync::Arc;
use tracing::{error, info};

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server, constructing all subsystems
    pub fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let metrics = Arc::new(MetricsRegistry::new()?);

        let client: Option<Arc<dyn CompletionClient>> =
            match GroqClient::from_settings(&config.provider) {
                Some(client) => {
                    info!("Upstream client initialized for model {}", config.provider.model);
                    Some(Arc::new(client))
                }
                None => {
                    // Keep serving: health and metrics stay up, generation
                    // requests get 503 until the key is provided
                    error!("Upstream client not initialized, generation requests will be rejected");
                    None
                }
            };

        let registry: Option<Arc<dyn ServiceRegistry>> =
            ConsulRegistry::from_settings(&config.registry, config.server.port)
                .map(|r| Arc::new(r) as Arc<dyn ServiceRegistry>);

        let retry = RetryPolicy::new(RetryConfig::from(&config.retry));

        let handler = GenerationHandler::new(
            client.clone(),
            registry.clone(),
            Arc::clone(&metrics),
            retry,
        );
        let health = HealthAggregator::new(client, registry.clone(), Arc::clone(&metrics));

        let state = AppState::new(config.clone(), handler, health, metrics, registry);

        Ok(Self {
            config: config.server.clone(),
            state,
        })
    }

    /// Shared application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Start the HTTP server and serve until shutdown
    pub async fn start(self) -> Result<()> {
        let state = web::Data::new(self.state);
        let bind_address = (self.config.host.clone(), self.config.port);

        info!(
            "Starting server on {}:{}",
            self.config.host, self.config.port
        );

        ActixHttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                // All origins, methods, and headers
                .wrap(Cors::permissive())
                .wrap(Logger::default())
                .configure(routes::configure_routes)
        })
        .bind(bind_address)?
        .run()
        .await?;

        Ok(())
    }
}
