//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::generation::GenerationHandler;
use crate::core::health::HealthAggregator;
use crate::monitoring::MetricsRegistry;
use crate::services::registry::ServiceRegistry;
use std::sync::Arc;

/// HTTP server state shared across handlers.
///
/// All fields are wrapped in `Arc` for efficient sharing across worker
/// threads.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Generation request handler
    pub handler: Arc<GenerationHandler>,
    /// Health aggregator
    pub health: Arc<HealthAggregator>,
    /// Metrics registry
    pub metrics: Arc<MetricsRegistry>,
    /// Registry client, if registration is enabled
    pub registry: Option<Arc<dyn ServiceRegistry>>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(
        config: Config,
        handler: GenerationHandler,
        health: HealthAggregator,
        metrics: Arc<MetricsRegistry>,
        registry: Option<Arc<dyn ServiceRegistry>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            handler: Arc::new(handler),
            health: Arc::new(health),
            metrics,
            registry,
        }
    }
}
