//! Generation request handler
//!
//! Drives the lifecycle of one accepted request: initialization check,
//! counter increment, retried upstream invocation, duration measurement,
//! best-effort service registration, failure classification.

mod types;


pub use types::{GenerationRequest, GenerationResult, TokenUsage};

use crate::core::provider::CompletionClient;
use crate::core::retry::RetryPolicy;
use crate::monitoring::MetricsRegistry;
use crate::services::registry::ServiceRegistry;
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Handler for text-generation requests.
///
/// Holds the only cross-request shared state (the metrics registry, with
/// atomic counters); everything per-request lives on the stack, so the
/// handler is safe to drive from any number of concurrent requests.
pub struct GenerationHandler {
    client: Option<Arc<dyn CompletionClient>>,
    registry: Option<Arc<dyn ServiceRegistry>>,
    metrics: Arc<MetricsRegistry>,
    retry: RetryPolicy,
}

impl GenerationHandler {
    /// Create a new handler over the given collaborators
    pub fn new(
        client: Option<Arc<dyn CompletionClient>>,
        registry: Option<Arc<dyn ServiceRegistry>>,
        metrics: Arc<MetricsRegistry>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            registry,
            metrics,
            retry,
        }
    }

    /// Whether the upstream client was initialized at startup
    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    /// Run one generation request to completion.
    ///
    /// The request counter moves once per accepted call, before the retry
    /// loop; the error counter moves once per failed attempt inside it. The
    /// duration histogram records the full wrapped elapsed time, backoff
    /// included, on success and on failure alike.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        let client = match &self.client {
            Some(client) => Arc::clone(client),
            None => {
                error!("Upstream client not initialized");
                return Err(GatewayError::NotInitialized);
            }
        };

        self.metrics.inc_requests();
        let started = Instant::now();

        let metrics = Arc::clone(&self.metrics);
        let outcome = self
            .retry
            .call(|| {
                let client = Arc::clone(&client);
                let metrics = Arc::clone(&metrics);
                let request = request.clone();
                async move {
                    let result = client
                        .generate(&request.prompt, request.max_tokens, request.temperature)
                        .await;
                    if let Err(err) = &result {
                        metrics.inc_errors();
                        warn!("Error during text generation: {}", err);
                    }
                    result
                }
            })
            .await;

        let elapsed = started.elapsed();
        self.metrics.observe_generation(elapsed);

        match outcome {
            Ok(result) => {
                info!(
                    "Text generation completed in {:.2} seconds",
                    elapsed.as_secs_f64()
                );
                self.spawn_registration();
                Ok(result)
            }
            Err(err) => {
                error!("Text generation failed: {}", err);
                Err(GatewayError::Generation(err.to_string()))
            }
        }
    }

    /// Re-register with the service registry on a detached task. Failure is
    /// intentionally non-fatal: it is logged and never reaches the caller.
    fn spawn_registration(&self) {
        let Some(registry) = &self.registry else {
            return;
        };

        let registry = Arc::clone(registry);
        tokio::spawn(async move {
            if let Err(err) = registry.register().await {
                error!("Failed to register service with registry: {}", err);
            }
        });
    }
}
