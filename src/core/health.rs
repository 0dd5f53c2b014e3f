//! Aggregate health model
//!
//! Folds the status of the upstream client, the registry client, and the
//! metrics subsystem into one composite record. Pure read-only poll: no
//! counter moves, no network probe of the registry (presence of the client
//! is taken as registry health).

use crate::core::provider::CompletionClient;
use crate::monitoring::MetricsRegistry;
use crate::services::registry::ServiceRegistry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Service name reported on `/` and `/health`
pub const SERVICE_NAME: &str = "LLM Text Generation Microservice";

/// Two-state subsystem status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Subsystem is usable
    Healthy,
    /// Subsystem is missing or failing
    Unhealthy,
}

impl ComponentStatus {
    fn from_flag(healthy: bool) -> Self {
        if healthy {
            ComponentStatus::Healthy
        } else {
            ComponentStatus::Unhealthy
        }
    }

    /// Whether this status is the healthy variant
    pub fn is_healthy(self) -> bool {
        matches!(self, ComponentStatus::Healthy)
    }
}

/// Point-in-time composite health snapshot. Recomputed per query, never
/// persisted. The overall `status` is the conjunction of the three
/// subsystem statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Overall status
    pub status: ComponentStatus,
    /// Constant service name
    pub service: String,
    /// Evaluation time, RFC 3339 UTC
    pub timestamp: String,
    /// Upstream client status
    pub model_status: ComponentStatus,
    /// Registry client status
    #[serde(rename = "consul_status")]
    pub registry_status: ComponentStatus,
    /// Metrics exporter status
    pub metrics_status: ComponentStatus,
}

/// On-demand health evaluator, off the generation path
pub struct HealthAggregator {
    client: Option<Arc<dyn CompletionClient>>,
    registry: Option<Arc<dyn ServiceRegistry>>,
    metrics: Arc<MetricsRegistry>,
}

impl HealthAggregator {
    /// Create an aggregator over the subsystems to probe
    pub fn new(
        client: Option<Arc<dyn CompletionClient>>,
        registry: Option<Arc<dyn ServiceRegistry>>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            client,
            registry,
            metrics,
        }
    }

    /// Evaluate all subsystem probes and fold them into one record
    pub fn evaluate(&self) -> HealthRecord {
        let model_status = ComponentStatus::from_flag(self.client.is_some());
        let registry_status = ComponentStatus::from_flag(self.registry.is_some());
        let metrics_status = ComponentStatus::from_flag(self.metrics.render().is_ok());

        let status = ComponentStatus::from_flag(
            model_status.is_healthy() && registry_status.is_healthy() && metrics_status.is_healthy(),
        );

        HealthRecord {
            status,
            service: SERVICE_NAME.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            model_status,
            registry_status,
            metrics_status,
        }
    }
}
