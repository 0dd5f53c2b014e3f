//! Service discovery registration
//!
//! Fire-and-forget client for a Consul-style agent. Registration is
//! idempotent: every call carries the same service id, so concurrent
//! re-registrations converge at the registry (last write wins).

use crate::config::RegistrySettings;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Faults from a registration attempt. Always logged by the caller, never
/// propagated to a response and never retried.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// The agent could not be reached
    #[error("registry transport error: {0}")]
    Transport(String),

    /// The agent answered with a non-success status
    #[error("registry rejected registration with status {status}: {body}")]
    Rejected {
        /// HTTP status code from the agent
        status: u16,
        /// Raw response body, best effort
        body: String,
    },
}

/// A client able to register this service with a discovery store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Register (or re-register) this service under its stable id
    async fn register(&self) -> std::result::Result<(), RegistrationError>;

    /// The stable service id sent with every registration
    fn service_id(&self) -> String;
}

/// Registry client speaking the Consul agent HTTP API
#[derive(Debug, Clone)]
pub struct ConsulRegistry {
    http: reqwest::Client,
    base_url: String,
    service_name: String,
    service_id: String,
    service_port: u16,
    check_url: String,
    check_interval: String,
}

impl ConsulRegistry {
    /// Build a registry client from settings; `None` when registration is
    /// disabled
    pub fn from_settings(settings: &RegistrySettings, service_port: u16) -> Option<Self> {
        if !settings.enabled {
            return None;
        }

        Some(Self {
            http: reqwest::Client::new(),
            base_url: format!("http://{}:{}", settings.host, settings.port),
            service_name: settings.service_name.clone(),
            service_id: settings.service_id.clone(),
            service_port,
            check_url: format!("http://localhost:{}/health", service_port),
            check_interval: settings.check_interval.clone(),
        })
    }
}

#[async_trait]
impl ServiceRegistry for ConsulRegistry {
    async fn register(&self) -> std::result::Result<(), RegistrationError> {
        let payload = serde_json::json!({
            "Name": self.service_name,
            "ID": self.service_id,
            "Port": self.service_port,
            "Check": {
                "HTTP": self.check_url,
                "Interval": self.check_interval,
            },
        });

        let response = self
            .http
            .put(format!("{}/v1/agent/service/register", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| RegistrationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistrationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Registered service {} with registry", self.service_id);
        Ok(())
    }

    fn service_id(&self) -> String {
        self.service_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> RegistrySettings {
        let address = server.address();
        RegistrySettings {
            enabled: true,
            host: address.ip().to_string(),
            port: address.port(),
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_settings_yield_no_client() {
        let settings = RegistrySettings {
            enabled: false,
            ..Default::default()
        };
        assert!(ConsulRegistry::from_settings(&settings, 8000).is_none());
    }

    #[tokio::test]
    async fn test_register_sends_stable_identity_and_check() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/agent/service/register"))
            .and(body_partial_json(serde_json::json!({
                "Name": "llm-service",
                "ID": "llm-service-1",
                "Port": 8000,
                "Check": {"Interval": "10s"},
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let registry = ConsulRegistry::from_settings(&settings_for(&server), 8000).unwrap();
        registry.register().await.unwrap();
        assert_eq!(registry.service_id(), "llm-service-1");
    }

    #[tokio::test]
    async fn test_repeated_registration_is_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/agent/service/register"))
            .respond_with(ResponseTemplate::new(200))
            .expect(3)
            .mount(&server)
            .await;

        let registry = ConsulRegistry::from_settings(&settings_for(&server), 8000).unwrap();
        for _ in 0..3 {
            registry.register().await.unwrap();
        }

        // Every request carried the same id
        for request in server.received_requests().await.unwrap() {
            let body: serde_json::Value = request.body_json().unwrap();
            assert_eq!(body["ID"], "llm-service-1");
        }
    }

    #[tokio::test]
    async fn test_agent_rejection_maps_to_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/agent/service/register"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad check"))
            .mount(&server)
            .await;

        let registry = ConsulRegistry::from_settings(&settings_for(&server), 8000).unwrap();
        let error = registry.register().await.unwrap_err();

        match error {
            RegistrationError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "bad check");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_agent_maps_to_transport() {
        // A bare (non-pooled) server is required so the socket actually
        // closes on drop.
        let server = MockServer::builder().start().await;
        let settings = settings_for(&server);
        drop(server);

        let registry = ConsulRegistry::from_settings(&settings, 8000).unwrap();
        let error = registry.register().await.unwrap_err();
        assert!(matches!(error, RegistrationError::Transport(_)));
    }
}
