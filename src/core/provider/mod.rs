//! Upstream provider adapter
//!
//! One generation call against the remote model provider, translated into a
//! normalized result. No retry logic lives here; the executor in
//! [`crate::core::retry`] wraps this adapter.

pub mod groq;

pub use groq::GroqClient;

use crate::core::generation::GenerationResult;
use async_trait::async_trait;
use thiserror::Error;

/// Faults raised by a single upstream attempt
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Network-level failure before a response arrived
    #[error("network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("provider returned status {status}: {body}")]
    Api {
        /// HTTP status code from the provider
        status: u16,
        /// Raw response body, best effort
        body: String,
    },

    /// Response body could not be decoded
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// Response decoded but carried no choices
    #[error("provider response contained no choices")]
    NoChoices,
}

/// A client able to perform one chat-style completion call.
///
/// The handler holds this behind `Option<Arc<dyn CompletionClient>>`: `None`
/// means the client failed to initialize at startup and every request must
/// be rejected before any network I/O.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Perform a single generation attempt
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> std::result::Result<GenerationResult, UpstreamError>;
}
