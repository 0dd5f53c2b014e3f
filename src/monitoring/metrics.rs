//! Prometheus metrics for the generation pipeline
//!
//! One owned registry object per process, injected into the handler at
//! construction. Counters are atomic, so increments from concurrent
//! requests need no extra locking.

use crate::utils::error::{GatewayError, Result};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::time::Duration;

/// Owned metrics registry: request/error counters plus a histogram of
/// per-request generation seconds
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    request_count: IntCounter,
    error_count: IntCounter,
    generation_time: Histogram,
}

impl MetricsRegistry {
    /// Create and register all gateway metrics
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let request_count = IntCounter::new("request_count", "Total number of requests")
            .map_err(|e| GatewayError::Metrics(e.to_string()))?;
        let error_count = IntCounter::new("error_count", "Total number of errors")
            .map_err(|e| GatewayError::Metrics(e.to_string()))?;
        let generation_time = Histogram::with_opts(HistogramOpts::new(
            "generation_time_seconds",
            "Time spent generating text",
        ))
        .map_err(|e| GatewayError::Metrics(e.to_string()))?;

        for collector in [
            Box::new(request_count.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(error_count.clone()),
            Box::new(generation_time.clone()),
        ] {
            registry
                .register(collector)
                .map_err(|e| GatewayError::Metrics(e.to_string()))?;
        }

        Ok(Self {
            registry,
            request_count,
            error_count,
            generation_time,
        })
    }

    /// Count one accepted generation request
    pub fn inc_requests(&self) {
        self.request_count.inc();
    }

    /// Count one failed generation attempt
    pub fn inc_errors(&self) {
        self.error_count.inc();
    }

    /// Record the wrapped duration of one generation call, backoff included
    pub fn observe_generation(&self, elapsed: Duration) {
        self.generation_time.observe(elapsed.as_secs_f64());
    }

    /// Current request counter value
    pub fn request_total(&self) -> u64 {
        self.request_count.get()
    }

    /// Current error counter value
    pub fn error_total(&self) -> u64 {
        self.error_count.get()
    }

    /// Number of recorded generation durations
    pub fn generation_samples(&self) -> u64 {
        self.generation_time.get_sample_count()
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| GatewayError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| GatewayError::Metrics(e.to_string()))
    }
}
