//! Core domain logic: the resilient generation pipeline
//!
//! Dependency order, leaves first: `provider` (one upstream call),
//! `retry` (bounded backoff around any fallible operation),
//! `generation` (the instrumented request lifecycle),
//! `health` (composite subsystem status).

pub mod generation;
pub mod health;
pub mod provider;
pub mod retry;
