//! External service clients

pub mod registry;

pub use registry::{ConsulRegistry, RegistrationError, ServiceRegistry};
