//! Vault endpoint configuration.
//!
//! `EndpointConfig` is the fully resolved connection configuration;
//! `EndpointOverrides` carries the fields a caller wants to change for a single
//! signing relationship. The process-wide base configuration lives in
//! [`defaults`] and is set once at startup.

mod endpoint;
pub use endpoint::*;

mod defaults;
pub use defaults::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointConfigError {
    #[error("Invalid endpoint configuration: {0}")]
    InvalidFormat(String),

    #[error("Invalid value for environment variable {var}: {value}")]
    InvalidEnv { var: String, value: String },

    #[error("Default endpoint configuration already initialized with a different value")]
    AlreadyInitialized,
}
