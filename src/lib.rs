// This file allows the components to be used as a library as well
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod rsa_service;

// Re-export important types for easier use
pub use config::{Config, ConfigError};
pub use error::RsaError;
pub use models::{KeyMode, Operation, OperationResult};
pub use orchestrator::RsaOrchestrator;
pub use rsa_service::{CryptoError, CryptoProvider, OpenSslProvider};
