//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid call timeout (expected 1-300 seconds)")]
    InvalidTimeout,

    #[error("Invalid poll timeout (expected 1-50 seconds)")]
    InvalidPollTimeout,

    #[error("Invalid session idle period")]
    InvalidIdlePeriod,

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Unknown timezone {0:?}")]
    InvalidTimezone(String),

    #[error("Invalid OCR engine {0} (expected 1, 2 or 3)")]
    InvalidOcrEngine(u8),

    #[error("Invalid authorized user id {0:?}")]
    InvalidActorId(String),

    #[error("No authorized users configured")]
    EmptyAccessList,
}
