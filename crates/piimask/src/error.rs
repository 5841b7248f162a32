//! Error types for piimask.
//!
//! Masking itself never fails; these errors come from the configuration,
//! classification, batch streaming and command-line layers around it.

use thiserror::Error;

/// The main error type for piimask operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// Input exceeds the configured size limit.
    #[error("input is {len} bytes, limit is {limit} bytes")]
    InputTooLarge {
        /// Size of the rejected input in bytes.
        len: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// One line of a batch exceeds the configured size limit.
    #[error("line {line} is {len} bytes, limit is {limit} bytes")]
    LineTooLarge {
        /// 1-based line number.
        line: usize,
        /// Size of the rejected line in bytes.
        len: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// A category name did not match any known category.
    #[error("unknown PII category: {0}")]
    UnknownCategory(String),

    // === Classification Errors ===
    /// The classifier failed to label the masked text.
    #[error("classification failed: {message}")]
    Classification {
        /// Description of what went wrong.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for piimask operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new classification error.
    #[must_use]
    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification {
            message: message.into(),
        }
    }

    /// Create a new configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error is an oversized input or line rejection.
    #[must_use]
    pub fn is_input_too_large(&self) -> bool {
        matches!(self, Self::InputTooLarge { .. } | Self::LineTooLarge { .. })
    }
}
