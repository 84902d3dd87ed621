//! Error types for QuantumSynth
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is [`QuantumSynthError`]. The HTTP layer maps variants onto status codes;
//! see [`QuantumSynthError::is_client_error`].

use thiserror::Error;

/// Result type alias for QuantumSynth operations
pub type Result<T> = std::result::Result<T, QuantumSynthError>;

/// Error type for all QuantumSynth operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuantumSynthError {
    /// A required field was empty or missing, or a value was out of range
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument
        reason: String,
    },

    /// Unexpected failure while synthesizing a result
    #[error("Internal failure: {reason}")]
    InternalFailure {
        /// Failure description
        reason: String,
    },

    /// Too many dispatches in flight
    #[error("Capacity exceeded: at most {limit} concurrent jobs")]
    CapacityExceeded {
        /// Configured concurrency limit
        limit: usize,
    },

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error description
        message: String,
    },

    /// I/O failure outside of request handling (binding, reading files)
    #[error("I/O error: {message}")]
    IoError {
        /// Error description
        message: String,
    },
}

impl QuantumSynthError {
    /// Shorthand for [`QuantumSynthError::InvalidArgument`]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`QuantumSynthError::InternalFailure`]
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::InternalFailure {
            reason: reason.into(),
        }
    }

    /// Whether the caller is at fault (maps to HTTP 400)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

impl From<std::io::Error> for QuantumSynthError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
        }
    }
}
