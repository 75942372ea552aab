//! Error types for the webhook
//!
//! Errors are structured with fields to aid debugging in production. Each
//! variant carries the context a denial message needs, such as the name of
//! the container that could not be mutated.

use thiserror::Error;

/// Result type for webhook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for webhook operations
#[derive(Debug, Error)]
pub enum Error {
    /// The raw admission object could not be decoded as a Pod
    #[error("could not deserialize pod object: {message}")]
    Decode {
        /// Description of what failed to parse
        message: String,
    },

    /// A mutation target was found but no usable probe could be built for it
    #[error("cannot build readiness probe for container '{container}': {message}")]
    Synthesis {
        /// Name of the container that matched the marker env var
        container: String,
        /// Description of what made the container unusable
        message: String,
    },

    /// Serializing a Pod for diffing failed
    #[error("patch computation error: {message}")]
    PatchComputation {
        /// Description of what failed
        message: String,
    },

    /// Configuration error (TLS material, listen address)
    #[error("configuration error: {message}")]
    Config {
        /// Description of what is misconfigured
        message: String,
    },

    /// HTTP server error
    #[error("server error: {message}")]
    Server {
        /// Description of what failed
        message: String,
    },
}

impl Error {
    /// Create a decode error with the given message
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    /// Create a synthesis error for a specific container
    pub fn synthesis_for(container: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Synthesis {
            container: container.into(),
            message: msg.into(),
        }
    }

    /// Create a patch computation error with the given message
    pub fn patch_computation(msg: impl Into<String>) -> Self {
        Self::PatchComputation {
            message: msg.into(),
        }
    }

    /// Create a configuration error with the given message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a server error with the given message
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server {
            message: msg.into(),
        }
    }

    /// Get the container name if this error is associated with a specific container
    pub fn container(&self) -> Option<&str> {
        match self {
            Error::Synthesis { container, .. } => Some(container),
            _ => None,
        }
    }

    /// Whether this error belongs to the mutation pipeline (as opposed to
    /// process configuration or the HTTP listener)
    pub fn is_mutation_error(&self) -> bool {
        matches!(
            self,
            Error::Decode { .. } | Error::Synthesis { .. } | Error::PatchComputation { .. }
        )
    }
}
