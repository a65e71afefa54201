//! Error types for the scandock crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for all scandock crates.
///
/// Provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ScandockError {
    /// Transient transport failure (network error, backing service timeout).
    ///
    /// The failed operation is not retried; the next poll or append attempt
    /// proceeds independently.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Missing or malformed session id. Terminal for the client that sent it.
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// Capture-device failure reported by a producer client
    /// (permission denied, device busy, no camera).
    #[error("Capture device error: {0}")]
    CaptureDevice(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScandockError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an InvalidSession error
    pub fn invalid_session(message: impl Into<String>) -> Self {
        Self::InvalidSession(message.into())
    }

    /// Creates a CaptureDevice error
    pub fn capture_device(message: impl Into<String>) -> Self {
        Self::CaptureDevice(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error is transient.
    ///
    /// Transient errors fail the individual operation only; callers are
    /// expected to carry on with their next poll or append attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Io { .. })
    }

    /// Check if this is an InvalidSession error
    pub fn is_invalid_session(&self) -> bool {
        matches!(self, Self::InvalidSession(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ScandockError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ScandockError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ScandockError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error for infrastructure boundaries
impl From<anyhow::Error> for ScandockError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<String> for ScandockError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, ScandockError>`.
pub type Result<T> = std::result::Result<T, ScandockError>;
