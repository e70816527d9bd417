//! Error types for SMP response decoding
//!
//! `DecodeError` covers everything that can be wrong with a single response
//! payload. `Error` is the crate-wide type returned by the public API and
//! wraps decode failures alongside configuration, verification and I/O errors.

use crate::decode::{DeviceStatus, ReturnCode};
use thiserror::Error;

/// Failure to turn one response envelope into a typed response
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Malformed field: {0}")]
    MalformedField(&'static str),

    #[error("Response payload is not a CBOR map")]
    NotAMap,

    #[error("Invalid CBOR payload: {message}")]
    Cbor { message: String },

    #[error("Device returned error status: {0}")]
    Device(DeviceStatus),
}

impl DecodeError {
    /// Name of the offending field, if the error is tied to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DecodeError::MissingField(name) | DecodeError::MalformedField(name) => Some(*name),
            _ => None,
        }
    }

    /// Whether the device reported that the target file does not exist
    pub fn is_no_entry(&self) -> bool {
        matches!(self, DecodeError::Device(status) if status.is_no_entry())
    }
}

/// The main error type for smp-decode
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Decode Errors
    // ============================================================================
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Opaque error from the transport that delivered the envelope
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // Verification Errors
    // ============================================================================
    #[error("Verification failed: {message}")]
    Verification { message: String },

    #[error("{algorithm} mismatch: device reported {expected}, computed {actual}")]
    IntegrityMismatch {
        algorithm: String,
        expected: String,
        actual: String,
    },

    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("Invalid input encoding: {message}")]
    InputEncoding { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a verification error
    pub fn verification(message: impl Into<String>) -> Self {
        Self::Verification {
            message: message.into(),
        }
    }

    /// Create an input encoding error
    pub fn input_encoding(message: impl Into<String>) -> Self {
        Self::InputEncoding {
            message: message.into(),
        }
    }

    /// Wrap a transport error without inspecting it
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }

    /// Check whether re-issuing the request that produced this error may help
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Decode(DecodeError::Device(status)) => is_retryable_status(status),
            _ => false,
        }
    }
}

/// Device statuses that describe a transient condition
fn is_retryable_status(status: &DeviceStatus) -> bool {
    matches!(
        status,
        DeviceStatus::Legacy(ReturnCode::Busy | ReturnCode::Timeout | ReturnCode::NoMemory)
    )
}

/// Result type alias for smp-decode
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(DecodeError::MissingField("off"));
        assert_eq!(err.to_string(), "Missing required field: off");

        let err = Error::from(DecodeError::MalformedField("output"));
        assert_eq!(err.to_string(), "Malformed field: output");

        let err = Error::config("bad width");
        assert_eq!(err.to_string(), "Configuration error: bad width");

        let err = Error::IntegrityMismatch {
            algorithm: "sha256".to_string(),
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "sha256 mismatch: device reported aa, computed bb"
        );
    }

    #[test]
    fn test_decode_error_field() {
        assert_eq!(DecodeError::MissingField("len").field(), Some("len"));
        assert_eq!(DecodeError::MalformedField("type").field(), Some("type"));
        assert_eq!(DecodeError::NotAMap.field(), None);
    }

    #[test]
    fn test_is_retryable() {
        let busy = DecodeError::Device(DeviceStatus::Legacy(ReturnCode::Busy));
        assert!(Error::from(busy).is_retryable());

        let timeout = DecodeError::Device(DeviceStatus::Legacy(ReturnCode::Timeout));
        assert!(Error::from(timeout).is_retryable());

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "link lost");
        assert!(Error::transport(io).is_retryable());

        assert!(!Error::from(DecodeError::MalformedField("output")).is_retryable());
        assert!(!Error::from(DecodeError::Device(DeviceStatus::Legacy(ReturnCode::NoEntry)))
            .is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
