//! Error types and handling for Strompris
//!
//! This module defines the error types used throughout the price pipeline,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Strompris operations
pub type Result<T> = std::result::Result<T, StromprisError>;

/// Main error type for Strompris
#[derive(Debug, Error)]
pub enum StromprisError {
    /// Network, TLS or HTTP level failures while talking to the price feed
    #[error("Fetch error: {message}")]
    Fetch { message: String },

    /// Payload shape, field or parse failures
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// The retry budget for the price feed ran out
    #[error("Fetch failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl StromprisError {
    /// Create a new fetch error
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        StromprisError::Fetch {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>, M: Into<String>>(field: S, message: M) -> Self {
        StromprisError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new retries-exhausted error
    pub fn retries_exhausted<S: Into<String>>(attempts: u32, message: S) -> Self {
        StromprisError::RetriesExhausted {
            attempts,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        StromprisError::Config {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        StromprisError::Io {
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        StromprisError::Serialization {
            message: message.into(),
        }
    }

    /// Process exit status the binary reports for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            StromprisError::RetriesExhausted { .. } => 2,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for StromprisError {
    fn from(err: std::io::Error) -> Self {
        StromprisError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for StromprisError {
    fn from(err: serde_yaml::Error) -> Self {
        StromprisError::serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StromprisError {
    fn from(err: serde_json::Error) -> Self {
        StromprisError::serialization(err.to_string())
    }
}

impl From<csv::Error> for StromprisError {
    fn from(err: csv::Error) -> Self {
        StromprisError::serialization(err.to_string())
    }
}

impl From<reqwest::Error> for StromprisError {
    fn from(err: reqwest::Error) -> Self {
        StromprisError::fetch(err.to_string())
    }
}

impl From<chrono::ParseError> for StromprisError {
    fn from(err: chrono::ParseError) -> Self {
        StromprisError::validation("datetime", err.to_string())
    }
}
