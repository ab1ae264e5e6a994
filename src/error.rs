//! Error types and handling for Börsihind
//!
//! The pricing core raises three kinds of errors (`InvalidConfiguration`,
//! `MissingTariffData`, `InvalidObservation`); the remaining variants belong to
//! the adapters around it (configuration files, feed documents, output files).

use thiserror::Error;

/// Result type alias for Börsihind operations
pub type Result<T> = std::result::Result<T, BorsihindError>;

/// Main error type for Börsihind
#[derive(Debug, Error)]
pub enum BorsihindError {
    /// Unknown timezone, unknown plan identifier, malformed tariff data
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// No effective-dated table covers the requested date
    #[error("Missing tariff data: {message}")]
    MissingTariffData { message: String },

    /// Non-finite or otherwise unusable price observation
    #[error("Invalid observation: {message}")]
    InvalidObservation { message: String },

    /// Configuration file and logging setup errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Feed document could not be decoded
    #[error("Feed error: {message}")]
    Feed { message: String },

    /// Background task failures
    #[error("Task error: {message}")]
    Task { message: String },
}

impl BorsihindError {
    /// Create a new invalid configuration error
    pub fn invalid_configuration<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a new missing tariff data error
    pub fn missing_tariff_data<S: Into<String>>(message: S) -> Self {
        Self::MissingTariffData {
            message: message.into(),
        }
    }

    /// Create a new invalid observation error
    pub fn invalid_observation<S: Into<String>>(message: S) -> Self {
        Self::InvalidObservation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a new feed error
    pub fn feed<S: Into<String>>(message: S) -> Self {
        Self::Feed {
            message: message.into(),
        }
    }

    /// Create a new task error
    pub fn task<S: Into<String>>(message: S) -> Self {
        Self::Task {
            message: message.into(),
        }
    }

    /// Whether this error originates in the pricing core rather than an adapter
    pub fn is_core(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration { .. }
                | Self::MissingTariffData { .. }
                | Self::InvalidObservation { .. }
        )
    }
}

impl From<std::io::Error> for BorsihindError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for BorsihindError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BorsihindError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<chrono::ParseError> for BorsihindError {
    fn from(err: chrono::ParseError) -> Self {
        Self::validation("datetime", err.to_string())
    }
}

impl From<tokio::task::JoinError> for BorsihindError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::task(err.to_string())
    }
}
