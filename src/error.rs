//! Error types and handling for Gridtariff
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Gridtariff operations
pub type Result<T> = std::result::Result<T, GridTariffError>;

/// Main error type for Gridtariff
#[derive(Debug, Error)]
pub enum GridTariffError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Network/DNS transport failures while reaching a feed
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Bounded wait exceeded while fetching a feed
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// Malformed XML in a feed response
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// No feed row matches the configured company
    #[error("Company not found: {company}")]
    NotFound { company: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl GridTariffError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        GridTariffError::Config {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        GridTariffError::Transport {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        GridTariffError::Timeout {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        GridTariffError::Parse {
            message: message.into(),
        }
    }

    /// Create a new not-found error for a company display name
    pub fn not_found<S: Into<String>>(company: S) -> Self {
        GridTariffError::NotFound {
            company: company.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        GridTariffError::Io {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        GridTariffError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        GridTariffError::Generic {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for GridTariffError {
    fn from(err: std::io::Error) -> Self {
        GridTariffError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for GridTariffError {
    fn from(err: serde_yaml::Error) -> Self {
        GridTariffError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GridTariffError {
    fn from(err: serde_json::Error) -> Self {
        GridTariffError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for GridTariffError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GridTariffError::timeout(err.to_string())
        } else {
            GridTariffError::transport(err.to_string())
        }
    }
}

impl From<quick_xml::Error> for GridTariffError {
    fn from(err: quick_xml::Error) -> Self {
        GridTariffError::parse(err.to_string())
    }
}

impl From<chrono::ParseError> for GridTariffError {
    fn from(err: chrono::ParseError) -> Self {
        GridTariffError::validation("datetime", &err.to_string())
    }
}
