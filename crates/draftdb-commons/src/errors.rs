//! Shared error types for DraftDB.
//!
//! This module provides common error types that can be used across all
//! DraftDB crates without introducing external dependencies.

use std::fmt;

/// Common error type for DraftDB operations.
///
/// This enum provides basic error variants that can be shared across all
/// crates without requiring external dependencies.
#[derive(Debug, Clone)]
pub enum CommonError {
    /// Invalid input provided to a function
    InvalidInput(String),

    /// Resource not found (app, table, row, session, etc.)
    NotFound(String),

    /// Configuration error
    ConfigurationError(String),

    /// Internal error (unexpected state)
    Internal(String),
}

impl CommonError {
    /// Creates an InvalidInput error with a message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a NotFound error with a message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates a ConfigurationError with a message.
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Creates an Internal error with a message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommonError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CommonError::NotFound(msg) => write!(f, "Not found: {}", msg),
            CommonError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            CommonError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for CommonError {}

/// Result type alias using CommonError.
pub type Result<T> = std::result::Result<T, CommonError>;
