//! Domain-level error types for sc2-quotes.
//!
//! All errors are typed with `thiserror` and carry enough context to be shown
//! to the user as a transient message without leaking transport details.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// User input rejected before any side effect (empty name, empty selection).
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The backend could not be reached or the transfer broke off.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The backend answered with a non-2xx status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The same action is already in flight.
    #[error("{action} is already in progress")]
    Busy { action: &'static str },

    /// The default list cannot be deleted.
    #[error("List '{id}' cannot be deleted")]
    ProtectedList { id: String },

    /// No setup list with the given id.
    #[error("Setup list not found: {id}")]
    ListNotFound { id: String },

    /// Failed to open or query the setup database.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid or corrupted data in an input file.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input file not found.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a database error from rusqlite error.
    pub fn database(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a network error from a reqwest error.
    pub fn network(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Message suitable for a result banner.
    ///
    /// Server errors surface the backend's own message, transport and decode
    /// failures their own description; everything else falls back to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server { message, .. }
            | Self::Network { message, .. }
            | Self::JsonParse { message, .. }
                if !message.is_empty() =>
            {
                message.clone()
            }
            Self::Validation { message } => message.clone(),
            Self::Busy { .. } => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
