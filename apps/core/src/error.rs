use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a
/// single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors originating from the database, typically from `sqlx`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors talking to an upstream HTTP service (Google Sheets).
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Data validation errors (e.g. invalid webhook payload).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors (e.g. missing environment variables).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Validation(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Validation(format!("Date parse error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(format!("HTTP error: {}", err))
    }
}
