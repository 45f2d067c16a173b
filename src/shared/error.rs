use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
pub enum AppError {
    #[error("Network Error: {0}")]
    Network(String),

    #[error("Translation Unavailable: {reason}")]
    TranslationUnavailable {
        /// Original text the caller should fall back to.
        text: String,
        reason: String,
    },

    #[error("Persistence Error: {0}")]
    Persistence(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Operation cancelled")]
    Cancelled,
}

// Implement conversion from standard errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
