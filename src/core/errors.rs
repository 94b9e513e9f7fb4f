use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Clone, Serialize, PartialEq)]
pub enum LedgerError {
    /// Payload failed validation before reaching storage or the gateway
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    /// Local storage rejected the write (quota, IO, corrupt file)
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Queued expense id already present in the write log
    #[error("Queued expense {0} already exists")]
    DuplicateEntry(String),

    /// Remote data gateway refused or could not be reached
    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl LedgerError {
    pub fn invalid(field: &str, description: impl Into<String>) -> Self {
        LedgerError::InvalidInput(
            field.to_string(),
            FieldError::new(field, format!("Invalid {}", field), description),
        )
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(e: std::io::Error) -> Self {
        LedgerError::StorageUnavailable(e.to_string())
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(e: reqwest::Error) -> Self {
        LedgerError::Remote(e.to_string())
    }
}
