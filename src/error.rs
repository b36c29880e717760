use std::sync::PoisonError;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillError {
    /// Bad user input: amount, name, month, category.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The vault could not be read or written.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl BillError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillError::Validation(message.into())
    }

    pub fn not_found(id: &str) -> Self {
        BillError::NotFound(format!("No bill with id {}", id))
    }
}

impl From<std::io::Error> for BillError {
    fn from(err: std::io::Error) -> Self {
        BillError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BillError {
    fn from(err: serde_json::Error) -> Self {
        BillError::Storage(err.to_string())
    }
}

impl<T> From<PoisonError<T>> for BillError {
    fn from(_: PoisonError<T>) -> Self {
        BillError::Storage("The bill store lock was poisoned".to_string())
    }
}
