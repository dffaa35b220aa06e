use thiserror::Error;

use super::model::{RecordId, RecordKind};

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordsError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: RecordId },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid username or password")]
    Unauthorized,

    #[error("Internal error")]
    Internal,
}

impl RecordsError {
    pub fn not_found(kind: RecordKind, id: RecordId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
