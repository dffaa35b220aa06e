use thiserror::Error;

use crate::contract::model::{RecordId, RecordKind};

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: RecordId },

    #[error("Invalid username or password")]
    Authentication,

    #[error("Database error: {message}")]
    Store { message: String },
}

impl DomainError {
    pub fn missing_fields(missing: Vec<&'static str>) -> Self {
        Self::Validation { missing }
    }

    pub fn user_not_found(id: RecordId) -> Self {
        Self::NotFound {
            kind: RecordKind::User,
            id,
        }
    }

    pub fn sched_not_found(id: RecordId) -> Self {
        Self::NotFound {
            kind: RecordKind::Sched,
            id,
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for DomainError {
    fn from(e: anyhow::Error) -> Self {
        // `{:#}` keeps the repository context chain on one line
        Self::store(format!("{e:#}"))
    }
}
