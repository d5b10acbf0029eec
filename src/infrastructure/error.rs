use crate::domain::error::{ScheduleError, ValidationError};
use crate::domain::models::BlockId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("block not found: {0}")]
    BlockNotFound(BlockId),
    #[error("runtime state lock poisoned: {0}")]
    StatePoisoned(String),
}

impl From<ScheduleError> for InfraError {
    fn from(error: ScheduleError) -> Self {
        match error {
            ScheduleError::NotFound(id) => Self::BlockNotFound(id),
            ScheduleError::Validation(error) => Self::Validation(error),
        }
    }
}
