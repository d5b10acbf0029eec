use crate::domain::models::BlockId;
use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("block end {end} must be after start {start}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    #[error("block title must not be empty")]
    EmptyTitle,
    #[error("block color must not be empty")]
    EmptyColor,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("block not found: {0}")]
    NotFound(BlockId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
