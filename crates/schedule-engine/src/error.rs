//! Error types for schedule-engine boundary operations.
//!
//! Expansion and layout are total and never return these; they surface only
//! where raw input is validated (grid configuration, strict date parsing,
//! JSON task lists).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid grid configuration: {0}")]
    InvalidGrid(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
