use thiserror::Error;

/// Why a single input line was dropped.
/// Always recoverable: the pipeline counts it and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("Date '{value}' is not an integer")]
    InvalidDate { value: String },

    #[error("Date '{value}' is not a calendar day (YYYYMMDD)")]
    InvalidCalendarDate { value: String },

    #[error("User id is empty")]
    EmptyUserId,

    #[error("Flag '{value}' is not an integer")]
    InvalidFlag { value: String },

    #[error("Line is not valid UTF-8")]
    InvalidEncoding,
}

#[derive(Error, Debug)]
pub enum RetentionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config '{path}': {reason}")]
    Config { path: String, reason: String },
}

pub type RetentionResult<T> = Result<T, RetentionError>;
