//! Structured error types for the conversion pipeline.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Source document errors
    MalformedInput,
    UnknownField,
    InvalidFieldValue,
    TimestampFormat,
    TimestampRange,

    // Graph errors
    DanglingReference,
    RuleTargetNotFound,
    InvalidProject,

    // Internal errors
    IoError,
    DatabaseError,
}

/// Fatal conversion error. Any of these aborts the run before output is written.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("malformed source document: {0}")]
    MalformedInput(String),

    #[error("{group} record {index} has no `{field}` field")]
    UnknownField {
        group: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("{group} record {index}: `{field}` has invalid value {value:?}")]
    InvalidFieldValue {
        group: &'static str,
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("{group} record {index} references unknown {kind} id {id:?}")]
    DanglingReference {
        group: &'static str,
        index: usize,
        kind: &'static str,
        id: String,
    },

    #[error("invalid timestamp {value:?}: {reason}")]
    TimestampFormat { value: String, reason: String },

    #[error("{group} record {index} moves task {task_id:?} outside the representable time range")]
    TimestampRange {
        group: &'static str,
        index: usize,
        task_id: String,
    },

    #[error("rule anchor project {name:?} must match exactly one project, found {found}")]
    RuleTargetNotFound { name: String, found: usize },

    #[error("invalid project: {0}")]
    InvalidProject(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl ConvertError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConvertError::MalformedInput(_) => ErrorCode::MalformedInput,
            ConvertError::UnknownField { .. } => ErrorCode::UnknownField,
            ConvertError::InvalidFieldValue { .. } => ErrorCode::InvalidFieldValue,
            ConvertError::DanglingReference { .. } => ErrorCode::DanglingReference,
            ConvertError::TimestampFormat { .. } => ErrorCode::TimestampFormat,
            ConvertError::TimestampRange { .. } => ErrorCode::TimestampRange,
            ConvertError::RuleTargetNotFound { .. } => ErrorCode::RuleTargetNotFound,
            ConvertError::InvalidProject(_) => ErrorCode::InvalidProject,
            ConvertError::Io(_) => ErrorCode::IoError,
            ConvertError::Database(_) => ErrorCode::DatabaseError,
        }
    }

    // Convenience constructors

    pub fn timestamp(value: &str, reason: impl Into<String>) -> Self {
        ConvertError::TimestampFormat {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn dangling(group: &'static str, index: usize, kind: &'static str, id: &str) -> Self {
        ConvertError::DanglingReference {
            group,
            index,
            kind,
            id: id.to_string(),
        }
    }
}

/// Result type for conversion operations.
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Non-fatal data problem. The affected entity is still written with its
/// computed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// A break whose end precedes its start.
    NegativeBreak {
        task_id: String,
        break_index: usize,
        duration_ms: i64,
    },
    /// A task whose end precedes its start once breaks are subtracted.
    InvertedTask {
        task_id: String,
        start_ms: i64,
        end_ms: i64,
    },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::NegativeBreak {
                task_id,
                break_index,
                duration_ms,
            } => write!(
                f,
                "break {} on task {} has negative duration ({} ms)",
                break_index, task_id, duration_ms
            ),
            DataQualityWarning::InvertedTask {
                task_id,
                start_ms,
                end_ms,
            } => write!(
                f,
                "task {} ends before it starts ({} ms < {} ms)",
                task_id, end_ms, start_ms
            ),
        }
    }
}
