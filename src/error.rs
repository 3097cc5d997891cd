// SPDX-License-Identifier: MIT

//! Typed error handling for mongo-query-builder
//!
//! `QueryError` carries the full diagnostic for every failure the builder can
//! produce. `Rejected` is the opaque signal handed to callers of the top-level
//! `compile` entry point, which never leaks the underlying detail.

use thiserror::Error;

/// Top-level error type for mongo-query-builder
#[derive(Debug, Error)]
pub enum QueryError {
    /// One of the input dictionaries has no entries
    #[error("No {which} supplied")]
    EmptyInput { which: String },

    /// An expression or condition does not match the recognized grammar
    #[error("Schema violation at '{path}': {reason}")]
    SchemaViolation { path: String, reason: String },

    /// An operator outside the recognized set reached the engine
    #[error("Unknown {kind} operator: '{op}'")]
    UnknownOperator { kind: String, op: String },

    /// A string operand names a condition that is not defined
    #[error("Condition '{0}' is not defined")]
    UnknownCondition(String),

    /// An expression node lacks an operand its operator requires
    #[error("Expression '{op}' is missing its '{slot}' operand")]
    MissingOperand { op: String, slot: String },

    /// A condition flagged `isDate` carries a value that is not a date
    #[error("Invalid date value {value}: {reason}")]
    InvalidDate { value: String, reason: String },

    /// An expression tree is nested deeper than the builder accepts
    #[error("Expression nesting exceeds the maximum depth of {max}")]
    TooDeep { max: usize },

    /// The evaluator's fragment stack did not match the tree it walked
    #[error("Internal evaluation error: {0}")]
    Internal(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Opaque failure returned by [`crate::query::compile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("query definition rejected")]
pub struct Rejected;

impl QueryError {
    /// Create an empty input error
    pub fn empty_input(which: impl Into<String>) -> Self {
        Self::EmptyInput {
            which: which.into(),
        }
    }

    /// Create a schema violation at the given location
    pub fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown operator error
    pub fn unknown_operator(kind: impl Into<String>, op: impl Into<String>) -> Self {
        Self::UnknownOperator {
            kind: kind.into(),
            op: op.into(),
        }
    }

    /// Create an internal evaluation error
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// Create a missing operand error
    pub fn missing_operand(op: impl Into<String>, slot: impl Into<String>) -> Self {
        Self::MissingOperand {
            op: op.into(),
            slot: slot.into(),
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(value: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<QueryError> for Rejected {
    fn from(_: QueryError) -> Self {
        Rejected
    }
}
