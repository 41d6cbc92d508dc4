//! Error types for pgstmt

use crate::rules::ValidationErrors;
use thiserror::Error;

/// Result type alias for pgstmt operations
pub type StmtResult<T> = Result<T, StmtError>;

/// Error types for statement assembly
#[derive(Debug, Error)]
pub enum StmtError {
    /// Required piece of the statement is missing or empty
    #[error("Malformed statement: {field}: {reason}")]
    MalformedStatement { field: &'static str, reason: String },

    /// Identifier failed validation
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A binding was read before any value was registered
    #[error("No binding has been registered yet")]
    MissingBinding,

    /// UPDATE without WHERE rejected by policy
    #[error("Unconditional UPDATE of table {table} rejected by policy")]
    UnconditionalUpdate { table: String },

    /// Operator outside the configured allowlist
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Payload failed upstream validation rules
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),
}

impl StmtError {
    /// Create a malformed statement error for a specific field
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedStatement {
            field,
            reason: reason.into(),
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    /// Check if this is a malformed statement error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedStatement { .. })
    }

    /// Name of the missing field for malformed statement errors
    pub fn malformed_field(&self) -> Option<&'static str> {
        match self {
            Self::MalformedStatement { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StmtError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ValidationErrors> for StmtError {
    fn from(errs: ValidationErrors) -> Self {
        Self::Validation(errs)
    }
}
