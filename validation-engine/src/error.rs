use thiserror::Error;

use crate::report::ErrorTree;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Descriptor root must be a mapping of field names to rules")]
    InvalidRoot,

    #[error("Schema descriptor has {} defect(s): {}", .0.len(), .0.join("; "))]
    Defects(Vec<String>),
}

/// Returned by [`crate::ValidationResult::into_result`] when a payload is rejected
#[derive(Error, Debug)]
#[error("Validation failed: {} field(s) rejected", .error.len())]
pub struct ValidationFailed {
    pub error: ErrorTree,
}

pub type Result<T> = std::result::Result<T, SchemaError>;
