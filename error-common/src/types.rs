use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codes::validation;

/// Category of a single field-level validation failure
///
/// Every violation the validation engine reports falls into exactly one of
/// these categories. The category never changes the shape of the error body
/// sent to clients (that is always a message string at the field's position),
/// but it drives the stable error code and lets callers count or filter
/// failures without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Field is absent, null or blank but the rule requires it
    MissingRequired,
    /// Value has a different runtime kind than the rule declares
    TypeMismatch,
    /// Number, string length or item count outside `min`/`max`
    OutOfRange,
    /// Value does not match the rule's regular expression
    PatternMismatch,
    /// Value is not one of the enumerated options
    EnumViolation,
    /// Value is not shaped like an email address
    InvalidEmailShape,
    /// Expected a mapping or sequence and got something else
    StructuralMismatch,
    /// The rule itself is malformed; the field fails closed
    SchemaDefect,
}

impl ViolationKind {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::MissingRequired => validation::MISSING_REQUIRED_FIELD,
            ViolationKind::TypeMismatch => validation::TYPE_MISMATCH,
            ViolationKind::OutOfRange => validation::OUT_OF_RANGE,
            ViolationKind::PatternMismatch => validation::INVALID_FORMAT,
            ViolationKind::EnumViolation => validation::VALUE_NOT_ALLOWED,
            ViolationKind::InvalidEmailShape => validation::INVALID_EMAIL,
            ViolationKind::StructuralMismatch => validation::STRUCTURE_MISMATCH,
            ViolationKind::SchemaDefect => validation::SCHEMA_DEFECT,
        }
    }

    /// True when the failure is caused by the schema rather than the client input
    pub fn is_server_side(&self) -> bool {
        matches!(self, ViolationKind::SchemaDefect)
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::MissingRequired => "missing_required",
            ViolationKind::TypeMismatch => "type_mismatch",
            ViolationKind::OutOfRange => "out_of_range",
            ViolationKind::PatternMismatch => "pattern_mismatch",
            ViolationKind::EnumViolation => "enum_violation",
            ViolationKind::InvalidEmailShape => "invalid_email_shape",
            ViolationKind::StructuralMismatch => "structural_mismatch",
            ViolationKind::SchemaDefect => "schema_defect",
        };
        f.write_str(name)
    }
}

/// One violation flattened out of an error tree, addressed by its field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Dotted path with list indices, e.g. `address.city` or `medicines[0].qty`
    pub path: String,
    pub kind: ViolationKind,
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            code: kind.code().to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.path, self.code, self.message)
    }
}
