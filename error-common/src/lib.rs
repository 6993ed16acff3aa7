//! Common error handling utilities for RustCare Engine
//!
//! This module provides the validation error taxonomy and the standardized
//! error codes shared by every write-path module. Request handlers, the
//! validation engine and reporting tools all speak the same vocabulary, so a
//! code seen in an API response can be traced back to a single category.
//!
//! # Error Categories
//!
//! - **MissingRequired**: required field absent or blank
//! - **TypeMismatch**: wrong runtime kind (string/number/boolean)
//! - **OutOfRange**: numeric, length or item-count bounds violated
//! - **PatternMismatch**: regular expression did not match
//! - **EnumViolation**: value outside the allowed set
//! - **InvalidEmailShape**: not shaped like `local@domain.tld`
//! - **StructuralMismatch**: expected a mapping or sequence
//! - **SchemaDefect**: malformed rule, reported instead of crashing
//!
//! # Example
//!
//! ```rust
//! use error_common::{FieldViolation, ViolationKind};
//!
//! let violation = FieldViolation::new("phone", ViolationKind::PatternMismatch, "phone has an invalid format");
//! assert_eq!(violation.code, "VALIDATION_1003");
//! ```

pub mod codes;
pub mod types;

pub use codes::*;
pub use types::*;
