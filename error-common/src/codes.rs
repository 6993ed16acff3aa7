// Error codes implementation
// This module contains standardized error codes for the RustCare Engine

pub mod validation {
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
    pub const TYPE_MISMATCH: &str = "VALIDATION_1004";
    pub const OUT_OF_RANGE: &str = "VALIDATION_1005";
    pub const VALUE_NOT_ALLOWED: &str = "VALIDATION_1006";
    pub const INVALID_EMAIL: &str = "VALIDATION_1007";
    pub const STRUCTURE_MISMATCH: &str = "VALIDATION_1008";
    pub const SCHEMA_DEFECT: &str = "VALIDATION_1009";
}
