//! Operator CLI for RustCare Engine payload validation
//!
//! `rustcare-validate` runs the write-path validator outside the server:
//! against a built-in endpoint schema or a descriptor file, on a payload read
//! from disk or standard input.
//!
//! # Example Usage
//!
//! ```bash
//! # Check a request body against a built-in endpoint schema
//! rustcare-validate check --endpoint supplier --payload supplier.json
//!
//! # Check against a descriptor file, reading the payload from stdin
//! cat body.json | rustcare-validate check --schema prescription.yaml --payload - --compact
//!
//! # Inspect how a descriptor is classified
//! rustcare-validate describe --schema prescription.yaml
//!
//! # List built-in schemas
//! rustcare-validate endpoints
//! ```
//!
//! Exit status is 0 for a valid payload, 1 for a rejected payload (or a
//! descriptor with defects under `describe`), and 2 for operational failures.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::*;
pub use commands::{Outcome, FAILURE_EXIT};
pub use config::CliConfig;
