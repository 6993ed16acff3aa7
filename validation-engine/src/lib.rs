//! Declarative payload validation for RustCare Engine write paths
//!
//! Every create/update flow (appointments, clinics, doctors, patients,
//! prescriptions, invoices, receptionists, suppliers, users) checks its
//! request body against a static schema before anything is persisted. This
//! crate is that check: a schema-driven recursive validator that returns an
//! error tree shaped like the schema, populated only where the payload is
//! wrong.
//!
//! # Key Features
//!
//! - **Closed rule model**: leaf, nested object and array-of-objects rules,
//!   classified once when the schema is built
//! - **Primitive checks**: presence, type, inclusive bounds, regex pattern,
//!   enum membership, email shape; first failure per field wins
//! - **Fail closed**: malformed rules reject their field instead of panicking
//! - **Pure**: no I/O, no shared state, no logging on the validation path
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use validation_engine::{schemas, validate};
//!
//! let payload = json!({
//!     "clinic": "c1",
//!     "name": "Acme",
//!     "address": { "city": "NY", "state": "NY" }
//! });
//!
//! let result = validate(&payload, schemas::supplier());
//! assert!(result.is_error);
//! assert_eq!(result.error.message("phone"), Some("phone is required"));
//! ```
//!
//! Schemas can also be built directly:
//!
//! ```rust
//! use validation_engine::{ArrayRule, LeafRule, Schema, ValueKind};
//!
//! let schema = Schema::new()
//!     .field("patient", LeafRule::new().required())
//!     .field(
//!         "medicines",
//!         ArrayRule::new(
//!             Schema::new()
//!                 .field("mId", LeafRule::new().required())
//!                 .field("qty", LeafRule::new().required().kind(ValueKind::Number).min(1.0)),
//!         ),
//!     );
//! assert_eq!(schema.depth(), 2);
//! ```

pub mod checks;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod report;
pub mod rule;
pub mod schemas;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use report::*;
pub use rule::*;
