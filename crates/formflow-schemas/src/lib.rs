//! Formflow Schemas - declarative form schemas and the field validator
//!
//! This crate provides the first stage of the submission pipeline: turning a
//! flat key/value form payload into either a validated record or an ordered
//! list of field-addressable issues.
//!
//! ## Features
//!
//! - **Declarative schemas**: fields with `required`, `email`, `min_length`,
//!   `max_length` and `pattern` constraints, written in Rust or loaded from
//!   JSON/YAML files
//! - **Ordered issues**: every failing constraint is reported, fields in
//!   declaration order, constraints in declaration order
//! - **Typed records**: decode a validated record into your own struct
//!
//! ## Quick Start
//!
//! ```rust
//! use formflow_schemas::{contact_validator, RawSubmission, SchemaValidator};
//!
//! let validator = contact_validator().unwrap();
//! let raw = RawSubmission::new()
//!     .with("first", "")
//!     .with("last", "Doe")
//!     .with("email", "doe@example.com");
//!
//! match validator.validate(&raw) {
//!     Ok(record) => println!("valid: {:?}", record),
//!     Err(issues) => println!("{}", issues),
//! }
//! ```
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

pub mod loader;
pub mod record;
pub mod validation;

// Re-export commonly used types for convenience
pub use loader::{LoaderError, LoaderResult, SchemaFormat, SchemaLoader};
pub use record::{RawSubmission, ValidatedRecord};
pub use validation::{
    contact_schema, contact_validator, validate_batch, Constraint, ContactRecord, FieldSpec,
    FieldValidator, FormSchema, Issue, IssueCode, Issues, PathSegment, SchemaError,
    SchemaValidator, ValidationContext, ValidationHelpers, ValidationResult,
};
