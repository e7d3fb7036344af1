//! Validation module: declarative form schemas and the field validator
//!
//! The validator turns a flat [`RawSubmission`](crate::RawSubmission) into
//! either a [`ValidatedRecord`](crate::ValidatedRecord) or an ordered list of
//! path-qualified [`Issue`]s. Issue order is significant: it decides which
//! message is shown when a field fails more than one constraint.
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod contact;
pub mod error;
pub mod form;

// Re-export commonly used types
pub use base::{SchemaValidator, ValidationContext, ValidationHelpers};
pub use contact::{contact_schema, contact_validator, ContactRecord};
pub use error::{Issue, IssueCode, Issues, PathSegment, SchemaError, ValidationResult};
pub use form::{Constraint, FieldSpec, FieldValidator, FormSchema};

/// Validate many submissions with one validator, pairing each input index
/// with its outcome
pub fn validate_batch<V: SchemaValidator>(
    validator: &V,
    submissions: &[crate::RawSubmission],
) -> Vec<(usize, ValidationResult<crate::ValidatedRecord>)> {
    submissions
        .iter()
        .enumerate()
        .map(|(i, raw)| (i, validator.validate(raw)))
        .collect()
}
