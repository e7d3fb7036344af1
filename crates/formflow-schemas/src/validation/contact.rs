//! Built-in contact form schema (first name, last name, email)
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::SchemaError;
use crate::validation::form::{Constraint, FieldSpec, FieldValidator, FormSchema};
use serde::{Deserialize, Serialize};

pub const FIRST_REQUIRED: &str = "First name is required";
pub const LAST_REQUIRED: &str = "Last name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email address";

/// Typed record for a validated contact submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub first: String,
    pub last: String,
    pub email: String,
}

/// The contact schema: `first` and `last` are trimmed non-empty strings,
/// `email` must be non-empty and a valid address.
pub fn contact_schema() -> FormSchema {
    let mut schema = FormSchema::new("contact")
        .field(
            FieldSpec::new("first")
                .label("First Name")
                .trimmed()
                .constraint(Constraint::required(FIRST_REQUIRED)),
        )
        .field(
            FieldSpec::new("last")
                .label("Last Name")
                .trimmed()
                .constraint(Constraint::required(LAST_REQUIRED)),
        )
        .field(
            FieldSpec::new("email")
                .label("Email")
                .constraint(Constraint::required(EMAIL_REQUIRED))
                .constraint(Constraint::email(EMAIL_INVALID)),
        );
    schema.description = Some("Contact details: first name, last name and email address".to_string());
    schema
}

/// Build a validator for the contact schema
pub fn contact_validator() -> Result<FieldValidator, SchemaError> {
    FieldValidator::new(contact_schema())
}
