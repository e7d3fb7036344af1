//! Declarative form schemas and the field validator built from them
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use crate::record::{RawSubmission, ValidatedRecord};
use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::{Issue, IssueCode, Issues, SchemaError, ValidationResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Message used for a missing field when no `required` message is declared
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Required";
pub const DEFAULT_EMAIL_MESSAGE: &str = "Invalid email address";

/// A per-field constraint, evaluated in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Value must be non-empty
    Required {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Value must be a syntactically valid email address
    Email {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MinLength {
        min: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Value must match the regular expression
    Pattern {
        regex: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl Constraint {
    pub fn required(message: impl Into<String>) -> Self {
        Self::Required {
            message: Some(message.into()),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::Email {
            message: Some(message.into()),
        }
    }

    pub fn min_length(min: usize) -> Self {
        Self::MinLength { min, message: None }
    }

    pub fn max_length(max: usize) -> Self {
        Self::MaxLength { max, message: None }
    }

    pub fn pattern(regex: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            regex: regex.into(),
            message: Some(message.into()),
        }
    }

    fn code(&self) -> IssueCode {
        match self {
            Self::Required { .. } => IssueCode::Required,
            Self::Email { .. } => IssueCode::Email,
            Self::MinLength { .. } => IssueCode::TooShort,
            Self::MaxLength { .. } => IssueCode::TooLong,
            Self::Pattern { .. } => IssueCode::Pattern,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Required { message } => message
                .clone()
                .unwrap_or_else(|| DEFAULT_REQUIRED_MESSAGE.to_string()),
            Self::Email { message } => message
                .clone()
                .unwrap_or_else(|| DEFAULT_EMAIL_MESSAGE.to_string()),
            Self::MinLength { min, message } => message
                .clone()
                .unwrap_or_else(|| format!("Must contain at least {} character(s)", min)),
            Self::MaxLength { max, message } => message
                .clone()
                .unwrap_or_else(|| format!("Must contain at most {} character(s)", max)),
            Self::Pattern { regex, message } => message
                .clone()
                .unwrap_or_else(|| format!("Must match pattern {}", regex)),
        }
    }
}

/// Declaration of one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Trim surrounding whitespace before checking and storing the value
    #[serde(default)]
    pub trim: bool,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            trim: false,
            constraints: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn trimmed(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Message for a missing value: the `required` message if declared
    fn missing_message(&self) -> String {
        self.constraints
            .iter()
            .find(|c| matches!(c, Constraint::Required { .. }))
            .map(Constraint::message)
            .unwrap_or_else(|| DEFAULT_REQUIRED_MESSAGE.to_string())
    }
}

/// A named, ordered set of field declarations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug)]
struct CompiledField {
    /// Compiled regexes, index-aligned with the field's constraints
    patterns: Vec<Option<Regex>>,
}

/// Field validator built from a checked [`FormSchema`].
///
/// Every declared field is checked and every failing constraint reports an
/// issue, so issue order is: fields in declaration order, then constraints
/// in declaration order. A field absent from the submission reports a single
/// `required` issue. Keys the schema does not declare are ignored.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    schema: Arc<FormSchema>,
    compiled: Arc<Vec<CompiledField>>,
}

impl FieldValidator {
    /// Check the schema and compile its patterns
    pub fn new(schema: FormSchema) -> Result<Self, SchemaError> {
        if schema.fields.is_empty() {
            return Err(SchemaError::NoFields {
                schema: schema.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        let mut compiled = Vec::with_capacity(schema.fields.len());

        for field in &schema.fields {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    schema: schema.name.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    field: field.name.clone(),
                });
            }
            check_bounds(field)?;

            let patterns = field
                .constraints
                .iter()
                .map(|constraint| match constraint {
                    Constraint::Pattern { regex, .. } => Regex::new(regex)
                        .map(Some)
                        .map_err(|source| SchemaError::InvalidPattern {
                            field: field.name.clone(),
                            source,
                        }),
                    _ => Ok(None),
                })
                .collect::<Result<Vec<_>, _>>()?;

            compiled.push(CompiledField { patterns });
        }

        Ok(Self {
            schema: Arc::new(schema),
            compiled: Arc::new(compiled),
        })
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Display label for a field, falling back to its name
    pub fn label_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.schema
            .get_field(field)
            .and_then(|f| f.label.as_deref())
            .unwrap_or(field)
    }

    fn check_field(
        &self,
        field: &FieldSpec,
        compiled: &CompiledField,
        value: &str,
        context: &ValidationContext,
        issues: &mut Issues,
    ) {
        for (constraint, pattern) in field.constraints.iter().zip(&compiled.patterns) {
            let ok = match constraint {
                Constraint::Required { .. } => !value.is_empty(),
                Constraint::Email { .. } => ValidationHelpers::is_email(value),
                Constraint::MinLength { min, .. } => ValidationHelpers::char_count(value) >= *min,
                Constraint::MaxLength { max, .. } => ValidationHelpers::char_count(value) <= *max,
                Constraint::Pattern { .. } => pattern
                    .as_ref()
                    .map(|regex| regex.is_match(value))
                    .unwrap_or(false),
            };

            if !ok {
                issues.push(context.issue(constraint.code(), constraint.message()));
            }
        }
    }
}

fn check_bounds(field: &FieldSpec) -> Result<(), SchemaError> {
    let min = field.constraints.iter().find_map(|c| match c {
        Constraint::MinLength { min, .. } => Some(*min),
        _ => None,
    });
    let max = field.constraints.iter().find_map(|c| match c {
        Constraint::MaxLength { max, .. } => Some(*max),
        _ => None,
    });

    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(SchemaError::InvalidBounds {
            field: field.name.clone(),
            reason: format!("min_length {} exceeds max_length {}", min, max),
        }),
        _ => Ok(()),
    }
}

impl SchemaValidator for FieldValidator {
    fn field_names(&self) -> Vec<&str> {
        self.schema.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn validate_with_context(
        &self,
        raw: &RawSubmission,
        context: &ValidationContext,
    ) -> ValidationResult<ValidatedRecord> {
        let mut issues = Issues::new();
        let mut values = BTreeMap::new();

        for (field, compiled) in self.schema.fields.iter().zip(self.compiled.iter()) {
            let field_context = context.child(field.name.as_str());

            let Some(value) = raw.get(&field.name) else {
                issues.push(Issue::at_path(
                    field_context.path.clone(),
                    IssueCode::Required,
                    field.missing_message(),
                ));
                continue;
            };

            let value = if field.trim { value.trim() } else { value };
            self.check_field(field, compiled, value, &field_context, &mut issues);
            values.insert(field.name.clone(), value.to_string());
        }

        issues.into_result()?;
        Ok(ValidatedRecord::from_values(values))
    }
}
