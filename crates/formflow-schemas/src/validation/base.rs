//! Base validation trait and common utilities
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use crate::record::{RawSubmission, ValidatedRecord};
use crate::validation::error::{Issue, IssueCode, Issues, PathSegment, ValidationResult};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

/// Validation context carrying the path of the value being checked
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    /// Path segments from the submission root
    pub path: Vec<PathSegment>,
}

impl ValidationContext {
    /// Context positioned at the submission root
    pub fn root() -> Self {
        Self { path: Vec::new() }
    }

    /// Create a child context for an object key
    pub fn child<K: Into<String>>(&self, key: K) -> Self {
        let mut path = self.path.clone();
        path.push(PathSegment::Key(key.into()));
        Self { path }
    }

    /// Create a child context for an array index
    pub fn child_index(&self, index: usize) -> Self {
        let mut path = self.path.clone();
        path.push(PathSegment::Index(index));
        Self { path }
    }

    /// Build an issue located at this context's path
    pub fn issue<M: Into<String>>(&self, code: IssueCode, message: M) -> Issue {
        Issue::at_path(self.path.clone(), code, message)
    }
}

/// Base trait for schema validators.
///
/// Implementations must be deterministic and free of side effects, and must
/// report issues in a stable order: downstream consumers keep the first
/// issue per field.
pub trait SchemaValidator {
    /// Names of the fields this validator declares, in declaration order
    fn field_names(&self) -> Vec<&str>;

    /// Validate a raw submission starting at the root
    fn validate(&self, raw: &RawSubmission) -> ValidationResult<ValidatedRecord> {
        self.validate_with_context(raw, &ValidationContext::root())
    }

    /// Validate with an explicit context
    fn validate_with_context(
        &self,
        raw: &RawSubmission,
        context: &ValidationContext,
    ) -> ValidationResult<ValidatedRecord>;

    /// Collect issues without failing (empty when the submission is valid)
    fn collect_issues(&self, raw: &RawSubmission) -> Issues {
        match self.validate(raw) {
            Ok(_) => Issues::new(),
            Err(issues) => issues,
        }
    }

    /// Validate and decode the record into a typed struct
    fn validate_into<T: DeserializeOwned>(&self, raw: &RawSubmission) -> ValidationResult<T>
    where
        Self: Sized,
    {
        let record = self.validate(raw)?;
        record.decode().map_err(|e| {
            Issues::from(Issue::at_path(
                Vec::new(),
                IssueCode::Custom("decode".to_string()),
                format!("Validated record does not match target type: {}", e),
            ))
        })
    }
}

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

/// Helper functions for common validation patterns
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// Syntactic email check: local part, `@`, dotted domain with an
    /// alphabetic top-level label of at least two characters.
    pub fn is_email(value: &str) -> bool {
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(
                r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
            )
            .expect("email regex is valid")
        });

        // The regex crate has no lookaround, so these two are checked by hand
        !value.starts_with('.') && !value.contains("..") && regex.is_match(value)
    }

    /// Length in characters, not bytes
    pub fn char_count(value: &str) -> usize {
        value.chars().count()
    }
}
