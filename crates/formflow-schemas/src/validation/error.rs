//! Validation issue types reported by the field validator
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One segment of an issue path: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Machine-friendly code naming the constraint that produced an issue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    Required,
    Email,
    TooShort,
    TooLong,
    Pattern,
    Custom(String),
}

impl IssueCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::Pattern => "pattern",
            Self::Custom(code) => code.as_str(),
        }
    }
}

/// A single validation issue with the path of the offending value
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub struct Issue {
    /// Path segments, the field name first
    pub path: Vec<PathSegment>,
    /// Constraint that failed
    pub code: IssueCode,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.json_path(), self.message)
    }
}

impl Issue {
    /// Create an issue addressed to a top-level field
    pub fn new<F, M>(field: F, code: IssueCode, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Self {
            path: vec![PathSegment::Key(field.into())],
            code,
            message: message.into(),
        }
    }

    /// Create an issue with an explicit path (possibly empty)
    pub fn at_path<M: Into<String>>(path: Vec<PathSegment>, code: IssueCode, message: M) -> Self {
        Self {
            path,
            code,
            message: message.into(),
        }
    }

    /// The field this issue belongs to, if it can be attributed to one
    pub fn field(&self) -> Option<String> {
        self.path.first().map(|segment| segment.to_string())
    }

    /// Render the path in `$.a[0].b` notation
    pub fn json_path(&self) -> String {
        let mut rendered = String::from("$");
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    rendered.push('.');
                    rendered.push_str(key);
                }
                PathSegment::Index(index) => {
                    rendered.push_str(&format!("[{}]", index));
                }
            }
        }
        rendered
    }
}

/// Ordered collection of issues from one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
pub struct Issues {
    pub issues: Vec<Issue>,
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation issue(s):", self.issues.len())?;
        for (i, issue) in self.issues.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl Issues {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, other: Issues) {
        self.issues.extend(other.issues);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    pub fn as_slice(&self) -> &[Issue] {
        &self.issues
    }

    /// Ok if no issues were collected, Err otherwise
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Issue> for Issues {
    fn from(issue: Issue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

impl From<Vec<Issue>> for Issues {
    fn from(issues: Vec<Issue>) -> Self {
        Self { issues }
    }
}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, Issues>;

/// Errors raised while building a schema (not while validating data)
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Schema '{schema}' declares no fields")]
    NoFields { schema: String },

    #[error("Schema '{schema}' has a field with an empty name")]
    EmptyFieldName { schema: String },

    #[error("Field '{field}' is declared more than once")]
    DuplicateField { field: String },

    #[error("Invalid pattern for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid length bounds for field '{field}': {reason}")]
    InvalidBounds { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_path_rendering() {
        let issue = Issue::at_path(
            vec!["items".into(), 2usize.into(), "name".into()],
            IssueCode::Required,
            "Required",
        );
        assert_eq!(issue.json_path(), "$.items[2].name");
        assert_eq!(issue.field().as_deref(), Some("items"));
    }

    #[test]
    fn test_empty_path_has_no_field() {
        let issue = Issue::at_path(Vec::new(), IssueCode::Custom("form".into()), "Bad form");
        assert_eq!(issue.field(), None);
        assert_eq!(issue.json_path(), "$");
    }

    #[test]
    fn test_path_serializes_as_plain_list() {
        let issue = Issue::new("email", IssueCode::Email, "Invalid email address");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["path"], serde_json::json!(["email"]));
        assert_eq!(json["code"], "email");
    }

    #[test]
    fn test_issues_display_lists_every_issue() {
        let issues = Issues::from(vec![
            Issue::new("first", IssueCode::Required, "First name is required"),
            Issue::new("email", IssueCode::Email, "Invalid email address"),
        ]);
        let rendered = issues.to_string();
        assert!(rendered.starts_with("2 validation issue(s):"));
        assert!(rendered.contains("1. $.first: First name is required"));
        assert!(rendered.contains("2. $.email: Invalid email address"));
    }

    #[test]
    fn test_into_result() {
        assert!(Issues::new().into_result().is_ok());
        let issues = Issues::from(Issue::new("last", IssueCode::Required, "Required"));
        assert_eq!(issues.into_result().unwrap_err().len(), 1);
    }
}
