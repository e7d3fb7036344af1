//! Submission state threaded between attempts
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name to the single message displayed for it
pub type FieldErrorMap = BTreeMap<String, String>;

/// Field name to the value to re-populate it with
pub type FieldValues = BTreeMap<String, String>;

/// The only state carried from one submission attempt to the next.
///
/// It is replaced wholesale after each attempt. Under field-level reporting
/// `fields` and `issues` are both absent exactly when the last attempt fully
/// succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionState {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<FieldErrorMap>,
}

impl SubmissionState {
    /// State before any submission: an empty message
    pub fn initial() -> Self {
        Self::default()
    }

    /// Full success: a message and nothing else
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: None,
            issues: None,
        }
    }

    /// Rejection carrying the values to re-populate and the per-field errors
    pub fn rejected(message: impl Into<String>, fields: FieldValues, issues: FieldErrorMap) -> Self {
        Self {
            message: message.into(),
            fields: Some(fields),
            issues: Some(issues),
        }
    }

    /// Rejection reported as a message only (generic reporting)
    pub fn message_only(message: impl Into<String>) -> Self {
        Self::succeeded(message)
    }

    /// True when no submission has happened yet
    pub fn is_initial(&self) -> bool {
        self.message.is_empty() && self.fields.is_none() && self.issues.is_none()
    }

    /// True when the state has the success shape: a message, no fields and
    /// no issues. Under generic reporting a rejection has the same shape, so
    /// callers there should look at the orchestrator's `Outcome` instead.
    pub fn is_success(&self) -> bool {
        !self.message.is_empty() && self.fields.is_none() && self.issues.is_none()
    }

    /// Error shown for one field, if any
    pub fn issue_for(&self, field: &str) -> Option<&str> {
        self.issues
            .as_ref()
            .and_then(|issues| issues.get(field))
            .map(String::as_str)
    }

    /// Value to re-populate a field with, if any
    pub fn field_value(&self, field: &str) -> Option<&str> {
        self.fields
            .as_ref()
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_state_shape() {
        let state = SubmissionState::initial();
        assert!(state.is_initial());
        assert!(!state.is_success());
        assert_eq!(serde_json::to_value(&state).unwrap(), json!({"message": ""}));
    }

    #[test]
    fn test_success_serializes_message_only() {
        let state = SubmissionState::succeeded("Form submitted successfully");
        assert!(state.is_success());
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({"message": "Form submitted successfully"})
        );
    }

    #[test]
    fn test_rejection_round_trips_through_json() {
        let mut fields = FieldValues::new();
        fields.insert("first".into(), "".into());
        let mut issues = FieldErrorMap::new();
        issues.insert("first".into(), "First name is required".into());

        let state = SubmissionState::rejected("Invalid form data", fields, issues);
        let json = serde_json::to_string(&state).unwrap();
        let parsed: SubmissionState = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, state);
        assert!(!parsed.is_success());
        assert_eq!(parsed.issue_for("first"), Some("First name is required"));
        assert_eq!(parsed.field_value("first"), Some(""));
        assert_eq!(parsed.issue_for("last"), None);
    }

    #[test]
    fn test_deserialize_from_minimal_json() {
        let state: SubmissionState = serde_json::from_value(json!({"message": "hi"})).unwrap();
        assert_eq!(state.fields, None);
        assert_eq!(state.issues, None);
    }
}
