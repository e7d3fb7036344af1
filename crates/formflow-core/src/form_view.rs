//! Client-side view of a form
//!
//! Holds what a rendered form shows: current values and the error displayed
//! under each field. Errors come either from local validation or from the
//! server state returned by the last submission.
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use crate::reshape::reshape;
use crate::state::{FieldErrorMap, FieldValues, SubmissionState};
use formflow_schemas::{FieldValidator, FormSchema, RawSubmission, SchemaValidator, ValidatedRecord};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    values: FieldValues,
    errors: FieldErrorMap,
}

impl FormView {
    /// Empty values for every declared field, overlaid with any values the
    /// state asks to re-populate
    pub fn new(schema: &FormSchema, state: &SubmissionState) -> Self {
        let mut values: FieldValues = schema
            .fields
            .iter()
            .map(|field| (field.name.clone(), String::new()))
            .collect();

        if let Some(fields) = &state.fields {
            for (name, value) in fields {
                values.insert(name.clone(), value.clone());
            }
        }

        Self {
            values,
            errors: FieldErrorMap::new(),
        }
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn set_value(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrorMap {
        &self.errors
    }

    /// Current values as a submission
    pub fn to_submission(&self) -> RawSubmission {
        self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Validate without a round trip. Errors are replaced by the reshaped
    /// issues on failure and cleared on success.
    pub fn validate_locally(
        &mut self,
        validator: &FieldValidator,
    ) -> Result<ValidatedRecord, FieldErrorMap> {
        match validator.validate(&self.to_submission()) {
            Ok(record) => {
                self.errors.clear();
                Ok(record)
            }
            Err(issues) => {
                self.errors = reshape(issues.as_slice());
                Err(self.errors.clone())
            }
        }
    }

    /// Apply server issues as displayed errors.
    ///
    /// Every observed state is applied, even one whose issues match an
    /// earlier response; a local validation may have cleared them since.
    /// Re-applying the same state leaves the errors unchanged. Returns the
    /// number of errors applied.
    pub fn observe(&mut self, state: &SubmissionState) -> usize {
        let Some(issues) = &state.issues else {
            return 0;
        };

        for (field, message) in issues {
            trace!(field = %field, "Applying server error");
            self.errors.insert(field.clone(), message.clone());
        }
        issues.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formflow_schemas::{contact_schema, contact_validator};

    fn rejected_state() -> SubmissionState {
        let mut fields = FieldValues::new();
        fields.insert("first".into(), "Jon".into());
        fields.insert("email".into(), "jane@example.com".into());
        let mut issues = FieldErrorMap::new();
        issues.insert("email".into(), "Email address is not valid".into());
        SubmissionState::rejected("Email address is not valid", fields, issues)
    }

    #[test]
    fn test_new_defaults_and_repopulates() {
        let view = FormView::new(&contact_schema(), &rejected_state());
        assert_eq!(view.value("first"), Some("Jon"));
        assert_eq!(view.value("last"), Some(""));
        assert_eq!(view.value("email"), Some("jane@example.com"));
    }

    #[test]
    fn test_observe_is_idempotent() {
        let state = rejected_state();
        let mut view = FormView::new(&contact_schema(), &state);

        assert_eq!(view.observe(&state), 1);
        let displayed = view.errors().clone();
        assert_eq!(view.observe(&state), 1);
        assert_eq!(view.errors(), &displayed);
        assert_eq!(view.error("email"), Some("Email address is not valid"));
    }

    #[test]
    fn test_repeated_rejection_is_shown_after_local_clear() {
        let validator = contact_validator().unwrap();
        let state = rejected_state();
        let mut view = FormView::new(&contact_schema(), &state);
        view.set_value("last", "Lee");
        assert_eq!(view.observe(&state), 1);

        view.set_value("email", "dana@test.io");
        assert!(view.validate_locally(&validator).is_ok());
        assert_eq!(view.error("email"), None);

        // Same issues as before, from a fresh server response
        assert_eq!(view.observe(&rejected_state()), 1);
        assert_eq!(view.error("email"), Some("Email address is not valid"));
    }

    #[test]
    fn test_observe_ignores_states_without_issues() {
        let mut view = FormView::new(&contact_schema(), &SubmissionState::initial());
        assert_eq!(view.observe(&SubmissionState::succeeded("done")), 0);
        assert!(view.errors().is_empty());
    }

    #[test]
    fn test_validate_locally() {
        let validator = contact_validator().unwrap();
        let mut view = FormView::new(&contact_schema(), &SubmissionState::initial());

        let errors = view.validate_locally(&validator).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(view.errors(), &errors);

        view.set_value("first", "Jon");
        view.set_value("last", "Lee");
        view.set_value("email", "jon@test.io");
        let record = view.validate_locally(&validator).unwrap();
        assert_eq!(record.get("email"), Some("jon@test.io"));
        assert!(view.errors().is_empty());
    }
}
