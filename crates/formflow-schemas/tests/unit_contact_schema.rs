//! Unit tests for the contact schema as seen from outside the crate
//!
//! These cover required fields, email format, issue ordering and the
//! handling of keys the schema does not declare.

use formflow_schemas::validation::contact::{
    EMAIL_INVALID, EMAIL_REQUIRED, FIRST_REQUIRED, LAST_REQUIRED,
};
use formflow_schemas::{contact_validator, IssueCode, PathSegment, RawSubmission, SchemaValidator};

fn submission(first: &str, last: &str, email: &str) -> RawSubmission {
    RawSubmission::new()
        .with("first", first)
        .with("last", last)
        .with("email", email)
}

#[cfg(test)]
mod required_field_validation {
    use super::*;

    #[test]
    fn test_every_field_valid() {
        let validator = contact_validator().unwrap();
        let result = validator.validate(&submission("Jane", "Doe", "jane@example.com"));
        assert!(result.is_ok(), "Should be valid: {:?}", result);
    }

    #[test]
    fn test_empty_first_name() {
        let validator = contact_validator().unwrap();
        let issues = validator
            .validate(&submission("", "Doe", "doe@example.com"))
            .unwrap_err();

        assert_eq!(issues.len(), 1);
        let issue = &issues.as_slice()[0];
        assert_eq!(issue.path, vec![PathSegment::Key("first".to_string())]);
        assert_eq!(issue.code, IssueCode::Required);
        assert_eq!(issue.message, FIRST_REQUIRED);
    }

    #[test]
    fn test_each_missing_field_is_named_first_in_its_path() {
        let validator = contact_validator().unwrap();
        for (missing, message) in [
            ("first", FIRST_REQUIRED),
            ("last", LAST_REQUIRED),
            ("email", EMAIL_REQUIRED),
        ] {
            let raw: RawSubmission = [("first", "Jon"), ("last", "Lee"), ("email", "jon@example.com")]
                .into_iter()
                .filter(|(k, _)| *k != missing)
                .collect();

            let issues = validator.validate(&raw).unwrap_err();
            assert_eq!(issues.as_slice()[0].field().as_deref(), Some(missing));
            assert_eq!(issues.as_slice()[0].message, message);
        }
    }

    #[test]
    fn test_empty_submission_reports_fields_in_declaration_order() {
        let validator = contact_validator().unwrap();
        let issues = validator.validate(&RawSubmission::new()).unwrap_err();
        let fields: Vec<_> = issues.iter().filter_map(|i| i.field()).collect();
        assert_eq!(fields, vec!["first", "last", "email"]);
    }
}

#[cfg(test)]
mod email_validation {
    use super::*;

    #[test]
    fn test_empty_email_reports_required_then_format() {
        let validator = contact_validator().unwrap();
        let issues = validator.validate(&submission("Jon", "Lee", "")).unwrap_err();
        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec![EMAIL_REQUIRED, EMAIL_INVALID]);
    }

    #[test]
    fn test_malformed_email() {
        let validator = contact_validator().unwrap();
        let issues = validator
            .validate(&submission("Jon", "Lee", "jon-at-example"))
            .unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues.as_slice()[0].code, IssueCode::Email);
    }
}

#[cfg(test)]
mod edge_cases {
    use super::*;

    #[test]
    fn test_undeclared_keys_are_stripped() {
        let validator = contact_validator().unwrap();
        let raw = submission("Jon", "Lee", "jon@example.com").with("$ACTION_ID", "abc123");
        let record = validator.validate(&raw).unwrap();
        assert_eq!(record.get("$ACTION_ID"), None);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_undeclared_keys_never_produce_issues() {
        let validator = contact_validator().unwrap();
        let raw = RawSubmission::new().with("nickname", "");
        let issues = validator.validate(&raw).unwrap_err();
        assert!(issues.iter().all(|i| i.field().as_deref() != Some("nickname")));
    }

    #[test]
    fn test_collect_issues_is_empty_for_valid_input() {
        let validator = contact_validator().unwrap();
        assert!(validator
            .collect_issues(&submission("Jon", "Lee", "jon@example.com"))
            .is_empty());
    }
}
