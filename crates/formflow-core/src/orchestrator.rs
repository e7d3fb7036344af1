//! Submission orchestrator
//!
//! Drives one submission attempt: field validation, then business rules,
//! then the next [`SubmissionState`]. The orchestrator keeps nothing between
//! calls; continuity lives entirely in the state the caller threads back in.
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::reshape::{reshape, summarize};
use crate::rules::{RuleConfig, RuleSet, RuleViolation};
use crate::state::{FieldErrorMap, SubmissionState};
use formflow_schemas::{
    contact_validator, FieldValidator, Issues, RawSubmission, SchemaValidator, ValidatedRecord,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

pub const DEFAULT_INVALID_MESSAGE: &str = "Invalid form data";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Form submitted successfully";

/// How rejections are reported back to the form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReporting {
    /// Banner message plus re-population values and one error per field
    #[default]
    FieldLevel,
    /// A single message describing what went wrong
    Generic,
}

/// Which validation stages run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Schema validation followed by business rules
    #[default]
    Strict,
    /// Schema validation only
    Basic,
}

/// Banner texts used by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Banner for a schema validation failure
    pub invalid: String,
    /// Banner for a fully accepted submission
    pub success: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            invalid: DEFAULT_INVALID_MESSAGE.to_string(),
            success: DEFAULT_SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// What happened to a submission, independent of how it is reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every stage passed
    Accepted(ValidatedRecord),
    /// The schema rejected one or more fields
    SchemaRejected(Issues),
    /// The schema passed but a business rule rejected a field
    RuleRejected(RuleViolation),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Accepted(_) => "accepted",
            Outcome::SchemaRejected(_) => "schema_rejected",
            Outcome::RuleRejected(_) => "rule_rejected",
        }
    }
}

/// Result of one attempt: the state to hand back plus the outcome behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub state: SubmissionState,
    pub outcome: Outcome,
}

/// Stateless pipeline from `(previous state, raw input)` to the next state
#[derive(Debug)]
pub struct Orchestrator {
    validator: FieldValidator,
    rules: RuleSet,
    messages: Messages,
    reporting: ErrorReporting,
    mode: ValidationMode,
}

impl Orchestrator {
    pub fn builder(validator: FieldValidator) -> OrchestratorBuilder {
        OrchestratorBuilder::new(validator)
    }

    /// Contact schema with the stock rule set and default messages
    pub fn contact() -> Result<Self> {
        Self::builder(contact_validator()?)
            .rule_configs(&RuleConfig::default_rules())?
            .build()
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn reporting(&self) -> ErrorReporting {
        self.reporting
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Run one attempt and return the next state
    pub fn submit(&self, previous: &SubmissionState, raw: &RawSubmission) -> SubmissionState {
        self.evaluate(previous, raw).state
    }

    /// Run one attempt and return the next state together with its outcome.
    ///
    /// `previous` is never merged into the result; the new state replaces it.
    #[instrument(
        skip_all,
        fields(
            schema = %self.validator.schema().name,
            fields = raw.len(),
            first_attempt = previous.is_initial(),
        )
    )]
    pub fn evaluate(&self, previous: &SubmissionState, raw: &RawSubmission) -> Submission {
        let record = match self.validator.validate(raw) {
            Ok(record) => record,
            Err(issues) => {
                info!(issues = issues.len(), "Submission rejected by schema");
                let state = self.schema_rejection(raw, &issues);
                return Submission {
                    state,
                    outcome: Outcome::SchemaRejected(issues),
                };
            }
        };

        if self.mode == ValidationMode::Strict {
            if let Err(violation) = self.rules.check(&record) {
                info!(rule = %violation.rule, field = %violation.field, "Submission rejected by business rule");
                let state = self.rule_rejection(raw, &record, &violation);
                return Submission {
                    state,
                    outcome: Outcome::RuleRejected(violation),
                };
            }
        } else {
            debug!("Basic mode, business rules skipped");
        }

        info!("Submission accepted");
        Submission {
            state: SubmissionState::succeeded(self.messages.success.clone()),
            outcome: Outcome::Accepted(record),
        }
    }

    fn schema_rejection(&self, raw: &RawSubmission, issues: &Issues) -> SubmissionState {
        match self.reporting {
            // Every submitted field is copied back, failing or not
            ErrorReporting::FieldLevel => SubmissionState::rejected(
                self.messages.invalid.clone(),
                raw.to_field_map(),
                reshape(issues.as_slice()),
            ),
            ErrorReporting::Generic => SubmissionState::message_only(format!(
                "{}: {}",
                self.messages.invalid,
                summarize(issues.as_slice()).join("; ")
            )),
        }
    }

    fn rule_rejection(
        &self,
        raw: &RawSubmission,
        record: &ValidatedRecord,
        violation: &RuleViolation,
    ) -> SubmissionState {
        match self.reporting {
            ErrorReporting::FieldLevel => {
                // Validated values win; undeclared raw keys are still echoed back
                let mut fields = raw.to_field_map();
                fields.extend(record.to_field_map());

                let mut issues = FieldErrorMap::new();
                issues.insert(violation.field.clone(), violation.message.clone());
                SubmissionState::rejected(violation.message.clone(), fields, issues)
            }
            ErrorReporting::Generic => SubmissionState::message_only(violation.message.clone()),
        }
    }
}

/// Builder wiring a validator to rules, messages and reporting options
#[derive(Debug)]
pub struct OrchestratorBuilder {
    validator: FieldValidator,
    rules: RuleSet,
    messages: Messages,
    reporting: ErrorReporting,
    mode: ValidationMode,
}

impl OrchestratorBuilder {
    pub fn new(validator: FieldValidator) -> Self {
        Self {
            validator,
            rules: RuleSet::new(),
            messages: Messages::default(),
            reporting: ErrorReporting::default(),
            mode: ValidationMode::default(),
        }
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the rule set with rules built from declarations
    pub fn rule_configs(mut self, configs: &[RuleConfig]) -> Result<Self> {
        self.rules = RuleSet::from_configs(configs)?;
        Ok(self)
    }

    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn reporting(mut self, reporting: ErrorReporting) -> Self {
        self.reporting = reporting;
        self
    }

    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check that every rule reports on a declared field, then build
    pub fn build(self) -> Result<Orchestrator> {
        let declared = self.validator.field_names();
        if let Some(rule) = self.rules.iter().find(|rule| !declared.contains(&rule.field())) {
            return Err(Error::rule(
                rule.name(),
                format!(
                    "targets field '{}' which schema '{}' does not declare",
                    rule.field(),
                    self.validator.schema().name
                ),
            ));
        }

        Ok(Orchestrator {
            validator: self.validator,
            rules: self.rules,
            messages: self.messages,
            reporting: self.reporting,
            mode: self.mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ForbidSubstring;
    use formflow_schemas::validation::contact::FIRST_REQUIRED;

    fn raw(first: &str, last: &str, email: &str) -> RawSubmission {
        RawSubmission::new()
            .with("first", first)
            .with("last", last)
            .with("email", email)
    }

    #[test]
    fn test_rule_on_undeclared_field_is_rejected_at_build() {
        let rules = RuleSet::new().with_rule(ForbidSubstring::new("phone", "0", "No zeros"));
        let err = Orchestrator::builder(contact_validator().unwrap())
            .rules(rules)
            .build()
            .unwrap_err();
        match err {
            Error::Rule { rule, message } => {
                assert_eq!(rule, "forbid_substring");
                assert!(message.contains("'phone'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_generic_reporting_for_schema_failure() {
        let orchestrator = Orchestrator::builder(contact_validator().unwrap())
            .reporting(ErrorReporting::Generic)
            .build()
            .unwrap();

        let submission = orchestrator.evaluate(&SubmissionState::initial(), &raw("", "Doe", "doe@example.com"));
        assert_eq!(
            submission.state.message,
            format!("{}: first: {}", DEFAULT_INVALID_MESSAGE, FIRST_REQUIRED)
        );
        assert_eq!(submission.state.fields, None);
        assert_eq!(submission.state.issues, None);
        assert_eq!(submission.outcome.label(), "schema_rejected");
    }

    #[test]
    fn test_generic_reporting_for_rule_failure() {
        let orchestrator = Orchestrator::builder(contact_validator().unwrap())
            .rule_configs(&RuleConfig::default_rules())
            .unwrap()
            .reporting(ErrorReporting::Generic)
            .build()
            .unwrap();

        let state = orchestrator.submit(&SubmissionState::initial(), &raw("Jane", "Doe", "jane@example.com"));
        assert_eq!(state, SubmissionState::message_only(crate::rules::DEFAULT_EMAIL_RULE_MESSAGE));
    }

    #[test]
    fn test_basic_mode_skips_rules() {
        let orchestrator = Orchestrator::builder(contact_validator().unwrap())
            .rule_configs(&RuleConfig::default_rules())
            .unwrap()
            .mode(ValidationMode::Basic)
            .build()
            .unwrap();

        let submission = orchestrator.evaluate(&SubmissionState::initial(), &raw("Jane", "Doe", "jane@example.com"));
        assert!(submission.outcome.is_accepted());
        assert!(submission.state.is_success());
    }

    #[test]
    fn test_custom_messages() {
        let orchestrator = Orchestrator::builder(contact_validator().unwrap())
            .messages(Messages {
                invalid: "Please fix the highlighted fields".to_string(),
                success: "Thanks!".to_string(),
            })
            .build()
            .unwrap();

        let rejected = orchestrator.submit(&SubmissionState::initial(), &raw("", "", ""));
        assert_eq!(rejected.message, "Please fix the highlighted fields");

        let accepted = orchestrator.submit(&rejected, &raw("Jon", "Lee", "jon@example.com"));
        assert_eq!(accepted, SubmissionState::succeeded("Thanks!"));
    }

    #[test]
    fn test_messages_deserialize_with_defaults() {
        let messages: Messages = serde_json::from_str(r#"{"success": "Done"}"#).unwrap();
        assert_eq!(messages.invalid, DEFAULT_INVALID_MESSAGE);
        assert_eq!(messages.success, "Done");
    }
}
