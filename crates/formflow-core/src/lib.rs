//! Formflow Core - Submission pipeline for validated forms
//!
//! This crate takes raw form input through schema validation and business
//! rules and produces the next [`SubmissionState`] for the form to display.
//!
//! # Main Components
//!
//! - **Error Reshaper**: Flat issue lists to one message per field
//! - **Business Rules**: Post-validation policy checks
//! - **Submission State**: The only data carried between attempts
//! - **Orchestrator**: Validation, rules and state transitions in one call
//! - **Session / FormView**: Per-session state threading and the client view
//!
//! # Example
//!
//! ```
//! use formflow_core::{Orchestrator, SubmissionState, RawSubmission};
//!
//! fn example() -> formflow_core::Result<()> {
//!     let orchestrator = Orchestrator::contact()?;
//!     let raw = RawSubmission::new().with("first", "Jon");
//!
//!     let state = orchestrator.submit(&SubmissionState::initial(), &raw);
//!     assert_eq!(state.issue_for("last"), Some("Last name is required"));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod form_view;
pub mod orchestrator;
pub mod reshape;
pub mod rules;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use form_view::FormView;
pub use orchestrator::{
    ErrorReporting, Messages, Orchestrator, OrchestratorBuilder, Outcome, Submission,
    ValidationMode, DEFAULT_INVALID_MESSAGE, DEFAULT_SUCCESS_MESSAGE,
};
pub use reshape::{reshape, summarize};
pub use rules::{
    BusinessRule, ForbidPattern, ForbidSubstring, ForbidValues, RuleConfig, RuleSet,
    RuleViolation, DEFAULT_EMAIL_RULE_MESSAGE,
};
pub use session::Session;
pub use state::{FieldErrorMap, FieldValues, SubmissionState};

// Schema-side types most callers need alongside the pipeline
pub use formflow_schemas::{
    FieldValidator, FormSchema, Issue, IssueCode, Issues, RawSubmission, SchemaValidator,
    ValidatedRecord,
};
