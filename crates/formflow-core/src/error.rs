//! Error types for the Formflow core library
//!
//! Validation failures are not errors here: they are carried as data in
//! [`SubmissionState`](crate::SubmissionState). This type covers building
//! the pipeline (schemas, rules, configuration).
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use formflow_schemas::{LoaderError, SchemaError};
use thiserror::Error;

/// Main error type for Formflow core operations
#[derive(Error, Debug)]
pub enum Error {
    /// The form schema could not be built
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A schema file could not be loaded
    #[error("Schema loading failed: {0}")]
    Loader(#[from] LoaderError),

    /// A business rule declaration is unusable
    #[error("Invalid rule '{rule}': {message}")]
    Rule { rule: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rule {
            rule: rule.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Result type alias for Formflow core operations
pub type Result<T> = std::result::Result<T, Error>;
