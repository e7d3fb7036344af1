//! Reshaping validation issues for display
//!
//! [`reshape`] turns the validator's flat, ordered issue list into one
//! message per field. [`summarize`] keeps every message for banner-style
//! display.
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use crate::state::FieldErrorMap;
use formflow_schemas::Issue;
use tracing::debug;

/// Map each field to the message of its first issue.
///
/// The field key is the first path segment. Issues with an empty path
/// cannot be attributed to a field and are dropped. Later issues for a field
/// that already has a message are discarded.
pub fn reshape(issues: &[Issue]) -> FieldErrorMap {
    let mut errors = FieldErrorMap::new();

    for issue in issues {
        let Some(field) = issue.field() else {
            debug!(message = %issue.message, "Dropping issue with empty path");
            continue;
        };

        errors.entry(field).or_insert_with(|| issue.message.clone());
    }

    errors
}

/// Every issue as a `field: message` line, in order, duplicates included.
///
/// Issues with an empty path keep the bare message.
pub fn summarize(issues: &[Issue]) -> Vec<String> {
    issues
        .iter()
        .map(|issue| match issue.field() {
            Some(field) => format!("{}: {}", field, issue.message),
            None => issue.message.clone(),
        })
        .collect()
}
