//! Business rules applied after schema validation succeeds
//!
//! A rule looks at a [`ValidatedRecord`] and either accepts it or rejects
//! one field with a message. Rules stand in for policy checks the schema
//! cannot express, such as blocked values or lookups against existing data.
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use formflow_schemas::ValidatedRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A rejected record: the field at fault and the message to show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: String,
    pub field: String,
    pub message: String,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule '{}' rejected field '{}': {}", self.rule, self.field, self.message)
    }
}

/// A post-schema check over a validated record
pub trait BusinessRule: fmt::Debug + Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// The field this rule reports on
    fn field(&self) -> &str;

    fn check(&self, record: &ValidatedRecord) -> std::result::Result<(), RuleViolation>;

    fn violation(&self) -> RuleViolation;
}

/// Rejects a field whose value contains a substring
#[derive(Debug, Clone)]
pub struct ForbidSubstring {
    pub field: String,
    pub needle: String,
    pub message: String,
    pub ignore_case: bool,
}

impl ForbidSubstring {
    pub fn new(field: impl Into<String>, needle: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            needle: needle.into(),
            message: message.into(),
            ignore_case: false,
        }
    }
}

impl BusinessRule for ForbidSubstring {
    fn name(&self) -> &str {
        "forbid_substring"
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn check(&self, record: &ValidatedRecord) -> std::result::Result<(), RuleViolation> {
        let Some(value) = record.get(&self.field) else {
            return Ok(());
        };

        let found = if self.ignore_case {
            value.to_lowercase().contains(&self.needle.to_lowercase())
        } else {
            value.contains(&self.needle)
        };

        if found {
            Err(self.violation())
        } else {
            Ok(())
        }
    }

    fn violation(&self) -> RuleViolation {
        RuleViolation {
            rule: self.name().to_string(),
            field: self.field.clone(),
            message: self.message.clone(),
        }
    }
}

/// Rejects a field whose value matches a regular expression
#[derive(Debug, Clone)]
pub struct ForbidPattern {
    pub field: String,
    pub regex: Regex,
    pub message: String,
}

impl BusinessRule for ForbidPattern {
    fn name(&self) -> &str {
        "forbid_pattern"
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn check(&self, record: &ValidatedRecord) -> std::result::Result<(), RuleViolation> {
        match record.get(&self.field) {
            Some(value) if self.regex.is_match(value) => Err(self.violation()),
            _ => Ok(()),
        }
    }

    fn violation(&self) -> RuleViolation {
        RuleViolation {
            rule: self.name().to_string(),
            field: self.field.clone(),
            message: self.message.clone(),
        }
    }
}

/// Rejects a field whose value is in a fixed set (compared case-insensitively)
#[derive(Debug, Clone)]
pub struct ForbidValues {
    pub field: String,
    values: HashSet<String>,
    pub message: String,
}

impl ForbidValues {
    pub fn new<I, S>(field: impl Into<String>, values: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            field: field.into(),
            values: values.into_iter().map(|v| v.as_ref().to_lowercase()).collect(),
            message: message.into(),
        }
    }
}

impl BusinessRule for ForbidValues {
    fn name(&self) -> &str {
        "forbid_values"
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn check(&self, record: &ValidatedRecord) -> std::result::Result<(), RuleViolation> {
        match record.get(&self.field) {
            Some(value) if self.values.contains(&value.to_lowercase()) => Err(self.violation()),
            _ => Ok(()),
        }
    }

    fn violation(&self) -> RuleViolation {
        RuleViolation {
            rule: self.name().to_string(),
            field: self.field.clone(),
            message: self.message.clone(),
        }
    }
}

/// Declarative rule, as written in configuration files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    ForbidSubstring {
        field: String,
        needle: String,
        message: String,
        #[serde(default)]
        ignore_case: bool,
    },
    ForbidPattern {
        field: String,
        regex: String,
        message: String,
    },
    ForbidValues {
        field: String,
        values: Vec<String>,
        message: String,
    },
}

pub const DEFAULT_EMAIL_RULE_MESSAGE: &str = "Email address is not valid";

impl RuleConfig {
    /// The stock rule set: reject any email containing the letter "a"
    pub fn default_rules() -> Vec<RuleConfig> {
        vec![RuleConfig::ForbidSubstring {
            field: "email".to_string(),
            needle: "a".to_string(),
            message: DEFAULT_EMAIL_RULE_MESSAGE.to_string(),
            ignore_case: false,
        }]
    }

    pub fn field(&self) -> &str {
        match self {
            Self::ForbidSubstring { field, .. }
            | Self::ForbidPattern { field, .. }
            | Self::ForbidValues { field, .. } => field,
        }
    }

    /// Build the runtime rule
    pub fn build(&self) -> Result<Box<dyn BusinessRule>> {
        match self {
            Self::ForbidSubstring {
                field,
                needle,
                message,
                ignore_case,
            } => {
                if needle.is_empty() {
                    return Err(Error::rule("forbid_substring", "needle must not be empty"));
                }
                Ok(Box::new(ForbidSubstring {
                    field: field.clone(),
                    needle: needle.clone(),
                    message: message.clone(),
                    ignore_case: *ignore_case,
                }))
            }
            Self::ForbidPattern {
                field,
                regex,
                message,
            } => {
                let regex = Regex::new(regex)
                    .map_err(|e| Error::rule("forbid_pattern", format!("invalid regex: {}", e)))?;
                Ok(Box::new(ForbidPattern {
                    field: field.clone(),
                    regex,
                    message: message.clone(),
                }))
            }
            Self::ForbidValues {
                field,
                values,
                message,
            } => Ok(Box::new(ForbidValues::new(field.clone(), values, message.clone()))),
        }
    }
}

/// Ordered rules; the first violation wins
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn BusinessRule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configs(configs: &[RuleConfig]) -> Result<Self> {
        let rules = configs
            .iter()
            .map(RuleConfig::build)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn with_rule<R: BusinessRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn push(&mut self, rule: Box<dyn BusinessRule>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn BusinessRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Fields the rules report on
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.field())
    }

    pub fn check(&self, record: &ValidatedRecord) -> std::result::Result<(), RuleViolation> {
        for rule in &self.rules {
            rule.check(record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(email: &str) -> ValidatedRecord {
        let mut values = BTreeMap::new();
        values.insert("first".to_string(), "Jon".to_string());
        values.insert("email".to_string(), email.to_string());
        ValidatedRecord::from_values(values)
    }

    #[test]
    fn test_default_rule_rejects_letter_a() {
        let rules = RuleSet::from_configs(&RuleConfig::default_rules()).unwrap();
        let violation = rules.check(&record("jane@example.com")).unwrap_err();
        assert_eq!(violation.field, "email");
        assert_eq!(violation.message, DEFAULT_EMAIL_RULE_MESSAGE);
        assert!(rules.check(&record("jon@test.io")).is_ok());
    }

    #[test]
    fn test_substring_ignore_case() {
        let rule = ForbidSubstring {
            ignore_case: true,
            ..ForbidSubstring::new("email", "SPAM", "No spam")
        };
        assert!(rule.check(&record("spam@test.io")).is_err());
        assert!(ForbidSubstring::new("email", "SPAM", "No spam")
            .check(&record("spam@test.io"))
            .is_ok());
    }

    #[test]
    fn test_forbid_values_is_case_insensitive() {
        let rule = ForbidValues::new("email", ["Taken@Example.com"], "Email already registered");
        assert!(rule.check(&record("taken@example.com")).is_err());
        assert!(rule.check(&record("free@example.com")).is_ok());
    }

    #[test]
    fn test_forbid_pattern_from_config() {
        let config = RuleConfig::ForbidPattern {
            field: "email".to_string(),
            regex: r"@example\.com$".to_string(),
            message: "Use a real domain".to_string(),
        };
        let rule = config.build().unwrap();
        assert_eq!(rule.name(), "forbid_pattern");
        assert!(rule.check(&record("jon@example.com")).is_err());
        assert!(rule.check(&record("jon@real.org")).is_ok());
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let bad_regex = RuleConfig::ForbidPattern {
            field: "email".to_string(),
            regex: "(".to_string(),
            message: "never".to_string(),
        };
        assert!(matches!(bad_regex.build(), Err(Error::Rule { .. })));

        let empty_needle = RuleConfig::ForbidSubstring {
            field: "email".to_string(),
            needle: String::new(),
            message: "never".to_string(),
            ignore_case: false,
        };
        assert!(empty_needle.build().is_err());
    }

    #[test]
    fn test_first_violation_wins() {
        let rules = RuleSet::new()
            .with_rule(ForbidSubstring::new("first", "J", "No J"))
            .with_rule(ForbidSubstring::new("email", "j", "No j"));
        let violation = rules.check(&record("jon@test.io")).unwrap_err();
        assert_eq!(violation.field, "first");
    }

    #[test]
    fn test_rule_on_absent_field_passes() {
        let rule = ForbidSubstring::new("phone", "0", "No zeros");
        assert!(rule.check(&record("jon@test.io")).is_ok());
    }

    #[test]
    fn test_rule_config_serde_shape() {
        let parsed: RuleConfig = serde_json::from_value(serde_json::json!({
            "kind": "forbid_values",
            "field": "email",
            "values": ["a@b.co"],
            "message": "Taken"
        }))
        .unwrap();
        assert_eq!(parsed.field(), "email");
    }
}
