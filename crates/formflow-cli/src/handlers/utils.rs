//! Shared utilities for command handlers

use crate::cli::{InputArgs, ModeArg, ReportingArg};
use crate::config::Config;
use crate::error::{Error, Result};
use formflow_core::{FieldValidator, Orchestrator, RawSubmission};
use formflow_schemas::{contact_validator, SchemaLoader};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Read a JSON or YAML file into a JSON value
pub fn read_structured(path: &Path) -> Result<serde_json::Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "Read input file");

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        })
    }
}

/// Write a value as YAML or pretty JSON, chosen by extension
pub fn write_structured<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content)?;
    Ok(())
}

/// Parse one flat object of field values
pub fn submission_from_value(value: &serde_json::Value, origin: &Path) -> Result<RawSubmission> {
    RawSubmission::from_json_object(value).ok_or_else(|| Error::InvalidFormat {
        path: origin.to_path_buf(),
        expected: "a flat object of field values".to_string(),
    })
}

/// Build the raw submission from `--data` and `--field` arguments.
///
/// Fields given on the command line override values from the file.
pub fn load_submission(input: &InputArgs) -> Result<RawSubmission> {
    if input.data.is_none() && input.fields.is_empty() {
        return Err(Error::invalid_args("provide form data with --data FILE or --field NAME=VALUE"));
    }

    let mut raw = match &input.data {
        Some(path) => submission_from_value(&read_structured(path)?, path)?,
        None => RawSubmission::new(),
    };

    for (name, value) in &input.fields {
        raw.insert(name.as_str(), value.as_str());
    }

    debug!(fields = raw.len(), "Built raw submission");
    Ok(raw)
}

/// Resolve the form schema: argument, then config, then the contact form
pub fn load_validator(schema: Option<&Path>, config: &Config) -> Result<FieldValidator> {
    match schema.or(config.form.schema.as_deref()) {
        Some(path) => {
            debug!(path = %path.display(), "Loading form schema");
            Ok(SchemaLoader::new().load_validator(path)?)
        }
        None => Ok(contact_validator().map_err(formflow_core::Error::from)?),
    }
}

/// Assemble the orchestrator from config, with command-line overrides
pub fn build_orchestrator(
    validator: FieldValidator,
    config: &Config,
    reporting: Option<ReportingArg>,
    mode: Option<ModeArg>,
) -> Result<Orchestrator> {
    let orchestrator = Orchestrator::builder(validator)
        .rule_configs(&config.form.rules)?
        .messages(config.form.messages.clone())
        .reporting(reporting.map(Into::into).unwrap_or(config.form.reporting))
        .mode(mode.map(Into::into).unwrap_or(config.form.mode))
        .build()?;
    Ok(orchestrator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formflow_core::{ErrorReporting, SchemaValidator};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_load_submission_merges_file_and_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.yaml");
        fs::write(&path, "first: Jane\nlast: Doe\nemail: jane@test.io\n").unwrap();

        let input = InputArgs {
            data: Some(path),
            fields: vec![("first".into(), "Jon".into())],
            schema: None,
        };
        let raw = load_submission(&input).unwrap();
        assert_eq!(raw.get("first"), Some("Jon"));
        assert_eq!(raw.get("last"), Some("Doe"));
    }

    #[test]
    fn test_load_submission_requires_input() {
        let err = load_submission(&InputArgs::default()).unwrap_err();
        assert!(err.should_show_help());
    }

    #[test]
    fn test_non_object_data_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let input = InputArgs {
            data: Some(path),
            ..InputArgs::default()
        };
        assert!(matches!(load_submission(&input), Err(Error::InvalidFormat { .. })));
    }

    #[test]
    fn test_missing_data_file() {
        let input = InputArgs {
            data: Some(PathBuf::from("/nonexistent/data.json")),
            ..InputArgs::default()
        };
        assert!(matches!(load_submission(&input), Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_default_validator_is_contact_form() {
        let validator = load_validator(None, &Config::default()).unwrap();
        assert_eq!(validator.field_names(), vec!["first", "last", "email"]);
    }

    #[test]
    fn test_overrides_beat_config() {
        let config = Config::default();
        let orchestrator = build_orchestrator(
            load_validator(None, &config).unwrap(),
            &config,
            Some(ReportingArg::Generic),
            None,
        )
        .unwrap();
        assert_eq!(orchestrator.reporting(), ErrorReporting::Generic);
        assert_eq!(orchestrator.rules().len(), 1);
    }
}
