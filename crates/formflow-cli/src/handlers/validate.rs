//! Validate command handler

use super::utils::{load_submission, load_validator};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::{OutputWriter, ValidationReport};
use formflow_core::{reshape, SchemaValidator};
use tracing::{info, instrument, warn};

/// Handle the validate command: field validation only, no business rules
#[instrument(skip_all, fields(data = ?args.input.data))]
pub async fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("validate_command");

    let validator = load_validator(args.input.schema.as_deref(), config)?;
    let raw = load_submission(&args.input)?;
    output.info(&format!(
        "Validating {} field(s) against schema '{}'",
        raw.len(),
        validator.schema().name
    ))?;

    let report = match validator.validate(&raw) {
        Ok(_) => {
            info!("Validation passed");
            ValidationReport {
                valid: true,
                issues: Vec::new(),
                errors: Default::default(),
            }
        }
        Err(issues) => {
            warn!(issues = issues.len(), "Validation failed");
            ValidationReport {
                valid: false,
                errors: reshape(issues.as_slice()),
                issues: issues.into_iter().collect(),
            }
        }
    };

    output.report(&report)?;

    if report.valid {
        Ok(())
    } else {
        Err(Error::rejected(format!(
            "{} validation issue(s)",
            report.issues.len()
        )))
    }
}
