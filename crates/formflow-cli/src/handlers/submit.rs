//! Submit command handler

use super::utils::{build_orchestrator, load_submission, load_validator, read_structured, write_structured};
use crate::cli::SubmitArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use formflow_core::{Outcome, SubmissionState};
use tracing::{debug, info, instrument};

/// Handle the submit command
#[instrument(skip_all, fields(previous = ?args.previous, save_to = ?args.save_to))]
pub async fn handle_submit(args: SubmitArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("submit_command");

    let validator = load_validator(args.input.schema.as_deref(), config)?;
    let orchestrator = build_orchestrator(validator, config, args.reporting, args.mode)?;
    let raw = load_submission(&args.input)?;

    let previous = match &args.previous {
        Some(path) => {
            debug!(path = %path.display(), "Loading previous state");
            serde_json::from_value(read_structured(path)?)?
        }
        None => SubmissionState::initial(),
    };

    let submission = orchestrator.evaluate(&previous, &raw);
    info!(outcome = submission.outcome.label(), "Submission evaluated");

    output.section("Submission State")?;
    output.state(&submission.state)?;

    if let Some(path) = &args.save_to {
        write_structured(path, &submission.state)?;
        output.success(&format!("✓ State saved to {}", path.display()))?;
    }

    match submission.outcome {
        Outcome::Accepted(_) => Ok(()),
        Outcome::SchemaRejected(issues) => Err(Error::rejected(format!(
            "{} validation issue(s)",
            issues.len()
        ))),
        Outcome::RuleRejected(violation) => Err(Error::rejected(violation.message)),
    }
}
