//! Replay command handler
//!
//! A scenario file maps session names to ordered submissions. Every session
//! runs as its own task with its own state; only the orchestrator is shared.

use super::utils::{build_orchestrator, load_validator, read_structured, submission_from_value};
use crate::cli::ReplayArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use formflow_core::{Orchestrator, RawSubmission, Session, SubmissionState};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, Instrument};

/// What a replayed session ended with
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub attempts: u32,
    pub outcome: String,
    pub state: SubmissionState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<SubmissionState>,
}

/// Handle the replay command
#[instrument(skip_all, fields(scenario = %args.scenario.display()))]
pub async fn handle_replay(args: ReplayArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details("replay_command", &args.scenario.display().to_string());

    let validator = load_validator(args.schema.as_deref(), config)?;
    let orchestrator = Arc::new(build_orchestrator(validator, config, None, None)?);
    let scenario = load_scenario(&args.scenario)?;
    info!(sessions = scenario.len(), "Replaying scenario");

    let progress = output.progress_bar(scenario.len() as u64, "Replaying sessions");

    let handles: Vec<_> = scenario
        .into_iter()
        .map(|(name, submissions)| {
            let orchestrator = Arc::clone(&orchestrator);
            let span = tracing::info_span!("session", name = %name);
            let keep_history = args.trace;
            tokio::spawn(
                async move { run_session(&orchestrator, &name, &submissions, keep_history) }
                    .instrument(span),
            )
        })
        .collect();

    let mut reports = BTreeMap::new();
    for handle in handles {
        let (name, report) = handle.await.map_err(|e| Error::Session {
            session: "unknown".to_string(),
            message: e.to_string(),
        })?;
        if let Some(pb) = &progress {
            pb.inc(1);
        }
        reports.insert(name, report);
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    print_reports(&reports, args.trace, output)?;
    timer.finish();
    Ok(())
}

/// Read the scenario into session name to ordered submissions
fn load_scenario(path: &std::path::Path) -> Result<BTreeMap<String, Vec<RawSubmission>>> {
    let value = read_structured(path)?;
    let sessions = value.as_object().ok_or_else(|| Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: "a mapping of session names to lists of submissions".to_string(),
    })?;

    sessions
        .iter()
        .map(|(name, submissions)| {
            let submissions = submissions.as_array().ok_or_else(|| Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: format!("a list of submissions for session '{}'", name),
            })?;
            let raws = submissions
                .iter()
                .map(|value| submission_from_value(value, path))
                .collect::<Result<Vec<_>>>()?;
            Ok((name.clone(), raws))
        })
        .collect()
}

fn run_session(
    orchestrator: &Orchestrator,
    name: &str,
    submissions: &[RawSubmission],
    keep_history: bool,
) -> (String, SessionReport) {
    let mut session = Session::new(name);
    let mut history = Vec::new();
    let mut outcome = "none";

    for raw in submissions {
        outcome = session.submit(orchestrator, raw).label();
        if keep_history {
            history.push(session.state.clone());
        }
    }

    debug!(attempts = session.attempts, outcome, "Session finished");
    (
        session.id,
        SessionReport {
            attempts: session.attempts,
            outcome: outcome.to_string(),
            state: session.state,
            history,
        },
    )
}

fn print_reports(
    reports: &BTreeMap<String, SessionReport>,
    trace: bool,
    output: &mut OutputWriter,
) -> Result<()> {
    if output.format() != crate::cli::OutputFormat::Human {
        return output.data(reports);
    }

    output.section("Sessions")?;
    let rows = reports
        .iter()
        .map(|(name, report)| {
            vec![
                name.clone(),
                report.attempts.to_string(),
                report.outcome.clone(),
                report.state.message.clone(),
            ]
        })
        .collect();
    output.table(&["Session", "Attempts", "Outcome", "Message"], rows)?;

    for (name, report) in reports {
        if trace {
            for (i, state) in report.history.iter().enumerate() {
                output.section(&format!("{} attempt {}", name, i + 1))?;
                output.state(state)?;
            }
        } else if report.state.issues.is_some() {
            output.section(name)?;
            output.state(&report.state)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_session_keeps_sessions_apart() {
        let orchestrator = Orchestrator::contact().unwrap();
        let good = RawSubmission::new()
            .with("first", "Jon")
            .with("last", "Lee")
            .with("email", "jon@test.io");

        let (_, retried) = run_session(&orchestrator, "retry", &[RawSubmission::new(), good.clone()], true);
        assert_eq!(retried.attempts, 2);
        assert_eq!(retried.outcome, "accepted");
        assert_eq!(retried.history.len(), 2);
        assert!(retried.history[0].issues.is_some());

        let (_, single) = run_session(&orchestrator, "single", &[RawSubmission::new()], false);
        assert_eq!(single.outcome, "schema_rejected");
        assert!(single.history.is_empty());
    }

    #[test]
    fn test_load_scenario() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scenario.yaml");
        std::fs::write(
            &path,
            "alice:\n  - {first: '', last: Doe, email: doe@test.io}\n  - {first: Alice, last: Doe, email: doe@test.io}\nbob: []\n",
        )
        .unwrap();

        let scenario = load_scenario(&path).unwrap();
        assert_eq!(scenario.len(), 2);
        assert_eq!(scenario["alice"].len(), 2);
        assert!(scenario["bob"].is_empty());
    }

    #[test]
    fn test_scenario_must_be_a_mapping() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scenario.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(load_scenario(&path), Err(Error::InvalidFormat { .. })));
    }
}
