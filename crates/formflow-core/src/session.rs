//! One user's sequence of submission attempts
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use crate::orchestrator::{Orchestrator, Outcome};
use crate::state::SubmissionState;
use chrono::{DateTime, Utc};
use formflow_schemas::RawSubmission;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Holds the state between attempts for one form instance.
///
/// Sessions share nothing with each other; an orchestrator can serve any
/// number of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub state: SubmissionState,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_submitted_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: SubmissionState::initial(),
            attempts: 0,
            last_submitted_at: None,
        }
    }

    /// Resume from a previously returned state
    pub fn resume(id: impl Into<String>, state: SubmissionState) -> Self {
        Self {
            state,
            ..Self::new(id)
        }
    }

    /// Submit once, replacing the held state with the result
    pub fn submit(&mut self, orchestrator: &Orchestrator, raw: &RawSubmission) -> Outcome {
        let submission = orchestrator.evaluate(&self.state, raw);
        self.attempts += 1;
        self.last_submitted_at = Some(Utc::now());
        self.state = submission.state;
        debug!(session = %self.id, attempt = self.attempts, outcome = submission.outcome.label(), "Session advanced");
        submission.outcome
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_success()
    }
}
