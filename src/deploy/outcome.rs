// ABOUTME: Terminal results of a poll session and of a whole deployment run.
// ABOUTME: Timeouts and failed updates are values here, not errors.

use crate::provider::{DeploymentEvent, EnvironmentSnapshot, EventSeverity};

use super::DeployError;

/// Detail taken from the first error event of a failed deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    pub severity: EventSeverity,
}

impl ErrorInfo {
    pub fn from_event(event: &DeploymentEvent) -> Self {
        let message = event.message();
        Self {
            message: message.strip_suffix('.').unwrap_or(message).to_string(),
            severity: event.severity(),
        }
    }
}

/// How a poll session ended, when it ended on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The environment runs the target version.
    Succeeded { snapshot: EnvironmentSnapshot },
    /// The environment settled on another version, or the wait timed out.
    Failed {
        snapshot: EnvironmentSnapshot,
        timed_out: bool,
        error: Option<ErrorInfo>,
    },
}

impl PollOutcome {
    pub fn snapshot(&self) -> &EnvironmentSnapshot {
        match self {
            PollOutcome::Succeeded { snapshot } | PollOutcome::Failed { snapshot, .. } => snapshot,
        }
    }
}

/// Result of one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure {
        message: Option<String>,
        severity: Option<EventSeverity>,
        timed_out: bool,
    },
    Exception {
        message: String,
        details: Option<String>,
    },
    /// Cancelled from outside; reported like an exception.
    Interrupted,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Exceptions and interruptions, as opposed to deployment failures.
    pub fn is_exception(&self) -> bool {
        matches!(self, Outcome::Exception { .. } | Outcome::Interrupted)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Outcome::Failure { timed_out: true, .. })
    }

    pub fn from_error(error: &DeployError) -> Self {
        if error.is_interrupted() {
            return Outcome::Interrupted;
        }
        Outcome::Exception {
            message: error.to_string(),
            details: error.details(),
        }
    }
}

impl From<&PollOutcome> for Outcome {
    fn from(poll: &PollOutcome) -> Self {
        match poll {
            PollOutcome::Succeeded { .. } => Outcome::Success,
            PollOutcome::Failed {
                timed_out, error, ..
            } => Outcome::Failure {
                message: error.as_ref().map(|e| e.message.clone()),
                severity: error.as_ref().map(|e| e.severity),
                timed_out: *timed_out,
            },
        }
    }
}
