// ABOUTME: Progress reporting channel between the deployment core and its host.
// ABOUTME: Defines the ProgressSink capability and the sinks shipped with the crate.

mod console;
mod recording;
mod reporter;
mod service_message;

pub use console::{ConsoleSink, OutputMode};
pub use recording::{RecordingSink, SinkRecord};
pub use reporter::{CREATE_VERSION_SECTION, DeploymentReporter, ProblemScope, UPDATE_ENVIRONMENT_SECTION};
pub use service_message::{ServiceMessageSink, escape};

use std::fmt;

/// Notifications the host receives while a deployment runs.
///
/// This is the core's only observable output besides the final outcome. Any
/// adapter (build log, console, test capture) can implement it.
pub trait ProgressSink: Send + Sync {
    /// A collapsible log section begins.
    fn section_started(&self, name: &str);

    /// The section opened with the same name ends.
    fn section_finished(&self, name: &str);

    fn message(&self, text: &str);

    fn error_message(&self, text: &str);

    /// Transient progress line, replaced by the next one.
    fn progress_update(&self, text: &str);

    /// Register a build problem. Equal identities describe the same failure.
    fn report_problem(&self, identity: i32, kind: ProblemKind, description: &str);

    /// Text appended to the build status line.
    fn status_suffix(&self, text: &str);
}

/// Classification of a reported problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// Deployment did not finish before the wait timeout.
    Timeout,
    /// Provider reported the environment update as failed.
    Failure,
    /// Unexpected error, including interruption.
    Exception,
    /// Provider rejected a request.
    Client,
    /// Provider failed to handle a request.
    Service,
}

impl ProblemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemKind::Timeout => "ELASTICBEANSTALK_TIMEOUT",
            ProblemKind::Failure => "ELASTICBEANSTALK_FAILURE",
            ProblemKind::Exception => "ELASTICBEANSTALK_EXCEPTION",
            ProblemKind::Client => "ELASTICBEANSTALK_CLIENT",
            ProblemKind::Service => "ELASTICBEANSTALK_SERVICE",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
