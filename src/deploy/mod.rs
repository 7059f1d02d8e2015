// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, the poller and the orchestrator that drives a run.

mod dedup;
mod deployment;
mod error;
mod orchestrator;
mod outcome;
mod plan;
mod poller;
mod state;
mod status;
mod transitions;

pub use dedup::SeenEvents;
pub use deployment::Deployment;
pub use error::DeployError;
pub use orchestrator::DeploymentOrchestrator;
pub use outcome::{ErrorInfo, Outcome, PollOutcome};
pub use plan::{DEFAULT_POLL_INTERVAL, DeploymentPlan, WaitSettings};
pub use poller::{DeploymentPoller, ERROR_EVENTS_LIMIT, PollStart, PollState, RECENT_EVENTS_LIMIT};
pub use state::{EnvironmentUpdating, Initialized, VersionCreated};
pub use status::EnvironmentPhase;
