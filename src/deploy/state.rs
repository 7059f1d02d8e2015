// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Later states carry the data earlier steps produced.

use crate::types::EnvironmentId;

use super::poller::PollStart;

/// Initial state: nothing sent to the provider yet.
/// Available actions: `create_version()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Version created (or an existing one reused).
/// Available actions: `update_environment()`
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionCreated {
    pub(crate) reused_existing: bool,
}

impl VersionCreated {
    /// Whether an existing version with the same label was reused.
    pub fn reused_existing(&self) -> bool {
        self.reused_existing
    }
}

/// Environment update accepted by the provider.
/// Available actions: `wait()`
#[derive(Debug, Clone)]
pub struct EnvironmentUpdating {
    pub(crate) environment_id: EnvironmentId,
    pub(crate) started: PollStart,
}

impl EnvironmentUpdating {
    pub fn environment_id(&self) -> &EnvironmentId {
        &self.environment_id
    }

    /// When the update was requested; events are fetched from here on.
    pub fn started(&self) -> PollStart {
        self.started
    }
}
