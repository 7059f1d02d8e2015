// ABOUTME: Immutable description of one deployment run.
// ABOUTME: Bundles the version and update requests with optional wait settings.

use std::time::Duration;

use crate::provider::{ApplicationVersionRequest, EnvironmentUpdateRequest};
use crate::types::{ApplicationName, EnvironmentName, SourceBundle, VersionLabel};

/// Poll interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// How long and how often to poll for deployment completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitSettings {
    /// Wait up to `timeout`, polling every [`DEFAULT_POLL_INTERVAL`].
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Everything a run needs: which version to create, where to deploy it and
/// whether to wait for the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPlan {
    version: ApplicationVersionRequest,
    update: EnvironmentUpdateRequest,
    wait: Option<WaitSettings>,
}

impl DeploymentPlan {
    /// Plan a fire-and-forget deployment of `version_label` to `environment`.
    pub fn new(
        application: ApplicationName,
        environment: EnvironmentName,
        version_label: VersionLabel,
        source: SourceBundle,
    ) -> Self {
        Self {
            version: ApplicationVersionRequest {
                application,
                version_label: version_label.clone(),
                source,
                skip_if_exists: false,
            },
            update: EnvironmentUpdateRequest {
                environment,
                version_label,
            },
            wait: None,
        }
    }

    /// Reuse an existing version with the same label instead of failing.
    pub fn skip_existing_version(mut self, skip: bool) -> Self {
        self.version.skip_if_exists = skip;
        self
    }

    /// Wait for the deployment to finish.
    pub fn wait(mut self, settings: WaitSettings) -> Self {
        self.wait = Some(settings);
        self
    }

    pub fn version_request(&self) -> &ApplicationVersionRequest {
        &self.version
    }

    pub fn update_request(&self) -> &EnvironmentUpdateRequest {
        &self.update
    }

    pub fn wait_settings(&self) -> Option<WaitSettings> {
        self.wait
    }

    pub fn version_label(&self) -> &VersionLabel {
        &self.update.version_label
    }
}
