// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use snafu::ResultExt;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::progress::DeploymentReporter;
use crate::provider::{BeanstalkApi, ProviderError};

use super::Deployment;
use super::error::{CreateVersionSnafu, DeployError, UpdateEnvironmentSnafu};
use super::outcome::PollOutcome;
use super::plan::WaitSettings;
use super::poller::{DeploymentPoller, PollStart};
use super::state::{EnvironmentUpdating, Initialized, VersionCreated};

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Deployment<S> {
    /// Internal helper to move to the next state, keeping the plan.
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            plan: self.plan,
            state,
        }
    }
}

// =============================================================================
// Initialized -> VersionCreated
// =============================================================================

impl Deployment<Initialized> {
    /// Register the application version with the provider.
    ///
    /// When the plan allows it, an existing version with the same label is
    /// reused instead of failing.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::CreateVersion` for any other provider failure.
    #[must_use = "deployment state must be used"]
    #[instrument(skip_all, fields(version = %self.version_label()))]
    pub async fn create_version<A: BeanstalkApi + ?Sized>(
        self,
        api: &A,
        reporter: &DeploymentReporter<'_>,
    ) -> Result<Deployment<VersionCreated>, DeployError> {
        let request = self.plan.version_request();
        reporter.create_version_started(request);

        let reused_existing = match api.create_application_version(request).await {
            Ok(()) => {
                reporter.create_version_finished(request);
                false
            }
            Err(ProviderError::VersionAlreadyExists { .. }) if request.skip_if_exists => {
                tracing::info!("reusing existing application version");
                reporter.create_version_skipped(request);
                true
            }
            Err(source) => return Err(source).context(CreateVersionSnafu),
        };

        Ok(self.transition(VersionCreated { reused_existing }))
    }
}

// =============================================================================
// VersionCreated -> EnvironmentUpdating
// =============================================================================

impl Deployment<VersionCreated> {
    /// Ask the provider to deploy the version to the target environment.
    ///
    /// The poll start is captured before the request so events emitted while
    /// the provider accepts it are not missed.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::UpdateEnvironment` if the provider rejects the update.
    #[must_use = "deployment state must be used"]
    #[instrument(skip_all, fields(environment = %self.plan.update_request().environment))]
    pub async fn update_environment<A: BeanstalkApi + ?Sized>(
        self,
        api: &A,
        reporter: &DeploymentReporter<'_>,
    ) -> Result<Deployment<EnvironmentUpdating>, DeployError> {
        reporter.update_started();
        let started = PollStart::now();

        let environment_id = api
            .update_environment(self.plan.update_request())
            .await
            .context(UpdateEnvironmentSnafu)?;
        reporter.deployment_started(
            self.plan.version_request(),
            self.plan.update_request(),
            &environment_id,
        );

        Ok(self.transition(EnvironmentUpdating {
            environment_id,
            started,
        }))
    }
}

// =============================================================================
// EnvironmentUpdating -> terminal
// =============================================================================

impl Deployment<EnvironmentUpdating> {
    /// Poll the environment until the deployment finishes or times out.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Poll` on provider failure and
    /// `DeployError::Interrupted` when `cancel` fires.
    pub async fn wait<A: BeanstalkApi + ?Sized>(
        &self,
        api: &A,
        reporter: &DeploymentReporter<'_>,
        settings: WaitSettings,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome, DeployError> {
        DeploymentPoller::new(api, reporter, settings, cancel.clone())
            .poll(
                &self.state.environment_id,
                self.version_label(),
                self.state.started,
            )
            .await
    }
}
