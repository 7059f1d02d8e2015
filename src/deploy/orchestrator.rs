// ABOUTME: Runs a full deployment: create version, update environment, optionally wait.
// ABOUTME: Converts errors and poll results into one Outcome and reports them.

use snafu::ensure;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::error::{DeployError, InterruptedSnafu};
use super::outcome::{Outcome, PollOutcome};
use super::plan::DeploymentPlan;
use super::Deployment;
use crate::progress::{DeploymentReporter, ProblemScope, ProgressSink};
use crate::provider::BeanstalkApi;

/// Sequences the deployment steps against one provider and one sink.
pub struct DeploymentOrchestrator<'a, A: ?Sized> {
    api: &'a A,
    sink: &'a dyn ProgressSink,
    cancel: CancellationToken,
}

impl<'a, A: BeanstalkApi + ?Sized> DeploymentOrchestrator<'a, A> {
    pub fn new(api: &'a A, sink: &'a dyn ProgressSink) -> Self {
        Self {
            api,
            sink,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned token; cancelling it interrupts the run.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Deploy `plan` and report every step.
    ///
    /// Never fails: provider errors and interruptions are reported on the
    /// sink and returned as [`Outcome::Exception`] or [`Outcome::Interrupted`].
    #[instrument(skip_all, fields(
        application = %plan.version_request().application,
        environment = %plan.update_request().environment,
        version = %plan.version_label(),
    ))]
    pub async fn run(&self, plan: DeploymentPlan) -> Outcome {
        let scope = ProblemScope::new(plan.version_request(), plan.update_request());
        let reporter = DeploymentReporter::new(self.sink, scope);

        match self.execute(plan, &reporter).await {
            Ok(outcome) => {
                tracing::info!(?outcome, "deployment finished");
                outcome
            }
            Err(error) => {
                reporter.exception(&error);
                Outcome::from_error(&error)
            }
        }
    }

    async fn execute(
        &self,
        plan: DeploymentPlan,
        reporter: &DeploymentReporter<'_>,
    ) -> Result<Outcome, DeployError> {
        let wait = plan.wait_settings();

        self.ensure_active()?;
        let deployment = Deployment::new(plan)
            .create_version(self.api, reporter)
            .await?;

        self.ensure_active()?;
        let deployment = deployment.update_environment(self.api, reporter).await?;

        let Some(settings) = wait else {
            reporter.deployment_accepted(deployment.plan().update_request());
            return Ok(Outcome::Success);
        };

        self.ensure_active()?;
        let poll = deployment
            .wait(self.api, reporter, settings, &self.cancel)
            .await?;

        match &poll {
            PollOutcome::Succeeded { snapshot } => {
                reporter.deployment_succeeded(&snapshot.environment_name, deployment.version_label());
            }
            PollOutcome::Failed {
                timed_out, error, ..
            } => {
                reporter.deployment_failed(*timed_out, error.as_ref());
            }
        }
        Ok(Outcome::from(&poll))
    }

    fn ensure_active(&self) -> Result<(), DeployError> {
        ensure!(!self.cancel.is_cancelled(), InterruptedSnafu);
        Ok(())
    }
}
