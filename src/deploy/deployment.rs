// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::types::{EnvironmentId, VersionLabel};

use super::plan::DeploymentPlan;
use super::state::{EnvironmentUpdating, Initialized, VersionCreated};

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries state-specific data (like the
/// environment ID returned by the update) so it only exists once the step
/// that produces it has run.
///
/// ```compile_fail
/// use beanpole::deploy::{Deployment, Initialized};
///
/// // No environment exists before the update step
/// fn environment_of(deployment: &Deployment<Initialized>) {
///     let _ = deployment.environment_id();
/// }
/// ```
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) plan: DeploymentPlan,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(plan: DeploymentPlan) -> Self {
        Deployment {
            plan,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn plan(&self) -> &DeploymentPlan {
        &self.plan
    }

    pub fn version_label(&self) -> &VersionLabel {
        self.plan.version_label()
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

impl Deployment<VersionCreated> {
    pub fn reused_existing_version(&self) -> bool {
        self.state.reused_existing()
    }
}

impl Deployment<EnvironmentUpdating> {
    pub fn environment_id(&self) -> &EnvironmentId {
        self.state.environment_id()
    }
}
