// ABOUTME: Cloud API port for the Beanstalk-style platform.
// ABOUTME: Defines the request, snapshot and query types the deployment core exchanges with adapters.

mod error;
mod event;

pub use error::ProviderError;
pub use event::{DeploymentEvent, EventIdentity, EventSeverity, ParseSeverityError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::types::{
    ApplicationName, EnvironmentId, EnvironmentName, SourceBundle, VersionLabel,
};

/// Operations the deployment core needs from the platform.
///
/// Implementations wrap an authenticated SDK client. Every method maps to one
/// provider call; retries belong in the implementation, not in the caller.
#[async_trait]
pub trait BeanstalkApi: Send + Sync {
    /// Register a new application version pointing at an uploaded bundle.
    ///
    /// Must return [`ProviderError::VersionAlreadyExists`] when the label is taken.
    async fn create_application_version(
        &self,
        request: &ApplicationVersionRequest,
    ) -> Result<(), ProviderError>;

    /// Ask the environment to switch to a version. Returns the environment ID.
    async fn update_environment(
        &self,
        request: &EnvironmentUpdateRequest,
    ) -> Result<EnvironmentId, ProviderError>;

    /// Fetch the current state of an environment.
    async fn describe_environment(
        &self,
        id: &EnvironmentId,
    ) -> Result<EnvironmentSnapshot, ProviderError>;

    /// List events for an environment, newest first as the provider orders them.
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<DeploymentEvent>, ProviderError>;
}

#[async_trait]
impl<T: BeanstalkApi + ?Sized> BeanstalkApi for &T {
    async fn create_application_version(
        &self,
        request: &ApplicationVersionRequest,
    ) -> Result<(), ProviderError> {
        (**self).create_application_version(request).await
    }

    async fn update_environment(
        &self,
        request: &EnvironmentUpdateRequest,
    ) -> Result<EnvironmentId, ProviderError> {
        (**self).update_environment(request).await
    }

    async fn describe_environment(
        &self,
        id: &EnvironmentId,
    ) -> Result<EnvironmentSnapshot, ProviderError> {
        (**self).describe_environment(id).await
    }

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<DeploymentEvent>, ProviderError> {
        (**self).list_events(query).await
    }
}

#[async_trait]
impl<T: BeanstalkApi + ?Sized> BeanstalkApi for Arc<T> {
    async fn create_application_version(
        &self,
        request: &ApplicationVersionRequest,
    ) -> Result<(), ProviderError> {
        (**self).create_application_version(request).await
    }

    async fn update_environment(
        &self,
        request: &EnvironmentUpdateRequest,
    ) -> Result<EnvironmentId, ProviderError> {
        (**self).update_environment(request).await
    }

    async fn describe_environment(
        &self,
        id: &EnvironmentId,
    ) -> Result<EnvironmentSnapshot, ProviderError> {
        (**self).describe_environment(id).await
    }

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<DeploymentEvent>, ProviderError> {
        (**self).list_events(query).await
    }
}

/// Request to register a new application version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationVersionRequest {
    pub application: ApplicationName,
    pub version_label: VersionLabel,
    pub source: SourceBundle,
    /// Treat "version already exists" as success instead of an error.
    pub skip_if_exists: bool,
}

/// Request to deploy a version to an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentUpdateRequest {
    pub environment: EnvironmentName,
    pub version_label: VersionLabel,
}

/// Point-in-time view of an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    pub environment_id: EnvironmentId,
    pub environment_name: String,
    pub application_name: String,
    /// Status string exactly as the provider reported it.
    pub raw_status: String,
    /// Version currently running, if the environment reports one.
    pub current_version_label: Option<String>,
}

impl EnvironmentSnapshot {
    /// Whether the environment runs the given version.
    pub fn runs_version(&self, label: &VersionLabel) -> bool {
        self.current_version_label.as_deref() == Some(label.as_str())
    }
}

/// Filter for [`BeanstalkApi::list_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub environment_id: EnvironmentId,
    pub since: Option<DateTime<Utc>>,
    pub max_records: u32,
    pub severity: Option<EventSeverity>,
    pub version_label: Option<VersionLabel>,
}

impl EventQuery {
    /// All events for an environment, capped at `max_records`.
    pub fn new(environment_id: EnvironmentId, max_records: u32) -> Self {
        Self {
            environment_id,
            since: None,
            max_records,
            severity: None,
            version_label: None,
        }
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn severity(mut self, severity: EventSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn version_label(mut self, label: VersionLabel) -> Self {
        self.version_label = Some(label);
        self
    }
}
