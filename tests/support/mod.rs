// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted BeanstalkApi fake and fixture builders for integration tests.

use std::sync::Once;

use async_trait::async_trait;
use beanpole::deploy::{DeploymentPlan, WaitSettings};
use beanpole::provider::{
    ApplicationVersionRequest, BeanstalkApi, DeploymentEvent, EnvironmentSnapshot,
    EnvironmentUpdateRequest, EventQuery, EventSeverity, ProviderError,
};
use beanpole::types::{
    ApplicationName, EnvironmentId, EnvironmentName, SourceBundle, VersionLabel,
};
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

static TRACING_INIT: Once = Once::new();

pub const ENVIRONMENT_ID: &str = "e-abc123";
pub const ENVIRONMENT_NAME: &str = "shop-prod";
pub const TARGET_VERSION: &str = "v2";

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("beanpole=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A provider call as the fake observed it.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateVersion { label: String, skip_if_exists: bool },
    UpdateEnvironment { environment: String },
    Describe,
    ListEvents {
        since: Option<DateTime<Utc>>,
        max_records: u32,
        severity: Option<EventSeverity>,
        version_label: Option<String>,
    },
}

/// What the fake returns for one poll iteration.
#[derive(Debug, Clone)]
pub struct PollScript {
    pub snapshot: Result<EnvironmentSnapshot, ProviderError>,
    pub recent: Vec<DeploymentEvent>,
    pub errors: Vec<DeploymentEvent>,
}

#[allow(dead_code)]
impl PollScript {
    pub fn status(status: &str, version: Option<&str>) -> Self {
        Self {
            snapshot: Ok(snapshot(status, version)),
            recent: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            snapshot: Err(error),
            recent: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn recent(mut self, events: Vec<DeploymentEvent>) -> Self {
        self.recent = events;
        self
    }

    pub fn errors(mut self, events: Vec<DeploymentEvent>) -> Self {
        self.errors = events;
        self
    }
}

#[derive(Debug, Default)]
struct Script {
    create_error: Option<ProviderError>,
    update_error: Option<ProviderError>,
    polls: Vec<PollScript>,
    describes: usize,
    calls: Vec<Call>,
}

/// `BeanstalkApi` fake driven by a per-poll script.
///
/// Poll N uses the Nth script; the last one repeats once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    script: Mutex<Script>,
}

#[allow(dead_code)]
impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create(self, error: ProviderError) -> Self {
        self.script.lock().create_error = Some(error);
        self
    }

    pub fn fail_update(self, error: ProviderError) -> Self {
        self.script.lock().update_error = Some(error);
        self
    }

    pub fn poll(self, poll: PollScript) -> Self {
        self.script.lock().polls.push(poll);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().calls.clone()
    }

    pub fn describe_count(&self) -> usize {
        self.script.lock().describes
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.script.lock().calls.iter().filter(|c| matches(c)).count()
    }

    fn current_poll(script: &Script) -> Option<&PollScript> {
        let index = script.describes.saturating_sub(1);
        script.polls.get(index).or_else(|| script.polls.last())
    }
}

#[async_trait]
impl BeanstalkApi for ScriptedApi {
    async fn create_application_version(
        &self,
        request: &ApplicationVersionRequest,
    ) -> Result<(), ProviderError> {
        let mut script = self.script.lock();
        script.calls.push(Call::CreateVersion {
            label: request.version_label.to_string(),
            skip_if_exists: request.skip_if_exists,
        });
        match script.create_error.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn update_environment(
        &self,
        request: &EnvironmentUpdateRequest,
    ) -> Result<EnvironmentId, ProviderError> {
        let mut script = self.script.lock();
        script.calls.push(Call::UpdateEnvironment {
            environment: request.environment.to_string(),
        });
        match script.update_error.clone() {
            Some(error) => Err(error),
            None => Ok(EnvironmentId::new(ENVIRONMENT_ID)),
        }
    }

    async fn describe_environment(
        &self,
        _id: &EnvironmentId,
    ) -> Result<EnvironmentSnapshot, ProviderError> {
        let mut script = self.script.lock();
        script.calls.push(Call::Describe);
        script.describes += 1;
        match Self::current_poll(&script) {
            Some(poll) => poll.snapshot.clone(),
            None => Err(ProviderError::EnvironmentNotFound(ENVIRONMENT_ID.to_string())),
        }
    }

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<DeploymentEvent>, ProviderError> {
        let mut script = self.script.lock();
        script.calls.push(Call::ListEvents {
            since: query.since,
            max_records: query.max_records,
            severity: query.severity,
            version_label: query.version_label.as_ref().map(ToString::to_string),
        });
        let Some(poll) = Self::current_poll(&script) else {
            return Ok(Vec::new());
        };
        let events = match query.severity {
            Some(EventSeverity::Error) => poll.errors.clone(),
            _ => poll.recent.clone(),
        };
        Ok(events
            .into_iter()
            .take(query.max_records as usize)
            .collect())
    }
}

#[allow(dead_code)]
pub fn snapshot(status: &str, version: Option<&str>) -> EnvironmentSnapshot {
    EnvironmentSnapshot {
        environment_id: EnvironmentId::new(ENVIRONMENT_ID),
        environment_name: ENVIRONMENT_NAME.to_string(),
        application_name: "shop".to_string(),
        raw_status: status.to_string(),
        current_version_label: version.map(str::to_string),
    }
}

/// Event at a fixed offset from an arbitrary epoch, so identities are stable.
#[allow(dead_code)]
pub fn event(offset_secs: i64, severity: EventSeverity, message: &str) -> DeploymentEvent {
    let at = Utc
        .timestamp_opt(1_700_000_000 + offset_secs, 0)
        .single()
        .unwrap();
    DeploymentEvent::new(at, severity, message)
}

#[allow(dead_code)]
pub fn plan() -> DeploymentPlan {
    DeploymentPlan::new(
        ApplicationName::new("shop").unwrap(),
        EnvironmentName::new(ENVIRONMENT_NAME).unwrap(),
        VersionLabel::new(TARGET_VERSION).unwrap(),
        SourceBundle::new("artifacts", "shop/v2.zip").unwrap(),
    )
}

#[allow(dead_code)]
pub fn waiting_plan(timeout_secs: u64, interval_secs: u64) -> DeploymentPlan {
    plan().wait(
        WaitSettings::new(std::time::Duration::from_secs(timeout_secs))
            .poll_interval(std::time::Duration::from_secs(interval_secs)),
    )
}
