// ABOUTME: Polls an environment until its deployment reaches a terminal state.
// ABOUTME: Relays new events, enforces the timeout and honours cancellation between calls.

use std::time::Duration;

use chrono::{DateTime, Utc};
use snafu::{ResultExt, ensure};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::dedup::SeenEvents;
use super::error::{DeployError, InterruptedSnafu, PollSnafu};
use super::outcome::{ErrorInfo, PollOutcome};
use super::plan::WaitSettings;
use super::status::EnvironmentPhase;
use crate::progress::DeploymentReporter;
use crate::provider::{
    BeanstalkApi, DeploymentEvent, EnvironmentSnapshot, EventQuery, EventSeverity,
};
use crate::types::{EnvironmentId, VersionLabel};

/// Events fetched per poll for progress relaying.
pub const RECENT_EVENTS_LIMIT: u32 = 20;
/// Error events fetched per poll to detect a failed deployment.
pub const ERROR_EVENTS_LIMIT: u32 = 10;

/// Moment a deployment was requested.
///
/// The monotonic instant drives the timeout; the wall-clock time bounds the
/// provider event queries.
#[derive(Debug, Clone, Copy)]
pub struct PollStart {
    instant: Instant,
    wall: DateTime<Utc>,
}

impl PollStart {
    pub fn now() -> Self {
        Self {
            instant: Instant::now(),
            wall: Utc::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }

    /// Wall-clock time events are listed from.
    pub fn wall_clock(&self) -> DateTime<Utc> {
        self.wall
    }
}

/// Bookkeeping for one poll session.
#[derive(Debug)]
pub struct PollState {
    start: PollStart,
    /// `None` when the timeout lies past the clock's range.
    deadline: Option<Instant>,
    seen: SeenEvents,
    last_snapshot: Option<EnvironmentSnapshot>,
}

impl PollState {
    pub fn new(start: PollStart, timeout: Duration) -> Self {
        Self {
            start,
            deadline: start.instant.checked_add(timeout),
            seen: SeenEvents::new(),
            last_snapshot: None,
        }
    }

    pub fn timed_out(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() > deadline)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Record the latest snapshot, logging status transitions.
    fn observe(&mut self, snapshot: &EnvironmentSnapshot, phase: EnvironmentPhase) {
        let changed = self
            .last_snapshot
            .as_ref()
            .is_none_or(|last| last.raw_status != snapshot.raw_status);
        if changed {
            tracing::info!(
                environment = %snapshot.environment_name,
                status = %snapshot.raw_status,
                %phase,
                "environment status changed"
            );
        }
        self.last_snapshot = Some(snapshot.clone());
    }

    /// Events from `events` not relayed earlier in this session.
    fn fresh_events(&mut self, events: Vec<DeploymentEvent>) -> Vec<DeploymentEvent> {
        self.seen.filter_new(events)
    }
}

/// Drives the poll loop for one environment update.
pub struct DeploymentPoller<'a, A: ?Sized> {
    api: &'a A,
    reporter: &'a DeploymentReporter<'a>,
    settings: WaitSettings,
    cancel: CancellationToken,
}

impl<'a, A: BeanstalkApi + ?Sized> DeploymentPoller<'a, A> {
    pub fn new(
        api: &'a A,
        reporter: &'a DeploymentReporter<'a>,
        settings: WaitSettings,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            reporter,
            settings,
            cancel,
        }
    }

    /// Poll until the environment runs `version_label`, an error event shows
    /// up, the environment leaves the updating phase, or the timeout passes.
    ///
    /// Provider errors abort the session without retrying. Cancellation
    /// before a call or during the sleep returns [`DeployError::Interrupted`].
    #[instrument(skip_all, fields(environment_id = %environment_id, version = %version_label))]
    pub async fn poll(
        &self,
        environment_id: &EnvironmentId,
        version_label: &VersionLabel,
        start: PollStart,
    ) -> Result<PollOutcome, DeployError> {
        let mut state = PollState::new(start, self.settings.timeout);
        self.reporter.wait_started();

        loop {
            self.ensure_active()?;
            let snapshot = self
                .api
                .describe_environment(environment_id)
                .await
                .context(PollSnafu)?;
            self.reporter.in_progress(&snapshot.environment_name);

            let phase = EnvironmentPhase::from_provider(&snapshot.raw_status);
            tracing::debug!(
                %phase,
                current_version = snapshot.current_version_label.as_deref().unwrap_or("-"),
                elapsed_secs = state.elapsed().as_secs(),
                "polled environment"
            );
            state.observe(&snapshot, phase);

            self.ensure_active()?;
            let recent = EventQuery::new(environment_id.clone(), RECENT_EVENTS_LIMIT)
                .since(start.wall_clock());
            let events = self.api.list_events(&recent).await.context(PollSnafu)?;
            for event in state.fresh_events(events) {
                self.reporter.event(&event);
            }

            if state.timed_out() {
                tracing::warn!(
                    timeout_secs = self.settings.timeout.as_secs(),
                    "deployment did not finish in time"
                );
                return Ok(PollOutcome::Failed {
                    snapshot,
                    timed_out: true,
                    error: None,
                });
            }

            self.ensure_active()?;
            let failures = EventQuery::new(environment_id.clone(), ERROR_EVENTS_LIMIT)
                .since(start.wall_clock())
                .severity(EventSeverity::Error)
                .version_label(version_label.clone());
            let errors = self.api.list_events(&failures).await.context(PollSnafu)?;

            if !errors.is_empty() || !phase.is_updating() {
                return Ok(resolve(snapshot, version_label, &errors));
            }

            self.sleep().await?;
        }
    }

    fn ensure_active(&self) -> Result<(), DeployError> {
        ensure!(!self.cancel.is_cancelled(), InterruptedSnafu);
        Ok(())
    }

    async fn sleep(&self) -> Result<(), DeployError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => InterruptedSnafu.fail(),
            _ = tokio::time::sleep(self.settings.poll_interval) => Ok(()),
        }
    }
}

/// Terminal state once polling stops without a timeout.
fn resolve(
    snapshot: EnvironmentSnapshot,
    version_label: &VersionLabel,
    errors: &[DeploymentEvent],
) -> PollOutcome {
    if snapshot.runs_version(version_label) {
        return PollOutcome::Succeeded { snapshot };
    }
    PollOutcome::Failed {
        snapshot,
        timed_out: false,
        error: errors.first().map(ErrorInfo::from_event),
    }
}
