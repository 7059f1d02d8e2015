// ABOUTME: Turns deployment lifecycle events into ProgressSink notifications.
// ABOUTME: Owns section bracketing, message wording and stable problem identities.

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use super::{ProblemKind, ProgressSink};
use crate::deploy::{DeployError, ErrorInfo};
use crate::provider::{ApplicationVersionRequest, DeploymentEvent, EnvironmentUpdateRequest};
use crate::types::{EnvironmentId, VersionLabel};

pub const CREATE_VERSION_SECTION: &str = "Create version";
pub const UPDATE_ENVIRONMENT_SECTION: &str = "Update environment";

/// Deployment target fields that make up every problem identity.
///
/// Two runs against the same target that fail the same way produce the same
/// identity, so the host collapses them into one tracked problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemScope {
    fields: Vec<String>,
}

impl ProblemScope {
    pub fn new(version: &ApplicationVersionRequest, update: &EnvironmentUpdateRequest) -> Self {
        Self {
            fields: vec![
                version.source.key().to_string(),
                version.source.bucket().to_string(),
                update.environment.to_string(),
                version.application.to_string(),
                version.skip_if_exists.to_string(),
                version.version_label.to_string(),
            ],
        }
    }

    /// Stable numeric identity for a problem classified by `parts`.
    pub fn identity(&self, parts: &[&str]) -> i32 {
        let mut hasher = Sha256::new();
        for field in self.fields.iter().map(String::as_str).chain(parts.iter().copied()) {
            hasher.update((field.len() as u64).to_be_bytes());
            hasher.update(field.as_bytes());
        }
        let digest = hasher.finalize();
        i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
    }
}

/// Reports one deployment run to a [`ProgressSink`].
///
/// At most one section is open at a time. Terminal notifications close it,
/// and closing twice is a no-op.
pub struct DeploymentReporter<'a> {
    sink: &'a dyn ProgressSink,
    scope: ProblemScope,
    open_section: Mutex<Option<&'static str>>,
}

impl<'a> DeploymentReporter<'a> {
    pub fn new(sink: &'a dyn ProgressSink, scope: ProblemScope) -> Self {
        Self {
            sink,
            scope,
            open_section: Mutex::new(None),
        }
    }

    pub fn create_version_started(&self, request: &ApplicationVersionRequest) {
        self.open(CREATE_VERSION_SECTION);
        self.sink.message(&format!(
            "Creating application {} version {} with bucket {} and key {}.",
            request.application,
            request.version_label,
            request.source.bucket(),
            request.source.key()
        ));
    }

    pub fn create_version_skipped(&self, request: &ApplicationVersionRequest) {
        self.sink.message(&format!(
            "Application {} version {} already exists, skipping upload...",
            request.application, request.version_label
        ));
        self.close();
    }

    pub fn create_version_finished(&self, request: &ApplicationVersionRequest) {
        self.sink.message(&format!(
            "Created application {} version {} with bucket {} and key {}.",
            request.application,
            request.version_label,
            request.source.bucket(),
            request.source.key()
        ));
        self.close();
    }

    /// Opens the update section before the provider is asked to deploy.
    pub fn update_started(&self) {
        self.open(UPDATE_ENVIRONMENT_SECTION);
    }

    pub fn deployment_started(
        &self,
        version: &ApplicationVersionRequest,
        update: &EnvironmentUpdateRequest,
        environment_id: &EnvironmentId,
    ) {
        tracing::debug!(%environment_id, "environment update accepted");
        self.sink.message(&format!(
            "Started deployment of application {} version {} to {}.",
            version.application, update.version_label, update.environment
        ));
    }

    /// Fire-and-forget deployments end here once the update is accepted.
    pub fn deployment_accepted(&self, update: &EnvironmentUpdateRequest) {
        let message = format!(
            "Deployment of version {} to {} started.",
            update.version_label, update.environment
        );
        self.sink
            .message("Not waiting for deployment finish, the environment keeps updating.");
        self.sink.status_suffix(&message);
        self.close();
    }

    pub fn wait_started(&self) {
        self.sink.message("Waiting for deployment finish.");
    }

    /// Heartbeat emitted on every poll.
    pub fn in_progress(&self, environment_name: &str) {
        self.sink.progress_update(&format!(
            "Waiting for deployment on environment {environment_name}."
        ));
    }

    pub fn event(&self, event: &DeploymentEvent) {
        self.sink.progress_update(event.message());
    }

    pub fn deployment_succeeded(&self, environment_name: &str, version_label: &VersionLabel) {
        let message = format!(
            "Version {version_label} was deployed to {environment_name} successfully."
        );
        self.sink.message(&message);
        self.sink.status_suffix(&message);
        self.close();
    }

    pub fn deployment_failed(&self, timed_out: bool, error: Option<&ErrorInfo>) {
        let (kind, description) = if timed_out {
            (
                ProblemKind::Timeout,
                "Timeout exceeded waiting for deployment to finish".to_string(),
            )
        } else {
            let description = match error {
                Some(info) if !info.message.is_empty() => {
                    format!("Deployment failed: {}", info.message)
                }
                _ => "Deployment failed".to_string(),
            };
            (ProblemKind::Failure, description)
        };

        let (message, severity) = match error {
            Some(info) => {
                if !info.message.is_empty() {
                    self.sink
                        .error_message(&format!("Associated error: {}", info.message));
                }
                self.sink
                    .error_message(&format!("Error severity: {}", info.severity));
                (info.message.as_str(), info.severity.as_str())
            }
            None => ("", ""),
        };

        let timed_out = timed_out.to_string();
        let identity = self.scope.identity(&[&timed_out, message, severity]);
        self.sink.report_problem(identity, kind, &description);
        self.close();
    }

    pub fn exception(&self, error: &DeployError) {
        tracing::error!(%error, "deployment aborted");

        let message = error.to_string();
        self.sink.error_message(&message);
        if let Some(details) = error.details() {
            self.sink.error_message(&details);
        }

        let kind = error.problem_kind();
        let identity = self.scope.identity(&[kind.as_str(), &message]);
        self.sink.report_problem(identity, kind, &message);
        self.close();
    }

    fn open(&self, section: &'static str) {
        let mut open = self.open_section.lock();
        if let Some(previous) = open.replace(section) {
            self.sink.section_finished(previous);
        }
        self.sink.section_started(section);
    }

    fn close(&self) {
        if let Some(section) = self.open_section.lock().take() {
            self.sink.section_finished(section);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApplicationName, EnvironmentName, SourceBundle};

    fn requests(key: &str) -> (ApplicationVersionRequest, EnvironmentUpdateRequest) {
        let label = VersionLabel::new("1.0.0-alpha1").unwrap();
        (
            ApplicationVersionRequest {
                application: ApplicationName::new("APP-NAME-BAR").unwrap(),
                version_label: label.clone(),
                source: SourceBundle::new("bucketName", key).unwrap(),
                skip_if_exists: false,
            },
            EnvironmentUpdateRequest {
                environment: EnvironmentName::new("ENV-NAME-FOO").unwrap(),
                version_label: label,
            },
        )
    }

    #[test]
    fn identity_is_deterministic() {
        let (version, update) = requests("path/key.zip");
        let a = ProblemScope::new(&version, &update);
        let b = ProblemScope::new(&version, &update);
        assert_eq!(a.identity(&["true", "", ""]), b.identity(&["true", "", ""]));
    }

    #[test]
    fn identity_separates_targets_and_causes() {
        let (version, update) = requests("path/key.zip");
        let scope = ProblemScope::new(&version, &update);
        let (other_version, other_update) = requests("path/other.zip");
        let other = ProblemScope::new(&other_version, &other_update);

        assert_ne!(
            scope.identity(&["true", "", ""]),
            scope.identity(&["false", "", ""])
        );
        assert_ne!(
            scope.identity(&["false", "a", ""]),
            other.identity(&["false", "a", ""])
        );
    }

    #[test]
    fn field_boundaries_matter() {
        let (version, update) = requests("path/key.zip");
        let scope = ProblemScope::new(&version, &update);
        assert_ne!(scope.identity(&["ab", "c"]), scope.identity(&["a", "bc"]));
    }
}
