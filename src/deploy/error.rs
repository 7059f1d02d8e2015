// ABOUTME: Error types for deployment steps, with the SNAFU pattern.
// ABOUTME: Records which step a provider failure interrupted, plus external cancellation.

use snafu::Snafu;

use crate::progress::ProblemKind;
use crate::provider::ProviderError;

/// Failures that abort a deployment run.
///
/// Timeouts and provider-reported deployment failures are not errors; they
/// come back as [`super::Outcome`] values.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DeployError {
    #[snafu(display("failed to create application version: {source}"))]
    CreateVersion { source: ProviderError },

    #[snafu(display("failed to update environment: {source}"))]
    UpdateEnvironment { source: ProviderError },

    #[snafu(display("failed to poll deployment status: {source}"))]
    Poll { source: ProviderError },

    #[snafu(display("deployment was interrupted"))]
    Interrupted,
}

impl DeployError {
    /// Problem classification used when reporting this error.
    pub fn problem_kind(&self) -> ProblemKind {
        match self.provider_error() {
            Some(source) => source.problem_kind(),
            None => ProblemKind::Exception,
        }
    }

    /// Provider-supplied details, if any.
    pub fn details(&self) -> Option<String> {
        self.provider_error().and_then(ProviderError::details)
    }

    /// The underlying provider failure, unless the run was interrupted.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            DeployError::CreateVersion { source }
            | DeployError::UpdateEnvironment { source }
            | DeployError::Poll { source } => Some(source),
            DeployError::Interrupted => None,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, DeployError::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failed_step() {
        let err = DeployError::UpdateEnvironment {
            source: ProviderError::EnvironmentNotFound("prod-env".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "failed to update environment: environment not found: prod-env"
        );
    }

    #[test]
    fn interrupted_is_an_exception_without_details() {
        let err = DeployError::Interrupted;
        assert!(err.is_interrupted());
        assert_eq!(err.problem_kind(), ProblemKind::Exception);
        assert!(err.details().is_none());
    }

    #[test]
    fn provider_classification_is_preserved() {
        let err = DeployError::CreateVersion {
            source: ProviderError::Client {
                message: "Invalid bucket".to_string(),
                details: Some("bucket is in another region".to_string()),
            },
        };
        assert_eq!(err.problem_kind(), ProblemKind::Client);
        assert_eq!(err.details().as_deref(), Some("bucket is in another region"));
    }
}
