// ABOUTME: Errors surfaced by the cloud API port.
// ABOUTME: Classifies provider failures into client, service and transport problems.

use crate::progress::ProblemKind;

/// Errors from provider operations.
///
/// The core never retries; adapters are expected to have exhausted their own
/// retry policy before returning one of these.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("application {application} version {version_label} already exists")]
    VersionAlreadyExists {
        application: String,
        version_label: String,
    },

    #[error("environment not found: {0}")]
    EnvironmentNotFound(String),

    /// The request was rejected (bad parameters, missing permissions).
    #[error("{message}")]
    Client {
        message: String,
        details: Option<String>,
    },

    /// The provider failed to handle a valid request.
    #[error("{message}")]
    Service {
        message: String,
        code: Option<String>,
        request_id: Option<String>,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Problem classification used when reporting this error.
    pub fn problem_kind(&self) -> ProblemKind {
        match self {
            ProviderError::Client { .. } => ProblemKind::Client,
            ProviderError::Service { .. } => ProblemKind::Service,
            _ => ProblemKind::Exception,
        }
    }

    /// Extra detail worth showing below the main message, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            ProviderError::Client { details, .. } => details.clone(),
            ProviderError::Service {
                code, request_id, ..
            } => {
                let parts: Vec<String> = [
                    code.as_ref().map(|c| format!("error code: {c}")),
                    request_id.as_ref().map(|r| format!("request id: {r}")),
                ]
                .into_iter()
                .flatten()
                .collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => None,
        }
    }
}
