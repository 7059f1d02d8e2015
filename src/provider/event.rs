// ABOUTME: Deployment events reported by the provider for an environment.
// ABOUTME: Each event carries a content-derived identity used for deduplication.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::types::RequestId;

/// Severity attached to a provider event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventSeverity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl EventSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSeverity::Trace => "TRACE",
            EventSeverity::Debug => "DEBUG",
            EventSeverity::Info => "INFO",
            EventSeverity::Warn => "WARN",
            EventSeverity::Error => "ERROR",
            EventSeverity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown event severity: {0}")]
pub struct ParseSeverityError(String);

impl FromStr for EventSeverity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(EventSeverity::Trace),
            "DEBUG" => Ok(EventSeverity::Debug),
            "INFO" => Ok(EventSeverity::Info),
            "WARN" => Ok(EventSeverity::Warn),
            "ERROR" => Ok(EventSeverity::Error),
            "FATAL" => Ok(EventSeverity::Fatal),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// Content-derived identity of an event.
///
/// Two fetches of the same provider event hash to the same identity, which is
/// what lets overlapping event windows be deduplicated.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventIdentity([u8; 32]);

impl EventIdentity {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for EventIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventIdentity(")?;
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

/// A provider-emitted log entry for an environment's update activity.
///
/// Fields are read-only so the identity can't drift from the content it was
/// computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentEvent {
    identity: EventIdentity,
    timestamp: DateTime<Utc>,
    severity: EventSeverity,
    message: String,
    version_label: Option<String>,
    request_id: Option<RequestId>,
}

impl DeploymentEvent {
    pub fn new(timestamp: DateTime<Utc>, severity: EventSeverity, message: impl Into<String>) -> Self {
        let mut event = Self {
            identity: EventIdentity([0; 32]),
            timestamp,
            severity,
            message: message.into(),
            version_label: None,
            request_id: None,
        };
        event.identity = event.compute_identity();
        event
    }

    /// Attach the version label the event refers to.
    pub fn with_version_label(mut self, label: impl Into<String>) -> Self {
        self.version_label = Some(label.into());
        self.identity = self.compute_identity();
        self
    }

    /// Attach the provider request that produced the event.
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self.identity = self.compute_identity();
        self
    }

    pub fn identity(&self) -> EventIdentity {
        self.identity
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn severity(&self) -> EventSeverity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn version_label(&self) -> Option<&str> {
        self.version_label.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    fn compute_identity(&self) -> EventIdentity {
        let timestamp = self.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true);
        let fields = [
            Some(timestamp.as_str()),
            Some(self.severity.as_str()),
            Some(self.message.as_str()),
            self.version_label.as_deref(),
            self.request_id.as_ref().map(|id| id.as_str()),
        ];

        // Length-prefix every field so ("ab", "c") and ("a", "bc") differ.
        let mut hasher = Sha256::new();
        for field in fields {
            match field {
                Some(value) => {
                    hasher.update([1u8]);
                    hasher.update((value.len() as u64).to_be_bytes());
                    hasher.update(value.as_bytes());
                }
                None => hasher.update([0u8]),
            }
        }
        EventIdentity(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn identity_is_stable_across_fetches() {
        let first = DeploymentEvent::new(at(0), EventSeverity::Info, "Environment update is starting.")
            .with_request_id(RequestId::new("req-1"));
        let again = DeploymentEvent::new(at(0), EventSeverity::Info, "Environment update is starting.")
            .with_request_id(RequestId::new("req-1"));
        assert_eq!(first.identity(), again.identity());
    }

    #[test]
    fn identity_depends_on_content() {
        let base = DeploymentEvent::new(at(0), EventSeverity::Info, "Deploying new version.");
        let later = DeploymentEvent::new(at(1), EventSeverity::Info, "Deploying new version.");
        let louder = DeploymentEvent::new(at(0), EventSeverity::Warn, "Deploying new version.");
        let labelled = base.clone().with_version_label("1.0.0");

        assert_ne!(base.identity(), later.identity());
        assert_ne!(base.identity(), louder.identity());
        assert_ne!(base.identity(), labelled.identity());
    }

    #[test]
    fn missing_and_empty_fields_hash_differently() {
        let none = DeploymentEvent::new(at(0), EventSeverity::Info, "x");
        let empty = none.clone().with_version_label("");
        assert_ne!(none.identity(), empty.identity());
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("error".parse::<EventSeverity>().unwrap(), EventSeverity::Error);
        assert_eq!("FATAL".parse::<EventSeverity>().unwrap(), EventSeverity::Fatal);
        assert!("loud".parse::<EventSeverity>().is_err());
    }
}
