// ABOUTME: Maps raw provider environment statuses onto a small phase enum.
// ABOUTME: Total and pure: unrecognized statuses become Unknown instead of errors.

use std::fmt;

/// Lifecycle phase of an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvironmentPhase {
    Launching,
    Updating,
    Ready,
    Terminating,
    Terminated,
    Unknown,
}

impl EnvironmentPhase {
    /// Translate the provider's status string.
    ///
    /// Matching is exact; statuses outside the known set (`Aborting`,
    /// `LinkingFrom`, a lowercase `ready`, ...) map to `Unknown`.
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "Launching" => EnvironmentPhase::Launching,
            "Updating" => EnvironmentPhase::Updating,
            "Ready" => EnvironmentPhase::Ready,
            "Terminating" => EnvironmentPhase::Terminating,
            "Terminated" => EnvironmentPhase::Terminated,
            _ => EnvironmentPhase::Unknown,
        }
    }

    /// Whether the environment is still applying an update.
    pub fn is_updating(&self) -> bool {
        matches!(self, EnvironmentPhase::Updating)
    }
}

impl fmt::Display for EnvironmentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EnvironmentPhase::Launching => "launching",
            EnvironmentPhase::Updating => "updating",
            EnvironmentPhase::Ready => "ready",
            EnvironmentPhase::Terminating => "terminating",
            EnvironmentPhase::Terminated => "terminated",
            EnvironmentPhase::Unknown => "status is unknown",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KNOWN: [&str; 5] = ["Launching", "Updating", "Ready", "Terminating", "Terminated"];

    #[test]
    fn maps_known_statuses() {
        assert_eq!(EnvironmentPhase::from_provider("Launching"), EnvironmentPhase::Launching);
        assert_eq!(EnvironmentPhase::from_provider("Updating"), EnvironmentPhase::Updating);
        assert_eq!(EnvironmentPhase::from_provider("Ready"), EnvironmentPhase::Ready);
        assert_eq!(EnvironmentPhase::from_provider("Terminating"), EnvironmentPhase::Terminating);
        assert_eq!(EnvironmentPhase::from_provider("Terminated"), EnvironmentPhase::Terminated);
    }

    #[test]
    fn other_provider_statuses_are_unknown() {
        for raw in ["Aborting", "LinkingFrom", "LinkingTo", "ready", "", " Ready"] {
            assert_eq!(EnvironmentPhase::from_provider(raw), EnvironmentPhase::Unknown, "{raw:?}");
        }
    }

    #[test]
    fn displays_human_readable_text() {
        assert_eq!(EnvironmentPhase::Updating.to_string(), "updating");
        assert_eq!(EnvironmentPhase::Unknown.to_string(), "status is unknown");
    }

    proptest! {
        #[test]
        fn unrecognized_strings_map_to_unknown(raw in ".*") {
            prop_assume!(!KNOWN.contains(&raw.as_str()));
            prop_assert_eq!(EnvironmentPhase::from_provider(&raw), EnvironmentPhase::Unknown);
        }
    }
}
