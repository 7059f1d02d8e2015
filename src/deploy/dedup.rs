// ABOUTME: Tracks which provider events were already reported in a poll session.
// ABOUTME: Overlapping event windows are filtered down to the events not seen before.

use std::collections::HashSet;

use crate::provider::{DeploymentEvent, EventIdentity};

/// Grow-only set of reported event identities.
#[derive(Debug, Default)]
pub struct SeenEvents {
    seen: HashSet<EventIdentity>,
}

impl SeenEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only events not reported yet, in input order, and remember them.
    pub fn filter_new(
        &mut self,
        events: impl IntoIterator<Item = DeploymentEvent>,
    ) -> Vec<DeploymentEvent> {
        events
            .into_iter()
            .filter(|event| self.seen.insert(event.identity()))
            .collect()
    }

    pub fn contains(&self, identity: &EventIdentity) -> bool {
        self.seen.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
