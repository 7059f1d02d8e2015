// ABOUTME: In-memory ProgressSink that records every notification.
// ABOUTME: Used by hosts and tests to assert on the exact notification sequence.

use parking_lot::Mutex;

use super::{ProblemKind, ProgressSink};

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkRecord {
    SectionStarted(String),
    SectionFinished(String),
    Message(String),
    Error(String),
    Progress(String),
    Problem {
        identity: i32,
        kind: ProblemKind,
        description: String,
    },
    Status(String),
}

impl SinkRecord {
    /// Compact single-line rendering, e.g. `OPEN Create version`.
    pub fn render(&self) -> String {
        match self {
            SinkRecord::SectionStarted(name) => format!("OPEN {name}"),
            SinkRecord::SectionFinished(name) => format!("CLOSE {name}"),
            SinkRecord::Message(text) => format!("LOG {text}"),
            SinkRecord::Error(text) => format!("ERR {text}"),
            SinkRecord::Progress(text) => format!("PROGRESS {text}"),
            SinkRecord::Problem {
                kind, description, ..
            } => format!("PROBLEM {kind} {description}"),
            SinkRecord::Status(text) => format!("STATUS {text}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<SinkRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<SinkRecord> {
        self.records.lock().clone()
    }

    /// Recorded notifications rendered with [`SinkRecord::render`].
    pub fn lines(&self) -> Vec<String> {
        self.records.lock().iter().map(SinkRecord::render).collect()
    }

    pub fn problems(&self) -> Vec<SinkRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| matches!(r, SinkRecord::Problem { .. }))
            .cloned()
            .collect()
    }

    fn push(&self, record: SinkRecord) {
        self.records.lock().push(record);
    }
}

impl ProgressSink for RecordingSink {
    fn section_started(&self, name: &str) {
        self.push(SinkRecord::SectionStarted(name.to_string()));
    }

    fn section_finished(&self, name: &str) {
        self.push(SinkRecord::SectionFinished(name.to_string()));
    }

    fn message(&self, text: &str) {
        self.push(SinkRecord::Message(text.to_string()));
    }

    fn error_message(&self, text: &str) {
        self.push(SinkRecord::Error(text.to_string()));
    }

    fn progress_update(&self, text: &str) {
        self.push(SinkRecord::Progress(text.to_string()));
    }

    fn report_problem(&self, identity: i32, kind: ProblemKind, description: &str) {
        self.push(SinkRecord::Problem {
            identity,
            kind,
            description: description.to_string(),
        });
    }

    fn status_suffix(&self, text: &str) {
        self.push(SinkRecord::Status(text.to_string()));
    }
}
