// ABOUTME: ProgressSink for running a deployment from a terminal or plain CI log.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use super::{ProblemKind, ProgressSink};

/// Output mode for console feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (errors, problems and final status only)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Prints deployment progress to stdout/stderr.
pub struct ConsoleSink {
    mode: OutputMode,
    started: Instant,
}

impl ConsoleSink {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started: Instant::now(),
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn json(&self, event: JsonEvent<'_>, to_stderr: bool) {
        if let Ok(json) = serde_json::to_string(&event) {
            if to_stderr {
                eprintln!("{json}");
            } else {
                println!("{json}");
            }
        }
    }
}

impl ProgressSink for ConsoleSink {
    fn section_started(&self, name: &str) {
        match self.mode {
            OutputMode::Normal => println!("→ {name}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.json(JsonEvent::new("section_started", name), false),
        }
    }

    fn section_finished(&self, name: &str) {
        if self.mode == OutputMode::Json {
            self.json(JsonEvent::new("section_finished", name), false);
        }
    }

    fn message(&self, text: &str) {
        match self.mode {
            OutputMode::Normal => println!("  {text}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.json(JsonEvent::new("message", text), false),
        }
    }

    fn error_message(&self, text: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {text}"),
            OutputMode::Json => self.json(JsonEvent::new("error", text), true),
        }
    }

    fn progress_update(&self, text: &str) {
        match self.mode {
            OutputMode::Normal => println!("  … {text}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.json(JsonEvent::new("progress", text), false),
        }
    }

    fn report_problem(&self, identity: i32, kind: ProblemKind, description: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("  ✗ {description} [{kind}]");
            }
            OutputMode::Json => {
                let mut event = JsonEvent::new("problem", description);
                event.kind = Some(kind.as_str());
                event.identity = Some(identity);
                self.json(event, true);
            }
        }
    }

    fn status_suffix(&self, text: &str) {
        match self.mode {
            OutputMode::Normal => println!("  ✓ {text} ({:.1}s)", self.elapsed_secs()),
            OutputMode::Quiet => println!("{text}"),
            OutputMode::Json => {
                let mut event = JsonEvent::new("status", text);
                event.duration_secs = Some(self.elapsed_secs());
                self.json(event, false);
            }
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

impl<'a> JsonEvent<'a> {
    fn new(event: &'a str, message: &'a str) -> Self {
        Self {
            event,
            message,
            kind: None,
            identity: None,
            duration_secs: None,
        }
    }
}
