// ABOUTME: ProgressSink writing TeamCity-style service messages.
// ABOUTME: Lets a CI server pick up sections, progress, problems and status from stdout.

use parking_lot::Mutex;
use std::io::Write;

use super::{ProblemKind, ProgressSink};

/// Writes `##teamcity[...]` service messages, one per line.
pub struct ServiceMessageSink<W: Write + Send> {
    out: Mutex<W>,
}

impl ServiceMessageSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ServiceMessageSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn emit(&self, line: String) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!("failed to write service message: {}", e);
        }
    }
}

impl<W: Write + Send> ProgressSink for ServiceMessageSink<W> {
    fn section_started(&self, name: &str) {
        self.emit(format!("##teamcity[blockOpened name='{}']", escape(name)));
    }

    fn section_finished(&self, name: &str) {
        self.emit(format!("##teamcity[blockClosed name='{}']", escape(name)));
    }

    fn message(&self, text: &str) {
        self.emit(format!(
            "##teamcity[message text='{}' status='NORMAL']",
            escape(text)
        ));
    }

    fn error_message(&self, text: &str) {
        self.emit(format!(
            "##teamcity[message text='{}' status='ERROR']",
            escape(text)
        ));
    }

    fn progress_update(&self, text: &str) {
        self.emit(format!("##teamcity[progressMessage '{}']", escape(text)));
    }

    fn report_problem(&self, identity: i32, kind: ProblemKind, description: &str) {
        self.emit(format!(
            "##teamcity[buildProblem identity='{}' type='{}' description='{}' tc:tags='tc:internal']",
            identity,
            kind,
            escape(description)
        ));
    }

    fn status_suffix(&self, text: &str) {
        self.emit(format!(
            "##teamcity[buildStatus tc:tags='tc:internal' text='{{build.status.text}}; {}']",
            escape(text)
        ));
    }
}

/// Escape a value for use inside a service message attribute.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '|' => escaped.push_str("||"),
            '\'' => escaped.push_str("|'"),
            '\n' => escaped.push_str("|n"),
            '\r' => escaped.push_str("|r"),
            '[' => escaped.push_str("|["),
            ']' => escaped.push_str("|]"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(sink: ServiceMessageSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape("it's [done]|\r\n"), "it|'s |[done|]|||r|n");
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn writes_sections_and_progress() {
        let sink = ServiceMessageSink::new(Vec::new());
        sink.section_started("Update environment");
        sink.progress_update("Waiting for deployment on environment prod-env.");
        sink.section_finished("Update environment");

        assert_eq!(
            output(sink),
            "##teamcity[blockOpened name='Update environment']\n\
             ##teamcity[progressMessage 'Waiting for deployment on environment prod-env.']\n\
             ##teamcity[blockClosed name='Update environment']\n"
        );
    }

    #[test]
    fn writes_problem_and_status() {
        let sink = ServiceMessageSink::new(Vec::new());
        sink.report_problem(42, ProblemKind::Timeout, "Timeout exceeded");
        sink.status_suffix("Version 1.0 was deployed");

        assert_eq!(
            output(sink),
            "##teamcity[buildProblem identity='42' type='ELASTICBEANSTALK_TIMEOUT' description='Timeout exceeded' tc:tags='tc:internal']\n\
             ##teamcity[buildStatus tc:tags='tc:internal' text='{build.status.text}; Version 1.0 was deployed']\n"
        );
    }

    #[test]
    fn error_messages_carry_error_status() {
        let sink = ServiceMessageSink::new(Vec::new());
        sink.error_message("Associated error: boom");
        assert_eq!(
            output(sink),
            "##teamcity[message text='Associated error: boom' status='ERROR']\n"
        );
    }
}
