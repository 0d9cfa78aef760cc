//! Build output monitor
//!
//! Feeds the lines of a running xmake build to an [`XMakeBuildParser`] and
//! forwards the resulting progress updates, diagnostics and unhandled lines
//! as [`BuildEvent`]s over a channel.

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::build_output::{DiagnosticTask, LineResult, LinkSpec, StreamKind, XMakeBuildParser};

/// Event produced for one line of build output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildEvent {
    Progress {
        percent: u8,
    },
    Task {
        task: DiagnosticTask,
        link_specs: Vec<LinkSpec>,
    },
    /// Line left for default handling
    Output {
        line: String,
        stream: StreamKind,
    },
}

/// Drives a build parser over one build run
pub struct BuildOutputMonitor {
    parser: XMakeBuildParser,
    event_sender: Option<mpsc::Sender<BuildEvent>>,
}

impl BuildOutputMonitor {
    /// Create a monitor that parses lines without forwarding events
    #[allow(dead_code)]
    pub fn new(parser: XMakeBuildParser) -> Self {
        Self {
            parser,
            event_sender: None,
        }
    }

    pub fn with_sender(parser: XMakeBuildParser, sender: mpsc::Sender<BuildEvent>) -> Self {
        Self {
            parser,
            event_sender: Some(sender),
        }
    }

    #[allow(dead_code)]
    pub fn parser(&self) -> &XMakeBuildParser {
        &self.parser
    }

    pub fn into_parser(self) -> XMakeBuildParser {
        self.parser
    }

    /// Parse a single line and build the event it produces
    pub fn process_line(&mut self, line: &str, stream: StreamKind) -> BuildEvent {
        match self.parser.handle_line(line, stream) {
            LineResult::Progress(percent) => BuildEvent::Progress { percent },
            LineResult::Task { task, link_specs } => BuildEvent::Task { task, link_specs },
            LineResult::NotHandled => {
                trace!("BuildOutputMonitor: passing through line: {}", line);
                BuildEvent::Output {
                    line: line.to_string(),
                    stream,
                }
            }
        }
    }

    /// Process an output stream until EOF, sending one event per line
    ///
    /// Events are delivered in line order. A closed receiver stops forwarding
    /// but parsing continues so the fatal error flag stays accurate.
    pub async fn monitor_stream<R>(&mut self, reader: R, stream: StreamKind) -> std::io::Result<()>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();

        debug!("BuildOutputMonitor: Starting {:?} monitoring", stream);

        while let Some(line) = lines.next_line().await? {
            let event = self.process_line(&line, stream);

            if let Some(sender) = &self.event_sender
                && sender.send(event).await.is_err()
            {
                warn!("BuildOutputMonitor: Event receiver dropped, no longer forwarding events");
                self.event_sender = None;
            }
        }

        debug!(
            "BuildOutputMonitor: {:?} monitoring ended (fatal errors: {})",
            stream,
            self.parser.has_fatal_errors()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_output::{DiagnosticDialect, TaskType};
    use std::path::PathBuf;

    fn parser(dialect: DiagnosticDialect) -> XMakeBuildParser {
        XMakeBuildParser::new(dialect).unwrap()
    }

    #[test]
    fn test_process_line_without_sender() {
        let mut monitor = BuildOutputMonitor::new(parser(DiagnosticDialect::GccClang));

        let event = monitor.process_line("[ 10%]: compiling", StreamKind::Stdout);
        assert_eq!(event, BuildEvent::Progress { percent: 10 });

        let event = monitor.process_line("checking for xcode ... no", StreamKind::Stdout);
        assert_eq!(
            event,
            BuildEvent::Output {
                line: "checking for xcode ... no".to_string(),
                stream: StreamKind::Stdout,
            }
        );
    }

    #[tokio::test]
    async fn test_monitor_stream_preserves_order() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut build_parser = parser(DiagnosticDialect::GccClang);
        build_parser.set_source_directory("/work");
        let mut monitor = BuildOutputMonitor::with_sender(build_parser, tx);

        let output = "[  0%]: cache compiling.release src/a.cpp\n\
                      error: src/a.cpp:3:5: expected ';'\n\
                      checking for something\n\
                      [100%]: build failed\n";
        let cursor = std::io::Cursor::new(output.as_bytes());

        monitor.monitor_stream(cursor, StreamKind::Stdout).await.unwrap();
        drop(monitor.event_sender.take());

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert_eq!(events.len(), 4);
        assert_eq!(events[0], BuildEvent::Progress { percent: 0 });
        match &events[1] {
            BuildEvent::Task { task, link_specs } => {
                assert_eq!(task.task_type, TaskType::Error);
                assert_eq!(task.file, PathBuf::from("/work/src/a.cpp"));
                assert_eq!(task.line, Some(3));
                assert_eq!(task.column, Some(5));
                assert_eq!(link_specs.len(), 1);
            }
            other => panic!("Wrong event at index 1: {other:?}"),
        }
        assert!(matches!(events[2], BuildEvent::Output { .. }));
        assert_eq!(events[3], BuildEvent::Progress { percent: 100 });

        assert!(monitor.parser().has_fatal_errors());
    }

    #[tokio::test]
    async fn test_monitor_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut monitor = BuildOutputMonitor::with_sender(parser(DiagnosticDialect::Msvc), tx);

        let output = "a.cpp(1): warning C1: w\nb.cpp(2): error C2: e\n";
        let cursor = std::io::Cursor::new(output.as_bytes());

        monitor.monitor_stream(cursor, StreamKind::Stdout).await.unwrap();

        assert!(monitor.into_parser().has_fatal_errors());
    }

    #[test]
    fn test_event_json_shape() {
        let event = BuildEvent::Progress { percent: 42 };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["kind"], "progress");
        assert_eq!(json["percent"], 42);
    }
}
