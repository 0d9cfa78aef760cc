//! Line parser for xmake build output
//!
//! Each line is tried against the progress pattern first and then against the
//! error pattern of the configured compiler dialect. Lines matching neither are
//! reported as not handled so the caller can apply its default formatting.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, trace};

use crate::build_output::dialect::DialectPattern;
use crate::build_output::{
    BuildParserError, DiagnosticDialect, DiagnosticTask, LinkSpec, SourceLink, StreamKind,
    TaskType,
};

// [ 42%]: compiling.release src/main.cpp
const PROGRESS_PATTERN: &str = r"^\[\s*(\d+)%\]";

const ERROR_INDICATOR: &str = "error";

/// Whether a line was consumed by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Done,
    NotHandled,
}

/// Outcome of feeding one line to [`XMakeBuildParser::handle_line`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineResult {
    /// Progress percentage, clamped to 100
    Progress(u8),
    /// Diagnostic with the span of the line that links to its location
    Task {
        task: DiagnosticTask,
        link_specs: Vec<LinkSpec>,
    },
    NotHandled,
}

impl LineResult {
    #[allow(dead_code)]
    pub fn status(&self) -> Status {
        match self {
            LineResult::NotHandled => Status::NotHandled,
            _ => Status::Done,
        }
    }
}

/// Parser for the output of a single xmake build run
///
/// The dialect pattern is fixed at construction. The fatal error flag only
/// ever goes from false to true; build a new parser for every run.
#[derive(Debug, Clone)]
pub struct XMakeBuildParser {
    progress_regex: Regex,
    error_pattern: DialectPattern,
    source_dir: Option<PathBuf>,
    has_fatal_errors: bool,
}

impl XMakeBuildParser {
    pub fn new(dialect: DiagnosticDialect) -> Result<Self, BuildParserError> {
        Ok(Self {
            progress_regex: Regex::new(PROGRESS_PATTERN)
                .map_err(BuildParserError::ProgressPattern)?,
            error_pattern: dialect.compile()?,
            source_dir: None,
            has_fatal_errors: false,
        })
    }

    pub fn dialect(&self) -> DiagnosticDialect {
        self.error_pattern.dialect()
    }

    /// Directory relative file paths of later diagnostics are resolved against
    pub fn set_source_directory(&mut self, source_dir: impl Into<PathBuf>) {
        self.source_dir = Some(source_dir.into());
    }

    #[allow(dead_code)]
    pub fn source_directory(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    /// This parser never detects shell output redirection
    #[allow(dead_code)]
    pub fn has_detected_redirection(&self) -> bool {
        false
    }

    pub fn has_fatal_errors(&self) -> bool {
        self.has_fatal_errors
    }

    /// Parse one line of output; lines must be fed in the order they were produced
    pub fn handle_line(&mut self, line: &str, stream: StreamKind) -> LineResult {
        let line = line.trim_end_matches(['\r', '\n']);
        trace!("XMakeBuildParser: {:?} line: {}", stream, line);

        if let Some(captures) = self.progress_regex.captures(line) {
            return match captures[1].parse::<u32>() {
                Ok(value) => {
                    let progress = value.min(100) as u8;
                    debug!("XMakeBuildParser: progress {}%", progress);
                    LineResult::Progress(progress)
                }
                Err(e) => {
                    debug!("XMakeBuildParser: unreadable progress '{}': {}", &captures[1], e);
                    LineResult::NotHandled
                }
            };
        }

        let Some(captures) = self.error_pattern.regex().captures(line) else {
            return LineResult::NotHandled;
        };

        let layout = self.error_pattern.captures();

        let task_type = if captures[0].contains(ERROR_INDICATOR) {
            TaskType::Error
        } else {
            TaskType::Warning
        };

        let number = |index: Option<usize>| {
            index
                .and_then(|i| captures.get(i))
                .and_then(|m| m.as_str().parse::<u32>().ok())
        };
        let line_number = number(Some(layout.line));
        let column = number(layout.column);

        let file_match = captures.get(layout.file);
        let file = self.resolve_path(file_match.map_or("", |m| m.as_str()));
        let message = captures
            .get(layout.message)
            .map_or_else(String::new, |m| m.as_str().to_string());

        let link_specs = file_match
            .map(|m| LinkSpec {
                start: m.start(),
                length: m.len(),
                link: SourceLink {
                    file: file.clone(),
                    line: line_number,
                    column,
                },
            })
            .into_iter()
            .collect();

        if task_type == TaskType::Error {
            self.has_fatal_errors = true;
        }

        let task = DiagnosticTask {
            task_type,
            file,
            line: line_number,
            column,
            message,
        };
        debug!("XMakeBuildParser: {}", task);

        LineResult::Task { task, link_specs }
    }

    fn resolve_path(&self, file: &str) -> PathBuf {
        let path = PathBuf::from(file);

        match &self.source_dir {
            Some(source_dir) if path.is_relative() => source_dir.join(path),
            _ => path,
        }
    }
}
