//! Compiler message dialects recognized in xmake build output

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::build_output::BuildParserError;

/// Compiler diagnostic format selected for a build run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticDialect {
    /// `main.cpp(45): warning C4101: unreferenced local variable`
    Msvc,
    /// `error: test/main.cpp:12:3: 'a' was not declared in this scope`
    #[value(name = "gcc", alias = "clang")]
    GccClang,
}

impl DiagnosticDialect {
    fn pattern(self) -> &'static str {
        match self {
            DiagnosticDialect::Msvc => r"(.+)\((\d+)\): (.+)",
            DiagnosticDialect::GccClang => r"error: (.*):(\d+):(\d+): (.*)",
        }
    }

    /// Capture group layout of the dialect pattern
    fn captures(self) -> CaptureLayout {
        match self {
            DiagnosticDialect::Msvc => CaptureLayout {
                file: 1,
                line: 2,
                column: None,
                message: 3,
            },
            DiagnosticDialect::GccClang => CaptureLayout {
                file: 1,
                line: 2,
                column: Some(3),
                message: 4,
            },
        }
    }

    /// Compile the error pattern for this dialect
    pub fn compile(self) -> Result<DialectPattern, BuildParserError> {
        let regex = Regex::new(self.pattern()).map_err(|source| BuildParserError::Pattern {
            dialect: self.name(),
            source,
        })?;

        Ok(DialectPattern {
            dialect: self,
            regex,
            captures: self.captures(),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            DiagnosticDialect::Msvc => "msvc",
            DiagnosticDialect::GccClang => "gcc/clang",
        }
    }
}

impl fmt::Display for DiagnosticDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CaptureLayout {
    pub file: usize,
    pub line: usize,
    pub column: Option<usize>,
    pub message: usize,
}

/// Precompiled error pattern of one dialect
#[derive(Debug, Clone)]
pub struct DialectPattern {
    dialect: DiagnosticDialect,
    regex: Regex,
    captures: CaptureLayout,
}

impl DialectPattern {
    pub fn dialect(&self) -> DiagnosticDialect {
        self.dialect
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub(crate) fn captures(&self) -> CaptureLayout {
        self.captures
    }

    /// Whether matches of this dialect carry a column number
    #[allow(dead_code)]
    pub fn has_column(&self) -> bool {
        self.captures.column.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_dialects_compile() {
        assert!(DiagnosticDialect::Msvc.compile().is_ok());
        assert!(DiagnosticDialect::GccClang.compile().is_ok());
    }

    #[test]
    fn test_column_support_per_dialect() {
        let msvc = DiagnosticDialect::Msvc.compile().unwrap();
        let gcc = DiagnosticDialect::GccClang.compile().unwrap();

        assert!(!msvc.has_column());
        assert!(gcc.has_column());
        assert_eq!(gcc.dialect(), DiagnosticDialect::GccClang);
    }

    #[test]
    fn test_msvc_pattern_captures() {
        let pattern = DiagnosticDialect::Msvc.compile().unwrap();
        let caps = pattern
            .regex()
            .captures("main.cpp(45): warning C4101: unreferenced local variable")
            .unwrap();

        assert_eq!(&caps[1], "main.cpp");
        assert_eq!(&caps[2], "45");
        assert_eq!(&caps[3], "warning C4101: unreferenced local variable");
    }

    #[test]
    fn test_gcc_pattern_requires_error_prefix() {
        let pattern = DiagnosticDialect::GccClang.compile().unwrap();

        assert!(pattern.regex().is_match("error: a.cpp:1:2: boom"));
        assert!(!pattern.regex().is_match("a.cpp:1:2: warning: unused"));
    }

    #[test]
    fn test_dialect_serde_names() {
        let json = serde_json::to_string(&DiagnosticDialect::GccClang).unwrap();
        assert_eq!(json, "\"gcc_clang\"");

        let dialect: DiagnosticDialect = serde_json::from_str("\"msvc\"").unwrap();
        assert_eq!(dialect, DiagnosticDialect::Msvc);
    }
}
