use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stream a line of build output was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Stdout,
    #[allow(dead_code)]
    Stderr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Error,
    Warning,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskType::Error => f.write_str("error"),
            TaskType::Warning => f.write_str("warning"),
        }
    }
}

/// Navigable source location: file plus optional 1-based line and column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl fmt::Display for SourceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
            if let Some(column) = self.column {
                write!(f, ":{column}")?;
            }
        }
        Ok(())
    }
}

/// Byte span of a line that refers to a source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub start: usize,
    pub length: usize,
    pub link: SourceLink,
}

/// Diagnostic extracted from a single line of build output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticTask {
    pub task_type: TaskType,
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub message: String,
}

impl DiagnosticTask {
    #[allow(dead_code)]
    pub fn is_error(&self) -> bool {
        self.task_type == TaskType::Error
    }

    pub fn link(&self) -> SourceLink {
        SourceLink {
            file: self.file.clone(),
            line: self.line,
            column: self.column,
        }
    }
}

impl fmt::Display for DiagnosticTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.link(), self.task_type, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_link_display() {
        let full = SourceLink {
            file: PathBuf::from("/src/main.cpp"),
            line: Some(12),
            column: Some(3),
        };
        assert_eq!(full.to_string(), "/src/main.cpp:12:3");

        let no_column = SourceLink {
            column: None,
            ..full.clone()
        };
        assert_eq!(no_column.to_string(), "/src/main.cpp:12");

        // A column without a line is not meaningful on its own
        let column_only = SourceLink {
            line: None,
            ..full
        };
        assert_eq!(column_only.to_string(), "/src/main.cpp");
    }

    #[test]
    fn test_task_display_and_json() {
        let task = DiagnosticTask {
            task_type: TaskType::Warning,
            file: PathBuf::from("main.cpp"),
            line: Some(45),
            column: None,
            message: "unreferenced local variable".to_string(),
        };

        assert!(!task.is_error());
        assert_eq!(
            task.to_string(),
            "main.cpp:45: warning: unreferenced local variable"
        );

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["task_type"], "warning");
        assert_eq!(json["line"], 45);
        assert!(json.get("column").is_none());
    }
}
