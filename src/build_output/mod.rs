//! Build output parsing
//!
//! Turns the console output of an `xmake build` run into progress updates and
//! diagnostic tasks with resolved source locations. The parser is synchronous
//! and strictly line-oriented; [`BuildOutputMonitor`] drives it over an async
//! stream and forwards the results over a channel.

pub mod dialect;
pub mod error;
pub mod monitor;
pub mod parser;
pub mod task;

pub use dialect::DiagnosticDialect;
pub use error::BuildParserError;
pub use monitor::{BuildEvent, BuildOutputMonitor};
#[allow(unused_imports)]
pub use parser::{LineResult, Status, XMakeBuildParser};
pub use task::{DiagnosticTask, LinkSpec, SourceLink, StreamKind, TaskType};
