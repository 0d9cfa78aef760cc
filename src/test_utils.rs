//! Test utilities
//!
//! Test logging setup and fixtures for building target lists.

/// Test logging utilities
#[cfg(all(test, feature = "test-logging"))]
pub mod logging {
    use std::sync::Once;
    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: Once = Once::new();

    /// Initialize test logging once per test binary
    ///
    /// Respects `RUST_LOG`, defaulting to trace output for this crate:
    ///
    /// ```bash
    /// RUST_LOG=xmake_project_manager::project=trace cargo test --features test-logging
    /// ```
    pub fn init() {
        INIT.call_once(|| {
            let env_filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("xmake_project_manager=trace,info"));

            fmt()
                .with_env_filter(env_filter)
                .with_test_writer()
                .with_target(true)
                .compact()
                .try_init()
                .ok(); // Ignore errors if already initialized by another test
        });
    }

    #[ctor::ctor]
    fn init_test_logging() {
        init();
    }
}

/// Target list fixtures
#[cfg(test)]
pub mod fixtures {
    use crate::project::{SourceGroup, Target, TargetKind};

    pub fn target(name: &str, kind: TargetKind, defined_in: &str) -> Target {
        Target::new(name, kind, defined_in)
    }

    pub fn source_group(name: &str, sources: &[&str]) -> SourceGroup {
        SourceGroup {
            name: name.to_string(),
            sources: strings(sources),
        }
    }

    pub fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }
}
