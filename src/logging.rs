use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_VAR: &str = "XMAKE_PM_LOG_FILE";
const LOG_UNIQUE_VAR: &str = "XMAKE_PM_LOG_UNIQUE";
const LOG_JSON_VAR: &str = "XMAKE_PM_LOG_JSON";

/// Configuration for the logging system
///
/// Logs never go to stdout, which carries command output.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter (e.g., "debug", "info", "xmake_project_manager::project=trace")
    pub level: String,
    /// Optional log file path. If None, logs only to stderr
    pub file_path: Option<PathBuf>,
    /// Whether to use structured JSON format for logs
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Create LogConfig from `RUST_LOG` and the `XMAKE_PM_LOG_*` variables
    pub fn from_env() -> Self {
        let flag = |name: &str| env::var(name).is_ok_and(|value| value == "true");

        let file_path = env::var(LOG_FILE_VAR).ok().map(|path| {
            let path = PathBuf::from(path);
            if flag(LOG_UNIQUE_VAR) {
                with_pid_suffix(&path, std::process::id())
            } else {
                path
            }
        });

        Self {
            level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            file_path,
            json_format: flag(LOG_JSON_VAR),
        }
    }

    /// Override values from CLI arguments
    pub fn with_overrides(mut self, level: Option<String>, file_path: Option<PathBuf>) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(file_path) = file_path {
            self.file_path = Some(file_path);
        }
        self
    }
}

/// `build.log` becomes `build.<pid>.log`
fn with_pid_suffix(path: &Path, pid: u32) -> PathBuf {
    let Some(stem) = path.file_stem() else {
        return path.to_path_buf();
    };

    let file_name = match path.extension() {
        Some(extension) => format!(
            "{}.{}.{}",
            stem.to_string_lossy(),
            pid,
            extension.to_string_lossy()
        ),
        None => format!("{}.{}", stem.to_string_lossy(), pid),
    };

    path.with_file_name(file_name)
}

/// Initialize the logging system based on configuration
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_new(&config.level).or_else(|_| EnvFilter::try_new("info"))?;
    let subscriber = tracing_subscriber::registry().with(env_filter);

    match (&config.file_path, config.json_format) {
        (Some(file_path), true) => {
            let file = OpenOptions::new().create(true).append(true).open(file_path)?;
            subscriber
                .with(fmt::layer().json().with_writer(file).with_ansi(false))
                .init();
        }
        (Some(file_path), false) => {
            let file = OpenOptions::new().create(true).append(true).open(file_path)?;
            subscriber
                .with(
                    fmt::layer()
                        .with_writer(file)
                        .with_ansi(false)
                        .with_target(true)
                        .with_line_number(true),
                )
                .init();
        }
        (None, true) => {
            subscriber
                .with(fmt::layer().json().with_writer(io::stderr).with_ansi(false))
                .init();
        }
        (None, false) => {
            subscriber
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_ansi(true)
                        .with_target(true),
                )
                .init();
        }
    }

    Ok(())
}

/// Log the duration of a named operation in one structured line
#[macro_export]
macro_rules! log_timing {
    ($level:expr, $operation:expr, $duration:expr) => {
        tracing::event!(
            $level,
            operation = $operation,
            duration_ms = $duration.as_millis() as u64,
            "Performance timing"
        );
    };
}
