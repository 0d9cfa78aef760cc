mod build_output;
mod logging;
mod project;

#[cfg(test)]
mod test_utils;

use build_output::{BuildEvent, BuildOutputMonitor, DiagnosticDialect, StreamKind, XMakeBuildParser};
use clap::{Parser, Subcommand};
use logging::{LogConfig, init_logging};
use project::{ProjectDescription, build_tree};

use std::path::PathBuf;
use std::time::Instant;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tracing::{Level, info};

/// Directory levels searched below the source directory for xmake.lua files
const BUILD_FILE_SCAN_DEPTH: usize = 8;

/// XMake project tooling: build output diagnostics and project tree
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (overrides RUST_LOG env var)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Log file path (overrides XMAKE_PM_LOG_FILE env var)
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse xmake build output into progress updates and diagnostics
    ParseOutput {
        /// Compiler message format of the build
        #[arg(long, value_enum)]
        dialect: DiagnosticDialect,

        /// Directory relative file paths in diagnostics are resolved against
        #[arg(long, value_name = "DIR")]
        source_dir: Option<PathBuf>,

        /// Print one JSON event per line
        #[arg(long)]
        json: bool,

        /// Build log to read (defaults to stdin)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Build the project tree from a project description file
    Tree {
        /// JSON project description (targets, directories, build files)
        #[arg(long, value_name = "FILE")]
        description: PathBuf,

        /// Also attach xmake.lua files found below the source directory
        #[arg(long)]
        scan_build_files: bool,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
}

async fn parse_output(
    dialect: DiagnosticDialect,
    source_dir: Option<PathBuf>,
    json: bool,
    input: Option<PathBuf>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut parser = XMakeBuildParser::new(dialect)?;
    if let Some(source_dir) = source_dir {
        parser.set_source_directory(source_dir);
    }
    info!("Parsing {} build output", parser.dialect());

    let (tx, mut rx) = mpsc::channel(64);
    let printer = tokio::spawn(async move {
        let mut diagnostics = 0usize;
        while let Some(event) = rx.recv().await {
            if matches!(event, BuildEvent::Task { .. }) {
                diagnostics += 1;
            }
            print_event(&event, json);
        }
        diagnostics
    });

    let mut monitor = BuildOutputMonitor::with_sender(parser, tx);
    let reader: Box<dyn AsyncRead + Unpin + Send> = match input {
        Some(path) => Box::new(tokio::fs::File::open(path).await?),
        None => Box::new(tokio::io::stdin()),
    };
    monitor.monitor_stream(reader, StreamKind::Stdout).await?;

    let parser = monitor.into_parser();
    let diagnostics = printer.await?;
    info!(
        "{} diagnostic(s), fatal errors: {}",
        diagnostics,
        parser.has_fatal_errors()
    );

    Ok(parser.has_fatal_errors())
}

fn print_event(event: &BuildEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("Failed to serialize event: {e}"),
        }
        return;
    }

    match event {
        BuildEvent::Progress { percent } => println!("[{percent:>3}%]"),
        BuildEvent::Task { task, .. } => println!("{task}"),
        BuildEvent::Output { line, .. } => println!("{line}"),
    }
}

fn print_tree(
    description: PathBuf,
    scan_build_files: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut description = ProjectDescription::load(&description)?;

    if scan_build_files {
        let added = description.discover_build_system_files(BUILD_FILE_SCAN_DEPTH)?;
        info!("Discovered {} additional build system file(s)", added);
    }

    let started = Instant::now();
    let tree = build_tree(
        description.source_dir(),
        &description.project_dir,
        &description.targets,
        &description.build_system_files,
    );
    log_timing!(Level::DEBUG, "build_tree", started.elapsed());

    info!(
        "Project tree has {} node(s) for {} target directory(ies)",
        tree.root().node_count(),
        tree.target_paths().len()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(tree.root())?);
    } else {
        print!("{}", project::tree::render_outline(tree.root()));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_config = LogConfig::from_env().with_overrides(args.log_level, args.log_file);
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    match args.command {
        Command::ParseOutput {
            dialect,
            source_dir,
            json,
            input,
        } => {
            let has_fatal_errors = parse_output(dialect, source_dir, json, input).await?;
            if has_fatal_errors {
                std::process::exit(1);
            }
        }
        Command::Tree {
            description,
            scan_build_files,
            json,
        } => print_tree(description, scan_build_files, json)?,
    }

    Ok(())
}
