// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::types::{ExitCodePolicy, parse_duration};

/// Command-line arguments for `testrun`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "testrun",
    version,
    about = "Run a project's test command with a timeout and report its output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Testrun.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to run the command in.
    ///
    /// Overrides `TESTRUN_DIR` and `runner.cwd`. If nothing is set, the
    /// nearest ancestor containing a project marker (e.g. `package.json`)
    /// is used.
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Maximum time to wait for the command (e.g. `120s`, `2m`, `120`).
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Time between SIGTERM and SIGKILL when the command must be stopped.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub kill_grace: Option<Duration>,

    /// Run the command through the platform shell (`sh -c` / `cmd /C`).
    #[arg(long)]
    pub shell: bool,

    /// Whether the command's exit code becomes testrun's own exit status.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub exit_code: Option<ExitCodePolicy>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TESTRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print what would run, but don't spawn anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Command to run instead of the configured one (after `--`).
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
