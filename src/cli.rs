// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::OverlapPolicy;

/// Command-line arguments for `taskcron`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskcron",
    version,
    about = "Run commands on cron schedules from a hot-reloaded task list.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the settings file (TOML).
    ///
    /// A missing `Taskcron.toml` in the working directory is not an error;
    /// built-in defaults are used instead.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Path to the task definition file (JSON array, or TOML `[[task]]`).
    #[arg(long, value_name = "PATH")]
    pub tasks: Option<String>,

    /// Path to the audit log (JSON array of execution outcomes).
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<String>,

    /// Path to the plain-text operational log.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<String>,

    /// Maximum number of entries kept in the audit log.
    #[arg(long, value_name = "N")]
    pub max_entries: Option<usize>,

    /// What to do when a task fires while its previous run is still going.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub overlap: Option<OverlapArg>,

    /// Kill task processes that run longer than this (e.g. "30s", "5m").
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKCRON_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate the task list, print next firings, but don't schedule.
    #[arg(long)]
    pub dry_run: bool,
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

/// Overlap policy as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OverlapArg {
    Allow,
    Skip,
}

impl From<OverlapArg> for OverlapPolicy {
    fn from(arg: OverlapArg) -> Self {
        match arg {
            OverlapArg::Allow => OverlapPolicy::Allow,
            OverlapArg::Skip => OverlapPolicy::Skip,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
