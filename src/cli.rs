// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every option is optional at this layer so that values from a TOML config
//! file can fill the gaps; see [`crate::config::Settings::resolve`].

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pollrun`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "pollrun",
    version,
    about = "Poll a directory tree and restart a command pipeline whenever watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Space separated list of file extensions to watch.
    ///
    /// A value starting with "+ " is appended to the built-in defaults
    /// instead of replacing them, e.g. `--exts "+ .mjs .ts"`.
    #[arg(long, value_name = "EXTS")]
    pub exts: Option<String>,

    /// Space separated list of glob patterns to watch.
    #[arg(long, value_name = "GLOBS")]
    pub patterns: Option<String>,

    /// Skip any directory whose name begins with a dot (default: true).
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub skip_dot_dirs: Option<bool>,

    /// Skip any file whose name begins with a dot (default: false).
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub skip_dot_files: Option<bool>,

    /// Space separated list of glob patterns to skip (default: "node_modules/*").
    #[arg(long, value_name = "GLOBS")]
    pub skip_patterns: Option<String>,

    /// Interval between scans, e.g. "500ms", "2s" (default: 2s).
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Print each command line before it is executed.
    #[arg(long)]
    pub verbose: bool,

    /// Clear the terminal before each run.
    #[arg(long)]
    pub clear: bool,

    /// Command used to clear the terminal instead of the reset sequence.
    #[arg(long, value_name = "CMD")]
    pub clear_cmd: Option<String>,

    /// On Unix, stop the previous run with SIGTERM instead of SIGKILL.
    #[arg(long)]
    pub sigterm: bool,

    /// Directory to watch (default: current directory).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Optional TOML config file. CLI flags take precedence over its values.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLLRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve configuration, print it, but don't scan or run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Commands to run, in order. `make:a,b` expands to `make a` then `make b`.
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    pub commands: Vec<String>,
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
