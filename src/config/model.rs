// src/config/model.rs

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::TerminationMode;

/// Optional TOML configuration file.
///
/// ```toml
/// [watch]
/// root = "."
/// exts = [".ts", "tsx"]
/// append_default_exts = true
/// patterns = ["Makefile"]
/// skip_patterns = ["node_modules/*", "target/*"]
/// skip_dot_dirs = true
/// skip_dot_files = false
/// interval = "1s"
///
/// [run]
/// commands = ["make:build", "./bin/server"]
/// verbose = true
/// clear = false
/// termination = "graceful"
/// ```
///
/// Every field is optional; CLI flags override anything set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub run: RunSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    pub root: Option<PathBuf>,

    /// Watched extensions; a missing leading `.` is added.
    pub exts: Option<Vec<String>>,

    /// When true, `exts` extends the built-in list instead of replacing it.
    #[serde(default)]
    pub append_default_exts: bool,

    pub patterns: Option<Vec<String>>,
    pub skip_patterns: Option<Vec<String>>,
    pub skip_dot_dirs: Option<bool>,
    pub skip_dot_files: Option<bool>,

    /// Humane duration string such as `"500ms"` or `"2s"`.
    pub interval: Option<String>,
}

/// `[run]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    pub commands: Option<Vec<String>>,
    pub verbose: Option<bool>,
    pub clear: Option<bool>,
    pub clear_cmd: Option<String>,
    pub termination: Option<TerminationMode>,
}

/// Fully resolved configuration.
///
/// Built by [`crate::config::resolve_settings`]; immutable for the rest of the
/// process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    /// Normalized extensions, each with a leading `.`.
    pub extensions: BTreeSet<String>,
    pub watch_patterns: Vec<String>,
    pub skip_patterns: Vec<String>,
    pub skip_dot_dirs: bool,
    pub skip_dot_files: bool,
    pub interval: Duration,
    pub verbose: bool,
    pub clear: bool,
    pub clear_cmd: Option<String>,
    pub termination: TerminationMode,
    /// Raw command strings after `make:` expansion.
    pub commands: Vec<String>,
}
