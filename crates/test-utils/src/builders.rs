#![allow(dead_code)]

use std::time::SystemTime;

use pollrun::exec::{Supervisor, SupervisorOptions};
use pollrun::fs::mock::{mock_time, MockFileSystem};
use pollrun::types::TerminationMode;
use pollrun::watch::rules::{default_extensions, split_patterns};
use pollrun::watch::WatchRules;

use crate::fake_process::{EventLog, FakeLauncher, FakeTerminator};

/// Builder for `WatchRules` with the documented defaults.
pub struct WatchRulesBuilder {
    exts: Vec<String>,
    append_defaults: bool,
    watch: Vec<String>,
    skip: Vec<String>,
    skip_dot_dirs: bool,
    skip_dot_files: bool,
}

impl WatchRulesBuilder {
    pub fn new() -> Self {
        Self {
            exts: Vec::new(),
            append_defaults: true,
            watch: Vec::new(),
            skip: split_patterns("node_modules/*"),
            skip_dot_dirs: true,
            skip_dot_files: false,
        }
    }

    /// Watch only the given extensions (replacing the defaults).
    pub fn only_exts(mut self, exts: &[&str]) -> Self {
        self.append_defaults = false;
        self.exts = exts.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn watch(mut self, pattern: &str) -> Self {
        self.watch.push(pattern.to_string());
        self
    }

    pub fn skip(mut self, pattern: &str) -> Self {
        self.skip.push(pattern.to_string());
        self
    }

    pub fn no_skip_patterns(mut self) -> Self {
        self.skip.clear();
        self
    }

    pub fn skip_dot_dirs(mut self, val: bool) -> Self {
        self.skip_dot_dirs = val;
        self
    }

    pub fn skip_dot_files(mut self, val: bool) -> Self {
        self.skip_dot_files = val;
        self
    }

    pub fn build(self) -> WatchRules {
        let mut exts = if self.append_defaults {
            default_extensions()
        } else {
            Default::default()
        };
        exts.extend(pollrun::watch::rules::normalize_extensions(&self.exts));

        WatchRules::new(exts, &self.watch, &self.skip, self.skip_dot_dirs, self.skip_dot_files)
    }
}

impl Default for WatchRulesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock tree rooted at `"."`.
pub struct TreeBuilder {
    fs: MockFileSystem,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            fs: MockFileSystem::new(),
        }
    }

    /// Add `./<rel>` modified at `mock_time(secs)`.
    pub fn file(self, rel: &str, secs: u64) -> Self {
        self.fs.add_file(format!("./{rel}"), Vec::new(), mock_time(secs));
        self
    }

    pub fn dir(self, rel: &str) -> Self {
        self.fs.add_dir(format!("./{rel}"));
        self
    }

    pub fn build(self) -> MockFileSystem {
        self.fs
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Supervisor over fakes sharing one event log.
pub fn fake_supervisor(
    commands: &[&str],
    launcher: impl FnOnce(EventLog) -> FakeLauncher,
    terminator: impl FnOnce(EventLog) -> FakeTerminator,
) -> (Supervisor<FakeLauncher, FakeTerminator>, EventLog) {
    let log = EventLog::new();
    let options = SupervisorOptions {
        commands: commands.iter().map(|s| s.to_string()).collect(),
        termination: TerminationMode::Kill,
        ..SupervisorOptions::default()
    };
    let supervisor = Supervisor::new(options, launcher(log.clone()), terminator(log.clone()));
    (supervisor, log)
}

/// A watermark before every `mock_time`.
pub fn before_everything() -> SystemTime {
    SystemTime::UNIX_EPOCH
}
