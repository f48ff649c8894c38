// src/watch/detector.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::watch::rules::WatchRules;
use crate::watch::scanner::{scan, ScanState};

/// Stateful wrapper around [`scan`] that remembers the previous cycle.
///
/// Owns the [`ScanState`] and the previous watched-file count; the control
/// loop is its only user.
#[derive(Debug)]
pub struct ChangeDetector {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    rules: WatchRules,
    state: ScanState,
    last_count: usize,
}

impl ChangeDetector {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>, rules: WatchRules) -> Self {
        Self {
            fs,
            root: root.into(),
            rules,
            state: ScanState::new(),
            last_count: 0,
        }
    }

    /// Run one cycle and decide whether the pipeline should run.
    ///
    /// A failed walk logs a warning and reports no change. Neither the file
    /// count nor the recorded modification times move, so the next complete
    /// walk still reports whatever changed in the meantime.
    pub fn poll(&mut self, last_run: SystemTime) -> bool {
        let outcome = match scan(
            self.fs.as_ref(),
            &self.root,
            &self.rules,
            &mut self.state,
            last_run,
        ) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(root = ?self.root, error = %format!("{err:#}"), "scan aborted; retrying next cycle");
                return false;
            }
        };

        let changed = outcome.changed(self.last_count);
        if changed {
            debug!(
                files = outcome.file_count,
                previous = self.last_count,
                modified = ?outcome.modified,
                "change detected"
            );
        }

        self.last_count = outcome.file_count;
        changed
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Watched-file count from the last complete walk.
    pub fn last_count(&self) -> usize {
        self.last_count
    }
}
