// src/watch/scanner.rs

//! One polling cycle over the tree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::trace;

use crate::fs::FileSystem;
use crate::watch::filter::{evaluate, EntryView};
use crate::watch::path_utils::{relative_str, to_slash};
use crate::watch::rules::WatchRules;

/// Last observed modification time per watched file, keyed by forward-slash
/// path relative to the root.
///
/// Entries for files that disappear are never removed; the file-count check
/// covers deletions.
pub type ScanState = HashMap<String, SystemTime>;

/// Result of a complete walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Number of watched files seen in this walk.
    pub file_count: usize,
    /// Watched files whose modification time moved past both their previous
    /// value and the last-run watermark.
    pub modified: Vec<String>,
}

impl ScanOutcome {
    /// Whether this walk, compared with a previous count, means "run again".
    pub fn changed(&self, previous_count: usize) -> bool {
        !self.modified.is_empty() || self.file_count != previous_count
    }
}

/// Walk `root`, update `state` in place and report modified files.
///
/// Skipped directories are not descended into. Entries are visited in
/// lexical order, depth first. A file counts as modified when it was already
/// in `state` with an older timestamp and its new timestamp is strictly after
/// `last_run`.
///
/// Any filesystem error aborts the walk and leaves `state` untouched, so the
/// next walk still sees every edit made since the last complete one.
pub fn scan(
    fs: &dyn FileSystem,
    root: &Path,
    rules: &WatchRules,
    state: &mut ScanState,
    last_run: SystemTime,
) -> Result<ScanOutcome> {
    let mut outcome = ScanOutcome::default();
    let mut updates: Vec<(String, SystemTime)> = Vec::new();
    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut children = fs.read_dir(&dir)?;
        children.sort();

        let mut subdirs = Vec::new();
        for path in children {
            let rel = relative_str(root, &path)
                .with_context(|| format!("{:?} is outside of {:?}", path, root))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| to_slash(&path));
            let is_dir = fs.is_dir(&path);

            let decision = evaluate(
                rules,
                &EntryView {
                    rel_path: &rel,
                    name: &name,
                    is_dir,
                },
            );

            if decision.is_skipped() {
                trace!(path = %rel, stage = ?decision.decided_by, "skipping entry");
                continue;
            }

            if is_dir {
                subdirs.push(path);
                continue;
            }

            let modified = fs.modified(&path)?;
            outcome.file_count += 1;

            if let Some(previous) = state.get(&rel) {
                if *previous < modified && last_run < modified {
                    outcome.modified.push(rel.clone());
                }
            }
            updates.push((rel, modified));
        }

        // Reverse so the lexically first directory is popped first.
        stack.extend(subdirs.into_iter().rev());
    }

    state.extend(updates);
    Ok(outcome)
}
