// src/watch/filter.rs

//! Per-entry skip / include decision.
//!
//! The decision is an ordered list of named stages. Each stage returns a
//! [`Verdict`]; the first `Include` or `Exclude` wins and an entry no stage
//! decides on is included. Because `WatchGlob` runs after `Extension`, a watch
//! pattern can never re-include a file whose extension is not watched.

use std::fmt;

use crate::watch::path_utils::extension_of;
use crate::watch::rules::WatchRules;

/// Marker that makes an entry name "hidden".
pub const DOT: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Include,
    Exclude,
    Undecided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    /// The traversal root is never a watched path.
    Root,
    /// Hidden directories / files, depending on the skip-dot flags.
    DotEntry,
    /// Any matching skip glob.
    SkipGlob,
    /// Files whose extension is not watched. Directories pass.
    Extension,
    /// A matching watch glob forces inclusion of whatever is left.
    WatchGlob,
}

/// Evaluation order.
pub const STAGES: [FilterStage; 5] = [
    FilterStage::Root,
    FilterStage::DotEntry,
    FilterStage::SkipGlob,
    FilterStage::Extension,
    FilterStage::WatchGlob,
];

/// What the filter sees of a directory entry.
#[derive(Debug, Clone, Copy)]
pub struct EntryView<'a> {
    /// Forward-slash path relative to the root; empty for the root itself.
    pub rel_path: &'a str,
    /// Final path component.
    pub name: &'a str,
    pub is_dir: bool,
}

impl FilterStage {
    pub fn name(self) -> &'static str {
        match self {
            FilterStage::Root => "root",
            FilterStage::DotEntry => "dot-entry",
            FilterStage::SkipGlob => "skip-glob",
            FilterStage::Extension => "extension",
            FilterStage::WatchGlob => "watch-glob",
        }
    }

    pub fn evaluate(self, rules: &WatchRules, entry: &EntryView<'_>) -> Verdict {
        match self {
            FilterStage::Root => {
                if entry.rel_path.is_empty() {
                    Verdict::Exclude
                } else {
                    Verdict::Undecided
                }
            }
            FilterStage::DotEntry => {
                let hidden = entry.name.starts_with(DOT);
                let skip = if entry.is_dir {
                    rules.skip_dot_dirs()
                } else {
                    rules.skip_dot_files()
                };
                if hidden && skip {
                    Verdict::Exclude
                } else {
                    Verdict::Undecided
                }
            }
            FilterStage::SkipGlob => {
                if rules.skip_patterns().is_match(entry.rel_path) {
                    Verdict::Exclude
                } else {
                    Verdict::Undecided
                }
            }
            FilterStage::Extension => {
                if !entry.is_dir && !rules.watches_extension(extension_of(entry.name)) {
                    Verdict::Exclude
                } else {
                    Verdict::Undecided
                }
            }
            FilterStage::WatchGlob => {
                if rules.watch_patterns().is_match(entry.rel_path) {
                    Verdict::Include
                } else {
                    Verdict::Undecided
                }
            }
        }
    }
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of running all stages over one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub include: bool,
    /// Stage that decided, or `None` when the default applied.
    pub decided_by: Option<FilterStage>,
}

impl Decision {
    pub fn is_skipped(&self) -> bool {
        !self.include
    }
}

/// Run [`STAGES`] in order over `entry`.
pub fn evaluate(rules: &WatchRules, entry: &EntryView<'_>) -> Decision {
    for stage in STAGES {
        match stage.evaluate(rules, entry) {
            Verdict::Include => {
                return Decision {
                    include: true,
                    decided_by: Some(stage),
                };
            }
            Verdict::Exclude => {
                return Decision {
                    include: false,
                    decided_by: Some(stage),
                };
            }
            Verdict::Undecided => {}
        }
    }

    Decision {
        include: true,
        decided_by: None,
    }
}
