// src/watch/rules.rs

use std::collections::BTreeSet;
use std::fmt;

use globset::{GlobBuilder, GlobMatcher};
use tracing::warn;

use crate::config::Settings;

/// Extensions watched when none are configured.
pub const DEFAULT_EXTENSIONS: &str =
    ".asm .c .cc .cpp .csv .go .h .hh .hpp .json .rs .s .sql .v .vhdl .zig";

/// Skip patterns used when none are configured.
pub const DEFAULT_SKIP_PATTERNS: &str = "node_modules/*";

/// An extension list starting with this prefix extends the defaults.
pub const APPEND_PREFIX: &str = "+ ";

/// Parse a space separated extension list, honouring [`APPEND_PREFIX`].
///
/// `"js"` and `".js"` are equivalent; `"+ .mjs"` yields the defaults plus
/// `.mjs`.
pub fn parse_extensions(list: &str) -> BTreeSet<String> {
    match list.strip_prefix(APPEND_PREFIX) {
        Some(extra) => {
            let mut exts = default_extensions();
            exts.extend(normalize_extensions(extra.split_whitespace()));
            exts
        }
        None => normalize_extensions(list.split_whitespace()),
    }
}

pub fn default_extensions() -> BTreeSet<String> {
    normalize_extensions(DEFAULT_EXTENSIONS.split_whitespace())
}

/// Add the leading `.` where missing and drop blanks.
pub fn normalize_extensions<I, S>(exts: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    exts.into_iter()
        .map(|e| e.as_ref().trim().to_string())
        .filter(|e| !e.is_empty())
        .map(|e| if e.starts_with('.') { e } else { format!(".{e}") })
        .collect()
}

/// Split a space separated pattern list.
pub fn split_patterns(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

/// Ordered glob list. Patterns that fail to compile are kept as "never
/// matches" entries so the list stays aligned with the configuration.
#[derive(Clone, Default)]
pub struct PatternList {
    entries: Vec<(String, Option<GlobMatcher>)>,
}

impl fmt::Debug for PatternList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(src, _)| src))
            .finish()
    }
}

impl PatternList {
    /// Compile shell-style globs where `*` and `?` do not cross `/`.
    ///
    /// `kind` is only used in the warning for malformed patterns.
    pub fn compile(kind: &str, patterns: &[String]) -> Self {
        let entries = patterns
            .iter()
            .map(|pat| {
                let matcher = match GlobBuilder::new(pat).literal_separator(true).build() {
                    Ok(glob) => Some(glob.compile_matcher()),
                    Err(e) => {
                        warn!(pattern = %pat, error = %e, "invalid {kind} pattern; it will never match");
                        None
                    }
                };
                (pat.clone(), matcher)
            })
            .collect();
        Self { entries }
    }

    /// First pattern matching `rel_path`, if any.
    pub fn first_match(&self, rel_path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, m)| m.as_ref().is_some_and(|m| m.is_match(rel_path)))
            .map(|(src, _)| src.as_str())
    }

    pub fn is_match(&self, rel_path: &str) -> bool {
        self.first_match(rel_path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolved inclusion rules. Immutable once built.
#[derive(Debug, Clone)]
pub struct WatchRules {
    extensions: BTreeSet<String>,
    watch: PatternList,
    skip: PatternList,
    skip_dot_dirs: bool,
    skip_dot_files: bool,
}

impl WatchRules {
    pub fn new(
        extensions: BTreeSet<String>,
        watch_patterns: &[String],
        skip_patterns: &[String],
        skip_dot_dirs: bool,
        skip_dot_files: bool,
    ) -> Self {
        Self {
            extensions: normalize_extensions(extensions),
            watch: PatternList::compile("watch", watch_patterns),
            skip: PatternList::compile("skip", skip_patterns),
            skip_dot_dirs,
            skip_dot_files,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.extensions.clone(),
            &settings.watch_patterns,
            &settings.skip_patterns,
            settings.skip_dot_dirs,
            settings.skip_dot_files,
        )
    }

    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    pub fn watches_extension(&self, ext: &str) -> bool {
        !ext.is_empty() && self.extensions.contains(ext)
    }

    pub fn watch_patterns(&self) -> &PatternList {
        &self.watch
    }

    pub fn skip_patterns(&self) -> &PatternList {
        &self.skip
    }

    pub fn skip_dot_dirs(&self) -> bool {
        self.skip_dot_dirs
    }

    pub fn skip_dot_files(&self) -> bool {
        self.skip_dot_files
    }
}
