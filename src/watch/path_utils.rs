// src/watch/path_utils.rs

//! Utility functions for path handling in the scanner.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// The root itself maps to the empty string. Returns `None` if `path` is not
/// under `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(to_slash(rel))
}

/// Forward-slash form of a path, independent of the host separator.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Extension of a file name: the suffix starting at the last `.`, or `""`.
///
/// `main.go` -> `.go`, `archive.tar.gz` -> `.gz`, `.bashrc` -> `.bashrc`,
/// `Makefile` -> `""`.
pub fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/project");
        let path = Path::new("/project/src/main.rs");
        assert_eq!(relative_str(root, path).as_deref(), Some("src/main.rs"));
        assert_eq!(relative_str(root, root).as_deref(), Some(""));
        assert_eq!(relative_str(root, Path::new("/elsewhere/x")), None);
    }

    #[test]
    fn extension_follows_last_dot() {
        assert_eq!(extension_of("main.go"), ".go");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of(".bashrc"), ".bashrc");
        assert_eq!(extension_of("Makefile"), "");
    }
}
