// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface used by the scanner.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Last modification time of `path`.
    fn modified(&self, path: &Path) -> Result<SystemTime>;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    // Symlinks are not followed, matching a plain directory walk.
    fn is_dir(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let meta = fs::symlink_metadata(path)
            .with_context(|| format!("reading metadata of {:?}", path))?;
        meta.modified()
            .with_context(|| format!("reading modification time of {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry.with_context(|| format!("reading entry in {:?}", path))?;
            entries.push(entry.path());
        }
        Ok(entries)
    }
}
