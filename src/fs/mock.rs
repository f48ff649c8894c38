// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { contents: Vec<u8>, modified: SystemTime },
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    failing_dirs: HashSet<PathBuf>,
    read_dir_calls: Vec<PathBuf>,
}

/// In-memory filesystem with controllable modification times.
///
/// Paths are used verbatim as keys; tests typically root everything at `"."`.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed base time so tests can reason about ordering without sleeping.
pub fn mock_time(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs)
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut state = MockState::default();
        // Ensure root exists
        state
            .entries
            .insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add (or replace) a file with the given modification time.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>, modified: SystemTime) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        state.entries.insert(
            path.clone(),
            MockEntry::File {
                contents: contents.into(),
                modified,
            },
        );
        link_to_parent(&mut state.entries, &path);
    }

    /// Add an empty directory (and any missing parents).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        ensure_dir_entry(&mut state.entries, path.as_ref());
    }

    /// Update the modification time of an existing file.
    pub fn touch(&self, path: impl AsRef<Path>, modified: SystemTime) {
        let mut state = self.lock();
        if let Some(MockEntry::File { modified: m, .. }) = state.entries.get_mut(path.as_ref()) {
            *m = modified;
        }
    }

    /// Remove a file or a whole directory subtree.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.lock();
        state.entries.retain(|p, _| !p.starts_with(path));

        if let (Some(parent), Some(name)) = (parent_of(path), path.file_name()) {
            let name = name.to_string_lossy();
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(&parent) {
                children.retain(|c| c.as_str() != name.as_ref());
            }
        }
    }

    /// Make `read_dir` on `path` fail from now on.
    pub fn fail_read_dir(&self, path: impl AsRef<Path>) {
        self.lock().failing_dirs.insert(path.as_ref().to_path_buf());
    }

    /// Undo [`MockFileSystem::fail_read_dir`].
    pub fn restore_read_dir(&self, path: impl AsRef<Path>) {
        self.lock().failing_dirs.remove(path.as_ref());
    }

    /// Every directory passed to `read_dir`, in call order.
    pub fn read_dir_calls(&self) -> Vec<PathBuf> {
        self.lock().read_dir_calls.clone()
    }

    pub fn clear_read_dir_calls(&self) {
        self.lock().read_dir_calls.clear();
    }
}

fn parent_of(path: &Path) -> Option<PathBuf> {
    path.parent().map(|parent| {
        if parent.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            parent.to_path_buf()
        }
    })
}

fn link_to_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let Some(parent) = parent_of(path) else {
        return;
    };
    if parent == path {
        return;
    }

    ensure_dir_entry(entries, &parent);
    if let Some(MockEntry::Dir(children)) = entries.get_mut(&parent) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    link_to_parent(entries, path);
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::File { contents, .. }) => String::from_utf8(contents.clone())
                .map_err(|e| anyhow!("Invalid UTF-8: {}", e)),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::Dir(_)))
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        match self.lock().entries.get(path) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Ok(mock_time(0)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut state = self.lock();
        state.read_dir_calls.push(path.to_path_buf());

        if state.failing_dirs.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }

        match state.entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
