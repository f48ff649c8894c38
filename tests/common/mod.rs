#![allow(dead_code)]

use std::fs::{self, File};
use std::path::Path;
use std::time::SystemTime;

pub use pollrun_test_utils::init_tracing;

/// Write `path` (creating parents) and pin its modification time.
pub fn write_with_mtime(path: &Path, contents: &str, modified: SystemTime) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    set_mtime(path, modified);
}

pub fn set_mtime(path: &Path, modified: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(modified)
        .unwrap();
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}
