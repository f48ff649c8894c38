// src/exec/process.rs

use std::time::Duration;

use tokio::process::Child;
use tracing::{debug, warn};

/// A process started as the final stage of a pipeline run.
///
/// Real handles wrap a `tokio::process::Child`; test launchers create handles
/// with only a program name and a fake pid.
#[derive(Debug)]
pub struct ProcessHandle {
    program: String,
    pid: Option<u32>,
    child: Option<Child>,
}

impl ProcessHandle {
    pub fn from_child(program: impl Into<String>, child: Child) -> Self {
        Self {
            program: program.into(),
            pid: child.id(),
            child: Some(child),
        }
    }

    /// Handle without an OS child attached.
    pub fn detached(program: impl Into<String>, pid: Option<u32>) -> Self {
        Self {
            program: program.into(),
            pid,
            child: None,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Pid recorded at spawn time.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Whether the process is known to have exited already.
    pub fn has_exited(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(Some(_))),
            None => false,
        }
    }

    /// Wait up to `limit` for the process to exit. Returns `true` if it did
    /// (or if there is no child to wait for).
    pub async fn wait_for_exit(&mut self, limit: Duration) -> bool {
        let Some(child) = self.child.as_mut() else {
            return true;
        };

        match tokio::time::timeout(limit, child.wait()).await {
            Ok(Ok(status)) => {
                debug!(program = %self.program, pid = ?self.pid, %status, "process exited");
                true
            }
            Ok(Err(e)) => {
                warn!(program = %self.program, pid = ?self.pid, error = %e, "failed to wait for process");
                false
            }
            Err(_) => {
                warn!(
                    program = %self.program,
                    pid = ?self.pid,
                    timeout_ms = limit.as_millis() as u64,
                    "process still running after termination request; leaving it behind"
                );
                false
            }
        }
    }
}
