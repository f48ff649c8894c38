// src/exec/terminate.rs

//! Stopping the previous run's processes.
//!
//! - On Unix, [`SignalTerminator`] sends SIGTERM (graceful) or SIGKILL.
//! - Elsewhere, [`TreeKillTerminator`] runs `taskkill /t /f /pid <pid>` so
//!   shells and their children go down together.
//!
//! Both then wait a bounded time for the process to go away and never fail
//! because it is slow to exit.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, Context};
use tokio::process::Command;
use tracing::debug;

use crate::errors::Result;
use crate::exec::process::ProcessHandle;
use crate::types::TerminationMode;

/// How long teardown waits for a terminated process before moving on.
pub const DEFAULT_REAP_TIMEOUT: Duration = Duration::from_secs(3);

/// Capability to stop a retained process.
pub trait Terminator: Send + Sync {
    fn terminate<'a>(
        &'a self,
        handle: &'a mut ProcessHandle,
        mode: TerminationMode,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// POSIX signal based termination.
#[cfg(unix)]
#[derive(Debug, Clone)]
pub struct SignalTerminator {
    reap_timeout: Duration,
}

#[cfg(unix)]
impl SignalTerminator {
    pub fn new(reap_timeout: Duration) -> Self {
        Self { reap_timeout }
    }
}

#[cfg(unix)]
impl Default for SignalTerminator {
    fn default() -> Self {
        Self::new(DEFAULT_REAP_TIMEOUT)
    }
}

#[cfg(unix)]
impl Terminator for SignalTerminator {
    fn terminate<'a>(
        &'a self,
        handle: &'a mut ProcessHandle,
        mode: TerminationMode,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if handle.has_exited() {
                debug!(program = %handle.program(), pid = ?handle.pid(), "process already exited");
                return Ok(());
            }

            let pid = handle
                .pid()
                .ok_or_else(|| anyhow!("process '{}' has no pid", handle.program()))?;
            let signal = if mode.is_graceful() {
                Signal::SIGTERM
            } else {
                Signal::SIGKILL
            };

            debug!(program = %handle.program(), pid, ?signal, "signalling process");
            let raw_pid = i32::try_from(pid).context("pid out of range")?;
            kill(Pid::from_raw(raw_pid), signal)
                .with_context(|| format!("sending {signal:?} to pid {pid}"))?;

            handle.wait_for_exit(self.reap_timeout).await;
            Ok(())
        })
    }
}

/// Whole-tree termination through `taskkill`.
///
/// There are no signals to choose from, so the mode is ignored.
#[derive(Debug, Clone)]
pub struct TreeKillTerminator {
    program: String,
    reap_timeout: Duration,
}

impl TreeKillTerminator {
    pub fn new(reap_timeout: Duration) -> Self {
        Self {
            program: "taskkill".to_string(),
            reap_timeout,
        }
    }

    /// Use a different kill program (it receives the same arguments).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn args_for(pid: u32) -> Vec<String> {
        vec![
            "/t".to_string(),
            "/f".to_string(),
            "/pid".to_string(),
            pid.to_string(),
        ]
    }
}

impl Default for TreeKillTerminator {
    fn default() -> Self {
        Self::new(DEFAULT_REAP_TIMEOUT)
    }
}

impl Terminator for TreeKillTerminator {
    fn terminate<'a>(
        &'a self,
        handle: &'a mut ProcessHandle,
        mode: TerminationMode,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            if handle.has_exited() {
                return Ok(());
            }

            let pid = handle
                .pid()
                .ok_or_else(|| anyhow!("process '{}' has no pid", handle.program()))?;
            debug!(program = %handle.program(), pid, ?mode, killer = %self.program, "killing process tree");

            let status = Command::new(&self.program)
                .args(Self::args_for(pid))
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .with_context(|| format!("running {}", self.program))?;

            if !status.success() {
                return Err(anyhow!("{} exited with {status} for pid {pid}", self.program).into());
            }

            handle.wait_for_exit(self.reap_timeout).await;
            Ok(())
        })
    }
}

#[cfg(unix)]
pub type PlatformTerminator = SignalTerminator;

#[cfg(not(unix))]
pub type PlatformTerminator = TreeKillTerminator;

/// Terminator for the platform we were built for.
pub fn platform_terminator() -> PlatformTerminator {
    PlatformTerminator::default()
}
