// src/exec/launcher.rs

//! Pluggable process launcher.
//!
//! The supervisor talks to a `Launcher` instead of `tokio::process` directly,
//! so tests can script exit codes and spawn failures without real processes.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::errors::{PollrunError, Result};
use crate::exec::command::{CommandLine, StageOutcome};
use crate::exec::process::ProcessHandle;

/// Trait abstracting how pipeline stages are started.
pub trait Launcher: Send {
    /// Start `cmd` and wait for it to exit.
    fn run_to_exit<'a>(
        &'a mut self,
        cmd: &'a CommandLine,
    ) -> Pin<Box<dyn Future<Output = Result<StageOutcome>> + Send + 'a>>;

    /// Start `cmd` without waiting and hand back its handle.
    fn spawn(&mut self, cmd: &CommandLine) -> Result<ProcessHandle>;
}

/// Launcher used in production: every stage inherits our stdin, stdout and
/// stderr.
#[derive(Debug, Clone, Default)]
pub struct RealLauncher;

impl RealLauncher {
    fn command(cmd: &CommandLine) -> Command {
        let mut c = Command::new(&cmd.program);
        c.args(&cmd.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        c
    }
}

fn spawn_error(cmd: &CommandLine, source: std::io::Error) -> PollrunError {
    PollrunError::Spawn {
        program: cmd.program.clone(),
        source,
    }
}

impl Launcher for RealLauncher {
    fn run_to_exit<'a>(
        &'a mut self,
        cmd: &'a CommandLine,
    ) -> Pin<Box<dyn Future<Output = Result<StageOutcome>> + Send + 'a>> {
        Box::pin(async move {
            let mut child = Self::command(cmd)
                .spawn()
                .map_err(|e| spawn_error(cmd, e))?;
            debug!(program = %cmd.program, pid = ?child.id(), "waiting for stage to exit");

            let status = child.wait().await?;
            Ok(StageOutcome::from_status(status))
        })
    }

    fn spawn(&mut self, cmd: &CommandLine) -> Result<ProcessHandle> {
        let child = Self::command(cmd)
            .spawn()
            .map_err(|e| spawn_error(cmd, e))?;
        Ok(ProcessHandle::from_child(cmd.program.clone(), child))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exit_codes_are_reported() {
        let mut launcher = RealLauncher;
        let ok = launcher.run_to_exit(&CommandLine::new("true", Vec::<String>::new())).await;
        assert_eq!(ok.unwrap(), StageOutcome::Success);

        let failed = launcher
            .run_to_exit(&CommandLine::new("sh", ["-c", "exit 3"]))
            .await;
        assert_eq!(failed.unwrap(), StageOutcome::Failed(3));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let mut launcher = RealLauncher;
        let cmd = CommandLine::new("pollrun-definitely-not-a-program", Vec::<String>::new());

        let err = launcher.run_to_exit(&cmd).await.unwrap_err();
        assert!(matches!(err, PollrunError::Spawn { ref program, .. } if program == "pollrun-definitely-not-a-program"));
        assert!(launcher.spawn(&cmd).is_err());
    }
}
