// src/exec/supervisor.rs

//! Pipeline supervisor.
//!
//! One `run` = stamp the watermark, optionally clear the terminal, stop
//! whatever the previous run left behind, then run the commands in order.
//! Every command but the last must exit successfully before the next one
//! starts; the last one is left running and its handle is kept for the next
//! teardown.

use std::io::{self, Write};
use std::time::SystemTime;

use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::exec::command::{CommandLine, StageOutcome};
use crate::exec::launcher::Launcher;
use crate::exec::process::ProcessHandle;
use crate::exec::terminate::Terminator;
use crate::types::TerminationMode;

/// Terminal reset sequence (RIS).
pub const CLEAR_SEQUENCE: &str = "\x1bc";

/// Run-time options for the supervisor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupervisorOptions {
    /// Raw command strings, tokenized again on every run.
    pub commands: Vec<String>,
    pub verbose: bool,
    pub clear: bool,
    pub clear_cmd: Option<String>,
    pub termination: TerminationMode,
}

impl SupervisorOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            commands: settings.commands.clone(),
            verbose: settings.verbose,
            clear: settings.clear,
            clear_cmd: settings.clear_cmd.clone(),
            termination: settings.termination,
        }
    }
}

/// The `last_run` watermark.
///
/// Only moves forward: stamping an earlier time than the current value keeps
/// the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerClock {
    last_run: SystemTime,
}

impl Default for TriggerClock {
    fn default() -> Self {
        Self {
            last_run: SystemTime::UNIX_EPOCH,
        }
    }
}

impl TriggerClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_run(&self) -> SystemTime {
        self.last_run
    }

    /// Record a run starting at `now` and return the new watermark.
    pub fn stamp(&mut self, now: SystemTime) -> SystemTime {
        if now > self.last_run {
            self.last_run = now;
        }
        self.last_run
    }
}

/// Why the sequencing part of a run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every stage started; the last one is running.
    Completed,
    /// Stage `index` exited non-zero.
    StageFailed { index: usize, code: i32 },
    /// Stage `index` could not be started.
    SpawnFailed { index: usize, message: String },
    /// Stage `index` did not tokenize to a program.
    InvalidCommand { index: usize, message: String },
}

/// Summary of one `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Watermark recorded at the start of the run.
    pub started_at: SystemTime,
    /// Handles from the previous run that were terminated without error.
    pub terminated: usize,
    /// Stages for which a process was started.
    pub started: usize,
    pub stop: StopReason,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.stop == StopReason::Completed
    }
}

/// Destination of the clear sequence and the verbose command echo.
pub type Console = Box<dyn Write + Send>;

/// Owns the retained processes and the watermark; driven by the control loop.
pub struct Supervisor<L: Launcher, T: Terminator> {
    options: SupervisorOptions,
    launcher: L,
    terminator: T,
    clock: TriggerClock,
    retained: Vec<ProcessHandle>,
    console: Console,
}

impl<L: Launcher, T: Terminator> std::fmt::Debug for Supervisor<L, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("options", &self.options)
            .field("clock", &self.clock)
            .field("retained", &self.retained)
            .finish_non_exhaustive()
    }
}

impl<L: Launcher, T: Terminator> Supervisor<L, T> {
    pub fn new(options: SupervisorOptions, launcher: L, terminator: T) -> Self {
        Self {
            options,
            launcher,
            terminator,
            clock: TriggerClock::new(),
            retained: Vec::new(),
            console: Box::new(io::stdout()),
        }
    }

    /// Write terminal output somewhere other than stdout.
    pub fn with_console(mut self, console: impl Write + Send + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    pub fn last_run(&self) -> SystemTime {
        self.clock.last_run()
    }

    /// Pids of the processes kept from the last run.
    pub fn retained_pids(&self) -> Vec<Option<u32>> {
        self.retained.iter().map(ProcessHandle::pid).collect()
    }

    pub fn retained_count(&self) -> usize {
        self.retained.len()
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Execute one pipeline run. Never fails; problems are logged and
    /// reflected in the returned report.
    pub async fn run(&mut self) -> RunReport {
        let started_at = self.clock.stamp(SystemTime::now());

        if self.options.clear {
            self.clear_terminal().await;
        }

        let terminated = self.teardown().await;
        let (started, stop) = self.sequence().await;

        match &stop {
            StopReason::Completed => {
                info!(stages = started, "pipeline started");
            }
            StopReason::StageFailed { index, code } => {
                warn!(stage = index + 1, exit_code = code, "stage failed; pipeline stopped");
            }
            StopReason::SpawnFailed { index, message } => {
                error!(stage = index + 1, error = %message, "stage could not be started; pipeline stopped");
            }
            StopReason::InvalidCommand { index, message } => {
                error!(stage = index + 1, error = %message, "invalid command; pipeline stopped");
            }
        }

        RunReport {
            started_at,
            terminated,
            started,
            stop,
        }
    }

    /// Stop everything retained from the previous run. Returns how many
    /// handles were terminated cleanly; the retained set is empty afterwards
    /// either way.
    pub async fn teardown(&mut self) -> usize {
        let handles = std::mem::take(&mut self.retained);
        let mode = self.options.termination;
        let mut terminated = 0;

        for mut handle in handles {
            debug!(program = %handle.program(), pid = ?handle.pid(), ?mode, "terminating previous run");
            match self.terminator.terminate(&mut handle, mode).await {
                Ok(()) => terminated += 1,
                Err(err) => {
                    warn!(
                        program = %handle.program(),
                        pid = ?handle.pid(),
                        error = %err,
                        "failed to terminate previous run; continuing"
                    );
                }
            }
        }

        terminated
    }

    async fn sequence(&mut self) -> (usize, StopReason) {
        let last = self.options.commands.len().saturating_sub(1);
        let mut started = 0;

        for (index, raw) in self.options.commands.iter().enumerate() {
            let cmd = match CommandLine::parse(raw) {
                Ok(cmd) => cmd,
                Err(e) => {
                    return (
                        started,
                        StopReason::InvalidCommand {
                            index,
                            message: format!("{raw:?}: {e}"),
                        },
                    );
                }
            };

            if self.options.verbose {
                let echoed = writeln!(self.console, "{cmd}").and_then(|()| self.console.flush());
                if let Err(e) = echoed {
                    warn!(command = %cmd, error = %e, "could not echo command");
                }
            }

            if index == last {
                match self.launcher.spawn(&cmd) {
                    Ok(handle) => {
                        debug!(program = %cmd.program, pid = ?handle.pid(), "final stage running");
                        self.retained.push(handle);
                        started += 1;
                    }
                    Err(e) => {
                        return (
                            started,
                            StopReason::SpawnFailed {
                                index,
                                message: e.to_string(),
                            },
                        );
                    }
                }
            } else {
                debug!(stage = index + 1, command = %cmd, "running stage to completion");
                match self.launcher.run_to_exit(&cmd).await {
                    Ok(StageOutcome::Success) => started += 1,
                    Ok(StageOutcome::Failed(code)) => {
                        return (started + 1, StopReason::StageFailed { index, code });
                    }
                    Err(e) => {
                        return (
                            started,
                            StopReason::SpawnFailed {
                                index,
                                message: e.to_string(),
                            },
                        );
                    }
                }
            }
        }

        (started, StopReason::Completed)
    }

    async fn clear_terminal(&mut self) {
        match &self.options.clear_cmd {
            Some(raw) => match CommandLine::parse(raw) {
                Ok(cmd) => match self.launcher.run_to_exit(&cmd).await {
                    Ok(StageOutcome::Success) => {}
                    Ok(StageOutcome::Failed(code)) => {
                        warn!(command = %cmd, exit_code = code, "clear command failed");
                    }
                    Err(e) => warn!(command = %cmd, error = %e, "clear command could not be started"),
                },
                Err(e) => warn!(command = %raw, error = %e, "invalid clear command"),
            },
            None => {
                if let Err(e) = write_clear_sequence(self.console.as_mut()) {
                    warn!(error = %e, "could not write clear sequence");
                }
            }
        }
    }
}

fn write_clear_sequence(out: &mut dyn Write) -> io::Result<()> {
    out.write_all(CLEAR_SEQUENCE.as_bytes())?;
    out.flush()
}
