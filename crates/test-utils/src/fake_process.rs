use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};

use pollrun::errors::{PollrunError, Result};
use pollrun::exec::{CommandLine, Launcher, ProcessHandle, StageOutcome, Terminator};
use pollrun::types::TerminationMode;

/// Something a fake launcher or terminator did, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// A stage ran to completion (rendered command line).
    Ran(String),
    /// A final stage was spawned with this fake pid.
    Spawned(String, u32),
    /// A pid was terminated.
    Terminated(u32, TerminationMode),
}

/// Shared, ordered log of [`ProcessEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<ProcessEvent>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProcessEvent>> {
        self.0.lock().unwrap()
    }

    pub fn push(&self, event: ProcessEvent) {
        self.lock().push(event);
    }

    pub fn events(&self) -> Vec<ProcessEvent> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Programs of every `Ran` / `Spawned` event, in order.
    pub fn started_programs(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                ProcessEvent::Ran(line) | ProcessEvent::Spawned(line, _) => {
                    line.split_whitespace().next().map(str::to_string)
                }
                ProcessEvent::Terminated(..) => None,
            })
            .collect()
    }
}

/// Launcher that never starts a process.
///
/// Every program exits 0 unless scripted with [`FakeLauncher::exit_code`];
/// programs registered with [`FakeLauncher::fail_spawn`] fail to start.
/// Exit codes can be changed later through a shared reference with
/// [`FakeLauncher::set_exit_code`].
#[derive(Debug, Clone)]
pub struct FakeLauncher {
    log: EventLog,
    exit_codes: Arc<Mutex<HashMap<String, i32>>>,
    unspawnable: HashSet<String>,
    next_pid: u32,
}

impl FakeLauncher {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            exit_codes: Arc::new(Mutex::new(HashMap::new())),
            unspawnable: HashSet::new(),
            next_pid: 1000,
        }
    }

    pub fn exit_code(self, program: &str, code: i32) -> Self {
        self.set_exit_code(program, code);
        self
    }

    pub fn set_exit_code(&self, program: &str, code: i32) {
        self.exit_codes
            .lock()
            .unwrap()
            .insert(program.to_string(), code);
    }

    pub fn fail_spawn(mut self, program: &str) -> Self {
        self.unspawnable.insert(program.to_string());
        self
    }

    fn check_spawnable(&self, cmd: &CommandLine) -> Result<()> {
        if self.unspawnable.contains(&cmd.program) {
            return Err(PollrunError::Spawn {
                program: cmd.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such program"),
            });
        }
        Ok(())
    }
}

impl Launcher for FakeLauncher {
    fn run_to_exit<'a>(
        &'a mut self,
        cmd: &'a CommandLine,
    ) -> Pin<Box<dyn Future<Output = Result<StageOutcome>> + Send + 'a>> {
        Box::pin(async move {
            self.check_spawnable(cmd)?;
            self.log.push(ProcessEvent::Ran(cmd.to_string()));
            let code = self.exit_codes.lock().unwrap().get(&cmd.program).copied();
            Ok(match code {
                Some(code) if code != 0 => StageOutcome::Failed(code),
                _ => StageOutcome::Success,
            })
        })
    }

    fn spawn(&mut self, cmd: &CommandLine) -> Result<ProcessHandle> {
        self.check_spawnable(cmd)?;
        let pid = self.next_pid;
        self.next_pid += 1;
        self.log.push(ProcessEvent::Spawned(cmd.to_string(), pid));
        Ok(ProcessHandle::detached(cmd.program.clone(), Some(pid)))
    }
}

/// Terminator that records pids instead of signalling them.
#[derive(Debug, Clone)]
pub struct FakeTerminator {
    log: EventLog,
    failing: bool,
}

impl FakeTerminator {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            failing: false,
        }
    }

    /// Record the attempt but report an error, like a stuck process.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

impl Terminator for FakeTerminator {
    fn terminate<'a>(
        &'a self,
        handle: &'a mut ProcessHandle,
        mode: TerminationMode,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let pid = handle.pid().unwrap_or_default();
            self.log.push(ProcessEvent::Terminated(pid, mode));
            if self.failing {
                return Err(anyhow::anyhow!("pid {pid} refused to die").into());
            }
            Ok(())
        })
    }
}

/// In-memory console shared between a supervisor and the test.
#[derive(Debug, Clone, Default)]
pub struct SharedConsole {
    buf: Arc<Mutex<Vec<u8>>>,
    broken: bool,
}

impl SharedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write fails, like a closed terminal.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for SharedConsole {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        if self.broken {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "console closed"));
        }
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if self.broken {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "console closed"));
        }
        Ok(())
    }
}
