// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`tokenizer`] splits raw command strings into program + arguments.
//! - [`command`] holds the tokenized [`CommandLine`] and stage outcomes.
//! - [`launcher`] provides the `Launcher` trait and the `tokio::process`
//!   backed [`RealLauncher`]; tests swap in a fake.
//! - [`terminate`] provides the `Terminator` trait with Unix (signals) and
//!   Windows (`taskkill`) implementations.
//! - [`supervisor`] sequences a pipeline run and keeps the final stage alive
//!   until the next one.

pub mod command;
pub mod launcher;
pub mod process;
pub mod supervisor;
pub mod terminate;
pub mod tokenizer;

pub use command::{CommandLine, StageOutcome};
pub use launcher::{Launcher, RealLauncher};
pub use process::ProcessHandle;
pub use supervisor::{Console, RunReport, StopReason, Supervisor, SupervisorOptions, TriggerClock};
pub use terminate::{platform_terminator, PlatformTerminator, Terminator};
pub use tokenizer::{tokenize, TokenizeError};
