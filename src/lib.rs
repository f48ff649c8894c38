// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{resolve_settings, Settings};
use crate::engine::ControlLoop;
use crate::errors::PollrunError;
use crate::exec::{platform_terminator, RealLauncher, Supervisor, SupervisorOptions};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{ChangeDetector, WatchRules};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings (CLI + optional TOML file)
/// - the polling change detector
/// - the pipeline supervisor with the platform terminator
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = resolve_settings(&args)?;

    if args.dry_run {
        print_dry_run(&settings);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    if !fs.is_dir(&settings.root) {
        return Err(PollrunError::ConfigError(format!(
            "root {:?} is not a directory",
            settings.root
        ))
        .into());
    }

    let detector = ChangeDetector::new(
        fs,
        settings.root.clone(),
        WatchRules::from_settings(&settings),
    );
    let supervisor = Supervisor::new(
        SupervisorOptions::from_settings(&settings),
        RealLauncher,
        platform_terminator(),
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    ControlLoop::new(detector, supervisor, settings.interval)
        .run_until(shutdown)
        .await;
    Ok(())
}

/// Simple dry-run output: print the resolved settings.
fn print_dry_run(settings: &Settings) {
    println!("pollrun dry-run");
    println!("  root = {}", settings.root.display());
    println!(
        "  exts = {}",
        settings.extensions.iter().cloned().collect::<Vec<_>>().join(" ")
    );
    if !settings.watch_patterns.is_empty() {
        println!("  patterns = {:?}", settings.watch_patterns);
    }
    println!("  skip_patterns = {:?}", settings.skip_patterns);
    println!("  skip_dot_dirs = {}", settings.skip_dot_dirs);
    println!("  skip_dot_files = {}", settings.skip_dot_files);
    println!("  interval = {}", humantime::format_duration(settings.interval));
    println!("  termination = {:?}", settings.termination);
    if settings.clear {
        match &settings.clear_cmd {
            Some(cmd) => println!("  clear: {cmd}"),
            None => println!("  clear: reset sequence"),
        }
    }
    println!();

    println!("commands ({}):", settings.commands.len());
    let last = settings.commands.len().saturating_sub(1);
    for (i, cmd) in settings.commands.iter().enumerate() {
        let mode = if i == last { "keep running" } else { "wait" };
        match exec::CommandLine::parse(cmd) {
            Ok(line) => println!("  {}. [{mode}] {line}", i + 1),
            Err(e) => println!("  {}. [invalid] {cmd:?}: {e}", i + 1),
        }
    }

    debug!("dry-run complete (no execution)");
}
