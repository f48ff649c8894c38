// tests/supervisor_processes.rs
//
// Real processes through `sh`; Unix only.
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use pollrun::exec::{
    platform_terminator, RealLauncher, StopReason, Supervisor, SupervisorOptions,
};
use pollrun::types::TerminationMode;

fn append(file: &Path, word: &str) -> String {
    format!(r#"sh -c "echo {word} >> {}""#, file.display())
}

fn supervisor(commands: Vec<String>, termination: TerminationMode) -> Supervisor<RealLauncher, pollrun::exec::PlatformTerminator> {
    let options = SupervisorOptions {
        commands,
        termination,
        ..SupervisorOptions::default()
    };
    Supervisor::new(options, RealLauncher, platform_terminator())
}

fn is_alive(pid: u32) -> bool {
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

async fn wait_for_contents(file: &Path, expected: &str) {
    with_timeout(async {
        loop {
            if std::fs::read_to_string(file).unwrap_or_default() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
}

#[tokio::test]
async fn stages_run_in_order() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");

    let mut sup = supervisor(
        vec![append(&out, "one"), append(&out, "two"), append(&out, "three")],
        TerminationMode::Kill,
    );
    let report = sup.run().await;

    assert!(report.is_complete());
    wait_for_contents(&out, "one\ntwo\nthree\n").await;
    sup.teardown().await;
}

#[tokio::test]
async fn failing_stage_prevents_later_stages() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");

    let mut sup = supervisor(
        vec![append(&out, "first"), "false".to_string(), append(&out, "third")],
        TerminationMode::Kill,
    );
    let report = sup.run().await;

    assert_eq!(report.stop, StopReason::StageFailed { index: 1, code: 1 });
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "first\n");
    assert_eq!(sup.retained_count(), 0);
}

#[tokio::test]
async fn restart_kills_previous_final_stage() {
    init_tracing();
    for mode in [TerminationMode::Kill, TerminationMode::Graceful] {
        let mut sup = supervisor(vec!["sleep 30".to_string()], mode);

        sup.run().await;
        let first = sup.retained_pids()[0].expect("pid");
        assert!(is_alive(first));

        let second = with_timeout(sup.run()).await;
        assert_eq!(second.terminated, 1, "{mode:?}");
        assert!(!is_alive(first), "{mode:?}: pid {first} survived");

        let current = sup.retained_pids()[0].expect("pid");
        assert_ne!(current, first);
        sup.teardown().await;
        assert!(!is_alive(current));
    }
}

#[tokio::test]
async fn unknown_program_is_reported_not_fatal() {
    init_tracing();
    let mut sup = supervisor(
        vec!["pollrun-no-such-program --flag".to_string()],
        TerminationMode::Kill,
    );

    let report = sup.run().await;
    assert!(matches!(report.stop, StopReason::SpawnFailed { index: 0, .. }));
    assert_eq!(report.started, 0);
}
