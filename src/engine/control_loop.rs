// src/engine/control_loop.rs

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use crate::exec::{Launcher, RunReport, Supervisor, Terminator};
use crate::watch::ChangeDetector;

/// The scan -> decide -> run -> sleep loop.
///
/// Sole owner of the detector state, the watermark and the retained
/// processes, so nothing here needs a lock.
#[derive(Debug)]
pub struct ControlLoop<L: Launcher, T: Terminator> {
    detector: ChangeDetector,
    supervisor: Supervisor<L, T>,
    interval: Duration,
    runs: u64,
}

impl<L: Launcher, T: Terminator> ControlLoop<L, T> {
    pub fn new(detector: ChangeDetector, supervisor: Supervisor<L, T>, interval: Duration) -> Self {
        Self {
            detector,
            supervisor,
            interval,
            runs: 0,
        }
    }

    /// One cycle: scan, and run the pipeline if anything changed.
    pub async fn tick(&mut self) -> Option<RunReport> {
        if !self.detector.poll(self.supervisor.last_run()) {
            return None;
        }

        self.runs += 1;
        info!(run = self.runs, "change detected; restarting pipeline");
        Some(self.supervisor.run().await)
    }

    /// Loop until `shutdown` resolves, then stop the running pipeline.
    ///
    /// A hung intermediate stage blocks the loop, including shutdown, until it
    /// exits.
    pub async fn run_until<F>(mut self, shutdown: F) -> Supervisor<L, T>
    where
        F: Future<Output = ()>,
    {
        info!(
            root = ?self.detector.root(),
            interval_ms = self.interval.as_millis() as u64,
            "pollrun started"
        );

        tokio::pin!(shutdown);

        loop {
            if let Some(report) = self.tick().await {
                debug!(?report, "run finished sequencing");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
            }
        }

        let stopped = self.supervisor.teardown().await;
        info!(stopped, "pollrun exiting");
        self.supervisor
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    pub fn supervisor(&self) -> &Supervisor<L, T> {
        &self.supervisor
    }

    /// Number of triggered runs so far.
    pub fn runs(&self) -> u64 {
        self.runs
    }
}
