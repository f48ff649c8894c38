//! Shared fixtures for the pollrun integration tests: mock trees, rule
//! builders and fake process backends.

pub mod builders;
pub mod fake_process;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Filter comes from `RUST_LOG`, falling back to `POLLRUN_LOG` and then
/// `info`. Output shows up only for failing tests unless run with
/// `--nocapture`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_from_env("POLLRUN_LOG"))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
