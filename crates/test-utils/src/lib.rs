//! Shared helpers for `testrun`'s integration tests: tracing setup, a
//! per-test time limit, builders for specs/configs/results and a scripted
//! `ProcessRunner`.

pub mod builders;
pub mod fake_runner;

use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Output goes through the test writer, so runner logs (spawn, timeout,
/// SIGTERM/SIGKILL) only show up for failing tests. Filter with `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Upper bound for any single test that spawns real processes.
///
/// Runner tests use sub-second timeouts; this catches a hang in termination
/// or pipe draining instead of letting the test binary stall.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(10), f)
        .await
        .expect("test exceeded 10s; a child or reader was not cleaned up")
}
