//! Shared fakes for taskcron's integration and property tests.
//!
//! - [`builders`]: task lists and definitions, serializable as task files.
//! - [`fake_process`]: a scripted `ProcessInvoker` that records command lines.
//! - [`manual_backend`]: a `ScheduleBackend` whose firings the test triggers.

pub mod builders;
pub mod fake_process;
pub mod manual_backend;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

/// Upper bound for any single awaited step in an async test.
pub const TEST_DEADLINE: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Install a test-captured subscriber once per test binary.
///
/// The filter comes from `TASKCRON_LOG`, then `RUST_LOG`, then `info`, so
/// `TASKCRON_LOG=debug cargo test -- --nocapture` shows scheduler and
/// audit-writer events next to the test output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env("TASKCRON_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_DEADLINE`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_DEADLINE, f).await {
        Ok(value) => value,
        Err(_) => panic!("test step did not finish within {TEST_DEADLINE:?}"),
    }
}
