//! Shared helpers for `tom`'s integration tests.

pub mod builders;
pub mod fake_executor;
pub mod faulty_fs;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Upper bound for a single build in tests.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a tracing subscriber that writes through the test harness.
///
/// The filter comes from `TOM_LOG` (as for the binary), then `RUST_LOG`,
/// then `info`. Output shows up only for failing tests unless the tests run
/// with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("TOM_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("build did not finish within {TEST_TIMEOUT:?}"),
    }
}
