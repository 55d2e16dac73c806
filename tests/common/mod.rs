#![allow(dead_code)]

pub use groupwatch_test_utils::builders;
pub use groupwatch_test_utils::recording_runner;
pub use groupwatch_test_utils::{init_tracing, with_timeout};

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Fixed "process start" used by tracker tests.
pub fn launch_time() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

/// `secs` seconds after [`launch_time`].
pub fn after_launch(secs: u64) -> SystemTime {
    launch_time() + Duration::from_secs(secs)
}
