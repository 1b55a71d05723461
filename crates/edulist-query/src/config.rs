//! Tunables for caching and input debouncing.

use std::time::Duration;

/// How long a cached list response is served without a network call.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Quiet period after the last keystroke before search text is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    pub stale_time: Duration,
    pub debounce: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}
