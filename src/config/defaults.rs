//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default polling interval in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 500;

/// Default `udevadm` program, looked up on `PATH`.
pub const UDEVADM: &str = "udevadm";

/// Whether the monitor process is wrapped in `stdbuf -oL` by default.
pub const LINE_BUFFERED: bool = true;

/// Default configuration file written by `init`.
pub const CONFIG_FILE: &str = "usbcdc-monitor.toml";

/// Default polling interval as Duration.
#[must_use]
pub const fn poll_interval() -> Duration {
    Duration::from_millis(POLL_INTERVAL_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_interval_matches_monitor_default() {
        assert_eq!(poll_interval(), crate::monitor::DEFAULT_POLL_INTERVAL);
    }
}
