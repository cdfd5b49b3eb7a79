//! Platform-specific event stream launchers.
//!
//! # Platform Support
//!
//! - **Linux**: Runs `udevadm monitor` ([`MonitorCommand`]).
//! - **Other platforms**: No event stream; the monitor polls.

#[cfg(target_os = "linux")]
mod udevadm;

#[cfg(target_os = "linux")]
pub use udevadm::MonitorCommand;

/// Returns true if an event stream can be launched on this platform.
#[must_use]
pub const fn has_event_stream() -> bool {
    cfg!(target_os = "linux")
}
