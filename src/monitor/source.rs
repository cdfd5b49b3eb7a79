//! The change source capability shared by streaming and polling.

use std::collections::VecDeque;
use std::future::Future;

use tokio::time::Instant;

use super::MonitorError;
use crate::device::{DeviceEvent, DeviceSet};

/// How a change source detects changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceMode {
    /// Events are read from an external monitor process.
    Streaming,
    /// Devices are periodically re-enumerated and diffed.
    Polling,
}

impl SourceMode {
    /// Returns a human-readable label for logging.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Streaming => "streaming",
            Self::Polling => "polling",
        }
    }
}

/// Strategy that detects device changes for a [`super::DeviceMonitor`].
///
/// # Design
///
/// - The monitor depends only on this trait
/// - Implementations are selected at startup ([`super::StreamSource`], [`super::PollSource`])
/// - One call to [`ChangeSource::next_changes`] performs one unit of work
pub trait ChangeSource: Send {
    /// Returns the detection mode, used as the monitor's state once it starts.
    fn mode(&self) -> SourceMode;

    /// Receives the initial snapshot and the time it was taken.
    ///
    /// Called exactly once, before the first [`ChangeSource::next_changes`].
    fn prime(&mut self, _snapshot: &DeviceSet, _taken_at: Instant) {}

    /// Performs one unit of detection work, appending any detected events.
    ///
    /// For a stream this is one paragraph; for a poll it is one tick. The
    /// future may append nothing and still return `Ok(())`.
    ///
    /// Must be cancel-safe at its suspension points: the monitor drops the
    /// future when it is closed.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Enumerate`] or [`MonitorError::Transport`]
    /// when detection cannot proceed.
    fn next_changes(
        &mut self,
        pending: &mut VecDeque<DeviceEvent>,
    ) -> impl Future<Output = Result<(), MonitorError>> + Send;

    /// Releases external resources. Called when the monitor is closed.
    fn shutdown(&mut self) {}
}
