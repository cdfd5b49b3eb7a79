//! Error types for the monitor layer.

use crate::device::EnumerateError;
use thiserror::Error;

/// Error type for the event-stream transport.
///
/// Any of these ends streaming: the monitor process is gone or unreadable.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The stream reached end of file.
    ///
    /// The monitor process exited or closed its standard output.
    #[error("Event stream closed")]
    Closed,

    /// Reading from the stream failed.
    #[error("Failed to read event stream: {0}")]
    Read(#[from] std::io::Error),

    /// The monitor process could not be started.
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        /// The program that was launched.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Error type for monitor operations.
///
/// Callers decide recovery strategy based on the error variant. None of
/// these latch: after an [`MonitorError::Enumerate`] or
/// [`MonitorError::Transport`] failure the monitor stays open and a later
/// call starts a fresh detection cycle.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// An operation was called out of order.
    ///
    /// This is a programming error in the caller and should not be retried.
    #[error("Usage error: {0}")]
    Usage(&'static str),

    /// Enumerating devices failed.
    #[error("Failed to enumerate devices: {0}")]
    Enumerate(#[from] EnumerateError),

    /// The event stream failed.
    #[error("Event stream failed: {0}")]
    Transport(#[source] TransportError),

    /// The monitor was closed while or before the operation ran.
    #[error("Operation aborted")]
    Aborted,
}

impl MonitorError {
    /// Returns true if this error was caused by closing the monitor.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Returns true if this error is a caller contract violation.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

impl From<TransportError> for MonitorError {
    fn from(error: TransportError) -> Self {
        Self::Transport(error)
    }
}
