//! Monitor layer for detecting USB CDC-ACM device changes.
//!
//! This module provides types and functions for:
//! - Detecting changes between snapshots ([`diff`], [`DeviceSetDifferences`])
//! - Error handling ([`MonitorError`], [`TransportError`])
//! - The change source capability ([`ChangeSource`], [`SourceMode`])
//! - Event-stream detection ([`StreamSource`], [`platform`])
//! - Polling detection ([`PollSource`])
//! - Orchestration ([`DeviceMonitor`], [`CloseHandle`])

mod change;
mod device_monitor;
mod error;
pub mod platform;
mod poller;
mod source;
mod stream;

#[cfg(test)]
mod test_fixtures;

pub use change::{DeviceSetDifferences, diff};
pub use device_monitor::{CloseHandle, DeviceMonitor, MonitorState};
pub use error::{MonitorError, TransportError};
pub use poller::{DEFAULT_POLL_INTERVAL, PollSource};
pub use source::{ChangeSource, SourceMode};
pub use stream::StreamSource;
