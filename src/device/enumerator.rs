//! Device enumeration trait and error types.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use super::DeviceSet;

/// Error type for device enumeration.
///
/// These are environment errors: the enumerator could not reach the OS
/// facility it depends on. Callers decide whether to retry.
#[derive(Debug, Error)]
pub enum EnumerateError {
    /// The sysfs device tree is absent or not a directory.
    #[error("No sysfs device tree at '{}'", path.display())]
    MissingSysfs {
        /// The directory that was expected to exist.
        path: PathBuf,
    },

    /// An external enumeration command could not be found.
    #[error("Command not found: {program}")]
    CommandNotFound {
        /// The program that was looked up.
        program: String,
    },

    /// An external enumeration command exited unsuccessfully.
    #[error("Command '{program}' failed: {status}")]
    CommandFailed {
        /// The program that was run.
        program: String,
        /// Exit status description.
        status: String,
    },

    /// An I/O error occurred while reading device information.
    #[error("I/O error while {context}: {source}")]
    Io {
        /// What the enumerator was doing.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },

    /// The requested enumerator is not available on this platform.
    #[error("Enumerator '{kind}' is not supported on this platform")]
    Unsupported {
        /// Name of the requested enumerator.
        kind: String,
    },
}

/// Trait for listing the USB serial devices currently present.
///
/// # Design
///
/// - The monitor and the poll source depend only on this trait
/// - Enables dependency injection for testing with mock implementations
/// - Platform-specific implementations live in [`super::platform`]
///
/// # Example
///
/// ```ignore
/// use usbcdc_monitor::device::{DeviceEnumerator, DeviceSet, EnumerateError};
///
/// struct MockEnumerator {
///     snapshots: Vec<DeviceSet>,
///     call_count: std::sync::atomic::AtomicUsize,
/// }
///
/// impl DeviceEnumerator for MockEnumerator {
///     fn enumerate(&self) -> Result<DeviceSet, EnumerateError> {
///         let idx = self.call_count.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
///         Ok(self.snapshots.get(idx).cloned().unwrap_or_default())
///     }
/// }
/// ```
pub trait DeviceEnumerator: Send + Sync {
    /// Lists the relevant devices present right now.
    ///
    /// # Errors
    ///
    /// Returns [`EnumerateError`] when the required OS facility is
    /// unavailable (missing sysfs, missing command, I/O failure).
    ///
    /// # Implementation Notes
    ///
    /// - Each call must enumerate afresh; no caching between calls
    /// - Devices with an empty path or product string must be omitted
    /// - This is a synchronous operation and may block briefly
    fn enumerate(&self) -> Result<DeviceSet, EnumerateError>;
}

impl<T: DeviceEnumerator + ?Sized> DeviceEnumerator for Arc<T> {
    fn enumerate(&self) -> Result<DeviceSet, EnumerateError> {
        (**self).enumerate()
    }
}

impl<T: DeviceEnumerator + ?Sized> DeviceEnumerator for Box<T> {
    fn enumerate(&self) -> Result<DeviceSet, EnumerateError> {
        (**self).enumerate()
    }
}
