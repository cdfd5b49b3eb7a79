//! Platform-specific device enumerator implementations.
//!
//! This module provides conditional compilation for platform-specific
//! implementations of the [`DeviceEnumerator`] trait.
//!
//! # Platform Support
//!
//! - **Linux**: Walks sysfs ([`SysfsEnumerator`]) or parses a
//!   `udevadm info --export-db` dump ([`UdevadmEnumerator`]).
//! - **Other platforms**: Uses the `serialport` crate ([`SerialPortEnumerator`]).

use std::fmt;
use std::path::Path;

use super::{DeviceEnumerator, EnumerateError};

#[cfg(target_os = "linux")]
mod sysfs;
#[cfg(target_os = "linux")]
mod udevadm;

#[cfg(not(target_os = "linux"))]
mod serial;

#[cfg(target_os = "linux")]
pub use sysfs::SysfsEnumerator;
#[cfg(target_os = "linux")]
pub use udevadm::UdevadmEnumerator;

#[cfg(not(target_os = "linux"))]
pub use serial::SerialPortEnumerator;

/// Selects which enumerator backs the initial snapshot and polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumeratorKind {
    /// Walk the sysfs device tree (Linux).
    Sysfs,
    /// Parse a one-shot `udevadm info --export-db` dump (Linux).
    Udevadm,
    /// Query the OS serial port registry through the `serialport` crate.
    SerialPort,
}

impl EnumeratorKind {
    /// Returns the preferred enumerator for the current platform.
    #[must_use]
    pub const fn platform_default() -> Self {
        if cfg!(target_os = "linux") {
            Self::Sysfs
        } else {
            Self::SerialPort
        }
    }

    /// Returns true if this enumerator is compiled in on the current platform.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        match self {
            Self::Sysfs | Self::Udevadm => cfg!(target_os = "linux"),
            Self::SerialPort => !cfg!(target_os = "linux"),
        }
    }

    /// Returns the configuration name of this enumerator.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sysfs => "sysfs",
            Self::Udevadm => "udevadm",
            Self::SerialPort => "serialport",
        }
    }

    /// Parses a configuration name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sysfs" => Some(Self::Sysfs),
            "udevadm" | "udev" => Some(Self::Udevadm),
            "serialport" | "serial" => Some(Self::SerialPort),
            _ => None,
        }
    }
}

impl fmt::Display for EnumeratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Creates the enumerator selected by `kind`.
///
/// # Arguments
///
/// * `kind` - Which enumerator to build
/// * `udevadm` - Program used by [`EnumeratorKind::Udevadm`]
///
/// # Errors
///
/// Returns [`EnumerateError::Unsupported`] if `kind` is not available on
/// the current platform.
#[cfg_attr(not(target_os = "linux"), allow(unused_variables))]
pub fn create_enumerator(
    kind: EnumeratorKind,
    udevadm: &Path,
) -> Result<Box<dyn DeviceEnumerator>, EnumerateError> {
    match kind {
        #[cfg(target_os = "linux")]
        EnumeratorKind::Sysfs => Ok(Box::new(SysfsEnumerator::new())),
        #[cfg(target_os = "linux")]
        EnumeratorKind::Udevadm => Ok(Box::new(UdevadmEnumerator::new(udevadm))),
        #[cfg(not(target_os = "linux"))]
        EnumeratorKind::SerialPort => Ok(Box::new(SerialPortEnumerator::new())),
        #[allow(unreachable_patterns)]
        other => Err(EnumerateError::Unsupported {
            kind: other.name().to_string(),
        }),
    }
}
