//! Linux device enumeration from a `udevadm info --export-db` dump.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::device::{DeviceEnumerator, DeviceSet, EnumerateError};
use crate::udev::parse_device_listing;

/// Linux implementation of [`DeviceEnumerator`] backed by the udev database.
///
/// Runs `udevadm info --export-db` once per call and keeps the complete
/// `cdc_acm` records. Useful where sysfs is not readable but the udev
/// daemon is running.
#[derive(Debug, Clone)]
pub struct UdevadmEnumerator {
    program: PathBuf,
}

impl UdevadmEnumerator {
    /// Creates an enumerator that runs `program`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the program this enumerator runs.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl DeviceEnumerator for UdevadmEnumerator {
    fn enumerate(&self) -> Result<DeviceSet, EnumerateError> {
        let output = Command::new(&self.program)
            .args(["info", "--export-db"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => EnumerateError::CommandNotFound {
                    program: self.program_name(),
                },
                _ => EnumerateError::Io {
                    context: format!("running {}", self.program_name()),
                    source,
                },
            })?;

        if !output.status.success() {
            return Err(EnumerateError::CommandFailed {
                program: self.program_name(),
                status: output.status.to_string(),
            });
        }

        let devices = parse_device_listing(&output.stdout);
        tracing::trace!(
            "udev database dump ({} bytes) held {} device(s)",
            output.stdout.len(),
            devices.len()
        );
        Ok(devices)
    }
}
