//! Linux device enumeration by walking the sysfs device tree.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::device::{Device, DeviceEnumerator, DeviceSet, EnumerateError};

/// Environment variable overriding the sysfs mount point.
pub const SYSFS_PATH_ENV: &str = "SYSFS_PATH";

/// Default sysfs mount point.
const DEFAULT_SYSFS_ROOT: &str = "/sys";

/// USB interface class code for Communications Device Class interfaces.
///
/// See <http://www.usb.org/developers/defined_class>.
const CDC_INTERFACE_CLASS: u8 = 0x02;

/// Prefix of the device node line in a tty `uevent` file.
const DEVNAME_KEY: &str = "DEVNAME=";

/// Linux implementation of [`DeviceEnumerator`] that walks sysfs.
///
/// Every USB interface directory whose `bInterfaceClass` is CDC is
/// resolved to a device: the product string comes from the parent USB
/// device's `product` file and the device node from the first `tty`
/// descendant's `uevent`.
///
/// # Example
///
/// ```no_run
/// use usbcdc_monitor::device::{DeviceEnumerator, platform::SysfsEnumerator};
///
/// let enumerator = SysfsEnumerator::new();
/// for device in enumerator.enumerate().expect("sysfs is mounted") {
///     println!("{device}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SysfsEnumerator {
    root: PathBuf,
}

impl SysfsEnumerator {
    /// Creates an enumerator rooted at `$SYSFS_PATH`, or `/sys` if unset.
    #[must_use]
    pub fn new() -> Self {
        let root = std::env::var_os(SYSFS_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_SYSFS_ROOT), PathBuf::from);
        Self { root }
    }

    /// Creates an enumerator rooted at an explicit sysfs mount point.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the sysfs mount point this enumerator reads.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn devices_dir(&self) -> Result<PathBuf, EnumerateError> {
        let dir = self.root.join("devices");
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(EnumerateError::MissingSysfs { path: dir })
        }
    }
}

impl Default for SysfsEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceEnumerator for SysfsEnumerator {
    fn enumerate(&self) -> Result<DeviceSet, EnumerateError> {
        let devices_dir = self.devices_dir()?;

        let devices: DeviceSet = walk_real_dirs(&devices_dir, 0)
            .filter(|dir| has_subsystem(dir.path(), "usb") && is_cdc_interface(dir.path()))
            .filter_map(|dir| interface_device(dir.path()))
            .filter(Device::is_complete)
            .collect();

        tracing::trace!(
            "sysfs walk of {} found {} device(s)",
            devices_dir.display(),
            devices.len()
        );
        Ok(devices)
    }
}

/// Recursively yields real (non-symlink) directories below `root`.
///
/// Unreadable entries are skipped; parts of sysfs are root-only.
fn walk_real_dirs(root: &Path, min_depth: usize) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .follow_links(false)
        .min_depth(min_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::trace!("Skipping unreadable sysfs entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
}

/// Returns true if `dir/subsystem` is a link whose target is named `name`.
fn has_subsystem(dir: &Path, name: &str) -> bool {
    fs::read_link(dir.join("subsystem"))
        .ok()
        .is_some_and(|target| target.file_name().is_some_and(|n| n == name))
}

/// Returns true if `dir/bInterfaceClass` holds the CDC class code.
fn is_cdc_interface(dir: &Path) -> bool {
    read_first_line(&dir.join("bInterfaceClass"))
        .and_then(|class| u8::from_str_radix(class.trim(), 16).ok())
        .is_some_and(|class| class == CDC_INTERFACE_CLASS)
}

/// Resolves a CDC interface directory to a device.
fn interface_device(interface: &Path) -> Option<Device> {
    let product = read_first_line(&interface.parent()?.join("product"))?;

    walk_real_dirs(&interface.join("tty"), 1)
        .filter(|tty| has_subsystem(tty.path(), "tty"))
        .find_map(|tty| read_devname(&tty.path().join("uevent")))
        .map(|path| Device::new(path, product))
}

/// Reads the `DEVNAME=` line of a `uevent` file as a `/dev` path.
fn read_devname(uevent: &Path) -> Option<String> {
    let file = fs::File::open(uevent).ok()?;
    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .find_map(|line| {
            line.strip_prefix(DEVNAME_KEY)
                .map(|name| format!("/dev/{name}"))
        })
}

/// Reads the first line of a small attribute file, without the newline.
fn read_first_line(path: &Path) -> Option<String> {
    let file = fs::File::open(path).ok()?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line).ok()?;
    let line = line.trim_end_matches(['\n', '\r']);
    Some(line.to_string())
}

#[cfg(test)]
#[path = "sysfs_tests.rs"]
mod tests;
