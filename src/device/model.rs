//! Core device types.

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;

use serde::Serialize;

/// A USB CDC-ACM serial device discovered on the host.
///
/// Devices are immutable values. Two devices are equal when both the
/// path and the product string match. Ordering is by path first, with the
/// product string as tiebreak, which lets [`DeviceSet`] keep its members
/// sorted and lets set differences run as a linear merge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Device {
    path: String,
    product: String,
}

impl Device {
    /// Creates a new device.
    ///
    /// # Arguments
    ///
    /// * `path` - The OS device node (e.g. `/dev/ttyACM0`, `COM3`)
    /// * `product` - The decoded, human-readable product string
    #[must_use]
    pub fn new(path: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            product: product.into(),
        }
    }

    /// Returns the OS device node identifier.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the product string.
    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Returns true if both the path and the product string are non-empty.
    ///
    /// Enumerators drop devices that fail this check.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.path.is_empty() && !self.product.is_empty()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'@{}", self.product, self.path)
    }
}

/// An ordered set of unique devices captured at one point in time.
///
/// A set is built once (from an enumeration or a parsed listing) and never
/// mutated afterwards; a refresh replaces the whole set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeviceSet(BTreeSet<Device>);

impl DeviceSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns the number of devices in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set contains no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the set contains `device`.
    #[must_use]
    pub fn contains(&self, device: &Device) -> bool {
        self.0.contains(device)
    }

    /// Returns the device registered at `path`, if any.
    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<&Device> {
        self.0.iter().find(|d| d.path() == path)
    }

    /// Iterates the devices in ascending order.
    pub fn iter(&self) -> btree_set::Iter<'_, Device> {
        self.0.iter()
    }
}

impl FromIterator<Device> for DeviceSet {
    fn from_iter<I: IntoIterator<Item = Device>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for DeviceSet {
    type Item = Device;
    type IntoIter = btree_set::IntoIter<Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DeviceSet {
    type Item = &'a Device;
    type IntoIter = btree_set::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The kind of device change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceEventKind {
    /// A device arrived.
    Add,
    /// A device was removed.
    Remove,
}

impl fmt::Display for DeviceEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Remove => write!(f, "REMOVE"),
        }
    }
}

/// A device arrival or removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceEvent {
    /// Whether the device arrived or was removed.
    pub kind: DeviceEventKind,
    /// The device concerned.
    pub device: Device,
}

impl DeviceEvent {
    /// Creates a new device event.
    #[must_use]
    pub const fn new(kind: DeviceEventKind, device: Device) -> Self {
        Self { kind, device }
    }

    /// Creates an "add" event.
    #[must_use]
    pub const fn added(device: Device) -> Self {
        Self::new(DeviceEventKind::Add, device)
    }

    /// Creates a "remove" event.
    #[must_use]
    pub const fn removed(device: Device) -> Self {
        Self::new(DeviceEventKind::Remove, device)
    }

    /// Returns true if this is an "add" event.
    #[must_use]
    pub const fn is_added(&self) -> bool {
        matches!(self.kind, DeviceEventKind::Add)
    }

    /// Returns true if this is a "remove" event.
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        matches!(self.kind, DeviceEventKind::Remove)
    }
}

impl fmt::Display for DeviceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.device)
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
