//! Device set change detection.

use std::cmp::Ordering;

use crate::device::{Device, DeviceEvent, DeviceSet};

/// The result of comparing a prior snapshot to a current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSetDifferences {
    /// Devices present in the current snapshot but not the prior one.
    pub added: DeviceSet,
    /// Devices present in the prior snapshot but not the current one.
    pub removed: DeviceSet,
}

impl DeviceSetDifferences {
    /// Returns true if the snapshots were identical.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Converts the differences into events, all removals before all additions.
    ///
    /// Reporting removals first guarantees a consumer never sees a path
    /// present under two product strings at once.
    #[must_use]
    pub fn into_events(self) -> Vec<DeviceEvent> {
        self.removed
            .into_iter()
            .map(DeviceEvent::removed)
            .chain(self.added.into_iter().map(DeviceEvent::added))
            .collect()
    }
}

/// Compares two device snapshots.
///
/// Pure and deterministic: `added` is `current \ prior` and `removed` is
/// `prior \ current`. Both inputs are already sorted by device ordering, so
/// this is a single linear merge over the two sequences.
///
/// # Arguments
///
/// * `prior` - The previously known devices
/// * `current` - The freshly enumerated devices
#[must_use]
pub fn diff(prior: &DeviceSet, current: &DeviceSet) -> DeviceSetDifferences {
    let mut added: Vec<Device> = Vec::new();
    let mut removed: Vec<Device> = Vec::new();

    let mut old = prior.iter().peekable();
    let mut new = current.iter().peekable();

    loop {
        match (old.peek(), new.peek()) {
            (Some(a), Some(b)) => match a.cmp(b) {
                Ordering::Less => {
                    removed.extend(old.next().cloned());
                }
                Ordering::Greater => {
                    added.extend(new.next().cloned());
                }
                Ordering::Equal => {
                    old.next();
                    new.next();
                }
            },
            (Some(_), None) => {
                removed.extend(old.by_ref().cloned());
            }
            (None, Some(_)) => {
                added.extend(new.by_ref().cloned());
            }
            (None, None) => break,
        }
    }

    DeviceSetDifferences {
        added: added.into_iter().collect(),
        removed: removed.into_iter().collect(),
    }
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;
