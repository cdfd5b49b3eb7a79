//! Polling-based change source.
//!
//! [`PollSource`] periodically re-enumerates devices and diffs the result
//! against the last known snapshot.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

use super::MonitorError;
use super::change::diff;
use super::source::{ChangeSource, SourceMode};
use crate::device::{DeviceEnumerator, DeviceEvent, DeviceSet};

/// Default delay between two enumerations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The last successful enumeration.
#[derive(Debug, Clone)]
struct Snapshot {
    devices: DeviceSet,
    taken_at: Instant,
}

/// A [`ChangeSource`] that detects changes by polling an enumerator.
///
/// Each call to [`ChangeSource::next_changes`] is one tick:
/// 1. Sleep until one interval after the previous enumeration attempt
///    completed
/// 2. Enumerate devices
/// 3. Queue every removed device, then every added device
/// 4. Replace the last known snapshot
///
/// A failed enumeration abandons the tick and leaves the snapshot untouched.
/// The next call waits a full interval and tries again.
///
/// Enumeration runs inline on the calling task. Enumerators only read small
/// sysfs attributes or a single command's output, so the blocking window
/// stays short.
#[derive(Debug)]
pub struct PollSource<E> {
    enumerator: E,
    interval: Duration,
    last: Option<Snapshot>,
    last_attempt_at: Option<Instant>,
}

impl<E> PollSource<E>
where
    E: DeviceEnumerator,
{
    /// Creates a new poll source.
    ///
    /// # Arguments
    ///
    /// * `enumerator` - The device enumerator to poll
    /// * `interval` - How long to wait between enumerations
    #[must_use]
    pub const fn new(enumerator: E, interval: Duration) -> Self {
        Self {
            enumerator,
            interval,
            last: None,
            last_attempt_at: None,
        }
    }

    /// Returns the polling interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns a reference to the enumerator.
    #[must_use]
    pub const fn enumerator(&self) -> &E {
        &self.enumerator
    }

    /// Returns the devices seen by the last successful enumeration.
    ///
    /// `None` until the source has been primed with the initial snapshot.
    #[must_use]
    pub fn last_known_devices(&self) -> Option<&DeviceSet> {
        self.last.as_ref().map(|s| &s.devices)
    }

    /// Returns when the last successful enumeration completed.
    #[must_use]
    pub fn last_snapshot_at(&self) -> Option<Instant> {
        self.last.as_ref().map(|s| s.taken_at)
    }

    /// Enumerates once and queues the differences from the last snapshot.
    fn tick(&mut self, pending: &mut VecDeque<DeviceEvent>) -> Result<(), MonitorError> {
        let current = match self.enumerator.enumerate() {
            Ok(current) => current,
            Err(e) => {
                self.last_attempt_at = Some(Instant::now());
                return Err(e.into());
            }
        };
        let taken_at = Instant::now();
        self.last_attempt_at = Some(taken_at);

        let prior = self.last.as_ref().map(|s| &s.devices);
        let changes = diff(prior.unwrap_or(&DeviceSet::new()), &current);
        if changes.is_empty() {
            tracing::trace!("Poll found no changes among {} device(s)", current.len());
        } else {
            tracing::debug!(
                "Poll detected {} added, {} removed",
                changes.added.len(),
                changes.removed.len()
            );
            for gone in &changes.removed {
                if let Some(replacement) = changes.added.find_by_path(gone.path()) {
                    tracing::debug!(
                        "{} changed product from '{}' to '{}'",
                        gone.path(),
                        gone.product(),
                        replacement.product()
                    );
                }
            }
            pending.extend(changes.into_events());
        }

        self.last = Some(Snapshot {
            devices: current,
            taken_at,
        });
        Ok(())
    }
}

impl<E> ChangeSource for PollSource<E>
where
    E: DeviceEnumerator,
{
    fn mode(&self) -> SourceMode {
        SourceMode::Polling
    }

    fn prime(&mut self, snapshot: &DeviceSet, taken_at: Instant) {
        self.last = Some(Snapshot {
            devices: snapshot.clone(),
            taken_at,
        });
        self.last_attempt_at = Some(taken_at);
    }

    async fn next_changes(
        &mut self,
        pending: &mut VecDeque<DeviceEvent>,
    ) -> Result<(), MonitorError> {
        let Some(previous) = self.last_attempt_at else {
            return Err(MonitorError::Usage(
                "poll source driven before the initial snapshot",
            ));
        };

        tokio::time::sleep_until(previous + self.interval).await;
        self.tick(pending)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
