//! The device change monitor.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use super::MonitorError;
use super::poller::PollSource;
use super::source::{ChangeSource, SourceMode};
use crate::device::{DeviceEnumerator, DeviceEvent, DeviceSet};

/// Lifecycle state of a [`DeviceMonitor`].
///
/// ```text
/// New --fetch_initial_devices--> Ready --receive_next_event--> Streaming | Polling
///  \______________________________\_______________________________\__close--> Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorState {
    /// Constructed; the initial snapshot has not been fetched.
    New,
    /// The initial snapshot was fetched; detection has not started.
    Ready,
    /// Detecting changes from an event stream.
    Streaming,
    /// Detecting changes by polling.
    Polling,
    /// Closed. Terminal.
    Closed,
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::New => "new",
            Self::Ready => "ready",
            Self::Streaming => "streaming",
            Self::Polling => "polling",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

impl From<SourceMode> for MonitorState {
    fn from(mode: SourceMode) -> Self {
        match mode {
            SourceMode::Streaming => Self::Streaming,
            SourceMode::Polling => Self::Polling,
        }
    }
}

/// A cloneable handle that closes a [`DeviceMonitor`] from elsewhere.
///
/// Closing is a one-way latch. An in-flight
/// [`DeviceMonitor::receive_next_event`] observes it at its next
/// suspension point and completes with [`MonitorError::Aborted`].
#[derive(Debug, Clone)]
pub struct CloseHandle {
    signal: Arc<watch::Sender<bool>>,
}

impl CloseHandle {
    fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal: Arc::new(signal),
        }
    }

    /// Closes the monitor. Idempotent.
    pub fn close(&self) {
        self.signal.send_replace(true);
    }

    /// Returns true once the monitor has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.signal.borrow()
    }

    /// Completes once the monitor has been closed.
    pub async fn closed(&self) {
        let mut receiver = self.signal.subscribe();
        // The sender lives in `self`, so this only returns once closed.
        let _ = receiver.wait_for(|closed| *closed).await;
    }
}

/// Watches for USB CDC-ACM devices arriving and leaving.
///
/// # Usage
///
/// 1. Call [`DeviceMonitor::fetch_initial_devices`] exactly once
/// 2. Call [`DeviceMonitor::receive_next_event`] repeatedly
/// 3. Call [`DeviceMonitor::close`], or a [`CloseHandle::close`], to stop
///
/// Events are delivered in detection order. The monitor owns its queue
/// and snapshot; `&mut self` rules out overlapping calls.
///
/// Errors from the change source do not latch: the monitor stays in its
/// detection state and the next call starts a fresh cycle.
///
/// Dropping the monitor closes it.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use usbcdc_monitor::device::DeviceEnumerator;
/// use usbcdc_monitor::monitor::{DEFAULT_POLL_INTERVAL, DeviceMonitor};
///
/// # async fn example(
/// #     enumerator: Arc<dyn DeviceEnumerator>,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// let mut monitor = DeviceMonitor::polling(enumerator, DEFAULT_POLL_INTERVAL);
/// for device in &monitor.fetch_initial_devices()? {
///     println!("{device}");
/// }
/// loop {
///     let event = monitor.receive_next_event().await?;
///     println!("{event}");
/// }
/// # }
/// ```
pub struct DeviceMonitor<E, S>
where
    E: DeviceEnumerator,
    S: ChangeSource,
{
    enumerator: E,
    source: S,
    state: MonitorState,
    pending: VecDeque<DeviceEvent>,
    close: CloseHandle,
}

impl<E, S> DeviceMonitor<E, S>
where
    E: DeviceEnumerator,
    S: ChangeSource,
{
    /// Creates a monitor that snapshots with `enumerator` and detects
    /// changes with `source`.
    #[must_use]
    pub fn new(enumerator: E, source: S) -> Self {
        Self {
            enumerator,
            source,
            state: MonitorState::New,
            pending: VecDeque::new(),
            close: CloseHandle::new(),
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> MonitorState {
        self.state
    }

    /// Returns the active change source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the number of detected events not yet delivered.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns a handle that can close this monitor from another task.
    #[must_use]
    pub fn close_handle(&self) -> CloseHandle {
        self.close.clone()
    }

    /// Enumerates the devices present now and starts tracking from them.
    ///
    /// # Errors
    ///
    /// - [`MonitorError::Usage`] if called more than once
    /// - [`MonitorError::Enumerate`] if enumeration fails; the monitor stays
    ///   in [`MonitorState::New`] and the call may be retried
    /// - [`MonitorError::Aborted`] if the monitor is closed
    pub fn fetch_initial_devices(&mut self) -> Result<DeviceSet, MonitorError> {
        self.check_open()?;
        if self.state != MonitorState::New {
            return Err(MonitorError::Usage(
                "fetch_initial_devices may only be called once",
            ));
        }

        let devices = self.enumerator.enumerate()?;
        self.source.prime(&devices, Instant::now());
        self.state = MonitorState::Ready;

        tracing::debug!("Initial snapshot holds {} device(s)", devices.len());
        Ok(devices)
    }

    /// Waits for the next device event.
    ///
    /// Queued events are returned immediately in FIFO order. Otherwise the
    /// change source is driven until it queues one.
    ///
    /// # Errors
    ///
    /// - [`MonitorError::Usage`] before [`DeviceMonitor::fetch_initial_devices`]
    /// - [`MonitorError::Enumerate`] or [`MonitorError::Transport`] when the
    ///   current detection cycle fails
    /// - [`MonitorError::Aborted`] when the monitor is or becomes closed
    pub async fn receive_next_event(&mut self) -> Result<DeviceEvent, MonitorError> {
        self.check_open()?;
        match self.state {
            MonitorState::New => {
                return Err(MonitorError::Usage(
                    "receive_next_event called before fetch_initial_devices",
                ));
            }
            MonitorState::Ready => {
                self.state = self.source.mode().into();
                tracing::info!("Monitoring device changes ({})", self.source.mode().label());
            }
            MonitorState::Streaming | MonitorState::Polling | MonitorState::Closed => {}
        }

        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }

            let close = self.close.clone();
            let outcome = tokio::select! {
                biased;
                () = close.closed() => None,
                result = self.source.next_changes(&mut self.pending) => Some(result),
            };

            match outcome {
                None => {
                    self.close();
                    return Err(MonitorError::Aborted);
                }
                Some(Err(e)) => return Err(e),
                Some(Ok(())) => {}
            }
        }
    }

    /// Closes the monitor. Idempotent.
    ///
    /// Queued events are dropped, the change source is shut down and every
    /// later call fails with [`MonitorError::Aborted`].
    pub fn close(&mut self) {
        self.close.close();
        if self.state == MonitorState::Closed {
            return;
        }
        tracing::debug!("Closing device monitor (was {})", self.state);
        self.state = MonitorState::Closed;
        self.pending.clear();
        self.source.shutdown();
    }

    /// Finishes a close requested through a [`CloseHandle`].
    fn check_open(&mut self) -> Result<(), MonitorError> {
        if self.close.is_closed() {
            self.close();
            Err(MonitorError::Aborted)
        } else {
            Ok(())
        }
    }
}

impl<E> DeviceMonitor<E, PollSource<E>>
where
    E: DeviceEnumerator + Clone,
{
    /// Creates a monitor that polls `enumerator` every `interval`.
    #[must_use]
    pub fn polling(enumerator: E, interval: Duration) -> Self {
        let source = PollSource::new(enumerator.clone(), interval);
        Self::new(enumerator, source)
    }
}

impl<E, S> fmt::Debug for DeviceMonitor<E, S>
where
    E: DeviceEnumerator,
    S: ChangeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceMonitor")
            .field("state", &self.state)
            .field("mode", &self.source.mode())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<E, S> Drop for DeviceMonitor<E, S>
where
    E: DeviceEnumerator,
    S: ChangeSource,
{
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[path = "device_monitor_tests.rs"]
mod tests;
