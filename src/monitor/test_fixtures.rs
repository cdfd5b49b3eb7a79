//! Shared test fixtures for monitor tests.

use crate::device::{Device, DeviceEnumerator, DeviceSet, EnumerateError};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock enumerator that returns scripted results.
///
/// Once the script runs out, the last successful snapshot is repeated so
/// that extra polls see no change.
pub struct MockEnumerator {
    results: Mutex<VecDeque<Result<DeviceSet, EnumerateError>>>,
    last: Mutex<DeviceSet>,
    calls: AtomicUsize,
}

impl MockEnumerator {
    pub fn new(results: Vec<Result<DeviceSet, EnumerateError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            last: Mutex::new(DeviceSet::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn returning_snapshots(snapshots: Vec<DeviceSet>) -> Self {
        Self::new(snapshots.into_iter().map(Ok).collect())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DeviceEnumerator for MockEnumerator {
    fn enumerate(&self) -> Result<DeviceSet, EnumerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut last = self.last.lock().unwrap();
        match self.results.lock().unwrap().pop_front() {
            Some(Ok(devices)) => {
                last.clone_from(&devices);
                Ok(devices)
            }
            Some(Err(e)) => Err(e),
            None => Ok(last.clone()),
        }
    }
}

/// Builds a device set from `(path, product)` pairs.
pub fn devices(pairs: &[(&str, &str)]) -> DeviceSet {
    pairs
        .iter()
        .map(|(path, product)| Device::new(*path, *product))
        .collect()
}

/// An environment error as raised by a host without sysfs.
pub fn missing_sysfs() -> EnumerateError {
    EnumerateError::MissingSysfs {
        path: "/sys/devices".into(),
    }
}

/// A complete `udevadm monitor --property` paragraph for a `cdc_acm` device.
pub fn event_paragraph(action: &str, devname: &str, model_enc: &str) -> String {
    format!(
        "UDEV  [1234.567890] {action}      /devices/usb1/1-1/1-1:1.0/tty/ttyACM0 (tty)\n\
         ACTION={action}\n\
         SUBSYSTEM=tty\n\
         DEVNAME={devname}\n\
         ID_MODEL_ENC={model_enc}\n\
         ID_USB_DRIVER=cdc_acm\n\
         \n"
    )
}
