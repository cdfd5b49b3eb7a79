//! Device layer for enumerating and representing USB serial devices.
//!
//! This module provides types and traits for:
//! - Representing discovered devices ([`Device`], [`DeviceSet`])
//! - Representing arrival/removal events ([`DeviceEvent`], [`DeviceEventKind`])
//! - Enumerating the devices currently present ([`DeviceEnumerator`])
//! - Platform-specific implementations ([`platform`])

mod enumerator;
mod model;
pub mod platform;

pub use enumerator::{DeviceEnumerator, EnumerateError};
pub use model::{Device, DeviceEvent, DeviceEventKind, DeviceSet};
