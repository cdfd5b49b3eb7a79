//! usbcdc-monitor: USB CDC-ACM Device Change Monitor
//!
//! A library for discovering the USB CDC-ACM serial devices attached to a
//! host and reporting every device that arrives or leaves, either from a
//! udev event stream or by polling.

pub mod config;
pub mod device;
pub mod monitor;
pub mod udev;
