//! Device enumeration through the `serialport` crate.
//!
//! Used on platforms without sysfs. The OS port registry does not expose
//! the bound driver, so every USB serial port with a product string is
//! reported.

use serialport::{SerialPortType, available_ports};

use crate::device::{Device, DeviceEnumerator, DeviceSet, EnumerateError};

/// [`DeviceEnumerator`] backed by [`serialport::available_ports`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialPortEnumerator;

impl SerialPortEnumerator {
    /// Creates a new enumerator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DeviceEnumerator for SerialPortEnumerator {
    fn enumerate(&self) -> Result<DeviceSet, EnumerateError> {
        let ports = available_ports().map_err(|e| EnumerateError::Platform {
            message: e.to_string(),
        })?;

        let devices: DeviceSet = ports
            .into_iter()
            .filter_map(|port| usb_device(port.port_name, &port.port_type))
            .collect();

        tracing::trace!("Serial port registry lists {} USB device(s)", devices.len());
        Ok(devices)
    }
}

/// Maps a USB port with a non-empty product string to a device.
fn usb_device(name: String, port_type: &SerialPortType) -> Option<Device> {
    match port_type {
        SerialPortType::UsbPort(usb) => usb
            .product
            .as_deref()
            .map(|product| Device::new(name, product))
            .filter(Device::is_complete),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::UsbPortInfo;

    fn usb_port(product: Option<&str>) -> SerialPortType {
        SerialPortType::UsbPort(UsbPortInfo {
            vid: 0x2341,
            pid: 0x0043,
            serial_number: None,
            manufacturer: Some("Arduino".to_string()),
            product: product.map(str::to_string),
        })
    }

    #[test]
    fn usb_port_with_product_is_kept() {
        let device = usb_device("COM3".to_string(), &usb_port(Some("Uno")));
        assert_eq!(device, Some(Device::new("COM3", "Uno")));
    }

    #[test]
    fn usb_port_without_product_is_omitted() {
        assert_eq!(usb_device("COM3".to_string(), &usb_port(None)), None);
        assert_eq!(usb_device("COM3".to_string(), &usb_port(Some(""))), None);
    }

    #[test]
    fn non_usb_ports_are_omitted() {
        assert_eq!(
            usb_device("COM1".to_string(), &SerialPortType::PciPort),
            None
        );
        assert_eq!(
            usb_device("/dev/cu.Bluetooth".to_string(), &SerialPortType::BluetoothPort),
            None
        );
    }
}
