//! Device descriptors and VID/PID match tables

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HidDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product_name: Option<String>,
    pub path: String,
    pub interface_number: Option<i32>,
}

impl HidDeviceInfo {
    pub fn new(vendor_id: u16, product_id: u16, path: String) -> Self {
        Self {
            vendor_id,
            product_id,
            serial_number: None,
            manufacturer: None,
            product_name: None,
            path,
            interface_number: None,
        }
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn with_interface(mut self, interface_number: i32) -> Self {
        self.interface_number = Some(interface_number);
        self
    }

    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }

    pub fn display_name(&self) -> String {
        self.product_name
            .clone()
            .or_else(|| self.manufacturer.clone())
            .unwrap_or_else(|| format!("{:04x}:{:04x}", self.vendor_id, self.product_id))
    }
}

impl Default for HidDeviceInfo {
    fn default() -> Self {
        Self {
            vendor_id: 0,
            product_id: 0,
            serial_number: None,
            manufacturer: None,
            product_name: None,
            path: String::new(),
            interface_number: None,
        }
    }
}

/// One accepted VID:PID (and optionally the HID interface) for a device family.
///
/// Composite foot switches expose a keyboard, a mouse and a vendor interface
/// under the same VID:PID; only the vendor interface accepts configuration
/// reports, so the match can pin an interface number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMatch {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: Option<i32>,
}

impl DeviceMatch {
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            interface: None,
        }
    }

    pub const fn on_interface(vendor_id: u16, product_id: u16, interface: i32) -> Self {
        Self {
            vendor_id,
            product_id,
            interface: Some(interface),
        }
    }

    pub fn matches(&self, info: &HidDeviceInfo) -> bool {
        if !info.matches(self.vendor_id, self.product_id) {
            return false;
        }
        // hidapi on macOS reports -1 for every interface
        if cfg!(target_os = "macos") {
            return true;
        }
        match self.interface {
            Some(wanted) => info.interface_number == Some(wanted),
            None => true,
        }
    }
}

impl fmt::Display for DeviceMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)?;
        if let Some(interface) = self.interface {
            write!(f, " (interface {interface})")?;
        }
        Ok(())
    }
}

/// Renders a match table as `0c45:7403, 0c45:7404` for error messages.
pub fn describe_matches(table: &[DeviceMatch]) -> String {
    table
        .iter()
        .map(|m| format!("{:04x}:{:04x}", m.vendor_id, m.product_id))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_creation() {
        let info = HidDeviceInfo::new(0x0c45, 0x7403, "/dev/hidraw0".to_string());
        assert_eq!(info.vendor_id, 0x0c45);
        assert_eq!(info.product_id, 0x7403);
        assert!(info.matches(0x0c45, 0x7403));
        assert!(!info.matches(0x0c45, 0x9999));
    }

    #[test]
    fn test_device_info_display_name() {
        let info = HidDeviceInfo::new(0x0c45, 0x7403, "/dev/hidraw0".to_string())
            .with_product_name("FootSwitch");
        assert_eq!(info.display_name(), "FootSwitch");

        let info = HidDeviceInfo::new(0x0c45, 0x7403, "/dev/hidraw0".to_string())
            .with_manufacturer("PCsensor");
        assert_eq!(info.display_name(), "PCsensor");

        let info = HidDeviceInfo::new(0x0c45, 0x7403, "/dev/hidraw0".to_string());
        assert_eq!(info.display_name(), "0c45:7403");
    }

    #[test]
    fn test_match_without_interface() {
        let m = DeviceMatch::new(0x0426, 0x3011);
        let info = HidDeviceInfo::new(0x0426, 0x3011, "p".to_string()).with_interface(0);
        assert!(m.matches(&info));
        let other = HidDeviceInfo::new(0x0426, 0x3012, "p".to_string());
        assert!(!m.matches(&other));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_match_pins_interface() {
        let m = DeviceMatch::on_interface(0x0c45, 0x7403, 1);
        let keyboard = HidDeviceInfo::new(0x0c45, 0x7403, "a".to_string()).with_interface(0);
        let vendor = HidDeviceInfo::new(0x0c45, 0x7403, "b".to_string()).with_interface(1);
        assert!(!m.matches(&keyboard));
        assert!(m.matches(&vendor));
    }

    #[test]
    fn test_describe_matches() {
        let table = [
            DeviceMatch::new(0x0c45, 0x7403),
            DeviceMatch::on_interface(0x413d, 0x2107, 1),
        ];
        assert_eq!(describe_matches(&table), "0c45:7403, 413d:2107");
        assert_eq!(format!("{}", table[1]), "413d:2107 (interface 1)");
    }
}
