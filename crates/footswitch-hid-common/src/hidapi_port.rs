//! hidapi-backed port and transport

use crate::{HidCommonError, HidCommonResult, HidDeviceInfo, HidPort, HidTransport};
use hidapi::{HidApi, HidDevice};
use std::ffi::CString;
use tracing::{debug, trace};

pub struct HidapiPort {
    api: HidApi,
}

impl HidapiPort {
    pub fn new() -> HidCommonResult<Self> {
        let api = HidApi::new().map_err(|e| HidCommonError::OpenError(e.to_string()))?;
        Ok(Self { api })
    }
}

fn describe(dev: &hidapi::DeviceInfo) -> HidDeviceInfo {
    let mut info = HidDeviceInfo::new(
        dev.vendor_id(),
        dev.product_id(),
        dev.path().to_string_lossy().into_owned(),
    );
    if let Some(serial) = dev.serial_number().filter(|s| !s.is_empty()) {
        info = info.with_serial(serial);
    }
    if let Some(manufacturer) = dev.manufacturer_string() {
        info = info.with_manufacturer(manufacturer);
    }
    if let Some(product) = dev.product_string() {
        info = info.with_product_name(product);
    }
    // hidapi reports -1 when the backend has no interface number
    if dev.interface_number() >= 0 {
        info = info.with_interface(dev.interface_number());
    }
    info
}

impl HidPort for HidapiPort {
    fn list_devices(&self) -> HidCommonResult<Vec<HidDeviceInfo>> {
        let devices: Vec<_> = self.api.device_list().map(describe).collect();
        trace!(count = devices.len(), "enumerated HID devices");
        Ok(devices)
    }

    fn open_device(&self, info: &HidDeviceInfo) -> HidCommonResult<Box<dyn HidTransport>> {
        let path = CString::new(info.path.clone())
            .map_err(|e| HidCommonError::OpenError(format!("invalid device path: {e}")))?;
        let device = self.api.open_path(&path).map_err(|e| {
            HidCommonError::OpenError(format!(
                "{:04x}:{:04x} at {}: {e}",
                info.vendor_id, info.product_id, info.path
            ))
        })?;
        debug!(path = %info.path, "opened HID device");
        Ok(Box::new(HidapiTransport {
            device,
            info: info.clone(),
        }))
    }
}

/// An open hidapi handle; the device is closed when this is dropped.
pub struct HidapiTransport {
    device: HidDevice,
    info: HidDeviceInfo,
}

impl HidTransport for HidapiTransport {
    fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        trace!(report = %crate::hex_dump(data), "hid write");
        self.device
            .write(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))
    }

    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> HidCommonResult<usize> {
        let n = self
            .device
            .read_timeout(buf, timeout_ms)
            .map_err(|e| HidCommonError::ReadError(e.to_string()))?;
        if n == 0 {
            return Err(HidCommonError::Timeout(timeout_ms));
        }
        trace!(report = %crate::hex_dump(buf.get(..n).unwrap_or_default()), "hid read");
        Ok(n)
    }

    fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
        trace!(report = %crate::hex_dump(data), "hid send feature");
        self.device
            .send_feature_report(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))
    }

    fn get_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<usize> {
        let n = self
            .device
            .get_feature_report(buf)
            .map_err(|e| HidCommonError::ReadError(e.to_string()))?;
        trace!(report = %crate::hex_dump(buf.get(..n).unwrap_or_default()), "hid get feature");
        Ok(n)
    }

    fn info(&self) -> &HidDeviceInfo {
        &self.info
    }
}

impl Drop for HidapiTransport {
    fn drop(&mut self) {
        debug!(path = %self.info.path, "closing HID device");
    }
}
