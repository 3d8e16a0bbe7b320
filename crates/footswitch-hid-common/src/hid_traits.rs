//! HID transport traits

use crate::{DeviceMatch, HidCommonError, HidCommonResult, HidDeviceInfo, describe_matches};
use std::time::Duration;

/// An open HID handle.
///
/// Reports written with [`write_report`](HidTransport::write_report) and
/// [`send_feature_report`](HidTransport::send_feature_report) carry the report
/// id in byte 0, as hidapi expects.
pub trait HidTransport {
    fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize>;

    /// Reads one input report. A timeout is an error, never a 0-length read.
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> HidCommonResult<usize>;

    fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()>;

    /// `buf[0]` holds the report id to query on entry.
    fn get_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<usize>;

    /// Gives the firmware time to latch the previous report.
    fn settle(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }

    fn info(&self) -> &HidDeviceInfo;
}

pub trait HidPort {
    fn list_devices(&self) -> HidCommonResult<Vec<HidDeviceInfo>>;

    fn open_device(&self, info: &HidDeviceInfo) -> HidCommonResult<Box<dyn HidTransport>>;
}

/// Returns the first enumerated device accepted by `table`.
///
/// Entries are tried in table order so that a preferred VID:PID wins over a
/// later one when several devices are plugged in.
pub fn find_first(port: &dyn HidPort, table: &[DeviceMatch]) -> HidCommonResult<HidDeviceInfo> {
    let devices = port.list_devices()?;
    for entry in table {
        if let Some(found) = devices.iter().find(|info| entry.matches(info)) {
            tracing::debug!(device = %entry, path = %found.path, "matched device");
            return Ok(found.clone());
        }
    }
    Err(HidCommonError::DeviceNotFound(format!(
        "no device with one of the supported VID:PID ({})",
        describe_matches(table)
    )))
}

/// Every device accepted by `table`, in enumeration order.
pub fn find_all(port: &dyn HidPort, table: &[DeviceMatch]) -> HidCommonResult<Vec<HidDeviceInfo>> {
    Ok(port
        .list_devices()?
        .into_iter()
        .filter(|info| table.iter().any(|entry| entry.matches(info)))
        .collect())
}

pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// One operation observed by [`MockTransport`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Transfer {
        Output(Vec<u8>),
        Read(usize),
        Feature(Vec<u8>),
        FeatureQuery(u8),
        Settle(Duration),
    }

    #[derive(Clone)]
    pub struct MockTransport {
        info: HidDeviceInfo,
        read_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
        feature_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
        history: Arc<Mutex<Vec<Transfer>>>,
        connected: Arc<Mutex<bool>>,
    }

    impl MockTransport {
        pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
            Self::with_info(HidDeviceInfo::new(vendor_id, product_id, path.into()))
        }

        pub fn with_info(info: HidDeviceInfo) -> Self {
            Self {
                info,
                read_queue: Arc::new(Mutex::new(VecDeque::new())),
                feature_queue: Arc::new(Mutex::new(VecDeque::new())),
                history: Arc::new(Mutex::new(Vec::new())),
                connected: Arc::new(Mutex::new(true)),
            }
        }

        pub fn queue_read(&self, data: impl Into<Vec<u8>>) {
            let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
            queue.push_back(data.into());
        }

        pub fn queue_feature(&self, data: impl Into<Vec<u8>>) {
            let mut queue = self.feature_queue.lock().unwrap_or_else(|e| e.into_inner());
            queue.push_back(data.into());
        }

        pub fn history(&self) -> Vec<Transfer> {
            let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
            history.clone()
        }

        /// Output reports only, in the order they were written.
        pub fn outputs(&self) -> Vec<Vec<u8>> {
            self.history()
                .into_iter()
                .filter_map(|t| match t {
                    Transfer::Output(data) => Some(data),
                    _ => None,
                })
                .collect()
        }

        /// Feature reports sent to the device, in order.
        pub fn features(&self) -> Vec<Vec<u8>> {
            self.history()
                .into_iter()
                .filter_map(|t| match t {
                    Transfer::Feature(data) => Some(data),
                    _ => None,
                })
                .collect()
        }

        pub fn total_settle(&self) -> Duration {
            self.history()
                .into_iter()
                .filter_map(|t| match t {
                    Transfer::Settle(d) => Some(d),
                    _ => None,
                })
                .sum()
        }

        pub fn disconnect(&self) {
            let mut connected = self.connected.lock().unwrap_or_else(|e| e.into_inner());
            *connected = false;
        }

        pub fn is_connected(&self) -> bool {
            *self.connected.lock().unwrap_or_else(|e| e.into_inner())
        }

        fn record(&self, transfer: Transfer) -> HidCommonResult<()> {
            if !self.is_connected() {
                return Err(HidCommonError::Disconnected);
            }
            let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
            history.push(transfer);
            Ok(())
        }
    }

    fn copy_into(src: &[u8], buf: &mut [u8]) -> usize {
        let n = src.len().min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), src.get(..n)) {
            dst.copy_from_slice(src);
        }
        n
    }

    impl HidTransport for MockTransport {
        fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
            self.record(Transfer::Output(data.to_vec()))?;
            Ok(data.len())
        }

        fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> HidCommonResult<usize> {
            self.record(Transfer::Read(buf.len()))?;
            let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
            match queue.pop_front() {
                Some(data) => Ok(copy_into(&data, buf)),
                None => Err(HidCommonError::Timeout(timeout_ms)),
            }
        }

        fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
            self.record(Transfer::Feature(data.to_vec()))
        }

        fn get_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<usize> {
            let report_id = buf.first().copied().unwrap_or(0);
            self.record(Transfer::FeatureQuery(report_id))?;
            let mut queue = self.feature_queue.lock().unwrap_or_else(|e| e.into_inner());
            queue
                .pop_front()
                .map(|data| copy_into(&data, buf))
                .ok_or_else(|| HidCommonError::ReadError("No feature report queued".to_string()))
        }

        fn settle(&mut self, delay: Duration) {
            let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
            history.push(Transfer::Settle(delay));
        }

        fn info(&self) -> &HidDeviceInfo {
            &self.info
        }
    }

    pub struct MockPort {
        devices: Vec<MockTransport>,
    }

    impl MockPort {
        pub fn new() -> Self {
            Self {
                devices: Vec::new(),
            }
        }

        pub fn add_device(&mut self, device: MockTransport) {
            self.devices.push(device);
        }

        pub fn device_count(&self) -> usize {
            self.devices.len()
        }
    }

    impl HidPort for MockPort {
        fn list_devices(&self) -> HidCommonResult<Vec<HidDeviceInfo>> {
            Ok(self.devices.iter().map(|d| d.info().clone()).collect())
        }

        fn open_device(&self, info: &HidDeviceInfo) -> HidCommonResult<Box<dyn HidTransport>> {
            self.devices
                .iter()
                .find(|d| d.info.path == info.path)
                .map(|d| Box::new(d.clone()) as Box<dyn HidTransport>)
                .ok_or_else(|| HidCommonError::DeviceNotFound(info.path.clone()))
        }
    }

    impl Default for MockPort {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{MockPort, MockTransport, Transfer};
    use super::*;

    #[test]
    fn test_mock_write_is_recorded() -> HidCommonResult<()> {
        let mut device = MockTransport::new(0x0c45, 0x7403, "/dev/hidraw0");
        assert_eq!(device.write_report(&[0x01, 0x80, 0x08])?, 3);
        assert_eq!(device.outputs(), vec![vec![0x01, 0x80, 0x08]]);
        Ok(())
    }

    #[test]
    fn test_mock_read_times_out_when_empty() {
        let mut device = MockTransport::new(0x0c45, 0x7403, "/dev/hidraw0");
        let mut buf = [0u8; 8];
        let result = device.read_report(&mut buf, 500);
        assert!(matches!(result, Err(HidCommonError::Timeout(500))));
    }

    #[test]
    fn test_mock_read_copies_queued_report() -> HidCommonResult<()> {
        let mut device = MockTransport::new(0x0c45, 0x7403, "/dev/hidraw0");
        device.queue_read(vec![0x08, 0x01, 0x00, 0x04]);
        let mut buf = [0u8; 8];
        let n = device.read_report(&mut buf, 500)?;
        assert_eq!(n, 4);
        assert_eq!(buf, [0x08, 0x01, 0x00, 0x04, 0, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_mock_settle_does_not_sleep_but_records() {
        let mut device = MockTransport::new(0x0c45, 0x7403, "/dev/hidraw0");
        device.settle(Duration::from_secs(3600));
        assert_eq!(device.total_settle(), Duration::from_secs(3600));
    }

    #[test]
    fn test_mock_feature_query_records_report_id() -> HidCommonResult<()> {
        let mut device = MockTransport::new(0x0426, 0x3011, "/dev/hidraw1");
        device.queue_feature(vec![0x06, 0xff]);
        let mut buf = [0u8; 8];
        buf[0] = 0x06;
        device.get_feature_report(&mut buf)?;
        assert_eq!(device.history(), vec![Transfer::FeatureQuery(0x06)]);
        Ok(())
    }

    #[test]
    fn test_mock_disconnect() {
        let mut device = MockTransport::new(0x0c45, 0x7403, "/dev/hidraw0");
        device.disconnect();
        assert!(matches!(
            device.write_report(&[0x01]),
            Err(HidCommonError::Disconnected)
        ));
    }

    #[test]
    fn test_find_first_prefers_table_order() -> HidCommonResult<()> {
        let mut port = MockPort::new();
        port.add_device(MockTransport::new(0x413d, 0x2107, "/dev/hidraw3"));
        port.add_device(MockTransport::new(0x0c45, 0x7403, "/dev/hidraw5"));
        let table = [DeviceMatch::new(0x0c45, 0x7403), DeviceMatch::new(0x413d, 0x2107)];

        let found = find_first(&port, &table)?;
        assert_eq!(found.path, "/dev/hidraw5");
        Ok(())
    }

    #[test]
    fn test_find_first_reports_supported_ids() {
        let port = MockPort::new();
        let table = [DeviceMatch::new(0x0c45, 0x7403)];
        match find_first(&port, &table) {
            Err(HidCommonError::DeviceNotFound(msg)) => assert!(msg.contains("0c45:7403")),
            other => panic!("expected DeviceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_port_opens_shared_handle() -> HidCommonResult<()> {
        let mut port = MockPort::new();
        let device = MockTransport::new(0x0c45, 0x7403, "/dev/hidraw0");
        port.add_device(device.clone());

        let info = find_first(&port, &[DeviceMatch::new(0x0c45, 0x7403)])?;
        let mut handle = port.open_device(&info)?;
        handle.write_report(&[0xAA])?;

        assert_eq!(device.outputs(), vec![vec![0xAA]]);
        assert_eq!(port.device_count(), 1);
        Ok(())
    }
}
