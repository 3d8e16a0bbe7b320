//! Device IDs for Scythe foot switches

use footswitch_hid_common::DeviceMatch;

pub const SCYTHE_VENDOR_ID: u16 = 0x0426;
pub const SCYTHE_FOOTSWITCH_PID: u16 = 0x3011;

pub const SCYTHE2_VENDOR_ID: u16 = 0x055A;
pub const SCYTHE2_FOOTSWITCH_PID: u16 = 0x0998;

pub const SCYTHE_DEVICES: [DeviceMatch; 1] =
    [DeviceMatch::new(SCYTHE_VENDOR_ID, SCYTHE_FOOTSWITCH_PID)];

pub const SCYTHE2_DEVICES: [DeviceMatch; 1] =
    [DeviceMatch::new(SCYTHE2_VENDOR_ID, SCYTHE2_FOOTSWITCH_PID)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_do_not_overlap() {
        let scythe2 = footswitch_hid_common::HidDeviceInfo::new(
            SCYTHE2_VENDOR_ID,
            SCYTHE2_FOOTSWITCH_PID,
            "/dev/hidraw4".into(),
        );
        assert!(SCYTHE2_DEVICES.iter().any(|m| m.matches(&scythe2)));
        assert!(!SCYTHE_DEVICES.iter().any(|m| m.matches(&scythe2)));
    }
}
