//! USB identifiers for the single-pedal foot switch.

use footswitch_hid_common::DeviceMatch;

pub const FOOTSWITCH1P_VID: u16 = 0x5131;
pub const FOOTSWITCH1P_PID: u16 = 0x2019;

/// Configuration interface; the keyboard and mouse interfaces ignore output
/// reports.
pub const FOOTSWITCH1P_INTERFACE: i32 = 3;

pub const FOOTSWITCH1P_DEVICES: [DeviceMatch; 1] = [DeviceMatch::on_interface(
    FOOTSWITCH1P_VID,
    FOOTSWITCH1P_PID,
    FOOTSWITCH1P_INTERFACE,
)];

#[must_use]
pub fn is_footswitch1p_device(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == FOOTSWITCH1P_VID && product_id == FOOTSWITCH1P_PID
}
