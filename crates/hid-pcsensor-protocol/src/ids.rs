//! Device IDs for PCsensor foot switches

use footswitch_hid_common::DeviceMatch;

pub const PCSENSOR_VENDOR_ID: u16 = 0x0C45;
pub const PCSENSOR_FS2007_PID: u16 = 0x7403;
pub const PCSENSOR_FS2007_ALT_PID: u16 = 0x7404;

pub const HCT_VENDOR_ID: u16 = 0x413D;
pub const HCT_FOOTSWITCH_PID: u16 = 0x2107;

pub const QINHENG_VENDOR_ID: u16 = 0x1A86;
pub const QINHENG_FOOTSWITCH_PID: u16 = 0xE026;

pub const IKKEGOL_VENDOR_ID: u16 = 0x3553;
pub const IKKEGOL_FOOTSWITCH_PID: u16 = 0xB001;

/// The vendor interface that accepts programming reports.
pub const PCSENSOR_INTERFACE: i32 = 1;

/// Supported devices in lookup order.
pub const PCSENSOR_DEVICES: [DeviceMatch; 5] = [
    DeviceMatch::on_interface(PCSENSOR_VENDOR_ID, PCSENSOR_FS2007_PID, PCSENSOR_INTERFACE),
    DeviceMatch::on_interface(PCSENSOR_VENDOR_ID, PCSENSOR_FS2007_ALT_PID, PCSENSOR_INTERFACE),
    DeviceMatch::on_interface(HCT_VENDOR_ID, HCT_FOOTSWITCH_PID, PCSENSOR_INTERFACE),
    DeviceMatch::on_interface(QINHENG_VENDOR_ID, QINHENG_FOOTSWITCH_PID, PCSENSOR_INTERFACE),
    DeviceMatch::on_interface(IKKEGOL_VENDOR_ID, IKKEGOL_FOOTSWITCH_PID, PCSENSOR_INTERFACE),
];

pub fn is_pcsensor_device(vendor_id: u16, product_id: u16) -> bool {
    PCSENSOR_DEVICES
        .iter()
        .any(|d| d.vendor_id == vendor_id && d.product_id == product_id)
}
