//! Output report layout and the device-id response.

use crate::{Footswitch1pAction, Footswitch1pResult};
use footswitch_hid_common::{ReportBuilder, ReportParser};
use footswitch_keymap::MouseButton;

pub const REPORT_SIZE: usize = 64;

pub const REPORT_SET_CODE: u8 = 0x10;
pub const REPORT_DEVICE_ID: u8 = 0x22;

/// The pedal is wired to P1.5.
pub const PEDAL_PIN: u8 = 0x03;

pub const COMMAND_KEYBOARD: u8 = 0x80;
pub const COMMAND_MOUSE: u8 = 0x02;

/// Bit 3 of the first mouse byte switches the pedal into mouse mode.
pub const MOUSE_ENABLE: u8 = 0x08;

const DATA_OFFSET: usize = 4;

pub type Report = [u8; REPORT_SIZE];

fn header(report_id: u8, pin: u8, command: u8, size: u8) -> Footswitch1pResult<ReportBuilder<REPORT_SIZE>> {
    let mut report = ReportBuilder::new();
    report.put(0, &[report_id, pin, command, size])?;
    Ok(report)
}

fn signed(value: i8) -> u8 {
    u8::from_le_bytes(value.to_le_bytes())
}

/// The single output report that programs the pedal.
pub fn encode_action(action: &Footswitch1pAction) -> Footswitch1pResult<Report> {
    let report = match action {
        Footswitch1pAction::Key { modifiers, code } => {
            let mut report = header(REPORT_SET_CODE, PEDAL_PIN, COMMAND_KEYBOARD, 0x08)?;
            report
                .set(DATA_OFFSET, modifiers.bits())?
                .set(DATA_OFFSET + 2, code.unwrap_or(0))?;
            report
        }
        Footswitch1pAction::Mouse { button, x, y, wheel } => {
            let mut report = header(REPORT_SET_CODE, PEDAL_PIN, COMMAND_MOUSE, 0x04)?;
            // the firmware moves opposite to the stored X and Y
            report.put(
                DATA_OFFSET,
                &[
                    MOUSE_ENABLE | button.map_or(0, MouseButton::bits),
                    signed(x.wrapping_neg()),
                    signed(y.wrapping_neg()),
                    signed(*wheel),
                ],
            )?;
            report
        }
    };
    Ok(report.build())
}

pub fn device_id_request() -> Footswitch1pResult<Report> {
    Ok(header(REPORT_DEVICE_ID, 0x00, 0x00, 0x22)?.build())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceResponse {
    DeviceId(u64),
    Unknown(Vec<u8>),
}

/// Decodes the answer to [`device_id_request`].
pub fn decode_response(data: &[u8]) -> DeviceResponse {
    let mut parser = ReportParser::new(data);
    if parser.read_u8().ok() == Some(REPORT_DEVICE_ID) {
        parser.skip(DATA_OFFSET - 1);
        if let Ok(id) = parser.read_u64_le() {
            return DeviceResponse::DeviceId(id);
        }
    }
    DeviceResponse::Unknown(data.to_vec())
}
