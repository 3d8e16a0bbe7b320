//! Programming and read-back over an open transport.

use crate::{
    DeviceResponse, Footswitch1pAction, Footswitch1pResult, REPORT_SIZE, decode_response,
    device_id_request, encode_action,
};
use footswitch_hid_common::{HidTransport, hex_dump};
use std::time::Duration;
use tracing::{debug, info};

pub const WRITE_SETTLE: Duration = Duration::from_millis(30);

pub const READ_TIMEOUT_MS: i32 = 1000;

pub fn write_action(
    transport: &mut dyn HidTransport,
    action: &Footswitch1pAction,
) -> Footswitch1pResult<()> {
    let report = encode_action(action)?;
    info!(%action, "writing pedal");
    debug!(report = %hex_dump(report.get(..8).unwrap_or_default()), "write");
    transport.write_report(&report)?;
    transport.settle(WRITE_SETTLE);
    Ok(())
}

pub fn read_device_id(transport: &mut dyn HidTransport) -> Footswitch1pResult<DeviceResponse> {
    transport.write_report(&device_id_request()?)?;
    transport.settle(WRITE_SETTLE);
    let mut buf = [0u8; REPORT_SIZE];
    let n = transport.read_report(&mut buf, READ_TIMEOUT_MS)?;
    Ok(decode_response(buf.get(..n).unwrap_or_default()))
}
