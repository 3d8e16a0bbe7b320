//! Write and read sessions over an open transport

use crate::{
    Decoded, PEDAL_COUNT, PcsensorResult, PedalReport, ProgramPlan, REPORT_SIZE, decode_report,
    query_report, write_sequence,
};
use footswitch_hid_common::{HidTransport, hex_dump};
use std::time::Duration;
use tracing::{debug, info};

/// Pause after every report so the firmware can store it.
pub const WRITE_SETTLE: Duration = Duration::from_millis(30);

pub const READ_TIMEOUT_MS: i32 = 1000;

/// hidapi on macOS hands back the report id as the first byte.
pub const READ_OFFSET: usize = if cfg!(target_os = "macos") { 1 } else { 0 };

/// One pedal's payload as read back from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedalReading {
    pub pedal: u8,
    pub report: PedalReport,
}

pub fn write_program(transport: &mut dyn HidTransport, plan: &ProgramPlan) -> PcsensorResult<()> {
    let reports = write_sequence(plan);
    info!(reports = reports.len(), "writing pedal program");
    for report in &reports {
        debug!(report = %hex_dump(report), "write");
        transport.write_report(report)?;
        transport.settle(WRITE_SETTLE);
    }
    Ok(())
}

pub fn read_pedals(transport: &mut dyn HidTransport) -> PcsensorResult<Vec<PedalReading>> {
    read_pedals_at(transport, READ_OFFSET)
}

/// Reads all pedals, skipping `offset` leading bytes of every input report.
pub fn read_pedals_at(
    transport: &mut dyn HidTransport,
    offset: usize,
) -> PcsensorResult<Vec<PedalReading>> {
    (1..=PEDAL_COUNT)
        .map(|pedal| {
            let report = read_pedal(transport, pedal, offset)?;
            debug!(pedal, %report, "read pedal");
            Ok(PedalReading { pedal, report })
        })
        .collect()
}

fn read_pedal(
    transport: &mut dyn HidTransport,
    pedal: u8,
    offset: usize,
) -> PcsensorResult<PedalReport> {
    transport.write_report(&query_report(pedal))?;
    transport.settle(WRITE_SETTLE);
    let first = read_one(transport, offset)?;
    match decode_report(&first)? {
        Decoded::Complete(report) => Ok(report),
        Decoded::Partial(mut text) => {
            loop {
                let next = read_one(transport, offset)?;
                if text.push(&next) {
                    break;
                }
            }
            Ok(PedalReport::Known(text.finish()))
        }
    }
}

fn read_one(transport: &mut dyn HidTransport, offset: usize) -> PcsensorResult<Vec<u8>> {
    let mut buf = vec![0u8; REPORT_SIZE.saturating_add(offset)];
    let n = transport.read_report(&mut buf, READ_TIMEOUT_MS)?;
    Ok(buf.get(offset..n).map(<[u8]>::to_vec).unwrap_or_default())
}
