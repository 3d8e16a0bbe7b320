//! Snapshot tests for the Scythe HID protocols.
//!
//! These tests lock in the wire format to catch accidental protocol regressions.

use footswitch_hid_common::hex_dump;
use hid_scythe_protocol::{ScytheError, scythe, scythe2};
use insta::assert_snapshot;

// ── USB-Foot Switch ───────────────────────────────────────────────────────────

#[test]
fn test_snapshot_scythe_key_combo_on_default_pedal() -> Result<(), ScytheError> {
    let mut program = scythe::ScytheProgram::new();
    program.add_modifier("ctrl")?;
    program.add_key("c")?;
    let reports = scythe::write_sequence(&program.finish()?)?;
    let dump: Vec<String> = reports.iter().map(|r| hex_dump(r)).collect();
    assert_snapshot!(
        dump.join(" | "),
        @"06 00 00 FF 00 00 00 00 | 06 01 00 FF 00 00 00 00 | 06 02 08 01 01 00 06 00 | 06 00 00 00 FF 00 00 00 | 06 03 00 FF 00 00 00 00 | 06 04 00 FF 00 00 00 00 | 06 05 00 FF 00 00 00 00 | 06 AA FF FF 00 00 00 00"
    );
    Ok(())
}

#[test]
fn test_snapshot_scythe_readings() -> Result<(), ScytheError> {
    let lines: Vec<String> = [
        [0x06, 0x81, 0, 0, 0, 0, 0, 0],
        [0x06, 0xff, 0, 0, 0, 0, 0, 0],
        [0x06, 0x0a, 0, 0x4c, 0, 0, 0, 0],
    ]
    .iter()
    .map(|r| scythe::decode_reading(r).map(|reading| reading.to_string()))
    .collect::<Result<_, _>>()?;
    assert_snapshot!(lines.join(" / "), @"mouse_left / undefined / shift+win+<delete>");
    Ok(())
}

// ── USB-Foot Switch II ────────────────────────────────────────────────────────

#[test]
fn test_snapshot_scythe2_blob() -> Result<(), ScytheError> {
    let mut program = scythe2::Scythe2Program::new();
    program.select_pedal(6)?;
    program.add_modifier("alt")?;
    program.set_key_once("tab")?;
    let blob = program.finish()?.encode_blob();
    assert_snapshot!(
        hex_dump(&blob),
        @"1A 00 01 10 F0 04 01 10 F0 04 01 10 F0 04 01 10 F0 04 01 10 F0 04 01 20 F4 2B"
    );
    Ok(())
}

#[test]
fn test_snapshot_scythe2_control_reports() -> Result<(), ScytheError> {
    let reports = scythe2::update_reports(&[0x04, 0x00])?;
    let heads: Vec<String> = reports.iter().map(|r| hex_dump(&r[..10])).collect();
    assert_snapshot!(
        heads.join(" | "),
        @"05 96 A5 00 00 00 00 40 00 00 | 05 96 A5 2C 00 00 02 6E 00 00 | 05 96 A5 26 00 00 02 6C 04 00 | 05 96 A5 26 00 00 02 6C 04 00 | 05 96 A5 2B 14 23 00 A6 04 00"
    );
    Ok(())
}

#[test]
fn test_snapshot_scythe2_readings_keys_and_mouse() -> Result<(), ScytheError> {
    let mut answer = [0u8; scythe2::REPORT_SIZE];
    let records = [
        0x01, 0x10, 0xf1, 0x04, // ctrl+a repeat
        0x01, 0x10, 0xc0, 0x02, // right button
        0x03, 0x30, 0xf0, 0x0b, 0xf0, 0x0c, 0xf0, 0x1e, // "hi1"
        0x01, 0x20, 0xf2, 0x2c, // shift+space once
        0x01, 0x10, 0xc0, 0x04, // middle button
        0x01, 0x10, 0xf0, 0x04, // a
    ];
    answer[2..2 + records.len()].copy_from_slice(&records);
    let lines: Vec<String> = scythe2::decode_settings(&answer)?
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_snapshot!(lines.join("\n"), @r"
    Pedal 1 (single key repeat): ctrl+a
    Pedal 2 (single key repeat): mouse right
    Pedal 3 (multiple keys): hi1
    Pedal 4 (single key no repeat): shift+<space>
    Pedal 5 (single key repeat): mouse middle
    Pedal 6 (single key repeat): a
    ");
    Ok(())
}

#[test]
fn test_snapshot_scythe2_read_request() -> Result<(), ScytheError> {
    assert_snapshot!(hex_dump(&scythe2::read_request()?[..8]), @"05 96 A5 5A 00 00 00 9A");
    Ok(())
}
