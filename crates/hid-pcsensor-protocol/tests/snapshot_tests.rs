//! Snapshot tests for the PCsensor HID protocol.
//!
//! These tests lock in the wire format to catch accidental protocol regressions.

use footswitch_hid_common::hex_dump;
use hid_pcsensor_protocol::{self as pcsensor, PcsensorProgram};
use insta::assert_snapshot;

fn dump_sequence(program: PcsensorProgram) -> Result<String, pcsensor::PcsensorError> {
    let plan = program.finish()?;
    Ok(pcsensor::write_sequence(&plan)
        .iter()
        .map(|r| hex_dump(r))
        .collect::<Vec<_>>()
        .join(" | "))
}

#[test]
fn test_snapshot_single_key_on_pedal_one() -> Result<(), pcsensor::PcsensorError> {
    let mut program = PcsensorProgram::new();
    program.set_key("a")?;
    assert_snapshot!(
        dump_sequence(program)?,
        @"01 80 08 00 00 00 00 00 | 01 81 08 01 00 00 00 00 | 08 01 00 04 00 00 00 00 | 01 81 08 02 00 00 00 00 | 08 00 00 00 00 00 00 00 | 01 81 08 03 00 00 00 00 | 08 00 00 00 00 00 00 00"
    );
    Ok(())
}

#[test]
fn test_snapshot_ctrl_alt_delete() -> Result<(), pcsensor::PcsensorError> {
    let mut program = PcsensorProgram::new();
    program.select_pedal(2)?;
    program.add_modifier("ctrl")?;
    program.add_modifier("alt")?;
    program.set_key("delete")?;
    assert_snapshot!(
        dump_sequence(program)?,
        @"01 80 08 00 00 00 00 00 | 01 81 08 01 00 00 00 00 | 08 00 00 00 00 00 00 00 | 01 81 08 02 00 00 00 00 | 08 03 05 4C 00 00 00 00 | 01 81 08 03 00 00 00 00 | 08 00 00 00 00 00 00 00"
    );
    Ok(())
}

#[test]
fn test_snapshot_mouse_scroll() -> Result<(), pcsensor::PcsensorError> {
    let mut program = PcsensorProgram::new();
    program.select_pedal(3)?;
    program.set_wheel(-3)?;
    assert_snapshot!(
        dump_sequence(program)?,
        @"01 80 08 00 00 00 00 00 | 01 81 08 01 00 00 00 00 | 08 00 00 00 00 00 00 00 | 01 81 08 02 00 00 00 00 | 08 00 00 00 00 00 00 00 | 01 81 08 03 00 00 00 00 | 08 02 00 00 00 00 00 FD"
    );
    Ok(())
}

#[test]
fn test_snapshot_string_spans_two_reports() -> Result<(), pcsensor::PcsensorError> {
    let mut program = PcsensorProgram::new();
    program.set_text("Hello!!")?;
    assert_snapshot!(
        dump_sequence(program)?,
        @"01 80 08 00 00 00 00 00 | 01 81 09 01 00 00 00 00 | 09 04 8B 08 0F 0F 12 9E | 9E 00 00 00 00 00 00 00 | 01 81 08 02 00 00 00 00 | 08 00 00 00 00 00 00 00 | 01 81 08 03 00 00 00 00 | 08 00 00 00 00 00 00 00"
    );
    Ok(())
}

#[test]
fn test_snapshot_three_pedals() -> Result<(), pcsensor::PcsensorError> {
    let mut program = PcsensorProgram::new();
    program.set_key("left")?;
    program.select_pedal(2)?;
    program.set_button("mouse_middle")?;
    program.select_pedal(3)?;
    program.set_key("right")?;
    assert_snapshot!(
        dump_sequence(program)?,
        @"01 80 08 00 00 00 00 00 | 01 81 08 01 00 00 00 00 | 08 01 00 51 00 00 00 00 | 01 81 08 02 00 00 00 00 | 08 02 00 00 04 00 00 00 | 01 81 08 03 00 00 00 00 | 08 01 00 4F 00 00 00 00"
    );
    Ok(())
}

#[test]
fn test_snapshot_error_messages() {
    let mut program = PcsensorProgram::new();
    let too_long = program.set_text(&"z".repeat(40)).map_err(|e| e.to_string());
    assert_snapshot!(format!("{too_long:?}"), @r#"Err("The size of the string must be <= 38, got 40")"#);

    let bad_key = program.set_key("f99").map_err(|e| e.to_string());
    assert_snapshot!(format!("{bad_key:?}"), @r#"Err("Cannot encode key 'f99'")"#);
}
