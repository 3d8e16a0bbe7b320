//! Property-based tests for footswitch1p report encoding.
//!
//! Uses proptest with 500 cases to verify invariants on:
//! - The report header for both modes
//! - Axis negation for the full signed byte range

use footswitch_keymap::Modifiers;
use hid_footswitch1p_protocol::{Footswitch1pAction, Footswitch1pProgram, REPORT_SIZE, encode_action};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Key reports keep the modifier byte and key code where the firmware reads them.
    #[test]
    fn prop_key_report(mods in any::<u8>(), code in any::<u8>()) {
        let report = encode_action(&Footswitch1pAction::Key {
            modifiers: Modifiers::from_bits_retain(mods),
            code: Some(code),
        })?;
        prop_assert_eq!(report.len(), REPORT_SIZE);
        prop_assert_eq!(&report[..4], &[0x10, 0x03, 0x80, 0x08]);
        prop_assert_eq!(report[4], mods);
        prop_assert_eq!(report[6], code);
    }

    /// Stored X and Y are the negated input; the wheel is stored as-is.
    #[test]
    fn prop_axes_negated(x in any::<i8>(), y in any::<i8>(), w in any::<i8>()) {
        let report = encode_action(&Footswitch1pAction::Mouse { button: None, x, y, wheel: w })?;
        prop_assert_eq!(report[4], 0x08);
        prop_assert_eq!(i8::from_le_bytes([report[5]]), x.wrapping_neg());
        prop_assert_eq!(i8::from_le_bytes([report[6]]), y.wrapping_neg());
        prop_assert_eq!(i8::from_le_bytes([report[7]]), w);
    }

    /// Any value outside the signed byte range is rejected on every axis.
    #[test]
    fn prop_axis_bounds(value in -1000i32..1000) {
        let in_range = (-128..=127).contains(&value);
        let mut program = Footswitch1pProgram::new();
        prop_assert_eq!(program.set_mouse_x(value).is_ok(), in_range);
        let mut program = Footswitch1pProgram::new();
        prop_assert_eq!(program.set_mouse_y(value).is_ok(), in_range);
        let mut program = Footswitch1pProgram::new();
        prop_assert_eq!(program.set_wheel(value).is_ok(), in_range);
    }
}
