//! HID protocol implementation for Scythe foot switches
//!
//! Two unrelated firmwares ship under the Scythe name:
//! - USB-Foot Switch (`0426:3011`): three pedals, 8-byte feature reports
//! - USB-Foot Switch II (`055a:0998`): six pedals, 0x48-byte checksummed
//!   feature reports carrying one settings blob
//!
//! Both only pick up new settings after being unplugged and plugged back in.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod scythe;
pub mod scythe2;

pub use ids::*;

use footswitch_hid_common::HidCommonError;
use footswitch_keymap::{KeymapError, Modifiers};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScytheError {
    #[error("Invalid pedal {pedal}: expected 1..={max}")]
    InvalidPedal { pedal: u8, max: u8 },

    #[error("Invalid combination of options on pedal {pedal}: {reason}")]
    InvalidCombination { pedal: u8, reason: &'static str },

    #[error("Cannot write more than {max} keys on pedal {pedal}")]
    TooManyKeys { pedal: u8, max: usize },

    #[error("The string length exceeds {max}, got {len}")]
    TextTooLong { len: usize, max: usize },

    #[error("Modifier '{0}' is not supported by this device")]
    UnsupportedModifier(String),

    #[error("Pedal {pedal} has a modifier but no key")]
    ModifierWithoutKey { pedal: u8 },

    #[error("Nothing to write: no pedal was configured")]
    EmptyProgram,

    #[error("Invalid response: expected {expected} bytes, got {actual}")]
    ShortResponse { expected: usize, actual: usize },

    #[error(transparent)]
    Keymap(#[from] KeymapError),

    #[error("HID error: {0}")]
    HidError(String),
}

pub type ScytheResult<T> = Result<T, ScytheError>;

impl From<HidCommonError> for ScytheError {
    fn from(e: HidCommonError) -> Self {
        ScytheError::HidError(e.to_string())
    }
}

/// Both firmwares need this long after every feature report.
pub const SETTLE: Duration = Duration::from_millis(200);

/// Only the left-hand modifiers fit in the stored modifier nibble.
pub const SUPPORTED_MODIFIERS: Modifiers = Modifiers::CTRL
    .union(Modifiers::SHIFT)
    .union(Modifiers::ALT)
    .union(Modifiers::WIN);

pub(crate) fn parse_left_modifier(name: &str) -> ScytheResult<Modifiers> {
    let modifier = footswitch_keymap::parse_modifier(name)?;
    if !SUPPORTED_MODIFIERS.contains(modifier) {
        return Err(ScytheError::UnsupportedModifier(name.to_string()));
    }
    Ok(modifier)
}
