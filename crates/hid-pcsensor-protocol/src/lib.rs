//! HID protocol implementation for PCsensor foot switches
//!
//! This crate covers the FS2007 family sold under many brands with one to
//! three pedals:
//! - PCsensor FS2007U1SW / FS2007U3SW
//! - iKKEGOL and other rebrands with the same firmware
//!
//! ## Wire format
//! All traffic is 8-byte reports on the vendor interface (interface 1).
//! A write session opens with a start report, then sends a header and the
//! payload chunks for every pedal. Reads query one pedal at a time.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod program;
pub mod report;
pub mod session;

pub use ids::*;
pub use program::*;
pub use report::*;
pub use session::*;

use footswitch_hid_common::HidCommonError;
use footswitch_keymap::{KeymapError, MouseButton};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PcsensorError {
    #[error("Invalid pedal {0}: expected 1..={PEDAL_COUNT}")]
    InvalidPedal(u8),

    #[error("Invalid combination of options on pedal {pedal}: {reason}")]
    InvalidCombination { pedal: u8, reason: &'static str },

    #[error("Option '{option}' given twice for pedal {pedal}")]
    DuplicateOption { pedal: u8, option: &'static str },

    #[error("The size of the string must be <= {max}, got {len}")]
    TextTooLong { len: usize, max: usize },

    #[error("'{0}' is invalid hex number")]
    InvalidHex(String),

    #[error("'{axis}' must be in [-128, 127], got {value}")]
    AxisOutOfRange { axis: char, value: i32 },

    #[error("Mouse button {0} is not supported by this device")]
    UnsupportedButton(MouseButton),

    #[error("Nothing to write: no pedal was configured")]
    EmptyProgram,

    #[error("Invalid response: expected {expected} bytes, got {actual}")]
    ShortResponse { expected: usize, actual: usize },

    #[error(transparent)]
    Keymap(#[from] KeymapError),

    #[error("HID error: {0}")]
    Hid(#[from] HidCommonError),
}

pub type PcsensorResult<T> = Result<T, PcsensorError>;

pub const REPORT_SIZE: usize = 8;
pub const PEDAL_COUNT: u8 = 3;
pub const MAX_TEXT_LEN: usize = 38;
