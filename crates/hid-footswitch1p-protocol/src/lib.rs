//! HID protocol for the single-pedal foot switch with VID:PID `5131:2019`.
//!
//! The pedal is programmed with one 64-byte output report on interface 3:
//!
//! ```text
//! report_id  pin  command  size  data[8]  (zero padding to 64 bytes)
//! ```
//!
//! A key report sends a keyboard usage with modifiers; a mouse report sends
//! button bits and relative X/Y/wheel movement. The device keeps only one of
//! the two.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod program;
pub mod report;
pub mod session;

pub use ids::{
    FOOTSWITCH1P_DEVICES, FOOTSWITCH1P_INTERFACE, FOOTSWITCH1P_PID, FOOTSWITCH1P_VID,
    is_footswitch1p_device,
};
pub use program::{Footswitch1pAction, Footswitch1pProgram};
pub use report::{
    DeviceResponse, REPORT_SIZE, decode_response, device_id_request, encode_action,
};
pub use session::{WRITE_SETTLE, read_device_id, write_action};

use footswitch_hid_common::HidCommonError;
use footswitch_keymap::{KeymapError, MouseButton};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Footswitch1pError {
    #[error("This device has a single pedal, got pedal {0}")]
    InvalidPedal(u8),

    #[error("You cannot mix key/modifier options with button/x/y/w options")]
    MixedModes,

    #[error("Option '{0}' given twice")]
    DuplicateOption(&'static str),

    #[error("'{axis}' must be in [-128, 127], got {value}")]
    AxisOutOfRange { axis: char, value: i32 },

    #[error("Mouse button {0} is not supported by this device")]
    UnsupportedButton(MouseButton),

    #[error("Nothing to write: no key, modifier, button or movement given")]
    EmptyProgram,

    #[error(transparent)]
    Keymap(#[from] KeymapError),

    #[error("HID error: {0}")]
    Hid(#[from] HidCommonError),
}

pub type Footswitch1pResult<T> = Result<T, Footswitch1pError>;
