//! Common HID plumbing for foot switch protocol implementations
//!
//! This crate provides the pieces shared by every foot switch protocol crate:
//! device descriptors and match tables, a transport abstraction over
//! output/input/feature reports, the hidapi backend, a scripted mock for
//! tests, and little-endian report builders.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
pub mod hid_traits;
pub mod hidapi_port;
pub mod report_parser;

pub use device_info::*;
pub use hid_traits::*;
pub use hidapi_port::*;
pub use report_parser::*;

use thiserror::Error;

/// Failures below the protocol layer.
///
/// Protocol crates wrap this in their own error enum. The CLI inspects
/// `DeviceNotFound` to pick its exit code; everything else is reported as is.
#[derive(Error, Debug)]
pub enum HidCommonError {
    /// No attached device matched the requested table, or a path vanished
    /// between enumeration and open.
    #[error("no matching foot switch: {0}")]
    DeviceNotFound(String),

    /// hidapi could not be initialized or the device node could not be opened.
    #[error("cannot open HID device: {0}")]
    OpenError(String),

    #[error("HID write failed: {0}")]
    WriteError(String),

    #[error("HID read failed: {0}")]
    ReadError(String),

    /// An interrupt read returned nothing within the timeout, in milliseconds.
    #[error("no report within {0} ms")]
    Timeout(i32),

    /// A report was shorter than its layout or a field fell outside it.
    #[error("malformed report: {0}")]
    InvalidReport(String),

    #[error("device went away")]
    Disconnected,
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;
