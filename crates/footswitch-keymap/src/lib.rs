//! Key codes understood by foot switch firmware
//!
//! The devices store USB HID keyboard usage codes. Bit 7 of a stored code
//! means "with shift", which is how upper-case letters and shifted symbols
//! survive in a single byte. This crate maps user-facing names and characters
//! to those bytes and back.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod keys;
pub mod modifiers;

pub use keys::*;
pub use modifiers::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    #[error("Cannot encode key '{0}'")]
    UnknownKey(String),

    #[error("Cannot encode character {ch:?} at position {index}")]
    UnencodableChar { ch: char, index: usize },

    #[error("Invalid modifier '{0}'")]
    UnknownModifier(String),

    #[error("Invalid mouse button '{0}'")]
    UnknownMouseButton(String),
}

pub type KeymapResult<T> = Result<T, KeymapError>;
