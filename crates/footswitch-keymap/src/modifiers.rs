//! Keyboard modifiers and mouse buttons

use crate::{KeymapError, KeymapResult};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// The USB HID keyboard modifier byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CTRL = 0x01;
        const SHIFT = 0x02;
        const ALT = 0x04;
        const WIN = 0x08;
        const R_CTRL = 0x10;
        const R_SHIFT = 0x20;
        const R_ALT = 0x40;
        const R_WIN = 0x80;
    }
}

const MODIFIER_NAMES: [(&str, Modifiers); 8] = [
    ("ctrl", Modifiers::CTRL),
    ("shift", Modifiers::SHIFT),
    ("alt", Modifiers::ALT),
    ("win", Modifiers::WIN),
    ("r_ctrl", Modifiers::R_CTRL),
    ("r_shift", Modifiers::R_SHIFT),
    ("r_alt", Modifiers::R_ALT),
    ("r_win", Modifiers::R_WIN),
];

/// Parses `ctrl`, `l_ctrl`, `r_ctrl`, ... ignoring case.
pub fn parse_modifier(name: &str) -> KeymapResult<Modifiers> {
    let lower = name.to_ascii_lowercase();
    let bare = lower.strip_prefix("l_").unwrap_or(&lower);
    MODIFIER_NAMES
        .iter()
        .find(|(n, _)| *n == bare)
        .map(|(_, m)| *m)
        .ok_or_else(|| KeymapError::UnknownModifier(name.to_string()))
}

impl Modifiers {
    /// Renders set modifiers as `ctrl+shift`, in bit order.
    pub fn describe(&self) -> String {
        MODIFIER_NAMES
            .iter()
            .filter(|(_, m)| self.contains(*m))
            .map(|(n, _)| *n)
            .collect::<Vec<_>>()
            .join("+")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MouseButton {
    Left = 0x01,
    Right = 0x02,
    Middle = 0x04,
    Double = 0x08,
}

impl MouseButton {
    pub const ALL: [MouseButton; 4] = [Self::Left, Self::Right, Self::Middle, Self::Double];

    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "mouse_left",
            Self::Right => "mouse_right",
            Self::Middle => "mouse_middle",
            Self::Double => "mouse_double",
        }
    }

    /// Human form used when reading a device back: `mouse left`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "mouse left",
            Self::Right => "mouse right",
            Self::Middle => "mouse middle",
            Self::Double => "mouse double",
        }
    }

    /// The first button whose bit is set; left wins over right over middle.
    pub fn from_bits(bits: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|b| bits & b.bits() != 0)
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn parse_mouse_button(name: &str) -> KeymapResult<MouseButton> {
    MouseButton::ALL
        .into_iter()
        .find(|b| b.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| KeymapError::UnknownMouseButton(name.to_string()))
}
