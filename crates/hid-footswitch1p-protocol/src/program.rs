//! Directive handling for the single pedal.

use crate::{Footswitch1pError, Footswitch1pResult};
use footswitch_keymap::{
    Modifiers, MouseButton, decode_byte, encode_key, parse_modifier, parse_mouse_button,
};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footswitch1pAction {
    Key {
        modifiers: Modifiers,
        code: Option<u8>,
    },
    Mouse {
        button: Option<MouseButton>,
        x: i8,
        y: i8,
        wheel: i8,
    },
}

impl fmt::Display for Footswitch1pAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key { modifiers, code } => {
                let mut parts = Vec::new();
                if !modifiers.is_empty() {
                    parts.push(modifiers.describe());
                }
                if let Some(code) = code {
                    parts.push(decode_byte(*code).to_string());
                }
                f.write_str(&parts.join("+"))
            }
            Self::Mouse { button, x, y, wheel } => {
                if let Some(button) = button {
                    write!(f, "{button} ")?;
                }
                write!(f, "X={x} Y={y} W={wheel}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Keyboard,
    Mouse,
}

#[derive(Debug, Clone, Default)]
pub struct Footswitch1pProgram {
    mode: Option<Mode>,
    modifiers: Modifiers,
    key: Option<u8>,
    button: Option<MouseButton>,
    x: Option<i8>,
    y: Option<i8>,
    wheel: Option<i8>,
}

impl Footswitch1pProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts only pedal 1.
    pub fn select_pedal(&mut self, pedal: u8) -> Footswitch1pResult<()> {
        if pedal != 1 {
            return Err(Footswitch1pError::InvalidPedal(pedal));
        }
        Ok(())
    }

    fn enter(&mut self, mode: Mode) -> Footswitch1pResult<()> {
        match self.mode {
            Some(current) if current != mode => Err(Footswitch1pError::MixedModes),
            _ => {
                self.mode = Some(mode);
                Ok(())
            }
        }
    }

    pub fn set_key(&mut self, name: &str) -> Footswitch1pResult<()> {
        let code = encode_key(name)?;
        self.enter(Mode::Keyboard)?;
        if self.key.replace(code).is_some() {
            return Err(Footswitch1pError::DuplicateOption("key"));
        }
        Ok(())
    }

    pub fn add_modifier(&mut self, name: &str) -> Footswitch1pResult<()> {
        let modifier = parse_modifier(name)?;
        self.enter(Mode::Keyboard)?;
        self.modifiers |= modifier;
        Ok(())
    }

    pub fn set_button(&mut self, name: &str) -> Footswitch1pResult<()> {
        let button = parse_mouse_button(name)?;
        if button == MouseButton::Double {
            return Err(Footswitch1pError::UnsupportedButton(button));
        }
        self.enter(Mode::Mouse)?;
        if self.button.replace(button).is_some() {
            return Err(Footswitch1pError::DuplicateOption("button"));
        }
        Ok(())
    }

    pub fn set_mouse_x(&mut self, value: i32) -> Footswitch1pResult<()> {
        let value = axis('x', value)?;
        self.enter(Mode::Mouse)?;
        set_once(&mut self.x, value, "x")
    }

    pub fn set_mouse_y(&mut self, value: i32) -> Footswitch1pResult<()> {
        let value = axis('y', value)?;
        self.enter(Mode::Mouse)?;
        set_once(&mut self.y, value, "y")
    }

    pub fn set_wheel(&mut self, value: i32) -> Footswitch1pResult<()> {
        let value = axis('w', value)?;
        self.enter(Mode::Mouse)?;
        set_once(&mut self.wheel, value, "w")
    }

    pub fn finish(self) -> Footswitch1pResult<Footswitch1pAction> {
        match self.mode {
            None => Err(Footswitch1pError::EmptyProgram),
            Some(Mode::Keyboard) => Ok(Footswitch1pAction::Key {
                modifiers: self.modifiers,
                code: self.key,
            }),
            Some(Mode::Mouse) => Ok(Footswitch1pAction::Mouse {
                button: self.button,
                x: self.x.unwrap_or(0),
                y: self.y.unwrap_or(0),
                wheel: self.wheel.unwrap_or(0),
            }),
        }
    }
}

fn axis(axis: char, value: i32) -> Footswitch1pResult<i8> {
    i8::try_from(value).map_err(|_| Footswitch1pError::AxisOutOfRange { axis, value })
}

fn set_once(slot: &mut Option<i8>, value: i8, option: &'static str) -> Footswitch1pResult<()> {
    if slot.replace(value).is_some() {
        return Err(Footswitch1pError::DuplicateOption(option));
    }
    Ok(())
}
