//! Per-pedal program assembled from command-line style directives

use crate::{MAX_TEXT_LEN, PEDAL_COUNT, PcsensorError, PcsensorResult};
use footswitch_keymap::{
    Modifiers, MouseButton, decode_byte, encode_key, encode_string, parse_modifier,
    parse_mouse_button,
};
use std::fmt;
use tracing::warn;

/// What a pedal does once programmed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PedalAction {
    #[default]
    Unconfigured,
    /// A key press. `code` is `None` for a modifier-only combo.
    Key {
        code: Option<u8>,
        modifiers: Modifiers,
        button: Option<MouseButton>,
    },
    Mouse {
        button: Option<MouseButton>,
        x: i8,
        y: i8,
        wheel: i8,
    },
    /// Encoded key codes typed in sequence.
    Text(Vec<u8>),
}

impl PedalAction {
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::Unconfigured)
    }
}

impl fmt::Display for PedalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => f.write_str("unconfigured"),
            Self::Key {
                code,
                modifiers,
                button,
            } => {
                let mut parts = Vec::new();
                if !modifiers.is_empty() {
                    parts.push(modifiers.describe());
                }
                if let Some(button) = button {
                    parts.push(button.name().to_string());
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
            Self::Text(codes) => f.write_str(&footswitch_keymap::decode_sequence(codes)),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PedalDraft {
    key: Option<u8>,
    modifiers: Modifiers,
    button: Option<MouseButton>,
    x: Option<i8>,
    y: Option<i8>,
    wheel: Option<i8>,
    text: Option<Vec<u8>>,
}

impl PedalDraft {
    fn has_axes(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.wheel.is_some()
    }

    fn is_empty(&self) -> bool {
        self.key.is_none()
            && self.modifiers.is_empty()
            && self.button.is_none()
            && !self.has_axes()
            && self.text.is_none()
    }

    fn resolve(self) -> PedalAction {
        if let Some(text) = self.text {
            return PedalAction::Text(text);
        }
        if self.key.is_some() || !self.modifiers.is_empty() {
            return PedalAction::Key {
                code: self.key,
                modifiers: self.modifiers,
                button: self.button,
            };
        }
        if self.button.is_some() || self.has_axes() {
            return PedalAction::Mouse {
                button: self.button,
                x: self.x.unwrap_or(0),
                y: self.y.unwrap_or(0),
                wheel: self.wheel.unwrap_or(0),
            };
        }
        PedalAction::Unconfigured
    }
}

/// Builds a program for the three pedals.
///
/// Directives apply to the selected pedal, which starts at pedal 1.
#[derive(Debug, Clone, Default)]
pub struct PcsensorProgram {
    pedals: [PedalDraft; PEDAL_COUNT as usize],
    current: usize,
}

impl PcsensorProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_pedal(&mut self, pedal: u8) -> PcsensorResult<()> {
        if !(1..=PEDAL_COUNT).contains(&pedal) {
            return Err(PcsensorError::InvalidPedal(pedal));
        }
        self.current = usize::from(pedal - 1);
        Ok(())
    }

    pub fn current_pedal(&self) -> u8 {
        // current < PEDAL_COUNT
        self.current as u8 + 1
    }

    fn current(&self) -> PcsensorResult<&PedalDraft> {
        self.pedals
            .get(self.current)
            .ok_or(PcsensorError::InvalidPedal(self.current_pedal()))
    }

    fn draft(&mut self) -> PcsensorResult<&mut PedalDraft> {
        let pedal = self.current_pedal();
        self.pedals
            .get_mut(self.current)
            .ok_or(PcsensorError::InvalidPedal(pedal))
    }

    fn combination(&self, reason: &'static str) -> PcsensorError {
        PcsensorError::InvalidCombination {
            pedal: self.current_pedal(),
            reason,
        }
    }

    fn duplicate(&self, option: &'static str) -> PcsensorError {
        PcsensorError::DuplicateOption {
            pedal: self.current_pedal(),
            option,
        }
    }

    pub fn set_key(&mut self, name: &str) -> PcsensorResult<()> {
        let code = encode_key(name)?;
        let draft = self.current()?;
        if draft.text.is_some() {
            return Err(self.combination("a string cannot be combined with a key"));
        }
        if draft.has_axes() {
            return Err(self.combination("mouse movement cannot be combined with a key"));
        }
        if draft.key.is_some() {
            return Err(self.duplicate("key"));
        }
        self.draft()?.key = Some(code);
        Ok(())
    }

    /// Adds a keyboard modifier. Mouse button names are accepted as well.
    pub fn add_modifier(&mut self, name: &str) -> PcsensorResult<()> {
        let modifier = match parse_modifier(name) {
            Ok(modifier) => modifier,
            Err(err) => match parse_mouse_button(name) {
                Ok(button) => return self.set_button_value(button),
                Err(_) => return Err(err.into()),
            },
        };
        let draft = self.current()?;
        if draft.text.is_some() {
            return Err(self.combination("a string cannot be combined with a modifier"));
        }
        if draft.has_axes() {
            return Err(self.combination("mouse movement cannot be combined with a modifier"));
        }
        self.draft()?.modifiers |= modifier;
        Ok(())
    }

    pub fn set_button(&mut self, name: &str) -> PcsensorResult<()> {
        let button = parse_mouse_button(name)?;
        self.set_button_value(button)
    }

    fn set_button_value(&mut self, button: MouseButton) -> PcsensorResult<()> {
        if button == MouseButton::Double {
            return Err(PcsensorError::UnsupportedButton(button));
        }
        let draft = self.current()?;
        if draft.text.is_some() {
            return Err(self.combination("a string cannot be combined with a mouse button"));
        }
        if draft.button.is_some() {
            return Err(self.duplicate("button"));
        }
        self.draft()?.button = Some(button);
        Ok(())
    }

    pub fn set_text(&mut self, text: &str) -> PcsensorResult<()> {
        let len = text.chars().count();
        if len > MAX_TEXT_LEN {
            return Err(PcsensorError::TextTooLong {
                len,
                max: MAX_TEXT_LEN,
            });
        }
        let codes = encode_string(text)?;
        self.store_text(codes)
    }

    /// Stores raw key codes given as hex, separated by spaces or commas.
    ///
    /// Returns `true` when the input held more than [`MAX_TEXT_LEN`] codes and
    /// was truncated.
    pub fn set_raw(&mut self, hex: &str) -> PcsensorResult<bool> {
        let tokens: Vec<&str> = hex
            .split([' ', ','])
            .filter(|t| !t.is_empty())
            .collect();
        let truncated = tokens.len() > MAX_TEXT_LEN;
        if truncated {
            warn!(
                given = tokens.len(),
                kept = MAX_TEXT_LEN,
                "raw data truncated"
            );
        }
        let codes = tokens
            .iter()
            .take(MAX_TEXT_LEN)
            .map(|t| parse_hex_byte(t))
            .collect::<PcsensorResult<Vec<u8>>>()?;
        self.store_text(codes)?;
        Ok(truncated)
    }

    fn store_text(&mut self, codes: Vec<u8>) -> PcsensorResult<()> {
        let draft = self.current()?;
        if draft.text.is_some() {
            return Err(self.duplicate("string"));
        }
        if !draft.is_empty() {
            return Err(self.combination("a string cannot be combined with other options"));
        }
        self.draft()?.text = Some(codes);
        Ok(())
    }

    pub fn set_mouse_x(&mut self, value: i32) -> PcsensorResult<()> {
        let value = axis_value('x', value)?;
        self.check_axis()?;
        if self.current()?.x.is_some() {
            return Err(self.duplicate("x"));
        }
        self.draft()?.x = Some(value);
        Ok(())
    }

    pub fn set_mouse_y(&mut self, value: i32) -> PcsensorResult<()> {
        let value = axis_value('y', value)?;
        self.check_axis()?;
        if self.current()?.y.is_some() {
            return Err(self.duplicate("y"));
        }
        self.draft()?.y = Some(value);
        Ok(())
    }

    pub fn set_wheel(&mut self, value: i32) -> PcsensorResult<()> {
        let value = axis_value('w', value)?;
        self.check_axis()?;
        if self.current()?.wheel.is_some() {
            return Err(self.duplicate("wheel"));
        }
        self.draft()?.wheel = Some(value);
        Ok(())
    }

    fn check_axis(&self) -> PcsensorResult<()> {
        let draft = self.current()?;
        if draft.text.is_some() {
            return Err(self.combination("a string cannot be combined with mouse movement"));
        }
        if draft.key.is_some() || !draft.modifiers.is_empty() {
            return Err(self.combination("mouse movement cannot be combined with keys"));
        }
        Ok(())
    }

    /// Resolves every pedal. Fails when nothing was configured.
    pub fn finish(self) -> PcsensorResult<ProgramPlan> {
        let actions = self.pedals.map(PedalDraft::resolve);
        if actions.iter().all(|a| !a.is_configured()) {
            return Err(PcsensorError::EmptyProgram);
        }
        Ok(ProgramPlan { actions })
    }
}

fn axis_value(axis: char, value: i32) -> PcsensorResult<i8> {
    i8::try_from(value).map_err(|_| PcsensorError::AxisOutOfRange { axis, value })
}

fn parse_hex_byte(token: &str) -> PcsensorResult<u8> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u8::from_str_radix(digits, 16).map_err(|_| PcsensorError::InvalidHex(token.to_string()))
}

/// A finished program: one action per pedal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramPlan {
    pub actions: [PedalAction; PEDAL_COUNT as usize],
}

impl ProgramPlan {
    /// `(pedal number, action)` for every pedal, configured or not.
    pub fn pedals(&self) -> impl Iterator<Item = (u8, &PedalAction)> {
        (1..=PEDAL_COUNT).zip(self.actions.iter())
    }
}
