//! Scythe USB-Foot Switch (`0426:3011`)
//!
//! Every pedal is stored as two 8-byte feature reports with report id 6. A
//! key pedal holds up to five key codes pressed together plus a modifier
//! byte; a mouse pedal holds a single button.

use crate::{SETTLE, ScytheError, ScytheResult, parse_left_modifier};
use footswitch_hid_common::{HidTransport, ReportBuilder, hex_dump};
use footswitch_keymap::{Modifiers, MouseButton, decode_byte, encode_key, parse_mouse_button};
use std::fmt;
use tracing::{debug, info};

pub const PEDAL_COUNT: u8 = 3;
pub const DEFAULT_PEDAL: u8 = 2;
pub const REPORT_ID: u8 = 0x06;
pub const REPORT_SIZE: usize = 8;
pub const MAX_KEYS: usize = 5;

pub type Report = [u8; REPORT_SIZE];

const KEY_TEMPLATE: [u8; 13] = [
    0x06, 0x00, 0x08, 0x01, 0x00, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0xff,
];
const MOUSE_TEMPLATE: [u8; 12] = [
    0x06, 0x00, 0x08, 0x04, 0x00, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0xff,
];
/// Template offsets that hold key codes, in fill order.
const KEY_SLOTS: [usize; MAX_KEYS] = [6, 7, 9, 10, 11];
const PEDAL_OFFSET: usize = 1;
const MODIFIER_OFFSET: usize = 4;
const BUTTON_OFFSET: usize = 4;

pub const END_REPORT: Report = [0x06, 0xaa, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00];

/// `06 <n> 00 ff`: leaves slot `n` untouched.
pub fn nop_report(slot: u8) -> Report {
    [0x06, slot, 0x00, 0xff, 0x00, 0x00, 0x00, 0x00]
}

pub fn query_report(pedal: u8) -> Report {
    [0x06, 0xbb, pedal, 0x00, 0x00, 0x00, 0x00, 0x00]
}

/// The stored byte for a mouse button.
pub fn button_code(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 0x81,
        MouseButton::Right => 0x82,
        MouseButton::Middle => 0x84,
        MouseButton::Double => 0x80,
    }
}

pub fn button_from_code(code: u8) -> Option<MouseButton> {
    match code {
        0x81 => Some(MouseButton::Left),
        0x82 => Some(MouseButton::Right),
        0x84 => Some(MouseButton::Middle),
        0x80 => Some(MouseButton::Double),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScythePedal {
    Keys { modifiers: Modifiers, keys: Vec<u8> },
    Mouse(MouseButton),
}

impl ScythePedal {
    /// The two reports stored for `pedal`.
    pub fn encode(&self, pedal: u8) -> ScytheResult<[Report; 2]> {
        let mut data = ReportBuilder::<{ REPORT_SIZE * 2 }>::new();
        match self {
            Self::Keys { modifiers, keys } => {
                data.put(0, &KEY_TEMPLATE)?
                    .set(MODIFIER_OFFSET, modifiers.bits())?;
                for (slot, code) in KEY_SLOTS.iter().zip(keys) {
                    data.set(*slot, *code)?;
                }
            }
            Self::Mouse(button) => {
                data.put(0, &MOUSE_TEMPLATE)?
                    .set(BUTTON_OFFSET, button_code(*button))?;
            }
        }
        data.set(PEDAL_OFFSET, pedal)?;
        let bytes = data.build();
        let (head, tail) = bytes.split_at(REPORT_SIZE);
        let mut first = [0u8; REPORT_SIZE];
        let mut second = [0u8; REPORT_SIZE];
        first.copy_from_slice(head);
        second.copy_from_slice(tail);
        Ok([first, second])
    }
}

/// Builds a program for the three pedals. The cursor starts on pedal 2.
#[derive(Debug, Clone)]
pub struct ScytheProgram {
    pedals: [Option<ScythePedal>; PEDAL_COUNT as usize],
    current: usize,
}

impl Default for ScytheProgram {
    fn default() -> Self {
        Self {
            pedals: Default::default(),
            current: usize::from(DEFAULT_PEDAL - 1),
        }
    }
}

impl ScytheProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_pedal(&mut self, pedal: u8) -> ScytheResult<()> {
        if !(1..=PEDAL_COUNT).contains(&pedal) {
            return Err(ScytheError::InvalidPedal {
                pedal,
                max: PEDAL_COUNT,
            });
        }
        self.current = usize::from(pedal - 1);
        Ok(())
    }

    pub fn current_pedal(&self) -> u8 {
        // current < PEDAL_COUNT
        self.current as u8 + 1
    }

    fn slot(&mut self) -> ScytheResult<&mut Option<ScythePedal>> {
        let pedal = self.current_pedal();
        self.pedals.get_mut(self.current).ok_or(ScytheError::InvalidPedal {
            pedal,
            max: PEDAL_COUNT,
        })
    }

    fn key_slot(&mut self) -> ScytheResult<(&mut Modifiers, &mut Vec<u8>)> {
        let pedal = self.current_pedal();
        let slot = self.slot()?;
        if slot.is_none() {
            *slot = Some(ScythePedal::Keys {
                modifiers: Modifiers::empty(),
                keys: Vec::new(),
            });
        }
        match slot {
            Some(ScythePedal::Keys { modifiers, keys }) => Ok((modifiers, keys)),
            _ => Err(ScytheError::InvalidCombination {
                pedal,
                reason: "keys and modifiers cannot be mixed with a mouse button",
            }),
        }
    }

    /// Adds a key pressed together with the others already on this pedal.
    pub fn add_key(&mut self, name: &str) -> ScytheResult<()> {
        let code = encode_key(name)?;
        let pedal = self.current_pedal();
        let (_, keys) = self.key_slot()?;
        if keys.len() >= MAX_KEYS {
            return Err(ScytheError::TooManyKeys {
                pedal,
                max: MAX_KEYS,
            });
        }
        keys.push(code);
        Ok(())
    }

    pub fn add_modifier(&mut self, name: &str) -> ScytheResult<()> {
        let modifier = parse_left_modifier(name)?;
        let (modifiers, _) = self.key_slot()?;
        *modifiers |= modifier;
        Ok(())
    }

    pub fn set_button(&mut self, name: &str) -> ScytheResult<()> {
        let button = parse_mouse_button(name)?;
        let pedal = self.current_pedal();
        let slot = self.slot()?;
        if let Some(existing) = slot {
            let reason = match existing {
                ScythePedal::Mouse(_) => "only one mouse button per pedal",
                ScythePedal::Keys { .. } => {
                    "keys and modifiers cannot be mixed with a mouse button"
                }
            };
            return Err(ScytheError::InvalidCombination { pedal, reason });
        }
        *slot = Some(ScythePedal::Mouse(button));
        Ok(())
    }

    pub fn finish(self) -> ScytheResult<ScythePlan> {
        if self.pedals.iter().all(Option::is_none) {
            return Err(ScytheError::EmptyProgram);
        }
        Ok(ScythePlan {
            pedals: self.pedals,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScythePlan {
    pub pedals: [Option<ScythePedal>; PEDAL_COUNT as usize],
}

/// Every report of a write session, in order.
///
/// Pedals left out of the plan get a nop carrying their number so the
/// stored setting is kept.
pub fn write_sequence(plan: &ScythePlan) -> ScytheResult<Vec<Report>> {
    let mut reports = vec![nop_report(0)];
    for (pedal, slot) in (1..=PEDAL_COUNT).zip(plan.pedals.iter()) {
        match slot {
            Some(data) => reports.extend(data.encode(pedal)?),
            None => reports.push(nop_report(pedal)),
        }
    }
    reports.push(nop_report(4));
    reports.push(nop_report(5));
    reports.push(END_REPORT);
    Ok(reports)
}

/// One pedal as reported back by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScytheReading {
    Undefined,
    Mouse(MouseButton),
    Keys { modifiers: Modifiers, keys: Vec<u8> },
}

impl fmt::Display for ScytheReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Mouse(button) => write!(f, "{button}"),
            Self::Keys { modifiers, keys } => {
                let mut parts = Vec::new();
                if !modifiers.is_empty() {
                    parts.push(modifiers.describe());
                }
                parts.extend(keys.iter().map(|k| decode_byte(*k).to_string()));
                f.write_str(&parts.join("+"))
            }
        }
    }
}

/// Decodes the answer to [`query_report`].
pub fn decode_reading(data: &[u8]) -> ScytheResult<ScytheReading> {
    if data.len() < REPORT_SIZE {
        return Err(ScytheError::ShortResponse {
            expected: REPORT_SIZE,
            actual: data.len(),
        });
    }
    let kind = data.get(1).copied().unwrap_or(0);
    if let Some(button) = button_from_code(kind) {
        return Ok(ScytheReading::Mouse(button));
    }
    if kind == 0xff {
        return Ok(ScytheReading::Undefined);
    }
    let keys = data
        .iter()
        .skip(3)
        .take(MAX_KEYS)
        .take_while(|b| **b != 0)
        .copied()
        .collect();
    Ok(ScytheReading::Keys {
        modifiers: Modifiers::from_bits_truncate(kind) & crate::SUPPORTED_MODIFIERS,
        keys,
    })
}

pub fn write_program(transport: &mut dyn HidTransport, plan: &ScythePlan) -> ScytheResult<()> {
    let reports = write_sequence(plan)?;
    info!(reports = reports.len(), "writing Scythe program");
    for report in &reports {
        debug!(report = %hex_dump(report), "send feature");
        transport.send_feature_report(report)?;
        transport.settle(SETTLE);
    }
    Ok(())
}

pub fn read_pedals(transport: &mut dyn HidTransport) -> ScytheResult<Vec<(u8, ScytheReading)>> {
    (1..=PEDAL_COUNT)
        .map(|pedal| {
            transport.send_feature_report(&query_report(pedal))?;
            let mut buf: Report = [REPORT_ID, 0, 0, 0, 0, 0, 0, 0];
            let n = transport.get_feature_report(&mut buf)?;
            let reading = decode_reading(buf.get(..n).unwrap_or_default())?;
            debug!(pedal, %reading, "read pedal");
            Ok((pedal, reading))
        })
        .collect()
}
