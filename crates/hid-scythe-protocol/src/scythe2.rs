//! Scythe USB-Foot Switch II (`055a:0998`)
//!
//! The six pedals are stored together as one settings blob:
//!
//! ```text
//! <len lo> <len hi>
//! <count> <type> (<mod> <code>) * count     (six records)
//! ```
//!
//! The blob is uploaded in 0x20-byte chunks inside 0x48-byte feature reports,
//! each stamped with the `05 96 a5` header and a checksum in byte 7.

use crate::{SETTLE, ScytheError, ScytheResult, parse_left_modifier};
use footswitch_hid_common::{HidTransport, ReportBuilder, ReportParser, hex_dump};
use footswitch_keymap::{
    Modifiers, MouseButton, decode_byte, encode_key, encode_string, parse_mouse_button,
};
use std::fmt;
use tracing::{debug, info, warn};

pub const PEDAL_COUNT: u8 = 6;
pub const REPORT_SIZE: usize = 0x48;
pub const CHUNK_SIZE: usize = 0x20;
pub const MAX_KEYS: usize = 255;

const HEADER: [u8; 3] = [0x05, 0x96, 0xa5];
const COMMAND_OFFSET: usize = 3;
const ARG_OFFSET: usize = 4;
const COUNT_OFFSET: usize = 6;
const CHECKSUM_OFFSET: usize = 7;
const COMMIT_ARGS: [u8; 2] = [0x14, 0x23];
const CHUNK_DATA_OFFSET: usize = 8;
const BLOB_RECORDS_OFFSET: usize = 2;

/// High nibble of a key's modifier byte.
pub const KEY_MARKER: u8 = 0xf0;
/// Modifier byte of a mouse button; the code holds the button bits.
pub const MOUSE_MARKER: u8 = 0xc0;

/// Key programmed on pedals the user left alone.
const FILLER_KEY: u8 = 0x04;

pub type Report = [u8; REPORT_SIZE];

pub mod command {
    pub const BEGIN: u8 = 0x2c;
    pub const CHUNK: u8 = 0x26;
    pub const COMMIT: u8 = 0x2b;
    pub const READ: u8 = 0x5a;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    KeyRepeat = 0x10,
    KeyOnce = 0x20,
    Sequence = 0x30,
}

impl RecordType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x10 => Some(Self::KeyRepeat),
            0x20 => Some(Self::KeyOnce),
            0x30 => Some(Self::Sequence),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::KeyRepeat => "single key repeat",
            Self::KeyOnce => "single key no repeat",
            Self::Sequence => "multiple keys",
        }
    }
}

/// One `(mod, code)` pair of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub modifier: u8,
    pub code: u8,
}

impl Stroke {
    pub fn key(modifiers: Modifiers, code: u8) -> Self {
        Self {
            modifier: KEY_MARKER | modifiers.bits(),
            code,
        }
    }

    pub fn mouse(button: MouseButton) -> Self {
        Self {
            modifier: MOUSE_MARKER,
            code: button.bits(),
        }
    }

    pub fn is_mouse(&self) -> bool {
        self.modifier == MOUSE_MARKER
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mouse() {
            let buttons: Vec<&str> = MouseButton::ALL
                .into_iter()
                .filter(|b| self.code & b.bits() != 0)
                .map(MouseButton::label)
                .collect();
            return f.write_str(&buttons.join("+"));
        }
        let modifiers = Modifiers::from_bits_truncate(self.modifier) & crate::SUPPORTED_MODIFIERS;
        if !modifiers.is_empty() {
            write!(f, "{}+", modifiers.describe())?;
        }
        write!(f, "{}", decode_byte(self.code))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedalRecord {
    pub kind: RecordType,
    pub strokes: Vec<Stroke>,
}

impl PedalRecord {
    fn filler() -> Self {
        Self {
            kind: RecordType::KeyRepeat,
            strokes: vec![Stroke::key(Modifiers::empty(), FILLER_KEY)],
        }
    }

    /// Size of the record inside the blob.
    pub fn encoded_len(&self) -> usize {
        self.strokes.len().saturating_mul(2).saturating_add(2)
    }
}

#[derive(Debug, Clone, Default)]
struct PedalDraft {
    kind: Option<RecordType>,
    strokes: Vec<Stroke>,
    modifiers: Modifiers,
}

/// Builds the settings for all six pedals. The cursor starts on pedal 1.
#[derive(Debug, Clone, Default)]
pub struct Scythe2Program {
    pedals: [PedalDraft; PEDAL_COUNT as usize],
    current: usize,
}

impl Scythe2Program {
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

    fn draft(&mut self) -> ScytheResult<&mut PedalDraft> {
        let pedal = self.current_pedal();
        self.pedals.get_mut(self.current).ok_or(ScytheError::InvalidPedal {
            pedal,
            max: PEDAL_COUNT,
        })
    }

    fn claim(&mut self, kind: RecordType) -> ScytheResult<&mut PedalDraft> {
        let pedal = self.current_pedal();
        let draft = self.draft()?;
        if draft.kind.is_some() {
            return Err(ScytheError::InvalidCombination {
                pedal,
                reason: "each pedal takes one key, string or mouse button",
            });
        }
        if kind == RecordType::Sequence && !draft.modifiers.is_empty() {
            return Err(ScytheError::InvalidCombination {
                pedal,
                reason: "a string cannot be combined with a modifier",
            });
        }
        draft.kind = Some(kind);
        Ok(draft)
    }

    /// A key that repeats while the pedal is held.
    pub fn set_key_repeat(&mut self, name: &str) -> ScytheResult<()> {
        let code = encode_key(name)?;
        let draft = self.claim(RecordType::KeyRepeat)?;
        draft.strokes = vec![Stroke::key(Modifiers::empty(), code)];
        Ok(())
    }

    /// A key pressed once per pedal press.
    pub fn set_key_once(&mut self, name: &str) -> ScytheResult<()> {
        let code = encode_key(name)?;
        let draft = self.claim(RecordType::KeyOnce)?;
        draft.strokes = vec![Stroke::key(Modifiers::empty(), code)];
        Ok(())
    }

    pub fn set_text(&mut self, text: &str) -> ScytheResult<()> {
        let len = text.chars().count();
        if len > MAX_KEYS {
            return Err(ScytheError::TextTooLong {
                len,
                max: MAX_KEYS,
            });
        }
        let codes = encode_string(text)?;
        let draft = self.claim(RecordType::Sequence)?;
        draft.strokes = codes
            .into_iter()
            .map(|code| Stroke::key(Modifiers::empty(), code))
            .collect();
        Ok(())
    }

    pub fn add_modifier(&mut self, name: &str) -> ScytheResult<()> {
        let modifier = parse_left_modifier(name)?;
        let pedal = self.current_pedal();
        let draft = self.draft()?;
        let is_key = matches!(
            draft.kind,
            None | Some(RecordType::KeyRepeat | RecordType::KeyOnce)
        ) && !draft.strokes.iter().any(Stroke::is_mouse);
        if !is_key {
            return Err(ScytheError::InvalidCombination {
                pedal,
                reason: "modifiers only apply to a single key",
            });
        }
        draft.modifiers |= modifier;
        Ok(())
    }

    pub fn set_button(&mut self, name: &str) -> ScytheResult<()> {
        let button = parse_mouse_button(name)?;
        let pedal = self.current_pedal();
        if !self.draft()?.modifiers.is_empty() {
            return Err(ScytheError::InvalidCombination {
                pedal,
                reason: "a mouse button cannot be combined with a modifier",
            });
        }
        let draft = self.claim(RecordType::KeyRepeat)?;
        draft.strokes = vec![Stroke::mouse(button)];
        Ok(())
    }

    /// Resolves all six records. Untouched pedals get the `a` key with
    /// repeat, since the device always stores the full set.
    pub fn finish(self) -> ScytheResult<Scythe2Plan> {
        if self
            .pedals
            .iter()
            .all(|d| d.kind.is_none() && d.modifiers.is_empty())
        {
            return Err(ScytheError::EmptyProgram);
        }
        let mut records = Vec::with_capacity(usize::from(PEDAL_COUNT));
        for (pedal, draft) in (1..=PEDAL_COUNT).zip(self.pedals) {
            let record = match draft.kind {
                None if !draft.modifiers.is_empty() => {
                    return Err(ScytheError::ModifierWithoutKey { pedal });
                }
                None => PedalRecord::filler(),
                Some(kind) => {
                    let mut strokes = draft.strokes;
                    if let Some(first) = strokes.first_mut().filter(|s| !s.is_mouse()) {
                        first.modifier |= draft.modifiers.bits();
                    }
                    PedalRecord { kind, strokes }
                }
            };
            records.push(record);
        }
        Ok(Scythe2Plan { records })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scythe2Plan {
    pub records: Vec<PedalRecord>,
}

impl Scythe2Plan {
    /// `len_lo len_hi` followed by every record.
    pub fn encode_blob(&self) -> Vec<u8> {
        let len = self
            .records
            .iter()
            .map(PedalRecord::encoded_len)
            .fold(BLOB_RECORDS_OFFSET, usize::saturating_add);
        let mut blob = Vec::with_capacity(len);
        // six records of at most 255 strokes stay well below 64 KiB
        blob.extend_from_slice(&u16::try_from(len).unwrap_or(u16::MAX).to_le_bytes());
        for record in &self.records {
            let count = u8::try_from(record.strokes.len()).unwrap_or(u8::MAX);
            blob.push(count);
            blob.push(record.kind as u8);
            for stroke in &record.strokes {
                blob.push(stroke.modifier);
                blob.push(stroke.code);
            }
        }
        blob
    }
}

/// Wrapping byte sum of the report, computed with the checksum byte zeroed.
pub fn checksum(report: &[u8]) -> u8 {
    report
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != CHECKSUM_OFFSET)
        .fold(0u8, |sum, (_, b)| sum.wrapping_add(*b))
}

/// Stamps the header and checksum into `report` and returns a copy to send.
pub fn seal(report: &mut ReportBuilder<REPORT_SIZE>) -> ScytheResult<Report> {
    report.put(0, &HEADER)?;
    let sum = checksum(report.as_slice());
    report.set(CHECKSUM_OFFSET, sum)?;
    Ok(report.build())
}

/// All reports that upload `blob`, in order.
///
/// One buffer is reused across the whole upload, so a short final chunk still
/// carries the tail of the previous one after its `count` bytes. The firmware
/// ignores those bytes but they are part of the checksum.
pub fn update_reports(blob: &[u8]) -> ScytheResult<Vec<Report>> {
    let mut reports = vec![seal(&mut ReportBuilder::new())?];

    let mut buf = ReportBuilder::<REPORT_SIZE>::new();
    buf.set(COMMAND_OFFSET, command::BEGIN)?
        .set(COUNT_OFFSET, 0x02)?;
    reports.push(seal(&mut buf)?);

    for (index, chunk) in blob.chunks(CHUNK_SIZE).enumerate() {
        // six records of at most 255 strokes stay well below 64 KiB
        let offset = u16::try_from(index.saturating_mul(CHUNK_SIZE)).unwrap_or(u16::MAX);
        buf.set(COMMAND_OFFSET, command::CHUNK)?
            .put(ARG_OFFSET, &offset.to_be_bytes())?
            .set(COUNT_OFFSET, u8::try_from(chunk.len()).unwrap_or(u8::MAX))?
            .put(CHUNK_DATA_OFFSET, chunk)?;
        let sealed = seal(&mut buf)?;
        reports.push(sealed);
        reports.push(sealed);
    }

    buf.set(COMMAND_OFFSET, command::COMMIT)?
        .put(ARG_OFFSET, &COMMIT_ARGS)?
        .set(COUNT_OFFSET, 0x00)?;
    reports.push(seal(&mut buf)?);
    Ok(reports)
}

pub fn read_request() -> ScytheResult<Report> {
    let mut buf = ReportBuilder::new();
    buf.set(COMMAND_OFFSET, command::READ)?;
    seal(&mut buf)
}

/// One pedal as stored on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scythe2Reading {
    pub pedal: u8,
    pub kind: u8,
    pub strokes: Vec<Stroke>,
}

impl Scythe2Reading {
    /// `single key repeat`, `multiple keys`, ...
    pub fn kind_label(&self) -> String {
        match RecordType::from_byte(self.kind) {
            Some(kind) => kind.label().to_string(),
            None => format!("unknown record type 0x{:02X}", self.kind),
        }
    }

    /// The stored keys: the typed text for a sequence, otherwise the first
    /// stroke with its modifiers.
    pub fn strokes_text(&self) -> String {
        match RecordType::from_byte(self.kind) {
            Some(RecordType::Sequence) => self
                .strokes
                .iter()
                .map(|s| decode_byte(s.code).to_string())
                .collect(),
            Some(_) => self.strokes.first().map(ToString::to_string).unwrap_or_default(),
            None => self
                .strokes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl fmt::Display for Scythe2Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pedal {} ({}): {}",
            self.pedal,
            self.kind_label(),
            self.strokes_text()
        )
    }
}

/// Parses the settings report returned after [`read_request`].
///
/// Records that would run past the end of the report are not readable and
/// are left out.
pub fn decode_settings(data: &[u8]) -> ScytheResult<Vec<Scythe2Reading>> {
    if data.len() < REPORT_SIZE {
        return Err(ScytheError::ShortResponse {
            expected: REPORT_SIZE,
            actual: data.len(),
        });
    }
    let mut parser = ReportParser::new(data.get(..REPORT_SIZE).unwrap_or(data));
    let stored_len = parser.read_u16_le()?;
    debug!(stored_len, "settings blob length");
    let mut readings = Vec::new();
    for pedal in 1..=PEDAL_COUNT {
        let Some(count) = data.get(parser.position()).copied() else {
            break;
        };
        let len = usize::from(count) * 2 + 2;
        if len > parser.remaining() {
            warn!(pedal, "pedal record runs past the settings report");
            break;
        }
        let count = parser.read_u8()?;
        let kind = parser.read_u8()?;
        let strokes = parser
            .read_bytes(usize::from(count) * 2)?
            .chunks_exact(2)
            .filter_map(|pair| match *pair {
                [modifier, code] => Some(Stroke { modifier, code }),
                _ => None,
            })
            .collect();
        readings.push(Scythe2Reading {
            pedal,
            kind,
            strokes,
        });
    }
    Ok(readings)
}

pub fn write_program(transport: &mut dyn HidTransport, plan: &Scythe2Plan) -> ScytheResult<()> {
    let blob = plan.encode_blob();
    debug!(blob = %hex_dump(&blob), "settings blob");
    let reports = update_reports(&blob)?;
    info!(
        bytes = blob.len(),
        reports = reports.len(),
        "writing Scythe II settings"
    );
    for report in &reports {
        transport.send_feature_report(report)?;
        transport.settle(SETTLE);
    }
    Ok(())
}

pub fn read_pedals(transport: &mut dyn HidTransport) -> ScytheResult<Vec<Scythe2Reading>> {
    let mut buf = read_request()?;
    transport.send_feature_report(&buf)?;
    transport.settle(SETTLE);
    let n = transport.get_feature_report(&mut buf)?;
    decode_settings(buf.get(..n).unwrap_or_default())
}
