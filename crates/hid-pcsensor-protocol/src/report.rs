//! Report encoders and the read-back decoder

use crate::{PcsensorError, PcsensorResult, PedalAction, ProgramPlan, REPORT_SIZE};
use footswitch_hid_common::ReportParser;
use footswitch_keymap::{Modifiers, MouseButton};

pub type Report = [u8; REPORT_SIZE];

pub const START_REPORT: Report = [0x01, 0x80, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];

pub mod payload_type {
    pub const UNCONFIGURED: u8 = 0x00;
    pub const KEY: u8 = 0x01;
    pub const MOUSE: u8 = 0x02;
    pub const COMBO: u8 = 0x03;
    pub const TEXT: u8 = 0x04;
    pub const KEY_LEGACY: u8 = 0x81;
}

/// `01 81 <len> <pedal>`: announces `len` payload bytes for `pedal`.
pub fn pedal_header(pedal: u8, len: u8) -> Report {
    [0x01, 0x81, len, pedal, 0x00, 0x00, 0x00, 0x00]
}

/// `01 82 08 <pedal>`: asks the device to report a pedal's payload.
pub fn query_report(pedal: u8) -> Report {
    [0x01, 0x82, 0x08, pedal, 0x00, 0x00, 0x00, 0x00]
}

/// Payload bytes for one action, zero-padded to whole reports.
///
/// The first byte is the payload length announced in the pedal header.
pub fn encode_payload(action: &PedalAction) -> Vec<u8> {
    match action {
        PedalAction::Unconfigured => vec![0x08, payload_type::UNCONFIGURED, 0, 0, 0, 0, 0, 0],
        PedalAction::Key {
            code,
            modifiers,
            button,
        } => {
            let code = code.unwrap_or(0);
            if modifiers.is_empty() && button.is_none() {
                vec![0x08, payload_type::KEY, 0x00, code, 0, 0, 0, 0]
            } else {
                let button = button.map_or(0, MouseButton::bits);
                vec![0x08, payload_type::COMBO, modifiers.bits(), code, button, 0, 0, 0]
            }
        }
        PedalAction::Mouse { button, x, y, wheel } => vec![
            0x08,
            payload_type::MOUSE,
            0x00,
            0x00,
            button.map_or(0, MouseButton::bits),
            u8::from_le_bytes(x.to_le_bytes()),
            u8::from_le_bytes(y.to_le_bytes()),
            u8::from_le_bytes(wheel.to_le_bytes()),
        ],
        PedalAction::Text(codes) => {
            // codes never exceed MAX_TEXT_LEN, so len + 2 fits in a byte
            let len = u8::try_from(codes.len().saturating_add(2)).unwrap_or(u8::MAX);
            let mut payload = Vec::with_capacity(codes.len().saturating_add(REPORT_SIZE));
            payload.push(len);
            payload.push(payload_type::TEXT);
            payload.extend_from_slice(codes);
            let padded = payload.len().div_ceil(REPORT_SIZE).saturating_mul(REPORT_SIZE);
            payload.resize(padded, 0);
            payload
        }
    }
}

/// Every report of a write session, in order.
///
/// All three slots are written; an unconfigured pedal gets `08 00 ..`, which
/// clears whatever the device had stored for it.
pub fn write_sequence(plan: &ProgramPlan) -> Vec<Report> {
    let mut reports = vec![START_REPORT];
    for (pedal, action) in plan.pedals() {
        let payload = encode_payload(action);
        let len = payload.first().copied().unwrap_or(0);
        reports.push(pedal_header(pedal, len));
        reports.extend(payload.chunks(REPORT_SIZE).map(|chunk| {
            let mut report = [0u8; REPORT_SIZE];
            report
                .iter_mut()
                .zip(chunk)
                .for_each(|(dst, src)| *dst = *src);
            report
        }));
    }
    reports
}

/// What a pedal reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PedalReport {
    Known(PedalAction),
    /// A payload type this crate does not understand, kept verbatim.
    Unknown(Vec<u8>),
}

impl std::fmt::Display for PedalReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(action) => write!(f, "{action}"),
            Self::Unknown(raw) => write!(
                f,
                "unknown payload: {}",
                footswitch_hid_common::hex_dump(raw)
            ),
        }
    }
}

/// Result of decoding the first report of a pedal's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Complete(PedalReport),
    /// A string longer than fits in the first report; feed the following
    /// reports to [`TextAssembler::push`].
    Partial(TextAssembler),
}

/// Collects a string payload spread over several reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAssembler {
    expected: usize,
    codes: Vec<u8>,
}

impl TextAssembler {
    fn new(expected: usize) -> Self {
        Self {
            expected,
            codes: Vec::with_capacity(expected),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.codes.len() >= self.expected
    }

    pub fn remaining(&self) -> usize {
        self.expected.saturating_sub(self.codes.len())
    }

    /// Appends the codes carried by one continuation report.
    pub fn push(&mut self, data: &[u8]) -> bool {
        let take = self.remaining().min(data.len());
        self.codes.extend(data.iter().take(take));
        self.is_complete()
    }

    pub fn finish(self) -> PedalAction {
        PedalAction::Text(self.codes)
    }
}

/// Decodes the first report answered to a [`query_report`].
pub fn decode_report(data: &[u8]) -> PcsensorResult<Decoded> {
    if data.len() < REPORT_SIZE {
        return Err(PcsensorError::ShortResponse {
            expected: REPORT_SIZE,
            actual: data.len(),
        });
    }
    let mut parser = ReportParser::new(data);
    let len = parser.read_u8()?;
    let kind = parser.read_u8()?;
    let action = match kind {
        payload_type::UNCONFIGURED => PedalAction::Unconfigured,
        payload_type::KEY | payload_type::KEY_LEGACY | payload_type::COMBO => {
            let modifiers = Modifiers::from_bits_retain(parser.read_u8()?);
            let code = parser.read_u8()?;
            let button = MouseButton::from_bits(parser.read_u8()?);
            PedalAction::Key {
                code: (code != 0).then_some(code),
                modifiers,
                button,
            }
        }
        payload_type::MOUSE => {
            parser.skip(2);
            let button = MouseButton::from_bits(parser.read_u8()?);
            PedalAction::Mouse {
                button,
                x: parser.read_i8()?,
                y: parser.read_i8()?,
                wheel: parser.read_i8()?,
            }
        }
        payload_type::TEXT => {
            let mut text = TextAssembler::new(usize::from(len.saturating_sub(2)));
            let head = parser.read_bytes(parser.remaining().min(REPORT_SIZE - 2))?;
            if text.push(head) {
                text.finish()
            } else {
                return Ok(Decoded::Partial(text));
            }
        }
        _ => {
            return Ok(Decoded::Complete(PedalReport::Unknown(
                data.iter().take(REPORT_SIZE).copied().collect(),
            )));
        }
    };
    Ok(Decoded::Complete(PedalReport::Known(action)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PcsensorProgram;

    #[test]
    fn test_control_reports() {
        assert_eq!(pedal_header(2, 8), [0x01, 0x81, 0x08, 0x02, 0, 0, 0, 0]);
        assert_eq!(query_report(3), [0x01, 0x82, 0x08, 0x03, 0, 0, 0, 0]);
    }

    #[test]
    fn test_plain_key_payload() {
        let action = PedalAction::Key {
            code: Some(0x04),
            modifiers: Modifiers::empty(),
            button: None,
        };
        assert_eq!(encode_payload(&action), vec![0x08, 0x01, 0x00, 0x04, 0, 0, 0, 0]);
    }

    #[test]
    fn test_combo_payload() {
        let action = PedalAction::Key {
            code: Some(0x06),
            modifiers: Modifiers::CTRL | Modifiers::ALT,
            button: Some(MouseButton::Middle),
        };
        assert_eq!(encode_payload(&action), vec![0x08, 0x03, 0x05, 0x06, 0x04, 0, 0, 0]);
    }

    #[test]
    fn test_mouse_payload_is_twos_complement() {
        let action = PedalAction::Mouse {
            button: Some(MouseButton::Left),
            x: -1,
            y: 10,
            wheel: -128,
        };
        assert_eq!(
            encode_payload(&action),
            vec![0x08, 0x02, 0x00, 0x00, 0x01, 0xff, 0x0a, 0x80]
        );
    }

    #[test]
    fn test_text_payload_padding() {
        let payload = encode_payload(&PedalAction::Text(vec![0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10, 0x11]));
        assert_eq!(payload.len(), 16);
        assert_eq!(payload[0], 9);
        assert_eq!(payload[1], payload_type::TEXT);
        assert_eq!(&payload[2..9], &[0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10, 0x11]);
        assert!(payload[9..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_write_sequence_clears_unconfigured_slots() -> PcsensorResult<()> {
        let mut program = PcsensorProgram::new();
        program.select_pedal(3)?;
        program.set_key("enter")?;
        let reports = write_sequence(&program.finish()?);
        let cleared = [0x08, 0x00, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            reports,
            vec![
                START_REPORT,
                pedal_header(1, 8),
                cleared,
                pedal_header(2, 8),
                cleared,
                pedal_header(3, 8),
                [0x08, 0x01, 0x00, 0x28, 0, 0, 0, 0],
            ]
        );
        Ok(())
    }

    #[test]
    fn test_decode_combo() -> PcsensorResult<()> {
        let decoded = decode_report(&[0x08, 0x03, 0x02, 0x04, 0x02, 0, 0, 0])?;
        assert_eq!(
            decoded,
            Decoded::Complete(PedalReport::Known(PedalAction::Key {
                code: Some(0x04),
                modifiers: Modifiers::SHIFT,
                button: Some(MouseButton::Right),
            }))
        );
        Ok(())
    }

    #[test]
    fn test_decode_legacy_key_type() -> Result<(), Box<dyn std::error::Error>> {
        let Decoded::Complete(report) = decode_report(&[0x08, 0x81, 0x00, 0x05, 0, 0, 0, 0])? else {
            return Err("a key fits in one report".into());
        };
        assert_eq!(report.to_string(), "b");
        Ok(())
    }

    #[test]
    fn test_decode_short_text_in_one_report() -> PcsensorResult<()> {
        let decoded = decode_report(&[0x05, 0x04, 0x0b, 0x0c, 0x1e, 0, 0, 0])?;
        assert_eq!(
            decoded,
            Decoded::Complete(PedalReport::Known(PedalAction::Text(vec![0x0b, 0x0c, 0x1e])))
        );
        Ok(())
    }

    #[test]
    fn test_decode_long_text_needs_more() -> Result<(), Box<dyn std::error::Error>> {
        let decoded = decode_report(&[0x0a, 0x04, 1, 2, 3, 4, 5, 6])?;
        let Decoded::Partial(mut text) = decoded else {
            return Err("eight codes do not fit in the first report".into());
        };
        assert_eq!(text.remaining(), 2);
        assert!(text.push(&[7, 8, 0, 0, 0, 0, 0, 0]));
        assert_eq!(text.finish(), PedalAction::Text(vec![1, 2, 3, 4, 5, 6, 7, 8]));
        Ok(())
    }

    #[test]
    fn test_decode_unknown_type_keeps_bytes() -> PcsensorResult<()> {
        let raw = [0x08, 0x07, 1, 2, 3, 4, 5, 6];
        let decoded = decode_report(&raw)?;
        assert_eq!(decoded, Decoded::Complete(PedalReport::Unknown(raw.to_vec())));
        Ok(())
    }

    #[test]
    fn test_decode_short_response() {
        assert!(matches!(
            decode_report(&[0x08, 0x01]),
            Err(PcsensorError::ShortResponse { expected: 8, actual: 2 })
        ));
    }
}
