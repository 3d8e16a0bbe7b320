//! HID report parsing and building utilities

use crate::{HidCommonError, HidCommonResult};

/// Cursor over a received report.
pub struct ReportParser<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ReportParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            buffer: data,
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn read_u8(&mut self) -> HidCommonResult<u8> {
        let value = *self
            .buffer
            .get(self.position)
            .ok_or_else(|| end_of_data(self.position, 1))?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_i8(&mut self) -> HidCommonResult<i8> {
        Ok(i8::from_le_bytes([self.read_u8()?]))
    }

    pub fn read_u16_le(&mut self) -> HidCommonResult<u16> {
        let bytes = self.read_array::<2>()?;
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_u64_le(&mut self) -> HidCommonResult<u64> {
        let bytes = self.read_array::<8>()?;
        Ok(u64::from_le_bytes(bytes))
    }

    pub fn read_bytes(&mut self, count: usize) -> HidCommonResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(count)
            .ok_or_else(|| end_of_data(self.position, count))?;
        let slice = self
            .buffer
            .get(self.position..end)
            .ok_or_else(|| end_of_data(self.position, count))?;
        self.position = end;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> HidCommonResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn skip(&mut self, count: usize) {
        self.position = self.position.saturating_add(count).min(self.buffer.len());
    }
}

fn end_of_data(position: usize, wanted: usize) -> HidCommonError {
    HidCommonError::InvalidReport(format!(
        "Unexpected end of data: wanted {wanted} byte(s) at offset {position}"
    ))
}

/// Fixed-size, zero-initialised outgoing report.
///
/// Writes past the end are errors rather than panics, so encoders can use
/// named offsets without indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBuilder<const N: usize> {
    buffer: [u8; N],
}

impl<const N: usize> Default for ReportBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReportBuilder<N> {
    pub fn new() -> Self {
        Self { buffer: [0u8; N] }
    }

    pub fn from_array(buffer: [u8; N]) -> Self {
        Self { buffer }
    }

    pub fn set(&mut self, offset: usize, value: u8) -> HidCommonResult<&mut Self> {
        let slot = self
            .buffer
            .get_mut(offset)
            .ok_or_else(|| out_of_range(offset, 1, N))?;
        *slot = value;
        Ok(self)
    }

    pub fn or(&mut self, offset: usize, bits: u8) -> HidCommonResult<&mut Self> {
        let slot = self
            .buffer
            .get_mut(offset)
            .ok_or_else(|| out_of_range(offset, 1, N))?;
        *slot |= bits;
        Ok(self)
    }

    pub fn put(&mut self, offset: usize, data: &[u8]) -> HidCommonResult<&mut Self> {
        let dst = offset
            .checked_add(data.len())
            .and_then(|end| self.buffer.get_mut(offset..end))
            .ok_or_else(|| out_of_range(offset, data.len(), N))?;
        dst.copy_from_slice(data);
        Ok(self)
    }

    pub fn get(&self, offset: usize) -> Option<u8> {
        self.buffer.get(offset).copied()
    }

    pub fn build(&self) -> [u8; N] {
        self.buffer
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }
}

fn out_of_range(offset: usize, count: usize, len: usize) -> HidCommonError {
    HidCommonError::InvalidReport(format!(
        "write of {count} byte(s) at offset {offset} exceeds {len}-byte report"
    ))
}

/// Formats bytes as space separated upper-case hex pairs.
pub fn hex_dump(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
