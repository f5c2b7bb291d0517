//! Split menu colors (`0xF11E`): the four most recently used colors.

use super::{record_body, require};
use crate::common::binary::{read_u32_le, write_slice, write_u32_le};
use crate::common::error::Result;
use crate::escher::header::{HEADER_SIZE, RecordHeader};
use crate::escher::types::record_id;
use bytes::Bytes;

const FIXED_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherSplitMenuColorsRecord {
    pub(crate) header: RecordHeader,
    colors: [u32; 4],
    remaining: Bytes,
}

impl Default for EscherSplitMenuColorsRecord {
    fn default() -> Self {
        // Instance is always 4, the number of colors.
        Self::with_header(RecordHeader::new(0x0040, record_id::SPLIT_MENU_COLORS))
    }
}

impl EscherSplitMenuColorsRecord {
    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            colors: [0; 4],
            remaining: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        require(body, FIXED_SIZE, self.header.record_id(), offset)?;
        for (i, color) in self.colors.iter_mut().enumerate() {
            *color = read_u32_le(body, i * 4)?;
        }
        self.remaining = Bytes::copy_from_slice(&body[FIXED_SIZE..]);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        for (i, color) in self.colors.iter().enumerate() {
            write_u32_le(data, offset + i * 4, *color)?;
        }
        write_slice(data, offset + FIXED_SIZE, &self.remaining)?;
        Ok(self.body_size())
    }

    pub(crate) fn body_size(&self) -> usize {
        FIXED_SIZE + self.remaining.len()
    }

    /// Colors in order: fill, line, shadow, 3-D.
    pub fn colors(&self) -> [u32; 4] {
        self.colors
    }

    pub fn set_colors(&mut self, colors: [u32; 4]) {
        self.colors = colors;
    }

    pub fn fill_color(&self) -> u32 {
        self.colors[0]
    }

    pub fn line_color(&self) -> u32 {
        self.colors[1]
    }

    pub fn shadow_color(&self) -> u32 {
        self.colors[2]
    }

    pub fn color_3d(&self) -> u32 {
        self.colors[3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_four_colors() {
        let mut data = vec![0x40, 0x00, 0x1E, 0xF1, 0x10, 0x00, 0x00, 0x00];
        for color in [0x0800_000Du32, 0x0800_000C, 0x0800_0017, 0x1000_00F7] {
            data.extend_from_slice(&color.to_le_bytes());
        }
        let mut record = EscherSplitMenuColorsRecord::default();
        assert_eq!(record.fill(&data, 0).unwrap(), 24);
        assert_eq!(record.fill_color(), 0x0800_000D);
        assert_eq!(record.color_3d(), 0x1000_00F7);

        let mut out = [0u8; 16];
        record.serialize_body(&mut out, 0).unwrap();
        assert_eq!(&out, &data[8..]);
    }
}
