//! Anchor and group-bounds records.
//!
//! - `Spgr` (`0xF009`): group coordinate rectangle, 4 x i32
//! - `ChildAnchor` (`0xF00F`): child rectangle inside a group, 4 x i32
//! - `ClientAnchor` (`0xF010`): cell-relative anchor in three layouts

use super::{record_body, require};
use crate::common::binary::{read_i32_le, read_u16_le, write_i32_le, write_slice, write_u16_le};
use crate::common::error::{Error, Result};
use crate::escher::header::{HEADER_SIZE, RecordHeader};
use crate::escher::types::record_id;
use bytes::Bytes;

const RECT_SIZE: usize = 16;

fn read_rect(body: &[u8]) -> Result<[i32; 4]> {
    Ok([
        read_i32_le(body, 0)?,
        read_i32_le(body, 4)?,
        read_i32_le(body, 8)?,
        read_i32_le(body, 12)?,
    ])
}

fn write_rect(rect: &[i32; 4], data: &mut [u8], offset: usize) -> Result<()> {
    for (i, value) in rect.iter().enumerate() {
        write_i32_le(data, offset + i * 4, *value)?;
    }
    Ok(())
}

/// Group shape coordinate system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherSpgrRecord {
    pub(crate) header: RecordHeader,
    rect: [i32; 4],
    remaining: Bytes,
}

impl Default for EscherSpgrRecord {
    fn default() -> Self {
        Self::with_header(RecordHeader::new(0x0001, record_id::SPGR))
    }
}

impl EscherSpgrRecord {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let mut record = Self::default();
        record.rect = [x1, y1, x2, y2];
        record
    }

    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            rect: [0; 4],
            remaining: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        require(body, RECT_SIZE, self.header.record_id(), offset)?;
        self.rect = read_rect(body)?;
        self.remaining = Bytes::copy_from_slice(&body[RECT_SIZE..]);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_rect(&self.rect, data, offset)?;
        write_slice(data, offset + RECT_SIZE, &self.remaining)?;
        Ok(self.body_size())
    }

    pub(crate) fn body_size(&self) -> usize {
        RECT_SIZE + self.remaining.len()
    }

    /// `(x1, y1, x2, y2)`
    pub fn rect(&self) -> (i32, i32, i32, i32) {
        let [x1, y1, x2, y2] = self.rect;
        (x1, y1, x2, y2)
    }

    pub fn set_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.rect = [x1, y1, x2, y2];
    }
}

/// Position of a shape inside its parent group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherChildAnchorRecord {
    pub(crate) header: RecordHeader,
    rect: [i32; 4],
    remaining: Bytes,
}

impl Default for EscherChildAnchorRecord {
    fn default() -> Self {
        Self::with_header(RecordHeader::new(0x0000, record_id::CHILD_ANCHOR))
    }
}

impl EscherChildAnchorRecord {
    pub fn new(dx1: i32, dy1: i32, dx2: i32, dy2: i32) -> Self {
        let mut record = Self::default();
        record.rect = [dx1, dy1, dx2, dy2];
        record
    }

    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            rect: [0; 4],
            remaining: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        require(body, RECT_SIZE, self.header.record_id(), offset)?;
        self.rect = read_rect(body)?;
        self.remaining = Bytes::copy_from_slice(&body[RECT_SIZE..]);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_rect(&self.rect, data, offset)?;
        write_slice(data, offset + RECT_SIZE, &self.remaining)?;
        Ok(self.body_size())
    }

    pub(crate) fn body_size(&self) -> usize {
        RECT_SIZE + self.remaining.len()
    }

    /// `(dx1, dy1, dx2, dy2)`
    pub fn rect(&self) -> (i32, i32, i32, i32) {
        let [dx1, dy1, dx2, dy2] = self.rect;
        (dx1, dy1, dx2, dy2)
    }

    pub fn set_rect(&mut self, dx1: i32, dy1: i32, dx2: i32, dy2: i32) {
        self.rect = [dx1, dy1, dx2, dy2];
    }
}

/// Which fields a client anchor body carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorLayout {
    /// 4-byte body owned entirely by the host application
    Host,
    /// flag, col1, dx1, row1
    Short,
    /// all nine fields
    Full,
}

const SHORT_SIZE: usize = 8;
const FULL_SIZE: usize = 18;
const HOST_SIZE: usize = 4;

/// Cell anchor of a top-level shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherClientAnchorRecord {
    pub(crate) header: RecordHeader,
    layout: AnchorLayout,
    /// flag, col1, dx1, row1, dy1, col2, dx2, row2, dy2
    fields: [u16; 9],
    remaining: Bytes,
}

impl Default for EscherClientAnchorRecord {
    fn default() -> Self {
        Self::with_header(RecordHeader::new(0x0000, record_id::CLIENT_ANCHOR))
    }
}

impl EscherClientAnchorRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        flag: u16,
        col1: u16,
        dx1: u16,
        row1: u16,
        dy1: u16,
        col2: u16,
        dx2: u16,
        row2: u16,
        dy2: u16,
    ) -> Self {
        let mut record = Self::default();
        record.fields = [flag, col1, dx1, row1, dy1, col2, dx2, row2, dy2];
        record
    }

    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            layout: AnchorLayout::Full,
            fields: [0; 9],
            remaining: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize) -> Result<usize> {
        let record_id = self.header.record_id();
        let body = record_body(data, offset, record_id)?;
        self.fields = [0; 9];

        let parsed = if body.len() == HOST_SIZE {
            self.layout = AnchorLayout::Host;
            0
        } else {
            if body.len() < SHORT_SIZE {
                return Err(Error::RecordTooShort {
                    record_id,
                    offset,
                    needed: SHORT_SIZE,
                    available: body.len(),
                });
            }
            let count = if body.len() >= FULL_SIZE {
                self.layout = AnchorLayout::Full;
                9
            } else {
                self.layout = AnchorLayout::Short;
                4
            };
            for i in 0..count {
                self.fields[i] = read_u16_le(body, i * 2)?;
            }
            count * 2
        };

        self.remaining = Bytes::copy_from_slice(&body[parsed..]);
        Ok(HEADER_SIZE + body.len())
    }

    fn field_count(&self) -> usize {
        match self.layout {
            AnchorLayout::Host => 0,
            AnchorLayout::Short => 4,
            AnchorLayout::Full => 9,
        }
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        let count = self.field_count();
        for i in 0..count {
            write_u16_le(data, offset + i * 2, self.fields[i])?;
        }
        write_slice(data, offset + count * 2, &self.remaining)?;
        Ok(self.body_size())
    }

    pub(crate) fn body_size(&self) -> usize {
        self.field_count() * 2 + self.remaining.len()
    }

    #[inline]
    pub fn layout(&self) -> AnchorLayout {
        self.layout
    }

    pub fn flag(&self) -> u16 {
        self.fields[0]
    }

    pub fn col1(&self) -> u16 {
        self.fields[1]
    }

    pub fn dx1(&self) -> u16 {
        self.fields[2]
    }

    pub fn row1(&self) -> u16 {
        self.fields[3]
    }

    pub fn dy1(&self) -> u16 {
        self.fields[4]
    }

    pub fn col2(&self) -> u16 {
        self.fields[5]
    }

    pub fn dx2(&self) -> u16 {
        self.fields[6]
    }

    pub fn row2(&self) -> u16 {
        self.fields[7]
    }

    pub fn dy2(&self) -> u16 {
        self.fields[8]
    }

    /// Set the starting cell; a host-owned anchor becomes a short anchor.
    pub fn set_start(&mut self, col1: u16, dx1: u16, row1: u16) {
        if self.layout == AnchorLayout::Host {
            self.layout = AnchorLayout::Short;
            self.remaining = Bytes::new();
        }
        self.fields[1] = col1;
        self.fields[2] = dx1;
        self.fields[3] = row1;
    }

    /// Set the ending cell; the anchor becomes a full anchor.
    pub fn set_end(&mut self, dy1: u16, col2: u16, dx2: u16, row2: u16, dy2: u16) {
        if self.layout == AnchorLayout::Host {
            self.remaining = Bytes::new();
        }
        self.layout = AnchorLayout::Full;
        self.fields[4..9].copy_from_slice(&[dy1, col2, dx2, row2, dy2]);
    }

    pub fn set_flag(&mut self, flag: u16) {
        self.fields[0] = flag;
    }

    /// Unparsed trailing bytes (the whole body for host anchors).
    pub fn remaining_data(&self) -> &[u8] {
        &self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(record_id: u16, body: &[u8]) -> Vec<u8> {
        let mut data = vec![0x00, 0x00];
        data.extend_from_slice(&record_id.to_le_bytes());
        data.extend_from_slice(&(body.len() as u32).to_le_bytes());
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_spgr_rect() {
        let mut body = Vec::new();
        for v in [0i32, 0, 1000, -500] {
            body.extend_from_slice(&v.to_le_bytes());
        }
        let data = record(record_id::SPGR, &body);
        let mut spgr = EscherSpgrRecord::default();
        assert_eq!(spgr.fill(&data, 0).unwrap(), 24);
        assert_eq!(spgr.rect(), (0, 0, 1000, -500));

        let mut out = vec![0u8; spgr.body_size()];
        spgr.serialize_body(&mut out, 0).unwrap();
        assert_eq!(out, body);
    }

    #[test]
    fn test_client_anchor_layouts() {
        let full: Vec<u8> = (0u8..18).collect();
        let data = record(record_id::CLIENT_ANCHOR, &full);
        let mut anchor = EscherClientAnchorRecord::default();
        anchor.fill(&data, 0).unwrap();
        assert_eq!(anchor.layout(), AnchorLayout::Full);
        assert_eq!(anchor.col1(), 0x0302);
        assert_eq!(anchor.dy2(), 0x1110);

        let data = record(record_id::CLIENT_ANCHOR, &[1, 0, 2, 0, 3, 0, 4, 0, 0xAA]);
        anchor.fill(&data, 0).unwrap();
        assert_eq!(anchor.layout(), AnchorLayout::Short);
        assert_eq!(anchor.row1(), 4);
        assert_eq!(anchor.remaining_data(), &[0xAA]);
        assert_eq!(anchor.body_size(), 9);

        let data = record(record_id::CLIENT_ANCHOR, &[9, 8, 7, 6]);
        anchor.fill(&data, 0).unwrap();
        assert_eq!(anchor.layout(), AnchorLayout::Host);
        let mut out = vec![0u8; anchor.body_size()];
        anchor.serialize_body(&mut out, 0).unwrap();
        assert_eq!(out, vec![9, 8, 7, 6]);
    }

    #[test]
    fn test_client_anchor_too_short() {
        let data = record(record_id::CLIENT_ANCHOR, &[1, 2, 3, 4, 5, 6]);
        let mut anchor = EscherClientAnchorRecord::default();
        assert!(matches!(
            anchor.fill(&data, 0),
            Err(Error::RecordTooShort { needed: 8, .. })
        ));
    }
}
