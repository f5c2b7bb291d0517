//! Shape atom (`0xF00A`): shape id plus shape flags.

use super::{record_body, require};
use crate::common::binary::{read_u32_le, write_slice, write_u32_le};
use crate::common::error::Result;
use crate::escher::header::{HEADER_SIZE, RecordHeader};
use crate::escher::types::record_id;
use bitflags::bitflags;
use bytes::Bytes;

bitflags! {
    /// Shape flags for EscherSpRecord (MS-ODRAW 2.2.40)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ShapeFlags: u32 {
        /// Shape is a group
        const GROUP = 0x0001;
        /// Shape is a child of a group
        const CHILD = 0x0002;
        /// Shape is the topmost group (patriarch)
        const PATRIARCH = 0x0004;
        /// Shape has been deleted
        const DELETED = 0x0008;
        /// Shape is an OLE object
        const OLE_SHAPE = 0x0010;
        /// Shape has a valid master
        const HAVE_MASTER = 0x0020;
        /// Shape is flipped horizontally
        const FLIP_H = 0x0040;
        /// Shape is flipped vertically
        const FLIP_V = 0x0080;
        /// Shape is a connector
        const CONNECTOR = 0x0100;
        /// Shape has an anchor
        const HAVE_ANCHOR = 0x0200;
        /// Shape is a background shape
        const BACKGROUND = 0x0400;
        /// Shape has a shape type property
        const HAVE_SPT = 0x0800;
    }
}

const FIXED_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherSpRecord {
    pub(crate) header: RecordHeader,
    shape_id: u32,
    flags: ShapeFlags,
    remaining: Bytes,
}

impl Default for EscherSpRecord {
    fn default() -> Self {
        Self::with_header(RecordHeader::new(0x0002, record_id::SP))
    }
}

impl EscherSpRecord {
    pub fn new(shape_type: u16, shape_id: u32, flags: ShapeFlags) -> Self {
        let mut record = Self::default();
        record.header.set_instance(shape_type);
        record.shape_id = shape_id;
        record.flags = flags;
        record
    }

    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            shape_id: 0,
            flags: ShapeFlags::empty(),
            remaining: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        require(body, FIXED_SIZE, self.header.record_id(), offset)?;
        self.shape_id = read_u32_le(body, 0)?;
        // Unnamed bits survive the round trip.
        self.flags = ShapeFlags::from_bits_retain(read_u32_le(body, 4)?);
        self.remaining = Bytes::copy_from_slice(&body[FIXED_SIZE..]);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_u32_le(data, offset, self.shape_id)?;
        write_u32_le(data, offset + 4, self.flags.bits())?;
        write_slice(data, offset + FIXED_SIZE, &self.remaining)?;
        Ok(self.body_size())
    }

    pub(crate) fn body_size(&self) -> usize {
        FIXED_SIZE + self.remaining.len()
    }

    #[inline]
    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    pub fn set_shape_id(&mut self, shape_id: u32) {
        self.shape_id = shape_id;
    }

    #[inline]
    pub fn flags(&self) -> ShapeFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: ShapeFlags) {
        self.flags = flags;
    }

    /// Shape type, stored in the instance field.
    #[inline]
    pub fn shape_type(&self) -> u16 {
        self.header.instance()
    }

    pub fn set_shape_type(&mut self, shape_type: u16) {
        self.header.set_instance(shape_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_serialize() {
        let data = [
            0x12, 0x00, 0x0A, 0xF0, 0x08, 0x00, 0x00, 0x00, // header, shape type 1
            0xE9, 0x03, 0x00, 0x00, 0x03, 0x0A, 0x00, 0x00,
        ];
        let mut record = EscherSpRecord::with_header(RecordHeader::new(0x0012, record_id::SP));
        assert_eq!(record.fill(&data, 0).unwrap(), 16);
        assert_eq!(record.shape_id(), 1001);
        assert!(record.flags().contains(ShapeFlags::GROUP | ShapeFlags::CHILD));
        assert!(record.flags().contains(ShapeFlags::HAVE_ANCHOR | ShapeFlags::HAVE_SPT));
        assert_eq!(record.shape_type(), 1);

        let mut body = [0u8; 8];
        record.serialize_body(&mut body, 0).unwrap();
        assert_eq!(&body, &data[8..]);
    }

    #[test]
    fn test_short_body_is_fatal() {
        let data = [0x02, 0x00, 0x0A, 0xF0, 0x04, 0x00, 0x00, 0x00, 1, 2, 3, 4];
        let mut record = EscherSpRecord::default();
        assert!(record.fill(&data, 0).is_err());
    }

    #[test]
    fn test_unnamed_flag_bits_retained() {
        let mut record = EscherSpRecord::new(202, 2049, ShapeFlags::from_bits_retain(0x8000_0001));
        record.set_shape_id(2050);
        assert_eq!(record.flags().bits(), 0x8000_0001);
        assert_eq!(record.shape_type(), 202);
        assert_eq!(record.header.options(), 0x0CA2);
    }
}
