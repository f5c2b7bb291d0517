//! Blip store entry (`0xF007`).
//!
//! # Format
//!
//! - Bytes 0-1: blip type for Windows and for Mac
//! - Bytes 2-17: picture UID
//! - Bytes 18-19: tag
//! - Bytes 20-23: size of the blip in the delay stream
//! - Bytes 24-27: reference count
//! - Bytes 28-31: offset in the delay stream
//! - Byte 32: usage, byte 33: name length, bytes 34-35: unused
//! - Name bytes, then an optional embedded blip record

use super::{record_body, require};
use crate::common::binary::{
    read_array, read_u8, read_u16_le, read_u32_le, write_slice, write_u8, write_u16_le, write_u32_le,
};
use crate::common::error::{Error, Result};
use crate::escher::factory::EscherRecordFactory;
use crate::escher::header::{HEADER_SIZE, RecordHeader, read_header};
use crate::escher::listener::NullListener;
use crate::escher::record::EscherRecord;
use crate::escher::types::{is_blip_id, record_id};
use bytes::Bytes;

const FIXED_SIZE: usize = 36;
const MAX_NAME_LEN: usize = u8::MAX as usize;

fn name_length(name: &[u8]) -> Result<u8> {
    u8::try_from(name.len()).map_err(|_| Error::FieldTooLarge {
        field: "blip store entry name",
        len: name.len(),
        max: MAX_NAME_LEN,
    })
}

/// Blip type byte values.
pub mod blip_type {
    pub const ERROR: u8 = 0x00;
    pub const UNKNOWN: u8 = 0x01;
    pub const EMF: u8 = 0x02;
    pub const WMF: u8 = 0x03;
    pub const PICT: u8 = 0x04;
    pub const JPEG: u8 = 0x05;
    pub const PNG: u8 = 0x06;
    pub const DIB: u8 = 0x07;
    pub const TIFF: u8 = 0x11;
    pub const CMYK_JPEG: u8 = 0x12;
}

#[derive(Debug, Clone, PartialEq)]
pub struct EscherBseRecord {
    pub(crate) header: RecordHeader,
    blip_type_win32: u8,
    blip_type_mac: u8,
    uid: [u8; 16],
    tag: u16,
    size: u32,
    ref_count: u32,
    delay_offset: u32,
    usage: u8,
    unused2: u8,
    unused3: u8,
    name: Bytes,
    blip: Option<Box<EscherRecord>>,
    remaining: Bytes,
}

impl Default for EscherBseRecord {
    fn default() -> Self {
        Self::with_header(RecordHeader::new(0x0002, record_id::BSE))
    }
}

impl EscherBseRecord {
    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            blip_type_win32: blip_type::UNKNOWN,
            blip_type_mac: blip_type::UNKNOWN,
            uid: [0; 16],
            tag: 0,
            size: 0,
            ref_count: 0,
            delay_offset: 0,
            usage: 0,
            unused2: 0,
            unused3: 0,
            name: Bytes::new(),
            blip: None,
            remaining: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize, factory: &dyn EscherRecordFactory) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        require(body, FIXED_SIZE, self.header.record_id(), offset)?;

        self.blip_type_win32 = read_u8(body, 0)?;
        self.blip_type_mac = read_u8(body, 1)?;
        self.uid = read_array::<16>(body, 2)?;
        self.tag = read_u16_le(body, 18)?;
        self.size = read_u32_le(body, 20)?;
        self.ref_count = read_u32_le(body, 24)?;
        self.delay_offset = read_u32_le(body, 28)?;
        self.usage = read_u8(body, 32)?;
        let name_len = read_u8(body, 33)? as usize;
        self.unused2 = read_u8(body, 34)?;
        self.unused3 = read_u8(body, 35)?;

        let mut pos = FIXED_SIZE;
        require(body, pos + name_len, self.header.record_id(), offset)?;
        self.name = Bytes::copy_from_slice(&body[pos..pos + name_len]);
        pos += name_len;

        self.blip = None;
        if body.len() - pos >= HEADER_SIZE {
            let (_, child_id, _) = read_header(body, pos)?;
            if is_blip_id(child_id) {
                let mut blip = factory.create_record(body, pos)?;
                pos += blip.fill(body, pos, factory)?;
                self.blip = Some(Box::new(blip));
            }
        }

        self.remaining = Bytes::copy_from_slice(&body[pos..]);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_u8(data, offset, self.blip_type_win32)?;
        write_u8(data, offset + 1, self.blip_type_mac)?;
        write_slice(data, offset + 2, &self.uid)?;
        write_u16_le(data, offset + 18, self.tag)?;
        write_u32_le(data, offset + 20, self.size)?;
        write_u32_le(data, offset + 24, self.ref_count)?;
        write_u32_le(data, offset + 28, self.delay_offset)?;
        write_u8(data, offset + 32, self.usage)?;
        write_u8(data, offset + 33, name_length(&self.name)?)?;
        write_u8(data, offset + 34, self.unused2)?;
        write_u8(data, offset + 35, self.unused3)?;

        let mut pos = offset + FIXED_SIZE;
        write_slice(data, pos, &self.name)?;
        pos += self.name.len();
        if let Some(blip) = &self.blip {
            pos += blip.serialize(pos, data, &mut NullListener)?;
        }
        write_slice(data, pos, &self.remaining)?;
        Ok(self.body_size())
    }

    pub(crate) fn body_size(&self) -> usize {
        FIXED_SIZE
            + self.name.len()
            + self.blip.as_ref().map_or(0, |b| b.record_size())
            + self.remaining.len()
    }

    #[inline]
    pub fn blip_type_win32(&self) -> u8 {
        self.blip_type_win32
    }

    #[inline]
    pub fn blip_type_mac(&self) -> u8 {
        self.blip_type_mac
    }

    pub fn set_blip_types(&mut self, win32: u8, mac: u8) {
        self.blip_type_win32 = win32;
        self.blip_type_mac = mac;
    }

    pub fn uid(&self) -> &[u8; 16] {
        &self.uid
    }

    pub fn set_uid(&mut self, uid: [u8; 16]) {
        self.uid = uid;
    }

    pub fn tag(&self) -> u16 {
        self.tag
    }

    /// Size of the blip in the delay stream.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size;
    }

    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }

    pub fn set_ref_count(&mut self, ref_count: u32) {
        self.ref_count = ref_count;
    }

    /// Offset of the blip in the delay stream.
    pub fn delay_offset(&self) -> u32 {
        self.delay_offset
    }

    pub fn set_delay_offset(&mut self, delay_offset: u32) {
        self.delay_offset = delay_offset;
    }

    pub fn usage(&self) -> u8 {
        self.usage
    }

    /// Raw name bytes (UTF-16LE when present).
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Set the name bytes; the length byte limits them to 255.
    pub fn set_name(&mut self, name: impl Into<Bytes>) -> Result<()> {
        let name = name.into();
        name_length(&name)?;
        self.name = name;
        Ok(())
    }

    /// The embedded blip, when the picture is stored inline.
    pub fn blip(&self) -> Option<&EscherRecord> {
        self.blip.as_deref()
    }

    pub fn set_blip(&mut self, blip: Option<EscherRecord>) {
        self.blip = blip.map(Box::new);
    }

    /// Whether the picture lives in the delay stream rather than inline.
    pub fn is_delay_loaded(&self) -> bool {
        self.blip.is_none() && self.size > 0
    }
}
