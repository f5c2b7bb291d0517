//! Picture (blip) records, ids `0xF018..=0xF117`.
//!
//! # Layouts
//!
//! Bitmap blips (JPEG, PNG, DIB, TIFF):
//! - `rgbUid1` (16 bytes), `rgbUid2` (16 bytes, only for the odd instance)
//! - tag byte (0xFF)
//! - picture bytes to the end of the record
//!
//! Metafile blips (EMF, WMF, PICT):
//! - `rgbUid1` (16 bytes), `rgbUid2` (16 bytes, only for the odd instance)
//! - `cb` uncompressed size (4), `rcBounds` (16), `ptSize` (8)
//! - `cbSave` stored size (4), compression (1), filter (1)
//! - `cbSave` bytes of picture data
//!
//! Other ids in the range are kept as raw bodies.

use super::{record_body, require};
use crate::common::binary::{
    read_array, read_i32_le, read_u8, read_u32_le, write_i32_le, write_slice, write_u8, write_u32_le,
};
use crate::common::error::Result;
use crate::escher::compression;
use crate::escher::header::{HEADER_SIZE, RecordHeader};
use crate::escher::types::record_id;
use bytes::Bytes;

pub const UID_SIZE: usize = 16;

/// Compression byte of a deflated metafile.
pub const COMPRESSION_DEFLATE: u8 = 0x00;
/// Compression byte of a metafile stored as-is.
pub const COMPRESSION_NONE: u8 = 0xFE;
/// Filter byte; no filter is defined.
pub const FILTER_NONE: u8 = 0xFE;

const BITMAP_TAG: u8 = 0xFF;
const METAFILE_FIXED_SIZE: usize = 34;

/// Instances that mark a single-UID blip of the given type.
fn blip_signatures(id: u16) -> &'static [u16] {
    match id {
        record_id::BLIP_EMF => &[0x3D4],
        record_id::BLIP_WMF => &[0x216],
        record_id::BLIP_PICT => &[0x542],
        record_id::BLIP_JPEG => &[0x46A, 0x6E2],
        record_id::BLIP_PNG => &[0x6E0],
        record_id::BLIP_DIB => &[0x7A8],
        record_id::BLIP_TIFF => &[0x6E4],
        _ => &[],
    }
}

/// A blip carries a second UID when its whole options word differs from the
/// signature only in the low instance bit; a nonzero version rules it out.
fn has_secondary_uid(header: &RecordHeader) -> bool {
    blip_signatures(header.record_id())
        .iter()
        .any(|signature| header.options() ^ (signature << 4) == 0x10)
}

fn default_instance(id: u16) -> u16 {
    blip_signatures(id).first().copied().unwrap_or(0)
}

/// Blip with no type-specific layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherBlipRecord {
    pub(crate) header: RecordHeader,
    picture_data: Bytes,
}

impl EscherBlipRecord {
    pub fn new(record_id: u16, picture_data: impl Into<Bytes>) -> Self {
        Self {
            header: RecordHeader::new(0x0000, record_id),
            picture_data: picture_data.into(),
        }
    }

    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            picture_data: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        self.picture_data = Bytes::copy_from_slice(body);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_slice(data, offset, &self.picture_data)?;
        Ok(self.picture_data.len())
    }

    #[inline]
    pub(crate) fn body_size(&self) -> usize {
        self.picture_data.len()
    }

    pub fn picture_data(&self) -> &[u8] {
        &self.picture_data
    }

    pub fn set_picture_data(&mut self, picture_data: impl Into<Bytes>) {
        self.picture_data = picture_data.into();
    }
}

/// JPEG, PNG, DIB and TIFF blips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherBitmapBlip {
    pub(crate) header: RecordHeader,
    uid: [u8; UID_SIZE],
    secondary_uid: Option<[u8; UID_SIZE]>,
    marker: u8,
    picture_data: Bytes,
}

impl EscherBitmapBlip {
    pub fn new(record_id: u16, uid: [u8; UID_SIZE], picture_data: impl Into<Bytes>) -> Self {
        Self {
            header: RecordHeader::new(default_instance(record_id) << 4, record_id),
            uid,
            secondary_uid: None,
            marker: BITMAP_TAG,
            picture_data: picture_data.into(),
        }
    }

    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            uid: [0; UID_SIZE],
            secondary_uid: None,
            marker: BITMAP_TAG,
            picture_data: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        let secondary = has_secondary_uid(&self.header);
        let fixed = UID_SIZE * if secondary { 2 } else { 1 } + 1;
        require(body, fixed, self.header.record_id(), offset)?;

        self.uid = read_array::<UID_SIZE>(body, 0)?;
        let mut pos = UID_SIZE;
        self.secondary_uid = if secondary {
            pos += UID_SIZE;
            Some(read_array::<UID_SIZE>(body, UID_SIZE)?)
        } else {
            None
        };
        self.marker = read_u8(body, pos)?;
        self.picture_data = Bytes::copy_from_slice(&body[pos + 1..]);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_slice(data, offset, &self.uid)?;
        let mut pos = offset + UID_SIZE;
        if let Some(uid) = &self.secondary_uid {
            write_slice(data, pos, uid)?;
            pos += UID_SIZE;
        }
        write_u8(data, pos, self.marker)?;
        write_slice(data, pos + 1, &self.picture_data)?;
        Ok(self.body_size())
    }

    pub(crate) fn body_size(&self) -> usize {
        UID_SIZE + self.secondary_uid.map_or(0, |_| UID_SIZE) + 1 + self.picture_data.len()
    }

    pub fn uid(&self) -> &[u8; UID_SIZE] {
        &self.uid
    }

    pub fn secondary_uid(&self) -> Option<&[u8; UID_SIZE]> {
        self.secondary_uid.as_ref()
    }

    pub fn marker(&self) -> u8 {
        self.marker
    }

    pub fn picture_data(&self) -> &[u8] {
        &self.picture_data
    }

    pub fn set_picture_data(&mut self, picture_data: impl Into<Bytes>) {
        self.picture_data = picture_data.into();
    }
}

/// EMF, WMF and PICT blips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherMetafileBlip {
    pub(crate) header: RecordHeader,
    uid: [u8; UID_SIZE],
    secondary_uid: Option<[u8; UID_SIZE]>,
    uncompressed_size: u32,
    bounds: [i32; 4],
    size_emu: (i32, i32),
    compression: u8,
    filter: u8,
    /// Picture bytes exactly as stored.
    raw_data: Bytes,
    /// Inflated picture, when the stored bytes are deflated and inflating succeeded.
    inflated: Option<Bytes>,
    remaining: Bytes,
}

impl EscherMetafileBlip {
    pub fn new(record_id: u16, uid: [u8; UID_SIZE]) -> Self {
        let mut blip = Self::with_header(RecordHeader::new(default_instance(record_id) << 4, record_id));
        blip.uid = uid;
        blip
    }

    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            uid: [0; UID_SIZE],
            secondary_uid: None,
            uncompressed_size: 0,
            bounds: [0; 4],
            size_emu: (0, 0),
            compression: COMPRESSION_NONE,
            filter: FILTER_NONE,
            raw_data: Bytes::new(),
            inflated: None,
            remaining: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize, decompress: bool) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        let secondary = has_secondary_uid(&self.header);
        let uids = UID_SIZE * if secondary { 2 } else { 1 };
        require(body, uids + METAFILE_FIXED_SIZE, self.header.record_id(), offset)?;

        self.uid = read_array::<UID_SIZE>(body, 0)?;
        self.secondary_uid = if secondary {
            Some(read_array::<UID_SIZE>(body, UID_SIZE)?)
        } else {
            None
        };

        let mut pos = uids;
        self.uncompressed_size = read_u32_le(body, pos)?;
        for (i, bound) in self.bounds.iter_mut().enumerate() {
            *bound = read_i32_le(body, pos + 4 + i * 4)?;
        }
        self.size_emu = (read_i32_le(body, pos + 20)?, read_i32_le(body, pos + 24)?);
        let stored_size = read_u32_le(body, pos + 28)? as usize;
        self.compression = read_u8(body, pos + 32)?;
        self.filter = read_u8(body, pos + 33)?;
        pos += METAFILE_FIXED_SIZE;

        require(body, pos + stored_size, self.header.record_id(), offset)?;
        self.raw_data = Bytes::copy_from_slice(&body[pos..pos + stored_size]);
        self.remaining = Bytes::copy_from_slice(&body[pos + stored_size..]);

        self.inflated = None;
        if decompress && self.compression == COMPRESSION_DEFLATE {
            match compression::decompress(&self.raw_data, self.uncompressed_size as usize) {
                Ok(inflated) => self.inflated = Some(Bytes::from(inflated)),
                Err(err) => tracing::warn!(
                    record_id = self.header.record_id(),
                    offset,
                    %err,
                    "keeping metafile blip data compressed"
                ),
            }
        }

        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_slice(data, offset, &self.uid)?;
        let mut pos = offset + UID_SIZE;
        if let Some(uid) = &self.secondary_uid {
            write_slice(data, pos, uid)?;
            pos += UID_SIZE;
        }
        write_u32_le(data, pos, self.uncompressed_size)?;
        for (i, bound) in self.bounds.iter().enumerate() {
            write_i32_le(data, pos + 4 + i * 4, *bound)?;
        }
        write_i32_le(data, pos + 20, self.size_emu.0)?;
        write_i32_le(data, pos + 24, self.size_emu.1)?;
        write_u32_le(data, pos + 28, self.raw_data.len() as u32)?;
        write_u8(data, pos + 32, self.compression)?;
        write_u8(data, pos + 33, self.filter)?;
        pos += METAFILE_FIXED_SIZE;
        write_slice(data, pos, &self.raw_data)?;
        write_slice(data, pos + self.raw_data.len(), &self.remaining)?;
        Ok(self.body_size())
    }

    pub(crate) fn body_size(&self) -> usize {
        UID_SIZE
            + self.secondary_uid.map_or(0, |_| UID_SIZE)
            + METAFILE_FIXED_SIZE
            + self.raw_data.len()
            + self.remaining.len()
    }

    pub fn uid(&self) -> &[u8; UID_SIZE] {
        &self.uid
    }

    pub fn secondary_uid(&self) -> Option<&[u8; UID_SIZE]> {
        self.secondary_uid.as_ref()
    }

    pub fn uncompressed_size(&self) -> u32 {
        self.uncompressed_size
    }

    /// `(left, top, right, bottom)` in the metafile's logical units.
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        let [left, top, right, bottom] = self.bounds;
        (left, top, right, bottom)
    }

    pub fn set_bounds(&mut self, left: i32, top: i32, right: i32, bottom: i32) {
        self.bounds = [left, top, right, bottom];
    }

    /// Rendered size in EMUs.
    pub fn size_emu(&self) -> (i32, i32) {
        self.size_emu
    }

    pub fn set_size_emu(&mut self, width: i32, height: i32) {
        self.size_emu = (width, height);
    }

    pub fn compression(&self) -> u8 {
        self.compression
    }

    pub fn filter(&self) -> u8 {
        self.filter
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.compression == COMPRESSION_DEFLATE
    }

    /// Stored bytes, compressed or not.
    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    /// Inflated picture when available, else the stored bytes.
    pub fn picture_data(&self) -> &[u8] {
        self.inflated.as_deref().unwrap_or(&self.raw_data)
    }

    /// Replace the picture, storing it deflated.
    pub fn set_picture_data(&mut self, picture: &[u8]) -> Result<()> {
        self.raw_data = Bytes::from(compression::compress(picture)?);
        self.inflated = Some(Bytes::copy_from_slice(picture));
        self.uncompressed_size = picture.len() as u32;
        self.compression = COMPRESSION_DEFLATE;
        self.filter = FILTER_NONE;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(options: u16, record_id: u16, body: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&options.to_le_bytes());
        data.extend_from_slice(&record_id.to_le_bytes());
        data.extend_from_slice(&(body.len() as u32).to_le_bytes());
        data.extend_from_slice(body);
        data
    }

    fn metafile_body(uid_count: usize, cb: u32, compression: u8, stored: &[u8]) -> Vec<u8> {
        let mut body = vec![0xAB; UID_SIZE * uid_count];
        body.extend_from_slice(&cb.to_le_bytes());
        for v in [0i32, 0, 100, 50] {
            body.extend_from_slice(&v.to_le_bytes());
        }
        for v in [914400i32, 457200] {
            body.extend_from_slice(&v.to_le_bytes());
        }
        body.extend_from_slice(&(stored.len() as u32).to_le_bytes());
        body.push(compression);
        body.push(FILTER_NONE);
        body.extend_from_slice(stored);
        body
    }

    #[test]
    fn test_png_blip() {
        let mut body = vec![0x11; UID_SIZE];
        body.push(0xFF);
        body.extend_from_slice(b"\x89PNG\r\n\x1a\n");
        let data = record(0x6E00, record_id::BLIP_PNG, &body);

        let mut blip = EscherBitmapBlip::with_header(RecordHeader::new(0x6E00, record_id::BLIP_PNG));
        assert_eq!(blip.fill(&data, 0).unwrap(), data.len());
        assert!(blip.secondary_uid().is_none());
        assert_eq!(blip.picture_data(), b"\x89PNG\r\n\x1a\n");

        let mut out = vec![0u8; blip.body_size()];
        blip.serialize_body(&mut out, 0).unwrap();
        assert_eq!(out, body);
    }

    #[test]
    fn test_jpeg_blip_with_secondary_uid() {
        let mut body = vec![0x11; UID_SIZE];
        body.extend_from_slice(&[0x22; UID_SIZE]);
        body.push(0xFF);
        body.extend_from_slice(&[0xFF, 0xD8, 0xFF]);
        let data = record(0x46B0, record_id::BLIP_JPEG, &body);

        let mut blip = EscherBitmapBlip::with_header(RecordHeader::new(0x46B0, record_id::BLIP_JPEG));
        blip.fill(&data, 0).unwrap();
        assert_eq!(blip.secondary_uid(), Some(&[0x22; UID_SIZE]));
        assert_eq!(blip.picture_data(), &[0xFF, 0xD8, 0xFF]);
        assert_eq!(blip.body_size(), body.len());
    }

    #[test]
    fn test_wmf_blip_inflates() {
        let picture = b"\xD7\xCD\xC6\x9A wmf records wmf records wmf records".to_vec();
        let packed = compression::compress(&picture).unwrap();
        let body = metafile_body(1, picture.len() as u32, COMPRESSION_DEFLATE, &packed);
        let data = record(0x2160, record_id::BLIP_WMF, &body);

        let mut blip = EscherMetafileBlip::with_header(RecordHeader::new(0x2160, record_id::BLIP_WMF));
        assert_eq!(blip.fill(&data, 0, true).unwrap(), data.len());
        assert!(blip.is_compressed());
        assert_eq!(blip.picture_data(), &picture[..]);
        assert_eq!(blip.raw_data(), &packed[..]);
        assert_eq!(blip.bounds(), (0, 0, 100, 50));
        assert_eq!(blip.size_emu(), (914400, 457200));

        let mut out = vec![0u8; blip.body_size()];
        blip.serialize_body(&mut out, 0).unwrap();
        assert_eq!(out, body);
    }

    #[test]
    fn test_emf_secondary_uid_and_no_inflate() {
        let body = metafile_body(2, 3, COMPRESSION_NONE, &[1, 2, 3]);
        let data = record(0x3D50, record_id::BLIP_EMF, &body);
        let mut blip = EscherMetafileBlip::with_header(RecordHeader::new(0x3D50, record_id::BLIP_EMF));
        blip.fill(&data, 0, false).unwrap();
        assert!(blip.secondary_uid().is_some());
        assert_eq!(blip.picture_data(), &[1, 2, 3]);
    }

    #[test]
    fn test_version_bits_rule_out_secondary_uid() {
        // Instance 0x3D5 is the EMF signature with the low bit set, but the
        // version nibble is 1.
        let body = metafile_body(1, 3, COMPRESSION_NONE, &[1, 2, 3]);
        let data = record(0x3D51, record_id::BLIP_EMF, &body);
        let mut blip = EscherMetafileBlip::with_header(RecordHeader::new(0x3D51, record_id::BLIP_EMF));
        assert_eq!(blip.fill(&data, 0, false).unwrap(), data.len());
        assert!(blip.secondary_uid().is_none());
        assert_eq!(blip.picture_data(), &[1, 2, 3]);

        let mut out = vec![0u8; blip.body_size()];
        blip.serialize_body(&mut out, 0).unwrap();
        assert_eq!(out, body);

        let jpeg = RecordHeader::new(0x46B1, record_id::BLIP_JPEG);
        assert!(!has_secondary_uid(&jpeg));
        assert!(has_secondary_uid(&RecordHeader::new(0x6E30, record_id::BLIP_JPEG)));
    }

    #[test]
    fn test_bad_deflate_keeps_raw() {
        let body = metafile_body(1, 10, COMPRESSION_DEFLATE, &[0x78, 0x9C, 0xFF, 0xFF]);
        let data = record(0x5420, record_id::BLIP_PICT, &body);
        let mut blip = EscherMetafileBlip::with_header(RecordHeader::new(0x5420, record_id::BLIP_PICT));
        blip.fill(&data, 0, true).unwrap();
        assert_eq!(blip.picture_data(), &[0x78, 0x9C, 0xFF, 0xFF]);
    }

    #[test]
    fn test_set_picture_data_compresses() {
        let mut blip = EscherMetafileBlip::new(record_id::BLIP_EMF, [7; UID_SIZE]);
        assert_eq!(blip.header.options(), 0x3D40);
        let picture = vec![0x42u8; 512];
        blip.set_picture_data(&picture).unwrap();
        assert_eq!(blip.uncompressed_size(), 512);
        assert!(blip.raw_data().len() < 512);
        assert_eq!(compression::decompress(blip.raw_data(), 512).unwrap(), picture);
    }
}
