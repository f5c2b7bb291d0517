//! Escher record header codec.
//!
//! # Format
//!
//! Every Escher record starts with an 8-byte little-endian header:
//! - Bytes 0-1: options (version in the low 4 bits, instance in the upper 12)
//! - Bytes 2-3: record type id
//! - Bytes 4-7: body length, excluding the header itself

use crate::common::binary::read_slice;
use crate::common::error::{Error, Result};
use zerocopy::{FromBytes, IntoBytes};
use zerocopy_derive::*;

/// Size of the record header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Version nibble that marks a record as a container of other records.
pub const CONTAINER_VERSION: u8 = 0x0F;

/// Escher record header (8 bytes) - zerocopy compatible
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct EscherRecordHeader {
    pub options: u16,
    pub record_id: u16,
    pub length: u32,
}

impl EscherRecordHeader {
    pub const fn new(options: u16, record_id: u16, length: u32) -> Self {
        Self {
            options: options.to_le(),
            record_id: record_id.to_le(),
            length: length.to_le(),
        }
    }

    /// Read a header from `data` at `offset`.
    pub fn read(data: &[u8], offset: usize) -> Result<Self> {
        let bytes = read_slice(data, offset, HEADER_SIZE)?;
        Self::read_from_bytes(bytes).map_err(|_| Error::InsufficientData {
            offset,
            needed: HEADER_SIZE,
            available: data.len().saturating_sub(offset),
        })
    }

    /// Write this header into `data` at `offset`.
    pub fn write(&self, data: &mut [u8], offset: usize) -> Result<()> {
        if offset.checked_add(HEADER_SIZE).is_none_or(|end| end > data.len()) {
            return Err(Error::BufferTooSmall {
                offset,
                needed: HEADER_SIZE,
                available: data.len().saturating_sub(offset),
            });
        }
        data[offset..offset + HEADER_SIZE].copy_from_slice(self.as_bytes());
        Ok(())
    }

    #[inline]
    pub const fn options(&self) -> u16 {
        u16::from_le(self.options)
    }

    #[inline]
    pub const fn record_id(&self) -> u16 {
        u16::from_le(self.record_id)
    }

    #[inline]
    pub const fn length(&self) -> u32 {
        u32::from_le(self.length)
    }

    #[inline]
    pub const fn version(&self) -> u8 {
        version_of(self.options())
    }

    #[inline]
    pub const fn instance(&self) -> u16 {
        instance_of(self.options())
    }
}

/// Pack a version nibble and a 12-bit instance into an options word.
#[inline]
pub const fn pack_options(version: u8, instance: u16) -> u16 {
    (version as u16 & 0x000F) | ((instance & 0x0FFF) << 4)
}

#[inline]
pub const fn version_of(options: u16) -> u8 {
    (options & 0x000F) as u8
}

#[inline]
pub const fn instance_of(options: u16) -> u16 {
    (options >> 4) & 0x0FFF
}

/// Read the `(options, record_id, declared_length)` triple at `offset`.
pub fn read_header(data: &[u8], offset: usize) -> Result<(u16, u16, u32)> {
    let header = EscherRecordHeader::read(data, offset)?;
    Ok((header.options(), header.record_id(), header.length()))
}

/// Write an 8-byte header at `offset`.
pub fn write_header(
    data: &mut [u8],
    offset: usize,
    options: u16,
    record_id: u16,
    length: u32,
) -> Result<()> {
    EscherRecordHeader::new(options, record_id, length).write(data, offset)
}

/// The options/record-id pair every record carries.
///
/// Options is the single source of truth; version and instance are
/// projections of it, so they can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordHeader {
    options: u16,
    record_id: u16,
}

impl RecordHeader {
    #[inline]
    pub const fn new(options: u16, record_id: u16) -> Self {
        Self { options, record_id }
    }

    #[inline]
    pub const fn options(&self) -> u16 {
        self.options
    }

    #[inline]
    pub fn set_options(&mut self, options: u16) {
        self.options = options;
    }

    #[inline]
    pub const fn record_id(&self) -> u16 {
        self.record_id
    }

    #[inline]
    pub fn set_record_id(&mut self, record_id: u16) {
        self.record_id = record_id;
    }

    #[inline]
    pub const fn version(&self) -> u8 {
        version_of(self.options)
    }

    pub fn set_version(&mut self, version: u8) {
        self.options = pack_options(version, self.instance());
    }

    #[inline]
    pub const fn instance(&self) -> u16 {
        instance_of(self.options)
    }

    pub fn set_instance(&mut self, instance: u16) {
        self.options = pack_options(self.version(), instance);
    }

    /// Container bit: version nibble is 0xF.
    #[inline]
    pub const fn is_container(&self) -> bool {
        self.version() == CONTAINER_VERSION
    }

    /// Write the header with the given body length.
    #[inline]
    pub fn write(&self, data: &mut [u8], offset: usize, length: u32) -> Result<()> {
        write_header(data, offset, self.options, self.record_id, length)
    }
}
