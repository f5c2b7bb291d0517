//! Whole-buffer Escher decoding and encoding.
//!
//! # Architecture
//!
//! - Top-level records are decoded back to back until the buffer ends
//! - Each record is shelled by the factory, then filled in place
//! - Encoding sizes the output up front and writes every record once

use super::container::EscherContainerRecord;
use super::factory::{DecodeOptions, DefaultEscherRecordFactory, EscherRecordFactory};
use super::header::HEADER_SIZE;
use super::listener::{EscherSerializationListener, NullListener};
use super::record::EscherRecord;
use super::types::record_id;
use crate::common::error::Result;

/// Escher parser over one drawing stream.
pub struct EscherParser<'data, F: EscherRecordFactory = DefaultEscherRecordFactory> {
    data: &'data [u8],
    factory: F,
}

impl<'data> EscherParser<'data> {
    /// Parser using the default factory and options.
    #[inline]
    pub fn new(data: &'data [u8]) -> Self {
        Self::with_factory(data, DefaultEscherRecordFactory::default())
    }

    /// Parser using the default factory with custom options.
    pub fn with_options(data: &'data [u8], options: DecodeOptions) -> Self {
        Self::with_factory(data, DefaultEscherRecordFactory::with_options(options))
    }
}

impl<'data, F: EscherRecordFactory> EscherParser<'data, F> {
    pub fn with_factory(data: &'data [u8], factory: F) -> Self {
        Self { data, factory }
    }

    /// Decode the record at `offset`; returns it with the bytes consumed.
    pub fn parse_record(&self, offset: usize) -> Result<(EscherRecord, usize)> {
        let mut record = self.factory.create_record(self.data, offset)?;
        let consumed = record.fill(self.data, offset, &self.factory)?;
        Ok((record, consumed))
    }

    /// Decode every top-level record.
    ///
    /// Fewer than eight trailing bytes cannot hold a header and are ignored.
    pub fn parse_all(&self) -> Result<Vec<EscherRecord>> {
        let mut records = Vec::new();
        let mut offset = 0;
        while self.data.len() - offset >= HEADER_SIZE {
            let (record, consumed) = self.parse_record(offset)?;
            records.push(record);
            offset += consumed;
        }
        if offset < self.data.len() {
            tracing::debug!(trailing = self.data.len() - offset, "ignoring bytes after the last record");
        }
        Ok(records)
    }

    /// The first record, when it is a container.
    pub fn root_container(&self) -> Result<Option<EscherContainerRecord>> {
        if self.data.len() < HEADER_SIZE {
            return Ok(None);
        }
        let (record, _) = self.parse_record(0)?;
        Ok(match record {
            EscherRecord::Container(container) => Some(container),
            _ => None,
        })
    }

    /// Every shape container below the root, depth first.
    pub fn find_all_shapes(&self) -> Result<Vec<EscherRecord>> {
        self.find_in_root(record_id::SP_CONTAINER)
    }

    /// Every client textbox below the root, depth first.
    pub fn find_all_textboxes(&self) -> Result<Vec<EscherRecord>> {
        self.find_in_root(record_id::CLIENT_TEXTBOX)
    }

    fn find_in_root(&self, id: u16) -> Result<Vec<EscherRecord>> {
        Ok(match self.root_container()? {
            Some(root) => root.find_records(id).into_iter().cloned().collect(),
            None => Vec::new(),
        })
    }
}

/// Decode a whole buffer with the default factory.
pub fn decode_records(data: &[u8]) -> Result<Vec<EscherRecord>> {
    EscherParser::new(data).parse_all()
}

/// Total encoded size of `records`.
pub fn records_size(records: &[EscherRecord]) -> usize {
    records.iter().map(EscherRecord::record_size).sum()
}

/// Write `records` back to back at `offset`.
pub fn serialize_records(
    records: &[EscherRecord],
    offset: usize,
    data: &mut [u8],
    listener: &mut dyn EscherSerializationListener,
) -> Result<usize> {
    let mut pos = offset;
    for record in records {
        pos += record.serialize(pos, data, listener)?;
    }
    Ok(pos - offset)
}

/// Encode `records` into a fresh buffer.
pub fn encode_records(records: &[EscherRecord]) -> Result<Vec<u8>> {
    let mut data = vec![0u8; records_size(records)];
    serialize_records(records, 0, &mut data, &mut NullListener)?;
    Ok(data)
}
