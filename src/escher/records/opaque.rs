//! Records whose body is carried as raw bytes.
//!
//! `ClientData` and `ClientTextbox` hold host-application records that the
//! drawing layer does not interpret. Ids with no registered decoder end up
//! in [`EscherUnknownRecord`].

use super::record_body;
use crate::common::binary::write_slice;
use crate::common::error::Result;
use crate::escher::container::{fill_children, serialize_children};
use crate::escher::factory::EscherRecordFactory;
use crate::escher::header::{HEADER_SIZE, RecordHeader};
use crate::escher::listener::EscherSerializationListener;
use crate::escher::record::EscherRecord;
use bytes::Bytes;

/// Host payload record (`ClientData` 0xF011, `ClientTextbox` 0xF00D).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherOpaqueRecord {
    pub(crate) header: RecordHeader,
    data: Bytes,
}

impl EscherOpaqueRecord {
    pub fn new(record_id: u16, data: impl Into<Bytes>) -> Self {
        Self {
            header: RecordHeader::new(0x0000, record_id),
            data: data.into(),
        }
    }

    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            data: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        self.data = Bytes::copy_from_slice(body);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_slice(data, offset, &self.data)?;
        Ok(self.data.len())
    }

    #[inline]
    pub(crate) fn body_size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn set_data(&mut self, data: impl Into<Bytes>) {
        self.data = data.into();
    }
}

/// Record with an unregistered id, kept byte for byte.
///
/// When the container bit is set the body is decoded as child records
/// instead, so unknown containers still expose their contents.
#[derive(Debug, Clone, PartialEq)]
pub struct EscherUnknownRecord {
    pub(crate) header: RecordHeader,
    data: Bytes,
    children: Vec<EscherRecord>,
    remaining_length: u32,
}

impl EscherUnknownRecord {
    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            data: Bytes::new(),
            children: Vec::new(),
            remaining_length: 0,
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize, factory: &dyn EscherRecordFactory) -> Result<usize> {
        if self.header.is_container() {
            let filled = fill_children(data, offset, factory)?;
            self.children = filled.children;
            self.remaining_length = filled.remaining_length;
            return Ok(filled.consumed);
        }
        let body = record_body(data, offset, self.header.record_id())?;
        self.data = Bytes::copy_from_slice(body);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_slice(data, offset, &self.data)?;
        Ok(self.data.len())
    }

    pub(crate) fn serialize_children(
        &self,
        offset: usize,
        data: &mut [u8],
        listener: &mut dyn EscherSerializationListener,
    ) -> Result<usize> {
        serialize_children(&self.header, &self.children, self.remaining_length, offset, data, listener)
    }

    #[inline]
    pub(crate) fn body_size(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn record_size(&self) -> usize {
        if self.header.is_container() {
            HEADER_SIZE
                + self.children.iter().map(EscherRecord::record_size).sum::<usize>()
                + self.remaining_length as usize
        } else {
            HEADER_SIZE + self.data.len()
        }
    }

    #[inline]
    pub fn is_container_record(&self) -> bool {
        self.header.is_container()
    }

    /// Raw body; empty when decoded as a container.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn children(&self) -> &[EscherRecord] {
        &self.children
    }

    pub fn remaining_length(&self) -> u32 {
        self.remaining_length
    }
}
