//! Container records: a header followed by a sequence of child records.
//!
//! Containers are recognised by version 0xF in the options field. The
//! declared length covers all children. When the buffer ends before that
//! budget is spent, the shortfall is kept as a remaining-length correction
//! so size calculations and re-serialization account for it.

use super::factory::EscherRecordFactory;
use super::header::{CONTAINER_VERSION, HEADER_SIZE, RecordHeader, read_header};
use super::listener::EscherSerializationListener;
use super::record::EscherRecord;
use super::types::record_name;
use crate::common::error::{Error, Result};

/// Children decoded from a container body.
pub(crate) struct FilledChildren {
    pub children: Vec<EscherRecord>,
    pub remaining_length: u32,
    pub consumed: usize,
}

/// Decode the children of the container whose header sits at `offset`.
///
/// Stops when the declared byte budget is spent or the buffer ends. A short
/// buffer is a warning, or [`Error::RecordTooShort`] when the factory's
/// options do not tolerate truncation.
pub(crate) fn fill_children(
    data: &[u8],
    offset: usize,
    factory: &dyn EscherRecordFactory,
) -> Result<FilledChildren> {
    let (_, record_id, declared) = read_header(data, offset)?;
    let mut bytes_remaining = declared as i64;
    let mut pos = offset + HEADER_SIZE;
    let mut children = Vec::new();

    while bytes_remaining > 0 && pos < data.len() {
        // A partial header cannot start another child.
        if data.len() - pos < HEADER_SIZE {
            break;
        }
        let mut child = factory.create_record(data, pos)?;
        let consumed = child.fill(data, pos, factory)?;
        pos += consumed;
        bytes_remaining -= consumed as i64;
        children.push(child);
    }

    let mut remaining_length = 0;
    if bytes_remaining > 0 {
        let available = data.len().saturating_sub(offset + HEADER_SIZE);
        if !factory.options().tolerate_truncation {
            return Err(Error::RecordTooShort {
                record_id,
                offset,
                needed: declared as usize,
                available,
            });
        }
        tracing::warn!(
            record_id,
            record = record_name(record_id),
            offset,
            declared,
            missing = bytes_remaining,
            "container runs past the end of the buffer"
        );
        remaining_length = bytes_remaining as u32;
    }

    Ok(FilledChildren {
        children,
        remaining_length,
        consumed: pos - offset,
    })
}

/// Write `children` after a container header and pad any truncation shortfall.
pub(crate) fn serialize_children(
    header: &RecordHeader,
    children: &[EscherRecord],
    remaining_length: u32,
    offset: usize,
    data: &mut [u8],
    listener: &mut dyn EscherSerializationListener,
) -> Result<usize> {
    let body_size: usize =
        children.iter().map(EscherRecord::record_size).sum::<usize>() + remaining_length as usize;
    header.write(data, offset, body_size as u32)?;

    let mut pos = offset + HEADER_SIZE;
    for child in children {
        pos += child.serialize(pos, data, listener)?;
    }

    let pad = remaining_length as usize;
    let available = data.len().saturating_sub(pos);
    match data.get_mut(pos..pos + pad) {
        Some(slot) => slot.fill(0),
        None => {
            return Err(Error::BufferTooSmall {
                offset: pos,
                needed: pad,
                available,
            });
        },
    }
    Ok(pos + pad - offset)
}

#[derive(Debug, Clone, PartialEq)]
pub struct EscherContainerRecord {
    pub(crate) header: RecordHeader,
    children: Vec<EscherRecord>,
    remaining_length: u32,
}

impl EscherContainerRecord {
    /// Empty container with the given record id.
    pub fn new(record_id: u16) -> Self {
        Self::with_header(RecordHeader::new(CONTAINER_VERSION as u16, record_id))
    }

    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            children: Vec::new(),
            remaining_length: 0,
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize, factory: &dyn EscherRecordFactory) -> Result<usize> {
        let filled = fill_children(data, offset, factory)?;
        self.children = filled.children;
        self.remaining_length = filled.remaining_length;
        Ok(filled.consumed)
    }

    pub(crate) fn serialize_body(
        &self,
        offset: usize,
        data: &mut [u8],
        listener: &mut dyn EscherSerializationListener,
    ) -> Result<usize> {
        serialize_children(&self.header, &self.children, self.remaining_length, offset, data, listener)
    }

    /// Header plus children plus the truncation correction.
    pub fn record_size(&self) -> usize {
        HEADER_SIZE
            + self.children.iter().map(EscherRecord::record_size).sum::<usize>()
            + self.remaining_length as usize
    }

    /// Bytes the declared length promised but the input did not contain.
    #[inline]
    pub fn remaining_length(&self) -> u32 {
        self.remaining_length
    }

    pub fn children(&self) -> &[EscherRecord] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [EscherRecord] {
        &mut self.children
    }

    pub fn set_children(&mut self, children: Vec<EscherRecord>) {
        self.children = children;
    }

    pub fn add_child(&mut self, record: EscherRecord) {
        self.children.push(record);
    }

    /// Insert `record` before the first child with id `before_id`, or at the end.
    pub fn add_child_before(&mut self, record: EscherRecord, before_id: u16) {
        match self.children.iter().position(|c| c.record_id() == before_id) {
            Some(index) => self.children.insert(index, record),
            None => self.children.push(record),
        }
    }

    pub fn remove_child(&mut self, index: usize) -> Option<EscherRecord> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// Remove every direct child with the given id; returns how many went.
    pub fn remove_children_of_type(&mut self, record_id: u16) -> usize {
        let before = self.children.len();
        self.children.retain(|c| c.record_id() != record_id);
        before - self.children.len()
    }

    /// First direct child with the given id.
    pub fn child_by_id(&self, record_id: u16) -> Option<&EscherRecord> {
        self.children.iter().find(|c| c.record_id() == record_id)
    }

    pub fn child_by_id_mut(&mut self, record_id: u16) -> Option<&mut EscherRecord> {
        self.children.iter_mut().find(|c| c.record_id() == record_id)
    }

    pub fn children_of_type(&self, record_id: u16) -> impl Iterator<Item = &EscherRecord> {
        self.children.iter().filter(move |c| c.record_id() == record_id)
    }

    /// Direct children that are containers.
    pub fn child_containers(&self) -> impl Iterator<Item = &EscherContainerRecord> {
        self.children.iter().filter_map(EscherRecord::as_container)
    }

    /// All descendants with the given id, depth first.
    pub fn find_records(&self, record_id: u16) -> Vec<&EscherRecord> {
        let mut found = Vec::new();
        collect_records(&self.children, record_id, &mut found);
        found
    }
}

fn collect_records<'a>(children: &'a [EscherRecord], record_id: u16, found: &mut Vec<&'a EscherRecord>) {
    for child in children {
        if child.record_id() == record_id {
            found.push(child);
        }
        collect_records(child.child_records(), record_id, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escher::factory::{DecodeOptions, DefaultEscherRecordFactory};
    use crate::escher::listener::NullListener;
    use crate::escher::records::{EscherSpRecord, ShapeFlags};
    use crate::escher::types::record_id;

    fn sp_container(declared: u32) -> Vec<u8> {
        let mut data = vec![0x0F, 0x00, 0x04, 0xF0];
        data.extend_from_slice(&declared.to_le_bytes());
        data.extend_from_slice(&[0x02, 0x00, 0x0A, 0xF0, 0x08, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&1001u32.to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes());
        data
    }

    #[test]
    fn test_truncated_container_keeps_shortfall() {
        let data = sp_container(40);
        let factory = DefaultEscherRecordFactory::default();
        let mut container = EscherContainerRecord::new(record_id::SP_CONTAINER);
        assert_eq!(container.fill(&data, 0, &factory).unwrap(), 24);
        assert_eq!(container.children().len(), 1);
        assert_eq!(container.remaining_length(), 24);
        assert_eq!(container.record_size(), 8 + 16 + 24);

        let mut out = vec![0xEEu8; container.record_size()];
        let written = container.serialize_body(0, &mut out, &mut NullListener).unwrap();
        assert_eq!(written, container.record_size());
        assert_eq!(&out[..24], &data[..]);
        assert!(out[24..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_strict_truncation_is_an_error() {
        let data = sp_container(40);
        let factory = DefaultEscherRecordFactory::with_options(DecodeOptions {
            tolerate_truncation: false,
            ..DecodeOptions::default()
        });
        let mut container = EscherContainerRecord::new(record_id::SP_CONTAINER);
        assert!(matches!(
            container.fill(&data, 0, &factory),
            Err(Error::RecordTooShort { record_id: 0xF004, .. })
        ));
    }

    #[test]
    fn test_child_editing() {
        let mut container = EscherContainerRecord::new(record_id::SP_CONTAINER);
        container.add_child(EscherRecord::Sp(EscherSpRecord::new(1, 1025, ShapeFlags::HAVE_SPT)));
        container.add_child_before(
            EscherRecord::Container(EscherContainerRecord::new(record_id::SPGR_CONTAINER)),
            record_id::SP,
        );
        assert_eq!(container.children()[0].record_id(), record_id::SPGR_CONTAINER);
        assert_eq!(container.child_containers().count(), 1);
        assert!(container.child_by_id(record_id::SP).is_some());
        assert_eq!(container.remove_children_of_type(record_id::SP), 1);
        assert!(container.remove_child(5).is_none());
        assert_eq!(container.record_size(), 16);
    }
}
