//! The closed set of Escher record kinds.

use super::container::EscherContainerRecord;
use super::factory::EscherRecordFactory;
use super::header::{HEADER_SIZE, RecordHeader};
use super::listener::{EscherSerializationListener, NullListener};
use super::records::{
    EscherBitmapBlip, EscherBlipRecord, EscherBseRecord, EscherChildAnchorRecord, EscherClientAnchorRecord,
    EscherDgRecord, EscherDggRecord, EscherMetafileBlip, EscherOpaqueRecord, EscherOptRecord, EscherSpRecord,
    EscherSpgrRecord, EscherSplitMenuColorsRecord, EscherUnknownRecord,
};
use super::types::record_name;
use crate::common::error::Result;

/// A decoded Escher record.
#[derive(Debug, Clone, PartialEq)]
pub enum EscherRecord {
    Container(EscherContainerRecord),
    Sp(EscherSpRecord),
    Spgr(EscherSpgrRecord),
    ClientAnchor(EscherClientAnchorRecord),
    ChildAnchor(EscherChildAnchorRecord),
    Dg(EscherDgRecord),
    Dgg(EscherDggRecord),
    /// `Opt` or `TertiaryOpt`
    Opt(EscherOptRecord),
    Bse(EscherBseRecord),
    SplitMenuColors(EscherSplitMenuColorsRecord),
    ClientData(EscherOpaqueRecord),
    ClientTextbox(EscherOpaqueRecord),
    Blip(EscherBlipRecord),
    BitmapBlip(EscherBitmapBlip),
    MetafileBlip(EscherMetafileBlip),
    Unknown(EscherUnknownRecord),
}

macro_rules! each_record {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            EscherRecord::Container($r) => $body,
            EscherRecord::Sp($r) => $body,
            EscherRecord::Spgr($r) => $body,
            EscherRecord::ClientAnchor($r) => $body,
            EscherRecord::ChildAnchor($r) => $body,
            EscherRecord::Dg($r) => $body,
            EscherRecord::Dgg($r) => $body,
            EscherRecord::Opt($r) => $body,
            EscherRecord::Bse($r) => $body,
            EscherRecord::SplitMenuColors($r) => $body,
            EscherRecord::ClientData($r) | EscherRecord::ClientTextbox($r) => $body,
            EscherRecord::Blip($r) => $body,
            EscherRecord::BitmapBlip($r) => $body,
            EscherRecord::MetafileBlip($r) => $body,
            EscherRecord::Unknown($r) => $body,
        }
    };
}

impl EscherRecord {
    #[inline]
    pub fn header(&self) -> &RecordHeader {
        each_record!(self, r => &r.header)
    }

    #[inline]
    pub fn header_mut(&mut self) -> &mut RecordHeader {
        each_record!(self, r => &mut r.header)
    }

    #[inline]
    pub fn record_id(&self) -> u16 {
        self.header().record_id()
    }

    #[inline]
    pub fn options(&self) -> u16 {
        self.header().options()
    }

    #[inline]
    pub fn version(&self) -> u8 {
        self.header().version()
    }

    #[inline]
    pub fn instance(&self) -> u16 {
        self.header().instance()
    }

    /// Whether the version nibble marks this record as a container.
    #[inline]
    pub fn is_container_record(&self) -> bool {
        self.header().is_container()
    }

    pub fn record_name(&self) -> &'static str {
        record_name(self.record_id())
    }

    /// Decode this record's body from the header at `offset`.
    ///
    /// Returns the bytes consumed, header included.
    pub fn fill(&mut self, data: &[u8], offset: usize, factory: &dyn EscherRecordFactory) -> Result<usize> {
        match self {
            Self::Container(r) => r.fill(data, offset, factory),
            Self::Sp(r) => r.fill(data, offset),
            Self::Spgr(r) => r.fill(data, offset),
            Self::ClientAnchor(r) => r.fill(data, offset),
            Self::ChildAnchor(r) => r.fill(data, offset),
            Self::Dg(r) => r.fill(data, offset),
            Self::Dgg(r) => r.fill(data, offset),
            Self::Opt(r) => r.fill(data, offset),
            Self::Bse(r) => r.fill(data, offset, factory),
            Self::SplitMenuColors(r) => r.fill(data, offset),
            Self::ClientData(r) | Self::ClientTextbox(r) => r.fill(data, offset),
            Self::Blip(r) => r.fill(data, offset),
            Self::BitmapBlip(r) => r.fill(data, offset),
            Self::MetafileBlip(r) => r.fill(data, offset, factory.options().decompress_blips),
            Self::Unknown(r) => r.fill(data, offset, factory),
        }
    }

    /// Write the record at `offset`, notifying `listener` around it.
    ///
    /// Returns the bytes written, which always equals [`Self::record_size`].
    pub fn serialize(
        &self,
        offset: usize,
        data: &mut [u8],
        listener: &mut dyn EscherSerializationListener,
    ) -> Result<usize> {
        let record_id = self.record_id();
        listener.before_record_serialize(offset, record_id, self);

        let written = match self {
            Self::Container(r) => r.serialize_body(offset, data, listener)?,
            Self::Unknown(r) if r.is_container_record() => r.serialize_children(offset, data, listener)?,
            Self::Sp(r) => write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?,
            Self::Spgr(r) => write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?,
            Self::ClientAnchor(r) => {
                write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?
            },
            Self::ChildAnchor(r) => {
                write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?
            },
            Self::Dg(r) => write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?,
            Self::Dgg(r) => write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?,
            Self::Opt(r) => write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?,
            Self::Bse(r) => write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?,
            Self::SplitMenuColors(r) => {
                write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?
            },
            Self::ClientData(r) | Self::ClientTextbox(r) => {
                write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?
            },
            Self::Blip(r) => write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?,
            Self::BitmapBlip(r) => {
                write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?
            },
            Self::MetafileBlip(r) => {
                write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?
            },
            Self::Unknown(r) => write_leaf(&r.header, r.body_size(), offset, data, |d, o| r.serialize_body(d, o))?,
        };

        listener.after_record_serialize(offset + written, record_id, written, self);
        Ok(written)
    }

    /// Encoded size including the header.
    pub fn record_size(&self) -> usize {
        match self {
            Self::Container(r) => r.record_size(),
            Self::Unknown(r) => r.record_size(),
            Self::Sp(r) => HEADER_SIZE + r.body_size(),
            Self::Spgr(r) => HEADER_SIZE + r.body_size(),
            Self::ClientAnchor(r) => HEADER_SIZE + r.body_size(),
            Self::ChildAnchor(r) => HEADER_SIZE + r.body_size(),
            Self::Dg(r) => HEADER_SIZE + r.body_size(),
            Self::Dgg(r) => HEADER_SIZE + r.body_size(),
            Self::Opt(r) => HEADER_SIZE + r.body_size(),
            Self::Bse(r) => HEADER_SIZE + r.body_size(),
            Self::SplitMenuColors(r) => HEADER_SIZE + r.body_size(),
            Self::ClientData(r) | Self::ClientTextbox(r) => HEADER_SIZE + r.body_size(),
            Self::Blip(r) => HEADER_SIZE + r.body_size(),
            Self::BitmapBlip(r) => HEADER_SIZE + r.body_size(),
            Self::MetafileBlip(r) => HEADER_SIZE + r.body_size(),
        }
    }

    /// Direct children; empty for leaves.
    pub fn child_records(&self) -> &[EscherRecord] {
        match self {
            Self::Container(r) => r.children(),
            Self::Unknown(r) => r.children(),
            _ => &[],
        }
    }

    pub fn as_container(&self) -> Option<&EscherContainerRecord> {
        match self {
            Self::Container(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut EscherContainerRecord> {
        match self {
            Self::Container(r) => Some(r),
            _ => None,
        }
    }

    /// Encode this record into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut data = vec![0u8; self.record_size()];
        self.serialize(0, &mut data, &mut NullListener)?;
        Ok(data)
    }
}

/// Write a leaf header sized for `body_size`, then its body.
fn write_leaf(
    header: &RecordHeader,
    body_size: usize,
    offset: usize,
    data: &mut [u8],
    write_body: impl FnOnce(&mut [u8], usize) -> Result<usize>,
) -> Result<usize> {
    header.write(data, offset, body_size as u32)?;
    let written = write_body(data, offset + HEADER_SIZE)?;
    Ok(HEADER_SIZE + written)
}
