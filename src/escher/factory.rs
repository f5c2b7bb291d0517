//! Record registry: picks the record kind for a header.
//!
//! Resolution order:
//! 1. Container bit (or a fixed container id), except the client textbox id
//! 2. Blip id range, split into bitmap, metafile and generic pictures
//! 3. The static leaf table
//! 4. [`EscherUnknownRecord`] for everything else

use super::container::EscherContainerRecord;
use super::header::{RecordHeader, read_header};
use super::record::EscherRecord;
use super::records::{
    EscherBitmapBlip, EscherBlipRecord, EscherBseRecord, EscherChildAnchorRecord, EscherClientAnchorRecord,
    EscherDgRecord, EscherDggRecord, EscherMetafileBlip, EscherOpaqueRecord, EscherOptRecord, EscherSpRecord,
    EscherSpgrRecord, EscherSplitMenuColorsRecord, EscherUnknownRecord,
};
use super::types::{EscherRecordType, is_blip_id, record_id};
use crate::common::error::Result;
use phf::phf_map;

/// Knobs that change how bytes are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Keep going with a warning when a container outruns the buffer.
    pub tolerate_truncation: bool,
    /// Inflate deflated metafile blips while decoding.
    pub decompress_blips: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            tolerate_truncation: true,
            decompress_blips: true,
        }
    }
}

impl DecodeOptions {
    pub const fn with_tolerate_truncation(mut self, tolerate: bool) -> Self {
        self.tolerate_truncation = tolerate;
        self
    }

    pub const fn with_decompress_blips(mut self, decompress: bool) -> Self {
        self.decompress_blips = decompress;
        self
    }
}

/// Produces empty record shells that the caller then fills.
pub trait EscherRecordFactory {
    /// Shell for the header at `offset`; only the header is read.
    fn create_record(&self, data: &[u8], offset: usize) -> Result<EscherRecord>;

    fn options(&self) -> DecodeOptions {
        DecodeOptions::default()
    }
}

type RecordConstructor = fn(RecordHeader) -> Result<EscherRecord>;

fn sp(header: RecordHeader) -> Result<EscherRecord> {
    Ok(EscherRecord::Sp(EscherSpRecord::with_header(header)))
}

fn spgr(header: RecordHeader) -> Result<EscherRecord> {
    Ok(EscherRecord::Spgr(EscherSpgrRecord::with_header(header)))
}

fn client_anchor(header: RecordHeader) -> Result<EscherRecord> {
    Ok(EscherRecord::ClientAnchor(EscherClientAnchorRecord::with_header(header)))
}

fn child_anchor(header: RecordHeader) -> Result<EscherRecord> {
    Ok(EscherRecord::ChildAnchor(EscherChildAnchorRecord::with_header(header)))
}

fn dg(header: RecordHeader) -> Result<EscherRecord> {
    Ok(EscherRecord::Dg(EscherDgRecord::with_header(header)))
}

fn dgg(header: RecordHeader) -> Result<EscherRecord> {
    Ok(EscherRecord::Dgg(EscherDggRecord::with_header(header)))
}

fn opt(header: RecordHeader) -> Result<EscherRecord> {
    Ok(EscherRecord::Opt(EscherOptRecord::with_header(header)))
}

fn bse(header: RecordHeader) -> Result<EscherRecord> {
    Ok(EscherRecord::Bse(EscherBseRecord::with_header(header)))
}

fn split_menu_colors(header: RecordHeader) -> Result<EscherRecord> {
    Ok(EscherRecord::SplitMenuColors(EscherSplitMenuColorsRecord::with_header(header)))
}

fn client_data(header: RecordHeader) -> Result<EscherRecord> {
    Ok(EscherRecord::ClientData(EscherOpaqueRecord::with_header(header)))
}

fn client_textbox(header: RecordHeader) -> Result<EscherRecord> {
    Ok(EscherRecord::ClientTextbox(EscherOpaqueRecord::with_header(header)))
}

static LEAF_CONSTRUCTORS: phf::Map<u16, RecordConstructor> = phf_map! {
    0xF00Au16 => sp,
    0xF009u16 => spgr,
    0xF010u16 => client_anchor,
    0xF00Fu16 => child_anchor,
    0xF008u16 => dg,
    0xF006u16 => dgg,
    0xF00Bu16 => opt,
    0xF122u16 => opt,
    0xF007u16 => bse,
    0xF11Eu16 => split_menu_colors,
    0xF011u16 => client_data,
    0xF00Du16 => client_textbox,
};

/// Whether `record_id` has a dedicated decoder.
pub fn is_registered(record_id: u16) -> bool {
    LEAF_CONSTRUCTORS.contains_key(&record_id)
}

/// The stock factory covering every record kind in this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEscherRecordFactory {
    options: DecodeOptions,
}

impl DefaultEscherRecordFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Shell for an already-read header.
    pub fn create_for_header(&self, header: RecordHeader) -> EscherRecord {
        let id = header.record_id();

        let is_container = header.is_container() || EscherRecordType::from(id).is_container();
        if is_container && id != record_id::CLIENT_TEXTBOX {
            return EscherRecord::Container(EscherContainerRecord::with_header(header));
        }

        if is_blip_id(id) {
            return match id {
                record_id::BLIP_JPEG | record_id::BLIP_PNG | record_id::BLIP_DIB | record_id::BLIP_TIFF => {
                    EscherRecord::BitmapBlip(EscherBitmapBlip::with_header(header))
                },
                record_id::BLIP_EMF | record_id::BLIP_WMF | record_id::BLIP_PICT => {
                    EscherRecord::MetafileBlip(EscherMetafileBlip::with_header(header))
                },
                _ => EscherRecord::Blip(EscherBlipRecord::with_header(header)),
            };
        }

        match LEAF_CONSTRUCTORS.get(&id) {
            Some(constructor) => construct_or_unknown(*constructor, header),
            None => EscherRecord::Unknown(EscherUnknownRecord::with_header(header)),
        }
    }
}

/// A constructor error keeps the record, opaque.
fn construct_or_unknown(constructor: RecordConstructor, header: RecordHeader) -> EscherRecord {
    match constructor(header) {
        Ok(record) => record,
        Err(err) => {
            tracing::debug!(record_id = header.record_id(), %err, "constructor failed, keeping record opaque");
            EscherRecord::Unknown(EscherUnknownRecord::with_header(header))
        },
    }
}

impl EscherRecordFactory for DefaultEscherRecordFactory {
    fn create_record(&self, data: &[u8], offset: usize) -> Result<EscherRecord> {
        let (options, id, _) = read_header(data, offset)?;
        Ok(self.create_for_header(RecordHeader::new(options, id)))
    }

    fn options(&self) -> DecodeOptions {
        self.options
    }
}
