//! BIFF chart records.
//!
//! Each record is a 4-byte header (record type and body length, both u16
//! little-endian) followed by the body. The grammar layer only inspects the
//! record type and a handful of body fields; bodies are otherwise opaque.

use crate::common::binary::{read_u16_le, read_slice};
use crate::common::error::{Error, Result};
use bytes::Bytes;

/// BIFF record header size.
pub const BIFF_HEADER_SIZE: usize = 4;

/// Record type ids used by the chart sheet grammar.
pub mod sid {
    pub const FONT: u16 = 0x0031;
    pub const CONTINUE: u16 = 0x003C;
    pub const SCL: u16 = 0x00A0;

    pub const START_BLOCK: u16 = 0x0852;
    pub const END_BLOCK: u16 = 0x0853;
    pub const START_OBJECT: u16 = 0x0854;
    pub const END_OBJECT: u16 = 0x0855;
    pub const CAT_LAB: u16 = 0x0856;
    pub const Y_MULT: u16 = 0x0857;
    pub const FRT_FONT_LIST: u16 = 0x085A;
    pub const DATA_LAB_EXT: u16 = 0x086A;
    pub const DATA_LAB_EXT_CONTENTS: u16 = 0x086B;
    pub const CONTINUE_FRT12: u16 = 0x087F;
    pub const CRT_LAYOUT12: u16 = 0x089D;
    pub const CRT_ML_FRT: u16 = 0x089E;
    pub const CRT_ML_FRT_CONTINUE: u16 = 0x089F;
    pub const SHAPE_PROPS_STREAM: u16 = 0x08A4;
    pub const TEXT_PROPS_STREAM: u16 = 0x08A5;
    pub const RICH_TEXT_STREAM: u16 = 0x08A6;
    pub const CRT_LAYOUT12A: u16 = 0x08A7;

    pub const CHART: u16 = 0x1002;
    pub const SERIES: u16 = 0x1003;
    pub const DATA_FORMAT: u16 = 0x1006;
    pub const LINE_FORMAT: u16 = 0x1007;
    pub const MARKER_FORMAT: u16 = 0x1009;
    pub const AREA_FORMAT: u16 = 0x100A;
    pub const PIE_FORMAT: u16 = 0x100B;
    pub const ATTACHED_LABEL: u16 = 0x100C;
    pub const SERIES_TEXT: u16 = 0x100D;
    pub const CHART_FORMAT: u16 = 0x1014;
    pub const LEGEND: u16 = 0x1015;
    pub const SERIES_LIST: u16 = 0x1016;
    pub const BAR: u16 = 0x1017;
    pub const LINE: u16 = 0x1018;
    pub const PIE: u16 = 0x1019;
    pub const AREA: u16 = 0x101A;
    pub const SCATTER: u16 = 0x101B;
    pub const CRT_LINE: u16 = 0x101C;
    pub const AXIS: u16 = 0x101D;
    pub const TICK: u16 = 0x101E;
    pub const VALUE_RANGE: u16 = 0x101F;
    pub const CAT_SER_RANGE: u16 = 0x1020;
    pub const AXIS_LINE: u16 = 0x1021;
    pub const CRT_LINK: u16 = 0x1022;
    pub const DEFAULT_TEXT: u16 = 0x1024;
    pub const TEXT: u16 = 0x1025;
    pub const FONT_X: u16 = 0x1026;
    pub const OBJECT_LINK: u16 = 0x1027;
    pub const FRAME: u16 = 0x1032;
    pub const BEGIN: u16 = 0x1033;
    pub const END: u16 = 0x1034;
    pub const PLOT_AREA: u16 = 0x1035;
    pub const CHART_3D: u16 = 0x103A;
    pub const PIC_F: u16 = 0x103C;
    pub const DROP_BAR: u16 = 0x103D;
    pub const RADAR: u16 = 0x103E;
    pub const SURF: u16 = 0x103F;
    pub const RADAR_AREA: u16 = 0x1040;
    pub const AXIS_PARENT: u16 = 0x1041;
    pub const LEGEND_EXCEPTION: u16 = 0x1043;
    pub const SHT_PROPS: u16 = 0x1044;
    pub const SER_TO_CRT: u16 = 0x1045;
    pub const AXES_USED: u16 = 0x1046;
    pub const SER_PARENT: u16 = 0x104A;
    pub const SER_AUX_TREND: u16 = 0x104B;
    pub const IFMT_RECORD: u16 = 0x104E;
    pub const POS: u16 = 0x104F;
    pub const AL_RUNS: u16 = 0x1050;
    pub const BRAI: u16 = 0x1051;
    pub const SER_AUX_ERR_BAR: u16 = 0x105B;
    pub const SER_FMT: u16 = 0x105D;
    pub const CHART_3D_BAR_SHAPE: u16 = 0x105F;
    pub const FBI: u16 = 0x1060;
    pub const BOP_POP: u16 = 0x1061;
    pub const AXC_EXT: u16 = 0x1062;
    pub const DAT: u16 = 0x1063;
    pub const PLOT_GROWTH: u16 = 0x1064;
    pub const GEL_FRAME: u16 = 0x1066;
    pub const BOP_POP_CUSTOM: u16 = 0x1067;
}

/// Future record types (`0x0800..=0x08FF`) must sit inside a block.
#[inline]
pub const fn is_future_record(record_sid: u16) -> bool {
    matches!(record_sid, 0x0800..=0x08FF)
}

/// Block markers are synthesized on write and dropped on read.
#[inline]
pub const fn is_block_marker(record_sid: u16) -> bool {
    record_sid == sid::START_BLOCK || record_sid == sid::END_BLOCK
}

/// Display name for the sids the grammar names.
pub fn sid_name(record_sid: u16) -> &'static str {
    match record_sid {
        sid::FONT => "Font",
        sid::CONTINUE => "Continue",
        sid::SCL => "Scl",
        sid::START_BLOCK => "StartBlock",
        sid::END_BLOCK => "EndBlock",
        sid::START_OBJECT => "StartObject",
        sid::END_OBJECT => "EndObject",
        sid::FRT_FONT_LIST => "FrtFontList",
        sid::CHART => "Chart",
        sid::SERIES => "Series",
        sid::DATA_FORMAT => "DataFormat",
        sid::LINE_FORMAT => "LineFormat",
        sid::AREA_FORMAT => "AreaFormat",
        sid::CHART_FORMAT => "ChartFormat",
        sid::LEGEND => "Legend",
        sid::AXIS => "Axis",
        sid::TEXT => "Text",
        sid::FRAME => "Frame",
        sid::BEGIN => "Begin",
        sid::END => "End",
        sid::AXIS_PARENT => "AxisParent",
        sid::LEGEND_EXCEPTION => "LegendException",
        sid::DROP_BAR => "DropBar",
        sid::DAT => "Dat",
        _ if is_future_record(record_sid) => "FutureRecord",
        _ => "Record",
    }
}

/// One BIFF record with an opaque body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRecord {
    pub sid: u16,
    pub data: Bytes,
}

impl ChartRecord {
    pub fn new(sid: u16, data: impl Into<Bytes>) -> Self {
        Self {
            sid,
            data: data.into(),
        }
    }

    /// Record with an empty body (`Begin`, `End`, `StartObject` bodies aside).
    pub fn empty(sid: u16) -> Self {
        Self::new(sid, Bytes::new())
    }

    /// Read the record at `offset`; returns it with the bytes consumed.
    pub fn read(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let sid = read_u16_le(data, offset)?;
        let len = read_u16_le(data, offset + 2)? as usize;
        let body = read_slice(data, offset + BIFF_HEADER_SIZE, len)?;
        Ok((Self::new(sid, Bytes::copy_from_slice(body)), BIFF_HEADER_SIZE + len))
    }

    /// Append the encoded record to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        let len = u16::try_from(self.data.len()).map_err(|_| Error::RecordTooLarge {
            sid: self.sid,
            len: self.data.len(),
        })?;
        out.reserve(self.encoded_size());
        out.extend_from_slice(&self.sid.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&self.data);
        Ok(())
    }

    #[inline]
    pub fn encoded_size(&self) -> usize {
        BIFF_HEADER_SIZE + self.data.len()
    }

    #[inline]
    pub fn is_future_record(&self) -> bool {
        is_future_record(self.sid)
    }

    /// Little-endian u16 at `offset` within the body.
    pub fn field_u16(&self, offset: usize) -> Result<u16> {
        read_u16_le(&self.data, offset)
    }
}

/// Decode a whole BIFF record stream.
pub fn decode_chart_records(data: &[u8]) -> Result<Vec<ChartRecord>> {
    let mut records = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let (record, consumed) = ChartRecord::read(data, offset)?;
        records.push(record);
        offset += consumed;
    }
    Ok(records)
}

/// Encode records back to back.
pub fn encode_chart_records(records: &[ChartRecord]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(records.iter().map(ChartRecord::encoded_size).sum());
    for record in records {
        record.write_to(&mut out)?;
    }
    Ok(out)
}

// Body fields read by the block-marker table.

/// `AxisParent.iax`: 0 primary axis group, 1 secondary.
pub fn axis_parent_index(record: &ChartRecord) -> Result<u16> {
    record.field_u16(0)
}

/// `Axis.wType`: 0 category, 1 value, 2 series.
pub fn axis_type(record: &ChartRecord) -> Result<u16> {
    record.field_u16(0)
}

/// `ChartFormat.icrt`: drawing order of the chart group.
pub fn chart_format_index(record: &ChartRecord) -> Result<u16> {
    record.field_u16(18)
}

/// `DataFormat.xi` (point index) and `DataFormat.yi` (series index).
pub fn data_format_indices(record: &ChartRecord) -> Result<(u16, u16)> {
    Ok((record.field_u16(0)?, record.field_u16(2)?))
}

/// `DefaultText.id`: which text defaults the following label carries.
pub fn default_text_id(record: &ChartRecord) -> Result<u16> {
    record.field_u16(0)
}

/// `LegendException.iss`: legend entry index.
pub fn legend_exception_index(record: &ChartRecord) -> Result<u16> {
    record.field_u16(0)
}
