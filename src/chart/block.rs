//! Block markers around future records.
//!
//! Future records (`0x0800..=0x08FF`) written inside a chart object must be
//! wrapped in a `StartBlock`/`EndBlock` pair naming that object. Which object
//! a grammar node stands for is a fixed table:
//!
//! | # | Node                     | Object kind     | Context                 | Instance 1          | Instance 2          |
//! |---|--------------------------|-----------------|-------------------------|---------------------|---------------------|
//! | 1 | CHARTFORMATS             | Sheet           | 0                       | 0                   | 0                   |
//! | 2 | AXISPARENT               | AxisGroup       | 0                       | `AxisParent.iax`    | 0                   |
//! | 3 | ATTACHEDLABEL            | AttachedLabel   | by enclosing rule       | ordinal in parent   | 0                   |
//! | 4 | IVAXIS, DVAXIS, SERIESAXIS | Axis          | 0                       | `Axis.wType`        | 0                   |
//! | 5 | CRT                      | ChartGroup      | 0                       | `ChartFormat.icrt`  | 0                   |
//! | 6 | DAT                      | DataTable       | 0                       | 0                   | 0                   |
//! | 7 | FRAME                    | Frame           | by enclosing rule       | 0                   | 0                   |
//! | 8 | LD                       | Legend          | 0                       | 0                   | 0                   |
//! | 9 | LEGENDEXCEPTION          | LegendException | 0                       | series index        | `LegendException.iss` |
//! | 10 | SERIESFORMAT            | Series          | 0                       | series index        | 0                   |
//! | 11 | SS                      | DataFormat      | 0                       | `DataFormat.yi`     | `DataFormat.xi`     |
//! | 12 | DROPBAR                 | DropBar         | 0                       | 0 up, 1 down        | 0                   |
//! | 13 | any other rule          | enclosing object's block                                                        |||||
//!
//! Attached label contexts: CHARTFORMATS 0, AXES 1, AXM 2, LD 3, SS 4,
//! DFTTEXT 5, LEGENDEXCEPTION 6. Frame contexts: CHARTFORMATS 0, AXES 1,
//! LD 2, ATTACHEDLABEL 3.

use super::record::{
    ChartRecord, axis_parent_index, axis_type, chart_format_index, data_format_indices, default_text_id,
    legend_exception_index, sid,
};
use crate::common::error::Result;

/// `iObjectKind` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ObjectKind {
    AxisGroup = 0x0000,
    AttachedLabel = 0x0002,
    Axis = 0x0004,
    ChartGroup = 0x0005,
    DataTable = 0x0006,
    Frame = 0x0007,
    Legend = 0x0009,
    LegendException = 0x000A,
    Series = 0x000C,
    Sheet = 0x000D,
    DataFormat = 0x000E,
    DropBar = 0x000F,
}

/// Rule that encloses an ATTACHEDLABEL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum LabelContext {
    ChartFormats = 0,
    Axes = 1,
    Axm = 2,
    Legend = 3,
    DataFormat = 4,
    DefaultText = 5,
    LegendException = 6,
}

/// Rule that encloses a FRAME.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FrameContext {
    ChartFormats = 0,
    Axes = 1,
    Legend = 2,
    AttachedLabel = 3,
}

/// The object a block is opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMarker {
    pub kind: ObjectKind,
    pub context: u16,
    pub instance1: u16,
    pub instance2: u16,
}

impl BlockMarker {
    pub const fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            context: 0,
            instance1: 0,
            instance2: 0,
        }
    }

    pub const fn with_context(mut self, context: u16) -> Self {
        self.context = context;
        self
    }

    pub const fn with_instances(mut self, instance1: u16, instance2: u16) -> Self {
        self.instance1 = instance1;
        self.instance2 = instance2;
        self
    }

    pub const fn sheet() -> Self {
        Self::new(ObjectKind::Sheet)
    }

    pub const fn axis_group(iax: u16) -> Self {
        Self::new(ObjectKind::AxisGroup).with_instances(iax, 0)
    }

    pub const fn attached_label(context: LabelContext, ordinal: u16) -> Self {
        Self::new(ObjectKind::AttachedLabel)
            .with_context(context as u16)
            .with_instances(ordinal, 0)
    }

    pub const fn axis(axis_type: u16) -> Self {
        Self::new(ObjectKind::Axis).with_instances(axis_type, 0)
    }

    pub const fn chart_group(icrt: u16) -> Self {
        Self::new(ObjectKind::ChartGroup).with_instances(icrt, 0)
    }

    pub const fn data_table() -> Self {
        Self::new(ObjectKind::DataTable)
    }

    pub const fn frame(context: FrameContext) -> Self {
        Self::new(ObjectKind::Frame).with_context(context as u16)
    }

    pub const fn legend() -> Self {
        Self::new(ObjectKind::Legend)
    }

    pub const fn legend_exception(series: u16, iss: u16) -> Self {
        Self::new(ObjectKind::LegendException).with_instances(series, iss)
    }

    pub const fn series(series: u16) -> Self {
        Self::new(ObjectKind::Series).with_instances(series, 0)
    }

    pub const fn data_format(yi: u16, xi: u16) -> Self {
        Self::new(ObjectKind::DataFormat).with_instances(yi, xi)
    }

    pub const fn drop_bar(ordinal: u16) -> Self {
        Self::new(ObjectKind::DropBar).with_instances(ordinal, 0)
    }

    /// `StartBlock`: rt, grbitFrt, iObjectKind, iObjectContext, iObjectInstance1, iObjectInstance2.
    pub fn start_record(&self) -> ChartRecord {
        let mut body = Vec::with_capacity(12);
        for value in [
            sid::START_BLOCK,
            0,
            self.kind as u16,
            self.context,
            self.instance1,
            self.instance2,
        ] {
            body.extend_from_slice(&value.to_le_bytes());
        }
        ChartRecord::new(sid::START_BLOCK, body)
    }

    /// `EndBlock`: rt, grbitFrt, iObjectKind, 6 unused bytes.
    pub fn end_record(&self) -> ChartRecord {
        let mut body = Vec::with_capacity(12);
        for value in [sid::END_BLOCK, 0, self.kind as u16] {
            body.extend_from_slice(&value.to_le_bytes());
        }
        body.resize(12, 0);
        ChartRecord::new(sid::END_BLOCK, body)
    }
}

/// Where a block's marker comes from.
///
/// Rows 2, 4, 5, 9 and 11 of the table take instances from record bodies.
/// Those bodies are only read when the block actually opens, so a pass that
/// never opens the block never looks at them.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerSource {
    Ready(BlockMarker),
    /// `AxisParent` record.
    AxisGroup(ChartRecord),
    /// `Axis` record.
    Axis(ChartRecord),
    /// `ChartFormat` record.
    ChartGroup(ChartRecord),
    /// `DataFormat` record.
    DataFormat(ChartRecord),
    LegendException { series: u16, record: ChartRecord },
    /// Label under a `DefaultText` record, keyed by its id.
    DefaultTextLabel(ChartRecord),
}

impl MarkerSource {
    pub fn resolve(&self) -> Result<BlockMarker> {
        Ok(match self {
            Self::Ready(marker) => *marker,
            Self::AxisGroup(record) => BlockMarker::axis_group(axis_parent_index(record)?),
            Self::Axis(record) => BlockMarker::axis(axis_type(record)?),
            Self::ChartGroup(record) => BlockMarker::chart_group(chart_format_index(record)?),
            Self::DataFormat(record) => {
                let (xi, yi) = data_format_indices(record)?;
                BlockMarker::data_format(yi, xi)
            },
            Self::LegendException { series, record } => {
                BlockMarker::legend_exception(*series, legend_exception_index(record)?)
            },
            Self::DefaultTextLabel(record) => {
                BlockMarker::attached_label(LabelContext::DefaultText, default_text_id(record)?)
            },
        })
    }
}

impl From<BlockMarker> for MarkerSource {
    fn from(marker: BlockMarker) -> Self {
        Self::Ready(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Error;

    #[test]
    fn test_start_block_layout() {
        let record = BlockMarker::data_format(3, 7).start_record();
        assert_eq!(record.sid, sid::START_BLOCK);
        assert_eq!(
            &record.data[..],
            &[0x52, 0x08, 0, 0, 0x0E, 0, 0, 0, 3, 0, 7, 0]
        );
    }

    #[test]
    fn test_end_block_layout() {
        let record = BlockMarker::attached_label(LabelContext::Legend, 0).end_record();
        assert_eq!(record.sid, sid::END_BLOCK);
        assert_eq!(&record.data[..], &[0x53, 0x08, 0, 0, 0x02, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_contexts() {
        assert_eq!(BlockMarker::frame(FrameContext::AttachedLabel).context, 3);
        assert_eq!(BlockMarker::attached_label(LabelContext::LegendException, 2).context, 6);
        assert_eq!(BlockMarker::legend_exception(4, 1).instance2, 1);
    }

    #[test]
    fn test_marker_sources_read_record_fields() {
        let mut data_format = vec![0u8; 8];
        data_format[0] = 5;
        data_format[2] = 2;
        let source = MarkerSource::DataFormat(ChartRecord::new(sid::DATA_FORMAT, data_format));
        assert_eq!(source.resolve().unwrap(), BlockMarker::data_format(2, 5));

        let text = MarkerSource::DefaultTextLabel(ChartRecord::new(sid::DEFAULT_TEXT, vec![3, 0]));
        let marker = text.resolve().unwrap();
        assert_eq!((marker.context, marker.instance1), (LabelContext::DefaultText as u16, 3));

        let ready = MarkerSource::from(BlockMarker::legend());
        assert_eq!(ready.resolve().unwrap(), BlockMarker::legend());
    }

    #[test]
    fn test_short_body_fails_only_on_resolve() {
        let source = MarkerSource::ChartGroup(ChartRecord::new(sid::CHART_FORMAT, vec![0u8; 4]));
        assert!(matches!(source.resolve(), Err(Error::InsufficientData { .. })));
    }
}
