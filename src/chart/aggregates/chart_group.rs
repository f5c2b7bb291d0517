//! Chart group rules: CRT, LD, DROPBAR and DAT.

use smallvec::SmallVec;

use super::fragments::{CrtMlFrt, Frame, GelFrame, ShapeProps, TextProps, optional_crt_ml_frt, optional_shape_props};
use super::fragments::{optional_text_props, repeated_shape_props, visit_optional};
use super::label::{AttachedLabel, DefaultText};
use super::series::DataFormat;
use crate::chart::block::{BlockMarker, FrameContext, LabelContext, MarkerSource};
use crate::chart::record::{ChartRecord, chart_format_index, sid};
use crate::chart::serializer::ChartSerializer;
use crate::chart::stream::RecordStream;
use crate::common::error::Result;

/// Record types that name the chart type of a group.
pub const CHART_TYPE_SIDS: [u16; 9] = [
    sid::BAR,
    sid::LINE,
    sid::BOP_POP,
    sid::PIE,
    sid::AREA,
    sid::SCATTER,
    sid::RADAR,
    sid::RADAR_AREA,
    sid::SURF,
];

/// `LD = Legend Begin Pos ATTACHEDLABEL [FRAME] [CrtLayout12] [TEXTPROPS] [CRTMLFRT] End`
///
/// The label is accepted as optional so a bare `Legend Begin Pos End` parses.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub legend: ChartRecord,
    pub begin: ChartRecord,
    pub pos: ChartRecord,
    pub label: Option<AttachedLabel>,
    pub frame: Option<Frame>,
    pub crt_layout12: Option<ChartRecord>,
    pub text_props: Option<TextProps>,
    pub crt_ml_frt: Option<CrtMlFrt>,
    pub end: ChartRecord,
}

impl Legend {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        Ok(Self {
            legend: stream.expect(sid::LEGEND)?,
            begin: stream.expect(sid::BEGIN)?,
            pos: stream.expect(sid::POS)?,
            label: AttachedLabel::parse_optional(stream)?,
            frame: Frame::parse_optional(stream)?,
            crt_layout12: stream.next_if(sid::CRT_LAYOUT12),
            text_props: optional_text_props(stream)?,
            crt_ml_frt: optional_crt_ml_frt(stream)?,
            end: stream.expect(sid::END)?,
        })
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.enter(BlockMarker::legend());
        ser.records([&self.legend, &self.begin, &self.pos])?;
        if let Some(label) = &self.label {
            label.visit(ser, LabelContext::Legend, 0)?;
        }
        if let Some(frame) = &self.frame {
            frame.visit(ser, FrameContext::Legend)?;
        }
        ser.optional(self.crt_layout12.as_ref())?;
        visit_optional(ser, self.text_props.as_ref())?;
        visit_optional(ser, self.crt_ml_frt.as_ref())?;
        ser.leave(Some(&self.end))
    }
}

/// `DROPBAR = DropBar Begin LineFormat AreaFormat [GELFRAME] [SHAPEPROPS] End`
#[derive(Debug, Clone, PartialEq)]
pub struct DropBar {
    pub drop_bar: ChartRecord,
    pub begin: ChartRecord,
    pub line_format: ChartRecord,
    pub area_format: ChartRecord,
    pub gel_frame: Option<GelFrame>,
    pub shape_props: Option<ShapeProps>,
    pub end: ChartRecord,
}

impl DropBar {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        Ok(Self {
            drop_bar: stream.expect(sid::DROP_BAR)?,
            begin: stream.expect(sid::BEGIN)?,
            line_format: stream.expect(sid::LINE_FORMAT)?,
            area_format: stream.expect(sid::AREA_FORMAT)?,
            gel_frame: GelFrame::parse_optional(stream)?,
            shape_props: optional_shape_props(stream)?,
            end: stream.expect(sid::END)?,
        })
    }

    /// `ordinal` is 0 for the up bar and 1 for the down bar.
    pub fn visit(&self, ser: &mut ChartSerializer<'_>, ordinal: u16) -> Result<()> {
        ser.enter(BlockMarker::drop_bar(ordinal));
        ser.records([&self.drop_bar, &self.begin, &self.line_format, &self.area_format])?;
        if let Some(gel_frame) = &self.gel_frame {
            gel_frame.visit(ser)?;
        }
        visit_optional(ser, self.shape_props.as_ref())?;
        ser.leave(Some(&self.end))
    }
}

/// `DAT = Dat Begin LD End`
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub dat: ChartRecord,
    pub begin: ChartRecord,
    pub legend: Legend,
    pub end: ChartRecord,
}

impl DataTable {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        Ok(Self {
            dat: stream.expect(sid::DAT)?,
            begin: stream.expect(sid::BEGIN)?,
            legend: Legend::parse(stream)?,
            end: stream.expect(sid::END)?,
        })
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.enter(BlockMarker::data_table());
        ser.records([&self.dat, &self.begin])?;
        self.legend.visit(ser)?;
        ser.leave(Some(&self.end))
    }
}

/// `CRT = ChartFormat Begin (Bar / Line / (BopPop [BopPopCustom]) / Pie / Area / Scatter / Radar /
/// RadarArea / Surf) CrtLink [SeriesList] [Chart3d] [LD] [2DROPBAR] *4(CrtLine LineFormat)
/// *2DFTTEXT [DataLabExtContents] [SS] *4SHAPEPROPS End`
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGroup {
    pub chart_format: ChartRecord,
    pub begin: ChartRecord,
    pub chart_type: ChartRecord,
    pub bop_pop_custom: Option<ChartRecord>,
    pub crt_link: ChartRecord,
    pub series_list: Option<ChartRecord>,
    pub chart_3d: Option<ChartRecord>,
    pub legend: Option<Legend>,
    /// Up and down bars.
    pub drop_bars: Option<[DropBar; 2]>,
    pub crt_lines: SmallVec<[(ChartRecord, ChartRecord); 4]>,
    pub default_texts: Vec<DefaultText>,
    pub data_lab_ext_contents: Option<ChartRecord>,
    pub data_format: Option<DataFormat>,
    pub shape_props: SmallVec<[ShapeProps; 4]>,
    pub end: ChartRecord,
}

impl ChartGroup {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let chart_format = stream.expect(sid::CHART_FORMAT)?;
        let begin = stream.expect(sid::BEGIN)?;
        let chart_type = stream.expect_any(&CHART_TYPE_SIDS)?;
        let bop_pop_custom = if chart_type.sid == sid::BOP_POP {
            stream.next_if(sid::BOP_POP_CUSTOM)
        } else {
            None
        };
        let crt_link = stream.expect(sid::CRT_LINK)?;
        let series_list = stream.next_if(sid::SERIES_LIST);
        let chart_3d = stream.next_if(sid::CHART_3D);
        let legend = if stream.peek_is(sid::LEGEND) {
            Some(Legend::parse(stream)?)
        } else {
            None
        };
        let drop_bars = if stream.peek_is(sid::DROP_BAR) {
            Some([DropBar::parse(stream)?, DropBar::parse(stream)?])
        } else {
            None
        };
        let mut crt_lines = SmallVec::new();
        while crt_lines.len() < 4
            && let Some(crt_line) = stream.next_if(sid::CRT_LINE)
        {
            crt_lines.push((crt_line, stream.expect(sid::LINE_FORMAT)?));
        }
        Ok(Self {
            chart_format,
            begin,
            chart_type,
            bop_pop_custom,
            crt_link,
            series_list,
            chart_3d,
            legend,
            drop_bars,
            crt_lines,
            default_texts: DefaultText::parse_repeated(stream)?,
            data_lab_ext_contents: stream.next_if(sid::DATA_LAB_EXT_CONTENTS),
            data_format: DataFormat::parse_optional(stream)?,
            shape_props: repeated_shape_props::<4>(stream)?,
            end: stream.expect(sid::END)?,
        })
    }

    /// `ChartFormat.icrt`
    pub fn drawing_order(&self) -> Result<u16> {
        chart_format_index(&self.chart_format)
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.enter(MarkerSource::ChartGroup(self.chart_format.clone()));
        ser.records([&self.chart_format, &self.begin, &self.chart_type])?;
        ser.optional(self.bop_pop_custom.as_ref())?;
        ser.record(&self.crt_link)?;
        ser.optional(self.series_list.as_ref())?;
        ser.optional(self.chart_3d.as_ref())?;
        if let Some(legend) = &self.legend {
            legend.visit(ser)?;
        }
        if let Some(drop_bars) = &self.drop_bars {
            for (ordinal, drop_bar) in drop_bars.iter().enumerate() {
                drop_bar.visit(ser, ordinal as u16)?;
            }
        }
        for (crt_line, line_format) in &self.crt_lines {
            ser.records([crt_line, line_format])?;
        }
        for default_text in &self.default_texts {
            default_text.visit(ser)?;
        }
        ser.optional(self.data_lab_ext_contents.as_ref())?;
        if let Some(data_format) = &self.data_format {
            data_format.visit(ser)?;
        }
        for shape in &self.shape_props {
            shape.visit(ser)?;
        }
        ser.leave(Some(&self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::block::ObjectKind;
    use crate::chart::serializer::ChartWriteOptions;

    fn records(sids: &[u16]) -> Vec<ChartRecord> {
        sids.iter().map(|&s| ChartRecord::empty(s)).collect()
    }

    fn chart_format(icrt: u16) -> ChartRecord {
        let mut body = vec![0u8; 20];
        body[18..20].copy_from_slice(&icrt.to_le_bytes());
        ChartRecord::new(sid::CHART_FORMAT, body)
    }

    fn visit_sids(group: &ChartGroup) -> Vec<ChartRecord> {
        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        group.visit(&mut ser).unwrap();
        ser.finish().unwrap();
        out
    }

    #[test]
    fn test_data_table_round_trip() {
        let sids = [sid::DAT, sid::BEGIN, sid::LEGEND, sid::BEGIN, sid::POS, sid::END, sid::END];
        let mut stream = RecordStream::new(records(&sids));
        let dat = DataTable::parse(&mut stream).unwrap();
        assert!(!stream.has_next());
        assert!(dat.legend.label.is_none());

        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        dat.visit(&mut ser).unwrap();
        ser.finish().unwrap();
        assert_eq!(out, records(&sids));
    }

    #[test]
    fn test_chart_group_with_drop_bars() {
        let mut input = vec![chart_format(1)];
        input.extend(records(&[
            sid::BEGIN,
            sid::LINE,
            sid::CRT_LINK,
            sid::DROP_BAR,
            sid::BEGIN,
            sid::LINE_FORMAT,
            sid::AREA_FORMAT,
            sid::END,
            sid::DROP_BAR,
            sid::BEGIN,
            sid::LINE_FORMAT,
            sid::AREA_FORMAT,
            sid::SHAPE_PROPS_STREAM,
            sid::END,
            sid::CRT_LINE,
            sid::LINE_FORMAT,
            sid::END,
        ]));
        let group = ChartGroup::parse(&mut RecordStream::new(input)).unwrap();
        assert!(group.drop_bars.is_some());
        assert_eq!(group.crt_lines.len(), 1);

        let out = visit_sids(&group);
        let starts: Vec<&ChartRecord> = out.iter().filter(|r| r.sid == sid::START_BLOCK).collect();
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[0].field_u16(4).unwrap(), ObjectKind::ChartGroup as u16);
        assert_eq!(starts[0].field_u16(8).unwrap(), 1);
        assert_eq!(starts[1].field_u16(4).unwrap(), ObjectKind::DropBar as u16);
        assert_eq!(starts[1].field_u16(8).unwrap(), 1);
    }

    #[test]
    fn test_bop_pop_custom_only_after_bop_pop() {
        let mut input = vec![chart_format(0)];
        input.extend(records(&[sid::BEGIN, sid::BOP_POP, sid::BOP_POP_CUSTOM, sid::CRT_LINK, sid::END]));
        let group = ChartGroup::parse(&mut RecordStream::new(input)).unwrap();
        assert!(group.bop_pop_custom.is_some());

        let mut input = vec![chart_format(0)];
        input.extend(records(&[sid::BEGIN, sid::PIE, sid::BOP_POP_CUSTOM, sid::CRT_LINK, sid::END]));
        assert!(ChartGroup::parse(&mut RecordStream::new(input)).is_err());
    }

    #[test]
    fn test_short_chart_format_without_markers() {
        let mut input = vec![ChartRecord::new(sid::CHART_FORMAT, vec![0u8; 4])];
        input.extend(records(&[sid::BEGIN, sid::BAR, sid::CRT_LINK, sid::SHAPE_PROPS_STREAM, sid::END]));
        let group = ChartGroup::parse(&mut RecordStream::new(input.clone())).unwrap();

        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::with_options(&mut out, ChartWriteOptions::default().with_block_markers(false));
        group.visit(&mut ser).unwrap();
        ser.finish().unwrap();
        assert_eq!(out, input);

        // The block opens for the ShapePropsStream and needs icrt.
        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        assert!(group.visit(&mut ser).is_err());
    }

    #[test]
    fn test_missing_chart_type() {
        let mut input = vec![chart_format(0)];
        input.extend(records(&[sid::BEGIN, sid::CRT_LINK, sid::END]));
        assert!(ChartGroup::parse(&mut RecordStream::new(input)).is_err());
    }
}
