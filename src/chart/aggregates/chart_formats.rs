//! CHARTFORMATS and the chart sheet around it.

use smallvec::SmallVec;

use super::axis::AxisParent;
use super::chart_group::DataTable;
use super::fragments::{
    CrtMlFrt, FontList, Frame, TextProps, optional_crt_ml_frt, optional_text_props, visit_optional,
};
use super::label::{AttachedLabel, DataLabel, DefaultText};
use super::series::{DataFormat, SeriesFormat};
use crate::chart::block::{BlockMarker, FrameContext, LabelContext};
use crate::chart::record::{ChartRecord, decode_chart_records, sid};
use crate::chart::serializer::{ChartSerializer, ChartWriteOptions, RecordVisitor};
use crate::chart::stream::RecordStream;
use crate::common::error::{Error, Result};

/// `CHARTFORMATS = Chart Begin *2FONTLIST Scl PlotGrowth [FRAME] *SERIESFORMAT *SS ShtProps
/// *2DFTTEXT AxesUsed 1*2AXISPARENT [CrtLayout12A] [DAT] *ATTACHEDLABEL [CRTMLFRT]
/// *([DataLabExt StartObject] ATTACHEDLABEL [EndObject]) [TEXTPROPS] *2CRTMLFRT End`
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFormats {
    pub chart: ChartRecord,
    pub begin: ChartRecord,
    pub font_lists: SmallVec<[FontList; 2]>,
    pub scl: ChartRecord,
    pub plot_growth: ChartRecord,
    pub frame: Option<Frame>,
    pub series: Vec<SeriesFormat>,
    pub data_formats: Vec<DataFormat>,
    pub sht_props: ChartRecord,
    pub default_texts: Vec<DefaultText>,
    pub axes_used: ChartRecord,
    pub axis_parents: SmallVec<[AxisParent; 2]>,
    pub crt_layout12a: Option<ChartRecord>,
    pub data_table: Option<DataTable>,
    pub labels: Vec<AttachedLabel>,
    pub crt_ml_frt: Option<CrtMlFrt>,
    pub data_labels: Vec<DataLabel>,
    pub text_props: Option<TextProps>,
    pub trailing_crt_ml_frts: SmallVec<[CrtMlFrt; 2]>,
    pub end: ChartRecord,
}

impl ChartFormats {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let chart = stream.expect(sid::CHART)?;
        let begin = stream.expect(sid::BEGIN)?;
        let mut font_lists = SmallVec::new();
        while font_lists.len() < 2 && stream.peek_is(sid::FRT_FONT_LIST) {
            font_lists.push(FontList::parse(stream)?);
        }
        let scl = stream.expect(sid::SCL)?;
        let plot_growth = stream.expect(sid::PLOT_GROWTH)?;
        let frame = Frame::parse_optional(stream)?;
        let series = SeriesFormat::parse_repeated(stream)?;
        let data_formats = DataFormat::parse_repeated(stream)?;
        let sht_props = stream.expect(sid::SHT_PROPS)?;
        let default_texts = DefaultText::parse_repeated(stream)?;
        let axes_used = stream.expect(sid::AXES_USED)?;

        let mut axis_parents = SmallVec::new();
        axis_parents.push(AxisParent::parse(stream)?);
        if stream.peek_is(sid::AXIS_PARENT) {
            axis_parents.push(AxisParent::parse(stream)?);
        }

        let crt_layout12a = stream.next_if(sid::CRT_LAYOUT12A);
        let data_table = if stream.peek_is(sid::DAT) {
            Some(DataTable::parse(stream)?)
        } else {
            None
        };
        let labels = AttachedLabel::parse_repeated(stream, usize::MAX)?;
        let crt_ml_frt = optional_crt_ml_frt(stream)?;
        let mut data_labels = Vec::new();
        while stream.peek_is_any(&[sid::DATA_LAB_EXT, sid::TEXT]) {
            data_labels.push(DataLabel::parse(stream)?);
        }
        let text_props = optional_text_props(stream)?;
        let mut trailing_crt_ml_frts = SmallVec::new();
        while trailing_crt_ml_frts.len() < 2
            && let Some(part) = optional_crt_ml_frt(stream)?
        {
            trailing_crt_ml_frts.push(part);
        }

        Ok(Self {
            chart,
            begin,
            font_lists,
            scl,
            plot_growth,
            frame,
            series,
            data_formats,
            sht_props,
            default_texts,
            axes_used,
            axis_parents,
            crt_layout12a,
            data_table,
            labels,
            crt_ml_frt,
            data_labels,
            text_props,
            trailing_crt_ml_frts,
            end: stream.expect(sid::END)?,
        })
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.enter(BlockMarker::sheet());
        ser.records([&self.chart, &self.begin])?;
        for font_list in &self.font_lists {
            font_list.visit(ser)?;
        }
        ser.records([&self.scl, &self.plot_growth])?;
        if let Some(frame) = &self.frame {
            frame.visit(ser, FrameContext::ChartFormats)?;
        }
        for (index, series) in self.series.iter().enumerate() {
            series.visit(ser, index as u16)?;
        }
        for data_format in &self.data_formats {
            data_format.visit(ser)?;
        }
        ser.record(&self.sht_props)?;
        for default_text in &self.default_texts {
            default_text.visit(ser)?;
        }
        ser.record(&self.axes_used)?;
        for axis_parent in &self.axis_parents {
            axis_parent.visit(ser)?;
        }
        ser.optional(self.crt_layout12a.as_ref())?;
        if let Some(data_table) = &self.data_table {
            data_table.visit(ser)?;
        }

        // Label ordinals run across both label lists.
        let mut ordinal = 0u16;
        for label in &self.labels {
            label.visit(ser, LabelContext::ChartFormats, ordinal)?;
            ordinal += 1;
        }
        visit_optional(ser, self.crt_ml_frt.as_ref())?;
        for data_label in &self.data_labels {
            data_label.visit(ser, LabelContext::ChartFormats, ordinal)?;
            ordinal += 1;
        }

        visit_optional(ser, self.text_props.as_ref())?;
        for part in &self.trailing_crt_ml_frts {
            part.visit(ser)?;
        }
        ser.leave(Some(&self.end))
    }
}

/// A chart substream: the CHARTFORMATS tree plus whatever records surround it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSheet {
    /// Records before `Chart`, kept as they are.
    pub leading: Vec<ChartRecord>,
    pub formats: ChartFormats,
    /// Records after the closing `End`, kept as they are.
    pub trailing: Vec<ChartRecord>,
}

impl ChartSheet {
    /// Group a flat record sequence. Block markers in the input are ignored.
    pub fn parse(records: impl IntoIterator<Item = ChartRecord>) -> Result<Self> {
        let mut stream = RecordStream::new(records);
        let mut leading = Vec::new();
        while stream.has_next() && !stream.peek_is(sid::CHART) {
            if let Some(record) = stream.get_next() {
                leading.push(record);
            }
        }
        if !stream.has_next() {
            return Err(Error::UnexpectedRecord {
                index: stream.position(),
                expected: sid::CHART,
                found: None,
            });
        }

        let formats = ChartFormats::parse(&mut stream)?;
        let trailing = stream.take_remaining();
        tracing::debug!(
            leading = leading.len(),
            series = formats.series.len(),
            axis_groups = formats.axis_parents.len(),
            trailing = trailing.len(),
            "parsed chart sheet"
        );
        Ok(Self {
            leading,
            formats,
            trailing,
        })
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::parse(decode_chart_records(data)?)
    }

    /// Run one serialize pass into `sink`.
    pub fn visit(&self, sink: &mut dyn RecordVisitor, options: ChartWriteOptions) -> Result<()> {
        let mut ser = ChartSerializer::with_options(sink, options);
        ser.records(&self.leading)?;
        self.formats.visit(&mut ser)?;
        ser.records(&self.trailing)?;
        ser.finish()
    }

    pub fn to_records(&self, options: ChartWriteOptions) -> Result<Vec<ChartRecord>> {
        let mut out: Vec<ChartRecord> = Vec::new();
        self.visit(&mut out, options)?;
        Ok(out)
    }

    pub fn to_bytes(&self, options: ChartWriteOptions) -> Result<Vec<u8>> {
        let mut out: Vec<u8> = Vec::new();
        self.visit(&mut out, options)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(sids: &[u16]) -> Vec<ChartRecord> {
        sids.iter().map(|&s| ChartRecord::empty(s)).collect()
    }

    fn minimal_sheet(extra_before_end: &[u16]) -> Vec<ChartRecord> {
        let mut out = records(&[
            sid::CHART,
            sid::BEGIN,
            sid::SCL,
            sid::PLOT_GROWTH,
            sid::SHT_PROPS,
            sid::AXES_USED,
        ]);
        out.push(ChartRecord::new(sid::AXIS_PARENT, vec![0u8; 18]));
        out.extend(records(&[sid::BEGIN, sid::POS]));
        out.push(ChartRecord::new(sid::CHART_FORMAT, vec![0u8; 20]));
        out.extend(records(&[sid::BEGIN, sid::BAR, sid::CRT_LINK, sid::END, sid::END]));
        out.extend(records(extra_before_end));
        out.push(ChartRecord::empty(sid::END));
        out
    }

    #[test]
    fn test_minimal_sheet() {
        let mut input = records(&[sid::CONTINUE]);
        input.extend(minimal_sheet(&[]));
        input.push(ChartRecord::empty(sid::SCL));

        let sheet = ChartSheet::parse(input.clone()).unwrap();
        assert_eq!(sheet.leading.len(), 1);
        assert_eq!(sheet.trailing.len(), 1);
        assert_eq!(sheet.formats.axis_parents.len(), 1);
        assert_eq!(sheet.to_records(ChartWriteOptions::default()).unwrap(), input);
    }

    #[test]
    fn test_missing_chart_record() {
        let err = ChartSheet::parse(records(&[sid::CONTINUE, sid::SCL])).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedRecord {
                expected: sid::CHART,
                found: None,
                ..
            }
        ));
    }

    #[test]
    fn test_sheet_block_around_trailing_future_records() {
        let input = minimal_sheet(&[sid::CRT_ML_FRT, sid::TEXT_PROPS_STREAM, sid::CRT_ML_FRT]);
        let sheet = ChartSheet::parse(input.clone()).unwrap();
        assert!(sheet.formats.text_props.is_some());
        assert_eq!(sheet.formats.trailing_crt_ml_frts.len(), 1);
        assert!(sheet.formats.crt_ml_frt.is_some());

        let out = sheet.to_records(ChartWriteOptions::default()).unwrap();
        assert_eq!(out.len(), input.len() + 2);
        let marker_free: Vec<ChartRecord> =
            out.iter().filter(|r| !crate::chart::record::is_block_marker(r.sid)).cloned().collect();
        assert_eq!(marker_free, input);
        assert_eq!(out[out.len() - 2].sid, sid::END_BLOCK);
    }
}
