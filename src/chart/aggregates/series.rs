//! Series rules: SERIESFORMAT, SS and LEGENDEXCEPTION.

use smallvec::SmallVec;

use super::fragments::{CrtMlFrt, GelFrame, ShapeProps, TextProps, optional_crt_ml_frt, optional_text_props};
use super::fragments::{repeated_shape_props, visit_optional};
use super::label::{AttachedLabel, Ai};
use crate::chart::block::{BlockMarker, LabelContext, MarkerSource};
use crate::chart::record::{ChartRecord, data_format_indices, legend_exception_index, sid};
use crate::chart::serializer::ChartSerializer;
use crate::chart::stream::RecordStream;
use crate::common::error::Result;

/// `SS = DataFormat Begin [Chart3DBarShape] [LineFormat AreaFormat PieFormat] [SerFmt]
/// [GELFRAME] [MarkerFormat] [AttachedLabel] *2SHAPEPROPS [CRTMLFRT] End`
#[derive(Debug, Clone, PartialEq)]
pub struct DataFormat {
    pub data_format: ChartRecord,
    pub begin: ChartRecord,
    pub chart_3d_bar_shape: Option<ChartRecord>,
    /// `LineFormat AreaFormat PieFormat`, all or nothing.
    pub formats: Option<[ChartRecord; 3]>,
    pub ser_fmt: Option<ChartRecord>,
    pub gel_frame: Option<GelFrame>,
    pub marker_format: Option<ChartRecord>,
    pub attached_label: Option<ChartRecord>,
    pub shape_props: SmallVec<[ShapeProps; 2]>,
    pub crt_ml_frt: Option<CrtMlFrt>,
    pub end: ChartRecord,
}

impl DataFormat {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let data_format = stream.expect(sid::DATA_FORMAT)?;
        let begin = stream.expect(sid::BEGIN)?;
        let chart_3d_bar_shape = stream.next_if(sid::CHART_3D_BAR_SHAPE);
        let formats = if stream.peek_is(sid::LINE_FORMAT) {
            Some([
                stream.expect(sid::LINE_FORMAT)?,
                stream.expect(sid::AREA_FORMAT)?,
                stream.expect(sid::PIE_FORMAT)?,
            ])
        } else {
            None
        };
        Ok(Self {
            data_format,
            begin,
            chart_3d_bar_shape,
            formats,
            ser_fmt: stream.next_if(sid::SER_FMT),
            gel_frame: GelFrame::parse_optional(stream)?,
            marker_format: stream.next_if(sid::MARKER_FORMAT),
            attached_label: stream.next_if(sid::ATTACHED_LABEL),
            shape_props: repeated_shape_props::<2>(stream)?,
            crt_ml_frt: optional_crt_ml_frt(stream)?,
            end: stream.expect(sid::END)?,
        })
    }

    pub fn parse_optional(stream: &mut RecordStream) -> Result<Option<Self>> {
        if stream.peek_is(sid::DATA_FORMAT) {
            Self::parse(stream).map(Some)
        } else {
            Ok(None)
        }
    }

    /// `*SS`
    pub fn parse_repeated(stream: &mut RecordStream) -> Result<Vec<Self>> {
        let mut formats = Vec::new();
        while let Some(format) = Self::parse_optional(stream)? {
            formats.push(format);
        }
        Ok(formats)
    }

    /// `(xi, yi)` from the `DataFormat` record.
    pub fn indices(&self) -> Result<(u16, u16)> {
        data_format_indices(&self.data_format)
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.enter(MarkerSource::DataFormat(self.data_format.clone()));
        ser.records([&self.data_format, &self.begin])?;
        ser.optional(self.chart_3d_bar_shape.as_ref())?;
        if let Some(formats) = &self.formats {
            ser.records(formats)?;
        }
        ser.optional(self.ser_fmt.as_ref())?;
        if let Some(gel_frame) = &self.gel_frame {
            gel_frame.visit(ser)?;
        }
        ser.optional(self.marker_format.as_ref())?;
        ser.optional(self.attached_label.as_ref())?;
        for shape in &self.shape_props {
            shape.visit(ser)?;
        }
        visit_optional(ser, self.crt_ml_frt.as_ref())?;
        ser.leave(Some(&self.end))
    }
}

/// `LegendException [Begin ATTACHEDLABEL [TEXTPROPS] End]`
#[derive(Debug, Clone, PartialEq)]
pub struct LegendException {
    pub legend_exception: ChartRecord,
    pub label: Option<LegendExceptionLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendExceptionLabel {
    pub begin: ChartRecord,
    pub label: AttachedLabel,
    pub text_props: Option<TextProps>,
    pub end: ChartRecord,
}

impl LegendException {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let legend_exception = stream.expect(sid::LEGEND_EXCEPTION)?;
        let label = if stream.peek_is(sid::BEGIN) {
            Some(LegendExceptionLabel {
                begin: stream.expect(sid::BEGIN)?,
                label: AttachedLabel::parse(stream)?,
                text_props: optional_text_props(stream)?,
                end: stream.expect(sid::END)?,
            })
        } else {
            None
        };
        Ok(Self { legend_exception, label })
    }

    /// `LegendException.iss`
    pub fn entry_index(&self) -> Result<u16> {
        legend_exception_index(&self.legend_exception)
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>, series: u16) -> Result<()> {
        ser.enter(MarkerSource::LegendException {
            series,
            record: self.legend_exception.clone(),
        });
        ser.record(&self.legend_exception)?;
        match &self.label {
            Some(label) => {
                ser.record(&label.begin)?;
                label.label.visit(ser, LabelContext::LegendException, 0)?;
                visit_optional(ser, label.text_props.as_ref())?;
                ser.leave(Some(&label.end))
            },
            None => ser.leave(None),
        }
    }
}

/// How a series attaches to the chart.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesLink {
    /// `SerToCrt`: plotted in a chart group.
    ChartGroup(ChartRecord),
    /// `SerParent (SerAuxTrend / SerAuxErrBar)`: trendline or error bars of another series.
    Auxiliary { ser_parent: ChartRecord, aux: ChartRecord },
}

/// `SERIESFORMAT = Series Begin 4AI *SS (SerToCrt / (SerParent (SerAuxTrend / SerAuxErrBar)))
/// *(LegendException [Begin ATTACHEDLABEL [TEXTPROPS] End]) End`
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFormat {
    pub series: ChartRecord,
    pub begin: ChartRecord,
    /// Name, values, categories and bubble sizes.
    pub ais: SmallVec<[Ai; 4]>,
    pub data_formats: Vec<DataFormat>,
    pub link: SeriesLink,
    pub legend_exceptions: Vec<LegendException>,
    pub end: ChartRecord,
}

impl SeriesFormat {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let series = stream.expect(sid::SERIES)?;
        let begin = stream.expect(sid::BEGIN)?;
        let mut ais = SmallVec::new();
        for _ in 0..4 {
            ais.push(Ai::parse(stream)?);
        }
        let data_formats = DataFormat::parse_repeated(stream)?;
        let link = match stream.next_if(sid::SER_TO_CRT) {
            Some(ser_to_crt) => SeriesLink::ChartGroup(ser_to_crt),
            None => SeriesLink::Auxiliary {
                ser_parent: stream.expect(sid::SER_PARENT)?,
                aux: stream.expect_any(&[sid::SER_AUX_TREND, sid::SER_AUX_ERR_BAR])?,
            },
        };
        let mut legend_exceptions = Vec::new();
        while stream.peek_is(sid::LEGEND_EXCEPTION) {
            legend_exceptions.push(LegendException::parse(stream)?);
        }
        Ok(Self {
            series,
            begin,
            ais,
            data_formats,
            link,
            legend_exceptions,
            end: stream.expect(sid::END)?,
        })
    }

    /// `*SERIESFORMAT`
    pub fn parse_repeated(stream: &mut RecordStream) -> Result<Vec<Self>> {
        let mut series = Vec::new();
        while stream.peek_is(sid::SERIES) {
            series.push(Self::parse(stream)?);
        }
        Ok(series)
    }

    /// `index` is the position of this series in the sheet.
    pub fn visit(&self, ser: &mut ChartSerializer<'_>, index: u16) -> Result<()> {
        ser.enter(BlockMarker::series(index));
        ser.records([&self.series, &self.begin])?;
        for ai in &self.ais {
            ai.visit(ser)?;
        }
        for data_format in &self.data_formats {
            data_format.visit(ser)?;
        }
        match &self.link {
            SeriesLink::ChartGroup(ser_to_crt) => ser.record(ser_to_crt)?,
            SeriesLink::Auxiliary { ser_parent, aux } => ser.records([ser_parent, aux])?,
        }
        for legend_exception in &self.legend_exceptions {
            legend_exception.visit(ser, index)?;
        }
        ser.leave(Some(&self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::block::ObjectKind;

    fn data_format_record(xi: u16, yi: u16) -> ChartRecord {
        let mut body = Vec::new();
        body.extend_from_slice(&xi.to_le_bytes());
        body.extend_from_slice(&yi.to_le_bytes());
        body.extend_from_slice(&[0, 0, 0, 0]);
        ChartRecord::new(sid::DATA_FORMAT, body)
    }

    fn records(sids: &[u16]) -> Vec<ChartRecord> {
        sids.iter().map(|&s| ChartRecord::empty(s)).collect()
    }

    #[test]
    fn test_data_format_block_instances() {
        let mut input = vec![data_format_record(4, 1)];
        input.extend(records(&[
            sid::BEGIN,
            sid::LINE_FORMAT,
            sid::AREA_FORMAT,
            sid::PIE_FORMAT,
            sid::SHAPE_PROPS_STREAM,
            sid::SHAPE_PROPS_STREAM,
            sid::END,
        ]));
        let ss = DataFormat::parse(&mut RecordStream::new(input)).unwrap();
        assert!(ss.formats.is_some());
        assert_eq!(ss.shape_props.len(), 2);

        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        ss.visit(&mut ser).unwrap();
        ser.finish().unwrap();

        let start = &out[5];
        assert_eq!(start.sid, sid::START_BLOCK);
        assert_eq!(start.field_u16(4).unwrap(), ObjectKind::DataFormat as u16);
        assert_eq!(start.field_u16(8).unwrap(), 1);
        assert_eq!(start.field_u16(10).unwrap(), 4);
    }

    #[test]
    fn test_partial_format_triple_fails() {
        let mut input = vec![data_format_record(0, 0)];
        input.extend(records(&[sid::BEGIN, sid::LINE_FORMAT, sid::END]));
        assert!(DataFormat::parse(&mut RecordStream::new(input)).is_err());
    }

    #[test]
    fn test_series_with_error_bars_and_legend_exception() {
        let mut sids = vec![sid::SERIES, sid::BEGIN];
        sids.extend_from_slice(&[sid::BRAI; 4]);
        sids.extend_from_slice(&[sid::SER_PARENT, sid::SER_AUX_ERR_BAR]);
        let mut input = records(&sids);
        input.push(ChartRecord::new(sid::LEGEND_EXCEPTION, vec![3, 0, 0, 0]));
        input.extend(records(&[
            sid::BEGIN,
            sid::TEXT,
            sid::BEGIN,
            sid::POS,
            sid::BRAI,
            sid::END,
            sid::TEXT_PROPS_STREAM,
            sid::END,
            sid::END,
        ]));

        let series = SeriesFormat::parse(&mut RecordStream::new(input)).unwrap();
        assert!(matches!(series.link, SeriesLink::Auxiliary { .. }));
        assert_eq!(series.legend_exceptions.len(), 1);

        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        series.visit(&mut ser, 5).unwrap();
        ser.finish().unwrap();

        let starts: Vec<&ChartRecord> = out.iter().filter(|r| r.sid == sid::START_BLOCK).collect();
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[0].field_u16(4).unwrap(), ObjectKind::Series as u16);
        assert_eq!(starts[0].field_u16(8).unwrap(), 5);
        assert_eq!(starts[1].field_u16(4).unwrap(), ObjectKind::LegendException as u16);
        assert_eq!(starts[1].field_u16(8).unwrap(), 5);
        assert_eq!(starts[1].field_u16(10).unwrap(), 3);

        let tail: Vec<u16> = out[out.len() - 4..].iter().map(|r| r.sid).collect();
        assert_eq!(tail, vec![sid::END_BLOCK, sid::END, sid::END_BLOCK, sid::END]);
    }
}
