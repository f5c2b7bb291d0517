//! Axis rules: AXISPARENT, AXES, IVAXIS, DVAXIS, SERIESAXIS, AXS and AXM.

use smallvec::SmallVec;

use super::chart_group::ChartGroup;
use super::fragments::{CrtMlFrt, Frame, GelFrame, ShapeProps, TextProps, optional_crt_ml_frt, optional_text_props};
use super::fragments::{repeated_shape_props, visit_optional};
use super::label::AttachedLabel;
use crate::chart::block::{FrameContext, LabelContext, MarkerSource};
use crate::chart::record::{ChartRecord, axis_parent_index, axis_type, sid};
use crate::chart::serializer::ChartSerializer;
use crate::chart::stream::RecordStream;
use crate::common::error::Result;

/// `AXS = [IFmtRecord] [Tick] [FontX] *4(AxisLine LineFormat) [AreaFormat] [GELFRAME]
/// *4SHAPEPROPS [TEXTPROPS]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisStyle {
    pub ifmt: Option<ChartRecord>,
    pub tick: Option<ChartRecord>,
    pub font_x: Option<ChartRecord>,
    pub axis_lines: SmallVec<[(ChartRecord, ChartRecord); 4]>,
    pub area_format: Option<ChartRecord>,
    pub gel_frame: Option<GelFrame>,
    pub shape_props: SmallVec<[ShapeProps; 4]>,
    pub text_props: Option<TextProps>,
}

impl AxisStyle {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let ifmt = stream.next_if(sid::IFMT_RECORD);
        let tick = stream.next_if(sid::TICK);
        let font_x = stream.next_if(sid::FONT_X);
        let mut axis_lines = SmallVec::new();
        while axis_lines.len() < 4
            && let Some(axis_line) = stream.next_if(sid::AXIS_LINE)
        {
            axis_lines.push((axis_line, stream.expect(sid::LINE_FORMAT)?));
        }
        Ok(Self {
            ifmt,
            tick,
            font_x,
            axis_lines,
            area_format: stream.next_if(sid::AREA_FORMAT),
            gel_frame: GelFrame::parse_optional(stream)?,
            shape_props: repeated_shape_props::<4>(stream)?,
            text_props: optional_text_props(stream)?,
        })
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.optional(self.ifmt.as_ref())?;
        ser.optional(self.tick.as_ref())?;
        ser.optional(self.font_x.as_ref())?;
        for (axis_line, line_format) in &self.axis_lines {
            ser.records([axis_line, line_format])?;
        }
        ser.optional(self.area_format.as_ref())?;
        if let Some(gel_frame) = &self.gel_frame {
            gel_frame.visit(ser)?;
        }
        for shape in &self.shape_props {
            shape.visit(ser)?;
        }
        visit_optional(ser, self.text_props.as_ref())
    }
}

/// `AXM = YMult StartObject ATTACHEDLABEL EndObject`
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayUnits {
    pub y_mult: ChartRecord,
    pub start_object: ChartRecord,
    pub label: AttachedLabel,
    pub end_object: ChartRecord,
}

impl DisplayUnits {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        Ok(Self {
            y_mult: stream.expect(sid::Y_MULT)?,
            start_object: stream.expect(sid::START_OBJECT)?,
            label: AttachedLabel::parse(stream)?,
            end_object: stream.expect(sid::END_OBJECT)?,
        })
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.records([&self.y_mult, &self.start_object])?;
        self.label.visit(ser, LabelContext::Axm, 0)?;
        ser.record(&self.end_object)
    }
}

/// Records that differ between the three axis rules.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisKind {
    /// `IVAXIS`: `[CatSerRange] AxcExt [CatLab]`
    Category {
        cat_ser_range: Option<ChartRecord>,
        axc_ext: ChartRecord,
        cat_lab: Option<ChartRecord>,
    },
    /// `DVAXIS`: `[ValueRange] [AXM]`
    Value {
        value_range: Option<ChartRecord>,
        display_units: Option<DisplayUnits>,
    },
    /// `SERIESAXIS`: `[CatSerRange]`
    Series { cat_ser_range: Option<ChartRecord> },
}

/// `Axis Begin <kind> AXS [CRTMLFRT] End`
#[derive(Debug, Clone, PartialEq)]
pub struct ChartAxis {
    pub axis: ChartRecord,
    pub begin: ChartRecord,
    pub kind: AxisKind,
    pub style: AxisStyle,
    pub crt_ml_frt: Option<CrtMlFrt>,
    pub end: ChartRecord,
}

impl ChartAxis {
    fn parse_with(
        stream: &mut RecordStream,
        kind: impl FnOnce(&mut RecordStream) -> Result<AxisKind>,
    ) -> Result<Self> {
        let axis = stream.expect(sid::AXIS)?;
        let begin = stream.expect(sid::BEGIN)?;
        let kind = kind(stream)?;
        Ok(Self {
            axis,
            begin,
            kind,
            style: AxisStyle::parse(stream)?,
            crt_ml_frt: optional_crt_ml_frt(stream)?,
            end: stream.expect(sid::END)?,
        })
    }

    /// `IVAXIS = Axis Begin [CatSerRange] AxcExt [CatLab] AXS [CRTMLFRT] End`
    pub fn parse_category(stream: &mut RecordStream) -> Result<Self> {
        Self::parse_with(stream, |s| {
            Ok(AxisKind::Category {
                cat_ser_range: s.next_if(sid::CAT_SER_RANGE),
                axc_ext: s.expect(sid::AXC_EXT)?,
                cat_lab: s.next_if(sid::CAT_LAB),
            })
        })
    }

    /// `DVAXIS = Axis Begin [ValueRange] [AXM] AXS [CRTMLFRT] End`
    pub fn parse_value(stream: &mut RecordStream) -> Result<Self> {
        Self::parse_with(stream, |s| {
            let value_range = s.next_if(sid::VALUE_RANGE);
            let display_units = if s.peek_is(sid::Y_MULT) {
                Some(DisplayUnits::parse(s)?)
            } else {
                None
            };
            Ok(AxisKind::Value {
                value_range,
                display_units,
            })
        })
    }

    /// `SERIESAXIS = Axis Begin [CatSerRange] AXS [CRTMLFRT] End`
    pub fn parse_series(stream: &mut RecordStream) -> Result<Self> {
        Self::parse_with(stream, |s| {
            Ok(AxisKind::Series {
                cat_ser_range: s.next_if(sid::CAT_SER_RANGE),
            })
        })
    }

    /// `Axis.wType`
    pub fn axis_type(&self) -> Result<u16> {
        axis_type(&self.axis)
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.enter(MarkerSource::Axis(self.axis.clone()));
        ser.records([&self.axis, &self.begin])?;
        match &self.kind {
            AxisKind::Category {
                cat_ser_range,
                axc_ext,
                cat_lab,
            } => {
                ser.optional(cat_ser_range.as_ref())?;
                ser.record(axc_ext)?;
                ser.optional(cat_lab.as_ref())?;
            },
            AxisKind::Value {
                value_range,
                display_units,
            } => {
                ser.optional(value_range.as_ref())?;
                if let Some(display_units) = display_units {
                    display_units.visit(ser)?;
                }
            },
            AxisKind::Series { cat_ser_range } => ser.optional(cat_ser_range.as_ref())?,
        }
        self.style.visit(ser)?;
        visit_optional(ser, self.crt_ml_frt.as_ref())?;
        ser.leave(Some(&self.end))
    }
}

/// The axis combinations AXES allows.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisSet {
    /// `IVAXIS DVAXIS [SERIESAXIS]`
    CategoryValue {
        category: ChartAxis,
        value: ChartAxis,
        series: Option<ChartAxis>,
    },
    /// `DVAXIS DVAXIS` (scatter and bubble charts)
    ValueValue { x: ChartAxis, y: ChartAxis },
}

impl AxisSet {
    pub fn axes(&self) -> Vec<&ChartAxis> {
        match self {
            Self::CategoryValue {
                category,
                value,
                series,
            } => [Some(category), Some(value), series.as_ref()].into_iter().flatten().collect(),
            Self::ValueValue { x, y } => vec![x, y],
        }
    }
}

/// `AXES = [IVAXIS DVAXIS [SERIESAXIS] / DVAXIS DVAXIS] *3ATTACHEDLABEL [PlotArea FRAME]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axes {
    pub axis_set: Option<AxisSet>,
    pub labels: Vec<AttachedLabel>,
    pub plot_area: Option<(ChartRecord, Frame)>,
}

impl Axes {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let axis_set = if stream.peek_is(sid::AXIS) {
            Some(match stream.try_parse(ChartAxis::parse_category) {
                Some(category) => AxisSet::CategoryValue {
                    category,
                    value: ChartAxis::parse_value(stream)?,
                    series: if stream.peek_is(sid::AXIS) {
                        Some(ChartAxis::parse_series(stream)?)
                    } else {
                        None
                    },
                },
                None => AxisSet::ValueValue {
                    x: ChartAxis::parse_value(stream)?,
                    y: ChartAxis::parse_value(stream)?,
                },
            })
        } else {
            None
        };
        let labels = AttachedLabel::parse_repeated(stream, 3)?;
        let plot_area = match stream.next_if(sid::PLOT_AREA) {
            Some(plot_area) => Some((plot_area, Frame::parse(stream)?)),
            None => None,
        };
        Ok(Self {
            axis_set,
            labels,
            plot_area,
        })
    }

    /// Whether the next record can start AXES.
    pub fn starts_here(stream: &RecordStream) -> bool {
        stream.peek_is_any(&[sid::AXIS, sid::TEXT, sid::PLOT_AREA])
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        if let Some(axis_set) = &self.axis_set {
            for axis in axis_set.axes() {
                axis.visit(ser)?;
            }
        }
        for (ordinal, label) in self.labels.iter().enumerate() {
            label.visit(ser, LabelContext::Axes, ordinal as u16)?;
        }
        if let Some((plot_area, frame)) = &self.plot_area {
            ser.record(plot_area)?;
            frame.visit(ser, FrameContext::Axes)?;
        }
        Ok(())
    }
}

/// `AXISPARENT = AxisParent Begin Pos [AXES] 1*4CRT End`
#[derive(Debug, Clone, PartialEq)]
pub struct AxisParent {
    pub axis_parent: ChartRecord,
    pub begin: ChartRecord,
    pub pos: ChartRecord,
    pub axes: Option<Axes>,
    pub chart_groups: SmallVec<[ChartGroup; 4]>,
    pub end: ChartRecord,
}

impl AxisParent {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let axis_parent = stream.expect(sid::AXIS_PARENT)?;
        let begin = stream.expect(sid::BEGIN)?;
        let pos = stream.expect(sid::POS)?;
        let axes = if Axes::starts_here(stream) {
            Some(Axes::parse(stream)?)
        } else {
            None
        };
        let mut chart_groups = SmallVec::new();
        chart_groups.push(ChartGroup::parse(stream)?);
        while chart_groups.len() < 4 && stream.peek_is(sid::CHART_FORMAT) {
            chart_groups.push(ChartGroup::parse(stream)?);
        }
        Ok(Self {
            axis_parent,
            begin,
            pos,
            axes,
            chart_groups,
            end: stream.expect(sid::END)?,
        })
    }

    /// `AxisParent.iax`
    pub fn axis_index(&self) -> Result<u16> {
        axis_parent_index(&self.axis_parent)
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.enter(MarkerSource::AxisGroup(self.axis_parent.clone()));
        ser.records([&self.axis_parent, &self.begin, &self.pos])?;
        if let Some(axes) = &self.axes {
            axes.visit(ser)?;
        }
        for chart_group in &self.chart_groups {
            chart_group.visit(ser)?;
        }
        ser.leave(Some(&self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_record(w_type: u16) -> ChartRecord {
        let mut body = w_type.to_le_bytes().to_vec();
        body.resize(18, 0);
        ChartRecord::new(sid::AXIS, body)
    }

    fn records(sids: &[u16]) -> Vec<ChartRecord> {
        sids.iter().map(|&s| ChartRecord::empty(s)).collect()
    }

    fn category_axis() -> Vec<ChartRecord> {
        let mut out = vec![axis_record(0)];
        out.extend(records(&[sid::BEGIN, sid::CAT_SER_RANGE, sid::AXC_EXT, sid::TICK, sid::END]));
        out
    }

    fn value_axis(with_units: bool) -> Vec<ChartRecord> {
        let mut out = vec![axis_record(1)];
        out.extend(records(&[sid::BEGIN, sid::VALUE_RANGE]));
        if with_units {
            out.extend(records(&[
                sid::Y_MULT,
                sid::START_OBJECT,
                sid::TEXT,
                sid::BEGIN,
                sid::POS,
                sid::BRAI,
                sid::END,
                sid::END_OBJECT,
            ]));
        }
        out.extend(records(&[sid::TICK, sid::AXIS_LINE, sid::LINE_FORMAT, sid::END]));
        out
    }

    #[test]
    fn test_category_value_axes() {
        let mut input = category_axis();
        input.extend(value_axis(true));
        input.extend(records(&[sid::PLOT_AREA, sid::FRAME, sid::BEGIN, sid::LINE_FORMAT, sid::AREA_FORMAT, sid::END]));
        input.push(ChartRecord::empty(sid::CHART_FORMAT));

        let mut stream = RecordStream::new(input);
        let axes = Axes::parse(&mut stream).unwrap();
        match &axes.axis_set {
            Some(AxisSet::CategoryValue { value, series, .. }) => {
                assert!(series.is_none());
                assert!(matches!(
                    value.kind,
                    AxisKind::Value {
                        display_units: Some(_),
                        ..
                    }
                ));
                assert_eq!(value.style.axis_lines.len(), 1);
            },
            other => panic!("unexpected axis set: {other:?}"),
        }
        assert!(axes.plot_area.is_some());
        assert!(stream.peek_is(sid::CHART_FORMAT));
    }

    #[test]
    fn test_value_value_axes_fall_back() {
        let mut input = value_axis(false);
        input.extend(value_axis(false));
        let mut stream = RecordStream::new(input);
        let axes = Axes::parse(&mut stream).unwrap();
        assert!(matches!(axes.axis_set, Some(AxisSet::ValueValue { .. })));
        assert!(!stream.has_next());
    }

    #[test]
    fn test_axis_block_uses_axis_type() {
        let mut input = value_axis(false);
        input.insert(input.len() - 1, ChartRecord::empty(sid::CRT_ML_FRT));
        let axis = ChartAxis::parse_value(&mut RecordStream::new(input)).unwrap();
        assert!(axis.crt_ml_frt.is_some());

        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        axis.visit(&mut ser).unwrap();
        ser.finish().unwrap();

        let start = out.iter().find(|r| r.sid == sid::START_BLOCK).unwrap();
        assert_eq!(start.field_u16(4).unwrap(), 0x0004);
        assert_eq!(start.field_u16(8).unwrap(), 1);
    }
}
