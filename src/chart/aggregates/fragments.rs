//! Small rules shared by several chart objects.

use smallvec::SmallVec;

use crate::chart::block::{BlockMarker, FrameContext};
use crate::chart::record::{ChartRecord, sid};
use crate::chart::serializer::ChartSerializer;
use crate::chart::stream::RecordStream;
use crate::common::error::Result;

/// `FONTLIST = FrtFontList StartObject *(Font [Fbi]) EndObject`
#[derive(Debug, Clone, PartialEq)]
pub struct FontList {
    pub frt_font_list: ChartRecord,
    pub start_object: ChartRecord,
    pub fonts: Vec<FontEntry>,
    pub end_object: ChartRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontEntry {
    pub font: ChartRecord,
    pub fbi: Option<ChartRecord>,
}

impl FontList {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let frt_font_list = stream.expect(sid::FRT_FONT_LIST)?;
        let start_object = stream.expect(sid::START_OBJECT)?;
        let mut fonts = Vec::new();
        while let Some(font) = stream.next_if(sid::FONT) {
            fonts.push(FontEntry {
                font,
                fbi: stream.next_if(sid::FBI),
            });
        }
        let end_object = stream.expect(sid::END_OBJECT)?;
        Ok(Self {
            frt_font_list,
            start_object,
            fonts,
            end_object,
        })
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.record(&self.frt_font_list)?;
        ser.record(&self.start_object)?;
        for entry in &self.fonts {
            ser.record(&entry.font)?;
            ser.optional(entry.fbi.as_ref())?;
        }
        ser.record(&self.end_object)
    }
}

/// `PICF = Begin PicF End`
#[derive(Debug, Clone, PartialEq)]
pub struct PicF {
    pub begin: ChartRecord,
    pub pic_f: ChartRecord,
    pub end: ChartRecord,
}

impl PicF {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        Ok(Self {
            begin: stream.expect(sid::BEGIN)?,
            pic_f: stream.expect(sid::PIC_F)?,
            end: stream.expect(sid::END)?,
        })
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.records([&self.begin, &self.pic_f, &self.end])
    }
}

/// `GELFRAME = 1*2GelFrame *Continue [PICF]`
#[derive(Debug, Clone, PartialEq)]
pub struct GelFrame {
    pub gel_frames: SmallVec<[ChartRecord; 2]>,
    pub continues: Vec<ChartRecord>,
    pub pic_f: Option<PicF>,
}

impl GelFrame {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let mut gel_frames = SmallVec::new();
        gel_frames.push(stream.expect(sid::GEL_FRAME)?);
        if let Some(second) = stream.next_if(sid::GEL_FRAME) {
            gel_frames.push(second);
        }
        let continues = stream.take_while_sid(sid::CONTINUE);
        let pic_f = if stream.peek_is(sid::BEGIN) {
            stream.try_parse(PicF::parse)
        } else {
            None
        };
        Ok(Self {
            gel_frames,
            continues,
            pic_f,
        })
    }

    pub fn parse_optional(stream: &mut RecordStream) -> Result<Option<Self>> {
        if stream.peek_is(sid::GEL_FRAME) {
            Self::parse(stream).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.records(&self.gel_frames)?;
        ser.records(&self.continues)?;
        if let Some(pic_f) = &self.pic_f {
            pic_f.visit(ser)?;
        }
        Ok(())
    }
}

/// A future record followed by its `ContinueFrt12`/`CrtMlFrtContinue` tail.
///
/// Covers `SHAPEPROPS`, `TEXTPROPS` and `CRTMLFRT`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuedRecord {
    pub head: ChartRecord,
    pub continues: Vec<ChartRecord>,
}

impl ContinuedRecord {
    fn parse_with(stream: &mut RecordStream, heads: &[u16], continue_sid: u16) -> Result<Self> {
        let head = stream.expect_any(heads)?;
        Ok(Self {
            head,
            continues: stream.take_while_sid(continue_sid),
        })
    }

    /// `SHAPEPROPS = ShapePropsStream *ContinueFrt12`
    pub fn parse_shape_props(stream: &mut RecordStream) -> Result<Self> {
        Self::parse_with(stream, &[sid::SHAPE_PROPS_STREAM], sid::CONTINUE_FRT12)
    }

    /// `TEXTPROPS = (RichTextStream / TextPropsStream) *ContinueFrt12`
    pub fn parse_text_props(stream: &mut RecordStream) -> Result<Self> {
        Self::parse_with(
            stream,
            &[sid::RICH_TEXT_STREAM, sid::TEXT_PROPS_STREAM],
            sid::CONTINUE_FRT12,
        )
    }

    /// `CRTMLFRT = CrtMlFrt *CrtMlFrtContinue`
    pub fn parse_crt_ml_frt(stream: &mut RecordStream) -> Result<Self> {
        Self::parse_with(stream, &[sid::CRT_ML_FRT], sid::CRT_ML_FRT_CONTINUE)
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.record(&self.head)?;
        ser.records(&self.continues)
    }
}

pub type ShapeProps = ContinuedRecord;
pub type TextProps = ContinuedRecord;
pub type CrtMlFrt = ContinuedRecord;

pub(crate) fn optional_shape_props(stream: &mut RecordStream) -> Result<Option<ShapeProps>> {
    if stream.peek_is(sid::SHAPE_PROPS_STREAM) {
        ContinuedRecord::parse_shape_props(stream).map(Some)
    } else {
        Ok(None)
    }
}

/// Up to `N` consecutive `SHAPEPROPS`.
pub(crate) fn repeated_shape_props<const N: usize>(
    stream: &mut RecordStream,
) -> Result<SmallVec<[ShapeProps; N]>> {
    let mut props = SmallVec::new();
    while props.len() < N
        && let Some(shape) = optional_shape_props(stream)?
    {
        props.push(shape);
    }
    Ok(props)
}

pub(crate) fn optional_text_props(stream: &mut RecordStream) -> Result<Option<TextProps>> {
    if stream.peek_is_any(&[sid::RICH_TEXT_STREAM, sid::TEXT_PROPS_STREAM]) {
        ContinuedRecord::parse_text_props(stream).map(Some)
    } else {
        Ok(None)
    }
}

pub(crate) fn optional_crt_ml_frt(stream: &mut RecordStream) -> Result<Option<CrtMlFrt>> {
    if stream.peek_is(sid::CRT_ML_FRT) {
        ContinuedRecord::parse_crt_ml_frt(stream).map(Some)
    } else {
        Ok(None)
    }
}

pub(crate) fn visit_optional(ser: &mut ChartSerializer<'_>, part: Option<&ContinuedRecord>) -> Result<()> {
    match part {
        Some(part) => part.visit(ser),
        None => Ok(()),
    }
}

/// `FRAME = Frame Begin LineFormat AreaFormat [GELFRAME] [SHAPEPROPS] End`
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub frame: ChartRecord,
    pub begin: ChartRecord,
    pub line_format: ChartRecord,
    pub area_format: ChartRecord,
    pub gel_frame: Option<GelFrame>,
    pub shape_props: Option<ShapeProps>,
    pub end: ChartRecord,
}

impl Frame {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        Ok(Self {
            frame: stream.expect(sid::FRAME)?,
            begin: stream.expect(sid::BEGIN)?,
            line_format: stream.expect(sid::LINE_FORMAT)?,
            area_format: stream.expect(sid::AREA_FORMAT)?,
            gel_frame: GelFrame::parse_optional(stream)?,
            shape_props: optional_shape_props(stream)?,
            end: stream.expect(sid::END)?,
        })
    }

    pub fn parse_optional(stream: &mut RecordStream) -> Result<Option<Self>> {
        if stream.peek_is(sid::FRAME) {
            Self::parse(stream).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>, context: FrameContext) -> Result<()> {
        ser.enter(BlockMarker::frame(context));
        ser.records([&self.frame, &self.begin, &self.line_format, &self.area_format])?;
        if let Some(gel_frame) = &self.gel_frame {
            gel_frame.visit(ser)?;
        }
        visit_optional(ser, self.shape_props.as_ref())?;
        ser.leave(Some(&self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::block::ObjectKind;

    fn stream(sids: &[u16]) -> RecordStream {
        RecordStream::new(sids.iter().map(|&s| ChartRecord::empty(s)))
    }

    fn visit_frame(frame: &Frame) -> Vec<ChartRecord> {
        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        frame.visit(&mut ser, FrameContext::Legend).unwrap();
        ser.finish().unwrap();
        out
    }

    #[test]
    fn test_gel_frame_with_pic_f() {
        let mut s = stream(&[
            sid::GEL_FRAME,
            sid::GEL_FRAME,
            sid::CONTINUE,
            sid::BEGIN,
            sid::PIC_F,
            sid::END,
            sid::END,
        ]);
        let gel = GelFrame::parse(&mut s).unwrap();
        assert_eq!(gel.gel_frames.len(), 2);
        assert_eq!(gel.continues.len(), 1);
        assert!(gel.pic_f.is_some());
        assert!(s.peek_is(sid::END));
    }

    #[test]
    fn test_gel_frame_begin_without_pic_f_rewinds() {
        let mut s = stream(&[sid::GEL_FRAME, sid::BEGIN, sid::POS]);
        let gel = GelFrame::parse(&mut s).unwrap();
        assert!(gel.pic_f.is_none());
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn test_frame_without_future_records_has_no_block() {
        let sids = [sid::FRAME, sid::BEGIN, sid::LINE_FORMAT, sid::AREA_FORMAT, sid::END];
        let frame = Frame::parse(&mut stream(&sids)).unwrap();
        let out = visit_frame(&frame);
        assert_eq!(out.iter().map(|r| r.sid).collect::<Vec<_>>(), sids);
    }

    #[test]
    fn test_frame_shape_props_get_a_block() {
        let frame = Frame::parse(&mut stream(&[
            sid::FRAME,
            sid::BEGIN,
            sid::LINE_FORMAT,
            sid::AREA_FORMAT,
            sid::SHAPE_PROPS_STREAM,
            sid::CONTINUE_FRT12,
            sid::END,
        ]))
        .unwrap();
        let out = visit_frame(&frame);
        let sids: Vec<u16> = out.iter().map(|r| r.sid).collect();
        assert_eq!(
            sids,
            vec![
                sid::FRAME,
                sid::BEGIN,
                sid::LINE_FORMAT,
                sid::AREA_FORMAT,
                sid::START_BLOCK,
                sid::SHAPE_PROPS_STREAM,
                sid::CONTINUE_FRT12,
                sid::END_BLOCK,
                sid::END,
            ]
        );
        assert_eq!(out[4].field_u16(4).unwrap(), ObjectKind::Frame as u16);
        assert_eq!(out[4].field_u16(6).unwrap(), FrameContext::Legend as u16);
    }

    #[test]
    fn test_font_list() {
        let list = FontList::parse(&mut stream(&[
            sid::FRT_FONT_LIST,
            sid::START_OBJECT,
            sid::FONT,
            sid::FBI,
            sid::FONT,
            sid::END_OBJECT,
        ]))
        .unwrap();
        assert_eq!(list.fonts.len(), 2);
        assert!(list.fonts[0].fbi.is_some());
        assert!(list.fonts[1].fbi.is_none());
    }

    #[test]
    fn test_text_props_alternatives() {
        let mut s = stream(&[sid::TEXT_PROPS_STREAM, sid::CONTINUE_FRT12, sid::RICH_TEXT_STREAM]);
        let first = optional_text_props(&mut s).unwrap().unwrap();
        assert_eq!(first.continues.len(), 1);
        assert!(optional_text_props(&mut s).unwrap().is_some());
        assert!(optional_text_props(&mut s).unwrap().is_none());
    }
}
