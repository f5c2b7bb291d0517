//! Text labels: ATTACHEDLABEL, AI and DFTTEXT.

use super::fragments::{CrtMlFrt, Frame, TextProps, optional_crt_ml_frt, optional_text_props, visit_optional};
use crate::chart::block::{BlockMarker, FrameContext, LabelContext, MarkerSource};
use crate::chart::record::{ChartRecord, default_text_id, sid};
use crate::chart::serializer::ChartSerializer;
use crate::chart::stream::RecordStream;
use crate::common::error::Result;

/// `AI = BRAI [SeriesText]`
#[derive(Debug, Clone, PartialEq)]
pub struct Ai {
    pub brai: ChartRecord,
    pub series_text: Option<ChartRecord>,
}

impl Ai {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        Ok(Self {
            brai: stream.expect(sid::BRAI)?,
            series_text: stream.next_if(sid::SERIES_TEXT),
        })
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.record(&self.brai)?;
        ser.optional(self.series_text.as_ref())
    }
}

/// `ATTACHEDLABEL = Text Begin Pos [FontX] [AlRuns] AI [FRAME] [ObjectLink]
/// [DataLabExtContents] [CrtLayout12] [TEXTPROPS] [CRTMLFRT] End`
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedLabel {
    pub text: ChartRecord,
    pub begin: ChartRecord,
    pub pos: ChartRecord,
    pub font_x: Option<ChartRecord>,
    pub al_runs: Option<ChartRecord>,
    pub ai: Ai,
    pub frame: Option<Frame>,
    pub object_link: Option<ChartRecord>,
    pub data_lab_ext_contents: Option<ChartRecord>,
    pub crt_layout12: Option<ChartRecord>,
    pub text_props: Option<TextProps>,
    pub crt_ml_frt: Option<CrtMlFrt>,
    pub end: ChartRecord,
}

impl AttachedLabel {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        Ok(Self {
            text: stream.expect(sid::TEXT)?,
            begin: stream.expect(sid::BEGIN)?,
            pos: stream.expect(sid::POS)?,
            font_x: stream.next_if(sid::FONT_X),
            al_runs: stream.next_if(sid::AL_RUNS),
            ai: Ai::parse(stream)?,
            frame: Frame::parse_optional(stream)?,
            object_link: stream.next_if(sid::OBJECT_LINK),
            data_lab_ext_contents: stream.next_if(sid::DATA_LAB_EXT_CONTENTS),
            crt_layout12: stream.next_if(sid::CRT_LAYOUT12),
            text_props: optional_text_props(stream)?,
            crt_ml_frt: optional_crt_ml_frt(stream)?,
            end: stream.expect(sid::END)?,
        })
    }

    pub fn parse_optional(stream: &mut RecordStream) -> Result<Option<Self>> {
        if stream.peek_is(sid::TEXT) {
            Self::parse(stream).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parse labels while a `Text` record comes next, up to `max`.
    pub fn parse_repeated(stream: &mut RecordStream, max: usize) -> Result<Vec<Self>> {
        let mut labels = Vec::new();
        while labels.len() < max
            && let Some(label) = Self::parse_optional(stream)?
        {
            labels.push(label);
        }
        Ok(labels)
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>, context: LabelContext, ordinal: u16) -> Result<()> {
        self.visit_in(ser, BlockMarker::attached_label(context, ordinal).into())
    }

    pub(crate) fn visit_in(&self, ser: &mut ChartSerializer<'_>, marker: MarkerSource) -> Result<()> {
        ser.enter(marker);
        ser.records([&self.text, &self.begin, &self.pos])?;
        ser.optional(self.font_x.as_ref())?;
        ser.optional(self.al_runs.as_ref())?;
        self.ai.visit(ser)?;
        if let Some(frame) = &self.frame {
            frame.visit(ser, FrameContext::AttachedLabel)?;
        }
        ser.optional(self.object_link.as_ref())?;
        ser.optional(self.data_lab_ext_contents.as_ref())?;
        ser.optional(self.crt_layout12.as_ref())?;
        visit_optional(ser, self.text_props.as_ref())?;
        visit_optional(ser, self.crt_ml_frt.as_ref())?;
        ser.leave(Some(&self.end))
    }
}

/// A label optionally wrapped in `DataLabExt StartObject ... EndObject`.
///
/// The tail of CHARTFORMATS repeats `[DataLabExt StartObject] ATTACHEDLABEL [EndObject]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataLabel {
    pub data_lab_ext: Option<ChartRecord>,
    pub start_object: Option<ChartRecord>,
    pub label: AttachedLabel,
    pub end_object: Option<ChartRecord>,
}

impl DataLabel {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let data_lab_ext = stream.next_if(sid::DATA_LAB_EXT);
        let start_object = match data_lab_ext {
            Some(_) => Some(stream.expect(sid::START_OBJECT)?),
            None => None,
        };
        Ok(Self {
            data_lab_ext,
            start_object,
            label: AttachedLabel::parse(stream)?,
            end_object: stream.next_if(sid::END_OBJECT),
        })
    }

    pub fn visit(&self, ser: &mut ChartSerializer<'_>, context: LabelContext, ordinal: u16) -> Result<()> {
        ser.optional(self.data_lab_ext.as_ref())?;
        ser.optional(self.start_object.as_ref())?;
        self.label.visit(ser, context, ordinal)?;
        ser.optional(self.end_object.as_ref())
    }
}

/// `DFTTEXT = [DataLabExt StartObject] DefaultText ATTACHEDLABEL [EndObject]`
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultText {
    pub data_lab_ext: Option<ChartRecord>,
    pub start_object: Option<ChartRecord>,
    pub default_text: ChartRecord,
    pub label: AttachedLabel,
    pub end_object: Option<ChartRecord>,
}

impl DefaultText {
    pub fn parse(stream: &mut RecordStream) -> Result<Self> {
        let data_lab_ext = stream.next_if(sid::DATA_LAB_EXT);
        let start_object = match data_lab_ext {
            Some(_) => Some(stream.expect(sid::START_OBJECT)?),
            None => None,
        };
        Ok(Self {
            data_lab_ext,
            start_object,
            default_text: stream.expect(sid::DEFAULT_TEXT)?,
            label: AttachedLabel::parse(stream)?,
            end_object: stream.next_if(sid::END_OBJECT),
        })
    }

    /// `*2DFTTEXT`
    pub fn parse_repeated(stream: &mut RecordStream) -> Result<Vec<Self>> {
        let mut texts = Vec::new();
        while texts.len() < 2 && stream.peek_is_any(&[sid::DEFAULT_TEXT, sid::DATA_LAB_EXT]) {
            texts.push(Self::parse(stream)?);
        }
        Ok(texts)
    }

    /// `DefaultText.id` of this entry.
    pub fn text_id(&self) -> Result<u16> {
        default_text_id(&self.default_text)
    }

    /// The label block is keyed by `DefaultText.id`.
    pub fn visit(&self, ser: &mut ChartSerializer<'_>) -> Result<()> {
        ser.optional(self.data_lab_ext.as_ref())?;
        ser.optional(self.start_object.as_ref())?;
        ser.record(&self.default_text)?;
        self.label.visit_in(ser, MarkerSource::DefaultTextLabel(self.default_text.clone()))?;
        ser.optional(self.end_object.as_ref())
    }
}
