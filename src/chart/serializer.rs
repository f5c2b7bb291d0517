//! Serialize pass over chart aggregates.
//!
//! Aggregates walk their records in file order and hand them to a
//! [`ChartSerializer`]. The serializer owns the block-marker bookkeeping for
//! exactly one pass: an object opened with [`ChartSerializer::enter`] only gets
//! a `StartBlock` once a future record shows up inside it, and the matching
//! `EndBlock` goes out right before the object's `End`.

use super::block::{BlockMarker, MarkerSource};
use super::record::ChartRecord;
use crate::common::error::{Error, Result};

/// Receiver of serialized chart records.
pub trait RecordVisitor {
    fn visit_record(&mut self, record: &ChartRecord) -> Result<()>;
}

impl RecordVisitor for Vec<ChartRecord> {
    fn visit_record(&mut self, record: &ChartRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

impl RecordVisitor for Vec<u8> {
    fn visit_record(&mut self, record: &ChartRecord) -> Result<()> {
        record.write_to(self)
    }
}

/// Sink that only counts encoded bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SizeCounter {
    pub records: usize,
    pub bytes: usize,
}

impl RecordVisitor for SizeCounter {
    fn visit_record(&mut self, record: &ChartRecord) -> Result<()> {
        self.records += 1;
        self.bytes += record.encoded_size();
        Ok(())
    }
}

/// Knobs for a serialize pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartWriteOptions {
    /// Wrap future records in `StartBlock`/`EndBlock` pairs.
    pub emit_block_markers: bool,
}

impl Default for ChartWriteOptions {
    fn default() -> Self {
        Self {
            emit_block_markers: true,
        }
    }
}

impl ChartWriteOptions {
    pub const fn with_block_markers(mut self, emit: bool) -> Self {
        self.emit_block_markers = emit;
        self
    }
}

#[derive(Debug, Clone)]
struct Frame {
    source: MarkerSource,
    opened: bool,
}

/// Per-pass writer state.
pub struct ChartSerializer<'a> {
    sink: &'a mut dyn RecordVisitor,
    options: ChartWriteOptions,
    frames: Vec<Frame>,
    open_blocks: Vec<BlockMarker>,
}

impl<'a> ChartSerializer<'a> {
    pub fn new(sink: &'a mut dyn RecordVisitor) -> Self {
        Self::with_options(sink, ChartWriteOptions::default())
    }

    pub fn with_options(sink: &'a mut dyn RecordVisitor, options: ChartWriteOptions) -> Self {
        Self {
            sink,
            options,
            frames: Vec::new(),
            open_blocks: Vec::new(),
        }
    }

    #[inline]
    pub fn options(&self) -> ChartWriteOptions {
        self.options
    }

    /// Blocks currently open.
    #[inline]
    pub fn open_block_count(&self) -> usize {
        self.open_blocks.len()
    }

    /// Start an object that owns a block.
    ///
    /// The marker is resolved only if a future record later opens the block.
    pub fn enter(&mut self, marker: impl Into<MarkerSource>) {
        self.frames.push(Frame {
            source: marker.into(),
            opened: false,
        });
    }

    /// Write one record, opening pending blocks first if it is a future record.
    pub fn record(&mut self, record: &ChartRecord) -> Result<()> {
        if self.options.emit_block_markers && record.is_future_record() {
            self.open_pending_blocks()?;
        }
        self.sink.visit_record(record)
    }

    pub fn records<'r>(&mut self, records: impl IntoIterator<Item = &'r ChartRecord>) -> Result<()> {
        for record in records {
            self.record(record)?;
        }
        Ok(())
    }

    pub fn optional(&mut self, record: Option<&ChartRecord>) -> Result<()> {
        match record {
            Some(record) => self.record(record),
            None => Ok(()),
        }
    }

    /// Finish the innermost object: close its block if one was opened,
    /// then write its `End` record.
    pub fn leave(&mut self, end: Option<&ChartRecord>) -> Result<()> {
        if let Some(frame) = self.frames.pop()
            && frame.opened
        {
            let marker = self.open_blocks.pop().ok_or(Error::UnbalancedBlocks(0))?;
            self.sink.visit_record(&marker.end_record())?;
        }
        match end {
            Some(end) => self.sink.visit_record(end),
            None => Ok(()),
        }
    }

    /// End the pass; every block must be closed.
    pub fn finish(self) -> Result<()> {
        let open = self.open_blocks.len().max(self.frames.len());
        if open > 0 {
            return Err(Error::UnbalancedBlocks(open));
        }
        Ok(())
    }

    fn open_pending_blocks(&mut self) -> Result<()> {
        for frame in self.frames.iter_mut().filter(|f| !f.opened) {
            let marker = frame.source.resolve()?;
            tracing::trace!(kind = ?marker.kind, "opening chart block");
            self.sink.visit_record(&marker.start_record())?;
            self.open_blocks.push(marker);
            frame.opened = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::block::ObjectKind;
    use crate::chart::record::sid;

    fn sids(records: &[ChartRecord]) -> Vec<u16> {
        records.iter().map(|r| r.sid).collect()
    }

    #[test]
    fn test_no_block_without_future_record() {
        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        ser.enter(BlockMarker::legend());
        ser.record(&ChartRecord::empty(sid::LEGEND)).unwrap();
        ser.leave(Some(&ChartRecord::empty(sid::END))).unwrap();
        ser.finish().unwrap();
        assert_eq!(sids(&out), vec![sid::LEGEND, sid::END]);
    }

    #[test]
    fn test_nested_blocks_open_outermost_first() {
        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        ser.enter(BlockMarker::sheet());
        ser.record(&ChartRecord::empty(sid::CHART)).unwrap();
        ser.enter(BlockMarker::legend());
        ser.record(&ChartRecord::empty(sid::CRT_LAYOUT12)).unwrap();
        ser.leave(Some(&ChartRecord::empty(sid::END))).unwrap();
        ser.leave(Some(&ChartRecord::empty(sid::END))).unwrap();
        ser.finish().unwrap();

        assert_eq!(
            sids(&out),
            vec![
                sid::CHART,
                sid::START_BLOCK,
                sid::START_BLOCK,
                sid::CRT_LAYOUT12,
                sid::END_BLOCK,
                sid::END,
                sid::END_BLOCK,
                sid::END,
            ]
        );
        assert_eq!(out[1].field_u16(4).unwrap(), ObjectKind::Sheet as u16);
        assert_eq!(out[2].field_u16(4).unwrap(), ObjectKind::Legend as u16);
    }

    #[test]
    fn test_markers_disabled() {
        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::with_options(&mut out, ChartWriteOptions::default().with_block_markers(false));
        ser.enter(BlockMarker::data_table());
        ser.record(&ChartRecord::empty(sid::CRT_ML_FRT)).unwrap();
        ser.leave(None).unwrap();
        ser.finish().unwrap();
        assert_eq!(sids(&out), vec![sid::CRT_ML_FRT]);
    }

    #[test]
    fn test_marker_fields_read_only_when_a_block_opens() {
        // ChartFormat without the icrt field.
        let short = ChartRecord::new(sid::CHART_FORMAT, vec![0u8; 4]);

        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        ser.enter(MarkerSource::ChartGroup(short.clone()));
        ser.record(&short).unwrap();
        ser.leave(Some(&ChartRecord::empty(sid::END))).unwrap();
        ser.finish().unwrap();

        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::with_options(&mut out, ChartWriteOptions::default().with_block_markers(false));
        ser.enter(MarkerSource::ChartGroup(short.clone()));
        ser.record(&ChartRecord::empty(sid::CRT_ML_FRT)).unwrap();
        ser.leave(None).unwrap();
        ser.finish().unwrap();

        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        ser.enter(MarkerSource::ChartGroup(short));
        assert!(matches!(
            ser.record(&ChartRecord::empty(sid::CRT_ML_FRT)),
            Err(Error::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_unbalanced_pass() {
        let mut out: Vec<ChartRecord> = Vec::new();
        let mut ser = ChartSerializer::new(&mut out);
        ser.enter(BlockMarker::sheet());
        ser.record(&ChartRecord::empty(sid::CRT_ML_FRT)).unwrap();
        assert_eq!(ser.open_block_count(), 1);
        assert!(matches!(ser.finish(), Err(Error::UnbalancedBlocks(1))));
    }

    #[test]
    fn test_byte_sink_and_counter() {
        let mut bytes: Vec<u8> = Vec::new();
        ChartSerializer::new(&mut bytes)
            .record(&ChartRecord::new(sid::POS, vec![1, 2]))
            .unwrap();
        assert_eq!(bytes, vec![0x4F, 0x10, 0x02, 0x00, 1, 2]);

        let mut counter = SizeCounter::default();
        counter.visit_record(&ChartRecord::new(sid::POS, vec![1, 2])).unwrap();
        assert_eq!((counter.records, counter.bytes), (1, 6));
    }
}
