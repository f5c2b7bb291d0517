//! Serialization hooks.
//!
//! Every record calls the listener immediately before and after writing
//! itself, including each child of a container, so tooling can map records
//! to byte offsets in the output.

use super::record::EscherRecord;

pub trait EscherSerializationListener {
    /// Called before `record` is written at `offset`.
    fn before_record_serialize(&mut self, offset: usize, record_id: u16, record: &EscherRecord);

    /// Called after `record` is written; `offset` points just past it.
    fn after_record_serialize(&mut self, offset: usize, record_id: u16, size: usize, record: &EscherRecord);
}

/// Listener that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullListener;

impl EscherSerializationListener for NullListener {
    #[inline]
    fn before_record_serialize(&mut self, _offset: usize, _record_id: u16, _record: &EscherRecord) {}

    #[inline]
    fn after_record_serialize(&mut self, _offset: usize, _record_id: u16, _size: usize, _record: &EscherRecord) {}
}

/// Listener that records `(record_id, start, end)` for every record written.
#[derive(Debug, Default, Clone)]
pub struct OffsetRecorder {
    spans: Vec<(u16, usize, usize)>,
    open: Vec<usize>,
}

impl OffsetRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spans in completion order: children before their container.
    pub fn spans(&self) -> &[(u16, usize, usize)] {
        &self.spans
    }
}

impl EscherSerializationListener for OffsetRecorder {
    fn before_record_serialize(&mut self, offset: usize, _record_id: u16, _record: &EscherRecord) {
        self.open.push(offset);
    }

    fn after_record_serialize(&mut self, offset: usize, record_id: u16, _size: usize, _record: &EscherRecord) {
        let start = self.open.pop().unwrap_or(offset);
        self.spans.push((record_id, start, offset));
    }
}
