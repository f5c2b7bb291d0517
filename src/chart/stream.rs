//! Cursor over a flat chart record sequence.
//!
//! Block markers are dropped on construction; the grammar never sees them.
//! Every lookahead is a single record (`peek_next_sid`), except for
//! [`RecordStream::try_parse`], which runs a sub-parse and rewinds the cursor
//! if it fails.

use super::record::{ChartRecord, decode_chart_records, is_block_marker};
use crate::common::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct RecordStream {
    records: Vec<ChartRecord>,
    pos: usize,
}

impl RecordStream {
    pub fn new(records: impl IntoIterator<Item = ChartRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .filter(|r| !is_block_marker(r.sid))
                .collect(),
            pos: 0,
        }
    }

    /// Decode BIFF bytes and wrap them.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::new(decode_chart_records(data)?))
    }

    /// Index of the next record.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.pos < self.records.len()
    }

    #[inline]
    pub fn peek_next_sid(&self) -> Option<u16> {
        self.records.get(self.pos).map(|r| r.sid)
    }

    #[inline]
    pub fn peek_is(&self, sid: u16) -> bool {
        self.peek_next_sid() == Some(sid)
    }

    pub fn peek_is_any(&self, sids: &[u16]) -> bool {
        self.peek_next_sid().is_some_and(|next| sids.contains(&next))
    }

    /// Take the next record, whatever it is.
    pub fn get_next(&mut self) -> Option<ChartRecord> {
        let record = self.records.get(self.pos).cloned()?;
        self.pos += 1;
        Some(record)
    }

    /// Take the next record, failing unless it has the given sid.
    pub fn expect(&mut self, sid: u16) -> Result<ChartRecord> {
        match self.peek_next_sid() {
            Some(next) if next == sid => self.get_next().ok_or(Error::UnexpectedRecord {
                index: self.pos,
                expected: sid,
                found: None,
            }),
            found => Err(Error::UnexpectedRecord {
                index: self.pos,
                expected: sid,
                found,
            }),
        }
    }

    /// Take the next record, failing unless its sid is one of `sids`.
    ///
    /// The error names the first alternative.
    pub fn expect_any(&mut self, sids: &[u16]) -> Result<ChartRecord> {
        match self.next_if_any(sids) {
            Some(record) => Ok(record),
            None => Err(Error::UnexpectedRecord {
                index: self.pos,
                expected: sids.first().copied().unwrap_or_default(),
                found: self.peek_next_sid(),
            }),
        }
    }

    /// Take the next record only when it has the given sid.
    pub fn next_if(&mut self, sid: u16) -> Option<ChartRecord> {
        if self.peek_is(sid) { self.get_next() } else { None }
    }

    /// Take the next record only when its sid is one of `sids`.
    pub fn next_if_any(&mut self, sids: &[u16]) -> Option<ChartRecord> {
        if self.peek_is_any(sids) { self.get_next() } else { None }
    }

    /// Take records while they have the given sid.
    pub fn take_while_sid(&mut self, sid: u16) -> Vec<ChartRecord> {
        let mut taken = Vec::new();
        while let Some(record) = self.next_if(sid) {
            taken.push(record);
        }
        taken
    }

    /// Run a speculative sub-parse.
    ///
    /// On failure the cursor returns to where it was and `None` comes back;
    /// the failure itself is not an error.
    pub fn try_parse<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Option<T> {
        let start = self.pos;
        match parse(self) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::trace!(index = start, %err, "speculative chart rule did not match");
                self.pos = start;
                None
            },
        }
    }

    /// Take every record left.
    pub fn take_remaining(&mut self) -> Vec<ChartRecord> {
        let rest = self.records[self.pos..].to_vec();
        self.pos = self.records.len();
        rest
    }
}
