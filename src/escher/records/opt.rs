//! Shape option records (`Opt` 0xF00B and `TertiaryOpt` 0xF122).
//!
//! The instance field holds the number of properties in the table. Decoding
//! keeps file order so an untouched record encodes to the same bytes; every
//! mutator re-sorts by property number and refreshes the instance.

use super::{record_body, require};
use crate::common::binary::write_slice;
use crate::common::error::Result;
use crate::escher::header::{HEADER_SIZE, RecordHeader};
use crate::escher::properties::{
    EscherProperty, decode_property_list, property_list_size, sort_properties, write_property_list,
};
use crate::escher::types::record_id;
use bytes::Bytes;

/// Version nibble of freshly created option records.
const OPT_VERSION: u16 = 0x0003;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherOptRecord {
    pub(crate) header: RecordHeader,
    properties: Vec<EscherProperty>,
    remaining: Bytes,
}

impl Default for EscherOptRecord {
    fn default() -> Self {
        Self::with_header(RecordHeader::new(OPT_VERSION, record_id::OPT))
    }
}

impl EscherOptRecord {
    /// Empty option record with the given id (`Opt` or `TertiaryOpt`).
    pub fn new(record_id: u16) -> Self {
        Self::with_header(RecordHeader::new(OPT_VERSION, record_id))
    }

    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            properties: Vec::new(),
            remaining: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        let count = self.header.instance() as usize;
        require(body, count * 6, self.header.record_id(), offset)?;
        self.properties = decode_property_list(body, 0, count)?;
        let used = property_list_size(&self.properties);
        self.remaining = Bytes::copy_from_slice(&body[used..]);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        let written = write_property_list(&self.properties, data, offset)?;
        write_slice(data, offset + written, &self.remaining)?;
        Ok(self.body_size())
    }

    pub(crate) fn body_size(&self) -> usize {
        property_list_size(&self.properties) + self.remaining.len()
    }

    pub fn properties(&self) -> &[EscherProperty] {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut [EscherProperty] {
        &mut self.properties
    }

    /// First property with the given property number.
    pub fn lookup(&self, property_number: u16) -> Option<&EscherProperty> {
        self.properties
            .iter()
            .find(|p| p.property_number() == property_number)
    }

    pub fn lookup_mut(&mut self, property_number: u16) -> Option<&mut EscherProperty> {
        self.properties
            .iter_mut()
            .find(|p| p.property_number() == property_number)
    }

    /// Append a property, keeping the table sorted.
    pub fn add_property(&mut self, property: EscherProperty) {
        self.properties.push(property);
        self.sort_properties();
    }

    /// Replace the property with the same number, or add it.
    pub fn set_property(&mut self, property: EscherProperty) {
        let number = property.property_number();
        self.properties.retain(|p| p.property_number() != number);
        self.add_property(property);
    }

    /// Remove every property with the given number; returns how many went.
    pub fn remove_property(&mut self, property_number: u16) -> usize {
        let before = self.properties.len();
        self.properties
            .retain(|p| p.property_number() != property_number);
        let removed = before - self.properties.len();
        if removed > 0 {
            self.sort_properties();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.properties.clear();
        self.header.set_instance(0);
    }

    /// Sort by property number and refresh the instance count.
    pub fn sort_properties(&mut self) {
        sort_properties(&mut self.properties);
        self.header.set_instance(self.properties.len() as u16);
    }

    /// Whether the table is in ascending property-number order.
    pub fn is_sorted(&self) -> bool {
        self.properties
            .windows(2)
            .all(|w| w[0].property_number() <= w[1].property_number())
    }
}
