//! Array properties: complex properties with an element-count mini-header.
//!
//! # Format
//!
//! ```text
//! Offset | Size | Field
//! -------|------|------
//! 0      | 2    | number of elements
//! 2      | 2    | number of elements in memory
//! 4      | 2    | element size (signed; negative means (-size) >> 2)
//! 6      | N    | elements
//! ```
//!
//! Writers disagree on whether the length stored in the simple part counts
//! the 6-byte header. Which convention a property used is observed on
//! decode and replayed on encode.

use crate::common::binary::{read_i16_le, read_u16_le, write_i16_le, write_u16_le, write_u32_le};
use crate::common::error::{Error, Result};

/// Size of the array mini-header.
pub const ARRAY_HEADER_SIZE: usize = 6;

/// Per-element width for a raw element-size field.
#[inline]
pub fn actual_element_width(element_size: i16) -> usize {
    if element_size < 0 {
        ((-(element_size as i32)) >> 2) as usize
    } else {
        element_size as usize
    }
}

/// Total complex-part length for `count` elements of `element_size`.
#[inline]
pub fn array_size_in_bytes(count: u16, element_size: i16) -> usize {
    count as usize * actual_element_width(element_size) + ARRAY_HEADER_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayProperty {
    id: u16,
    data: Vec<u8>,
    size_includes_header: bool,
    empty_complex_part: bool,
}

impl ArrayProperty {
    /// Create an array property; empty data becomes an all-zero mini-header.
    pub fn new(id: u16, data: Vec<u8>) -> Self {
        let empty_complex_part = data.is_empty();
        let data = if empty_complex_part {
            vec![0u8; ARRAY_HEADER_SIZE]
        } else {
            data
        };
        Self {
            id,
            data,
            size_includes_header: true,
            empty_complex_part,
        }
    }

    /// Shell created from a simple-part entry; the complex part is read later.
    pub(crate) fn with_declared_length(id: u16, declared: usize) -> Self {
        Self {
            id,
            data: Vec::new(),
            size_includes_header: true,
            empty_complex_part: declared == 0,
        }
    }

    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Read the complex part at `offset`, returning the bytes consumed.
    ///
    /// The consumed length comes from the mini-header, not `declared`; a
    /// declared length equal to the element bytes alone marks the property
    /// as excluding its header.
    pub(crate) fn fill_complex_part(&mut self, data: &[u8], offset: usize, declared: usize) -> Result<usize> {
        if self.empty_complex_part {
            self.data.clear();
            return Ok(0);
        }

        let property_number = self.id & super::PROPERTY_NUMBER_MASK;
        let available = data.len().saturating_sub(offset);
        if available < ARRAY_HEADER_SIZE {
            return Err(Error::PropertySizeMismatch {
                property_number,
                declared: ARRAY_HEADER_SIZE,
                available,
            });
        }

        let count = read_u16_le(data, offset)?;
        let element_size = read_i16_le(data, offset + 4)?;
        let element_bytes = count as usize * actual_element_width(element_size);
        if element_bytes == declared {
            self.size_includes_header = false;
        }

        let total = element_bytes + ARRAY_HEADER_SIZE;
        if available < total {
            return Err(Error::PropertySizeMismatch {
                property_number,
                declared: total,
                available,
            });
        }

        self.data.clear();
        self.data.extend_from_slice(&data[offset..offset + total]);
        Ok(total)
    }

    /// Number of elements; zero for an empty complex part.
    pub fn element_count(&self) -> u16 {
        if self.empty_complex_part {
            return 0;
        }
        read_u16_le(&self.data, 0).unwrap_or(0)
    }

    pub fn elements_in_memory(&self) -> u16 {
        if self.empty_complex_part {
            return 0;
        }
        read_u16_le(&self.data, 2).unwrap_or(0)
    }

    /// Raw element-size field; zero for an empty complex part.
    pub fn element_size(&self) -> i16 {
        if self.empty_complex_part {
            return 0;
        }
        read_i16_le(&self.data, 4).unwrap_or(0)
    }

    /// Resize the array to `count` elements, keeping the element size.
    pub fn set_element_count(&mut self, count: u16) -> Result<()> {
        let element_size = self.element_size();
        self.resize(count, element_size)
    }

    /// Change the element size, keeping the element count.
    pub fn set_element_size(&mut self, element_size: i16) -> Result<()> {
        let count = self.element_count();
        self.resize(count, element_size)
    }

    fn resize(&mut self, count: u16, element_size: i16) -> Result<()> {
        self.empty_complex_part = false;
        self.data.resize(array_size_in_bytes(count, element_size), 0);
        write_u16_le(&mut self.data, 0, count)?;
        write_u16_le(&mut self.data, 2, count)?;
        write_i16_le(&mut self.data, 4, element_size)
    }

    /// Borrow element `index`.
    pub fn element(&self, index: usize) -> Option<&[u8]> {
        if index >= self.element_count() as usize {
            return None;
        }
        let width = actual_element_width(self.element_size());
        let start = ARRAY_HEADER_SIZE + index * width;
        self.data.get(start..start + width)
    }

    /// Overwrite element `index`; extra input bytes are ignored.
    pub fn set_element(&mut self, index: usize, element: &[u8]) -> bool {
        if index >= self.element_count() as usize {
            return false;
        }
        let width = actual_element_width(self.element_size());
        let start = ARRAY_HEADER_SIZE + index * width;
        let len = width.min(element.len());
        match self.data.get_mut(start..start + len) {
            Some(slot) => {
                slot.copy_from_slice(&element[..len]);
                true
            },
            None => false,
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &[u8]> {
        (0..self.element_count() as usize).filter_map(move |i| self.element(i))
    }

    #[inline]
    pub fn size_includes_header(&self) -> bool {
        self.size_includes_header
    }

    pub fn set_size_includes_header(&mut self, includes: bool) {
        self.size_includes_header = includes;
    }

    #[inline]
    pub fn is_empty_complex_part(&self) -> bool {
        self.empty_complex_part
    }

    #[inline]
    pub fn complex_data(&self) -> &[u8] {
        &self.data
    }

    /// Length written into the simple part.
    pub fn declared_length(&self) -> u32 {
        let len = self.data.len();
        let len = if self.size_includes_header {
            len
        } else {
            len.saturating_sub(ARRAY_HEADER_SIZE)
        };
        len as u32
    }

    pub(crate) fn serialize_simple_part(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_u16_le(data, offset, self.id)?;
        write_u32_le(data, offset + 2, self.declared_length())?;
        Ok(6)
    }
}
