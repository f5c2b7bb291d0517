//! Property variants carried by option records.

use super::array::ArrayProperty;
use super::meta::property_name;
use super::{BLIP_ID_FLAG, COMPLEX_FLAG, PROPERTY_NUMBER_MASK};
use crate::common::binary::{write_slice, write_u16_le, write_u32_le};
use crate::common::error::Result;
use bytes::Bytes;
use std::fmt;

/// A property with an inline 32-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleProperty {
    pub id: u16,
    pub value: i32,
}

impl SimpleProperty {
    pub const fn new(id: u16, value: i32) -> Self {
        Self { id, value }
    }
}

/// A property whose value is an opaque byte blob stored after the simple parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexProperty {
    pub id: u16,
    pub data: Bytes,
}

impl ComplexProperty {
    pub fn new(id: u16, data: impl Into<Bytes>) -> Self {
        Self {
            id: id | COMPLEX_FLAG,
            data: data.into(),
        }
    }
}

/// One entry of an option record's property table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscherProperty {
    Simple(SimpleProperty),
    /// Packed boolean flags
    Bool(SimpleProperty),
    /// Color in 0x00BBGGRR order
    Rgb(SimpleProperty),
    Shapepath(SimpleProperty),
    Complex(ComplexProperty),
    Array(ArrayProperty),
}

/// Shape path types stored in `geometry.shapepath`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapePathType {
    Lines,
    LinesClosed,
    Curves,
    CurvesClosed,
    Complex,
    Other(i32),
}

impl From<i32> for ShapePathType {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::Lines,
            1 => Self::LinesClosed,
            2 => Self::Curves,
            3 => Self::CurvesClosed,
            4 => Self::Complex,
            other => Self::Other(other),
        }
    }
}

impl EscherProperty {
    pub fn simple(id: u16, value: i32) -> Self {
        Self::Simple(SimpleProperty::new(id, value))
    }

    pub fn bool(id: u16, value: i32) -> Self {
        Self::Bool(SimpleProperty::new(id, value))
    }

    pub fn rgb(id: u16, color: u32) -> Self {
        Self::Rgb(SimpleProperty::new(id, color as i32))
    }

    pub fn complex(id: u16, data: impl Into<Bytes>) -> Self {
        Self::Complex(ComplexProperty::new(id, data))
    }

    /// Raw id including the complex and blip-id flag bits.
    pub fn id(&self) -> u16 {
        match self {
            Self::Simple(p) | Self::Bool(p) | Self::Rgb(p) | Self::Shapepath(p) => p.id,
            Self::Complex(p) => p.id,
            Self::Array(p) => p.id(),
        }
    }

    #[inline]
    pub fn property_number(&self) -> u16 {
        self.id() & PROPERTY_NUMBER_MASK
    }

    #[inline]
    pub fn is_complex(&self) -> bool {
        self.id() & COMPLEX_FLAG != 0
    }

    #[inline]
    pub fn is_blip_id(&self) -> bool {
        self.id() & BLIP_ID_FLAG != 0
    }

    pub fn name(&self) -> &'static str {
        property_name(self.property_number())
    }

    /// Inline value for simple kinds, complex length for blob kinds.
    pub fn property_value(&self) -> i32 {
        match self {
            Self::Simple(p) | Self::Bool(p) | Self::Rgb(p) | Self::Shapepath(p) => p.value,
            Self::Complex(p) => p.data.len() as i32,
            Self::Array(p) => p.declared_length() as i32,
        }
    }

    /// Complex payload, if any.
    pub fn complex_data(&self) -> Option<&[u8]> {
        match self {
            Self::Complex(p) => Some(&p.data),
            Self::Array(p) => Some(p.complex_data()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayProperty> {
        match self {
            Self::Array(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayProperty> {
        match self {
            Self::Array(p) => Some(p),
            _ => None,
        }
    }

    /// `(red, green, blue)` for color properties.
    pub fn rgb_components(&self) -> Option<(u8, u8, u8)> {
        match self {
            Self::Rgb(p) => {
                let color = p.value as u32;
                Some((
                    (color & 0xFF) as u8,
                    ((color >> 8) & 0xFF) as u8,
                    ((color >> 16) & 0xFF) as u8,
                ))
            },
            _ => None,
        }
    }

    /// Whether a bool property has any flag set.
    pub fn is_true(&self) -> Option<bool> {
        match self {
            Self::Bool(p) => Some(p.value != 0),
            _ => None,
        }
    }

    pub fn shape_path(&self) -> Option<ShapePathType> {
        match self {
            Self::Shapepath(p) => Some(ShapePathType::from(p.value)),
            _ => None,
        }
    }

    /// Serialized size: 6-byte simple part plus any complex part.
    pub fn property_size(&self) -> usize {
        6 + self.complex_part_size()
    }

    pub fn complex_part_size(&self) -> usize {
        match self {
            Self::Complex(p) => p.data.len(),
            Self::Array(p) => p.complex_data().len(),
            _ => 0,
        }
    }

    pub(crate) fn serialize_simple_part(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        match self {
            Self::Array(p) => p.serialize_simple_part(data, offset),
            _ => {
                write_u16_le(data, offset, self.id())?;
                write_u32_le(data, offset + 2, self.property_value() as u32)?;
                Ok(6)
            },
        }
    }

    pub(crate) fn serialize_complex_part(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        match self.complex_data() {
            Some(bytes) => {
                write_slice(data, offset, bytes)?;
                Ok(bytes.len())
            },
            None => Ok(0),
        }
    }
}

impl fmt::Display for EscherProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (0x{:04X}, complex={}, blip={}) ",
            self.name(),
            self.property_number(),
            self.is_complex(),
            self.is_blip_id()
        )?;
        match self {
            Self::Simple(p) | Self::Bool(p) | Self::Shapepath(p) => write!(f, "value={}", p.value),
            Self::Rgb(p) => write!(f, "color=0x{:08X}", p.value as u32),
            Self::Complex(p) => write!(f, "data={} bytes", p.data.len()),
            Self::Array(p) => write!(
                f,
                "elements={} size={} data={} bytes",
                p.element_count(),
                p.element_size(),
                p.complex_data().len()
            ),
        }
    }
}
