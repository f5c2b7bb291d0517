//! Escher shape property tables (Opt records).
//!
//! # Complex Properties
//!
//! Properties can be simple (4-byte value) or complex (variable-length data).
//! The table is stored in two passes:
//! 1. All 6-byte simple parts (`id:u16`, `value:u32`)
//! 2. All complex parts, in the same order, sized by the simple part's value
//!
//! Complex data is never interleaved with the simple parts.

pub mod array;
pub mod meta;
pub mod property;

pub use array::{ARRAY_HEADER_SIZE, ArrayProperty, actual_element_width, array_size_in_bytes};
pub use meta::{PropertyKind, property_kind, property_name};
pub use property::{ComplexProperty, EscherProperty, ShapePathType, SimpleProperty};

use crate::common::binary::{read_i32_le, read_u16_le};
use crate::common::error::{Error, Result};
use bytes::Bytes;

/// Property number bits of a property id.
pub const PROPERTY_NUMBER_MASK: u16 = 0x3FFF;
/// Set when the value references a blip store entry.
pub const BLIP_ID_FLAG: u16 = 0x4000;
/// Set when the value is the length of a complex part.
pub const COMPLEX_FLAG: u16 = 0x8000;

/// Decode `count` properties starting at `offset`.
///
/// `data` must end where the owning record's body ends; complex parts that
/// run past it fail with [`Error::PropertySizeMismatch`].
pub fn decode_property_list(data: &[u8], offset: usize, count: usize) -> Result<Vec<EscherProperty>> {
    let mut properties = Vec::with_capacity(count);
    let mut declared_lengths = Vec::with_capacity(count);
    let mut pos = offset;

    // Complex parts start after every simple part; plain blobs consume exactly
    // their declared length, so their running total must fit what follows.
    let complex_start = offset.saturating_add(count.saturating_mul(6));
    let complex_available = data.len().saturating_sub(complex_start);
    let mut complex_total = 0usize;

    for _ in 0..count {
        let id = read_u16_le(data, pos)?;
        let value = read_i32_le(data, pos + 2)?;
        pos += 6;

        let number = id & PROPERTY_NUMBER_MASK;
        let is_complex = id & COMPLEX_FLAG != 0;
        let kind = property_kind(number);

        // Negative lengths are treated as zero.
        let declared = if is_complex { value.max(0) as usize } else { 0 };
        let property = if is_complex {
            match kind {
                PropertyKind::Array => {
                    EscherProperty::Array(ArrayProperty::with_declared_length(id, declared))
                },
                _ => {
                    complex_total = complex_total.saturating_add(declared);
                    if complex_total > complex_available {
                        return Err(Error::PropertySizeMismatch {
                            property_number: number,
                            declared,
                            available: complex_available.saturating_sub(complex_total - declared),
                        });
                    }
                    EscherProperty::Complex(ComplexProperty {
                        id,
                        data: Bytes::new(),
                    })
                },
            }
        } else {
            let simple = SimpleProperty::new(id, value);
            match kind {
                PropertyKind::Bool => EscherProperty::Bool(simple),
                PropertyKind::Rgb => EscherProperty::Rgb(simple),
                PropertyKind::ShapePath => EscherProperty::Shapepath(simple),
                PropertyKind::Array | PropertyKind::Unknown => EscherProperty::Simple(simple),
            }
        };
        properties.push(property);
        declared_lengths.push(declared);
    }

    for (property, declared) in properties.iter_mut().zip(declared_lengths) {
        match property {
            EscherProperty::Array(array) => {
                pos += array.fill_complex_part(data, pos, declared)?;
            },
            EscherProperty::Complex(complex) => {
                let available = data.len().saturating_sub(pos);
                if available < declared {
                    return Err(Error::PropertySizeMismatch {
                        property_number: complex.id & PROPERTY_NUMBER_MASK,
                        declared,
                        available,
                    });
                }
                complex.data = Bytes::copy_from_slice(&data[pos..pos + declared]);
                pos += declared;
            },
            _ => {},
        }
    }

    Ok(properties)
}

/// Total encoded size of a property list.
pub fn property_list_size(properties: &[EscherProperty]) -> usize {
    properties.iter().map(EscherProperty::property_size).sum()
}

/// Write all simple parts, then all complex parts, in list order.
pub fn write_property_list(
    properties: &[EscherProperty],
    data: &mut [u8],
    offset: usize,
) -> Result<usize> {
    let mut pos = offset;
    for property in properties {
        pos += property.serialize_simple_part(data, pos)?;
    }
    for property in properties {
        pos += property.serialize_complex_part(data, pos)?;
    }
    Ok(pos - offset)
}

/// Encode a property list into a fresh buffer.
pub fn encode_property_list(properties: &[EscherProperty]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; property_list_size(properties)];
    write_property_list(properties, &mut out, 0)?;
    Ok(out)
}

/// Sort by property number; stable, so equal numbers keep their order.
pub fn sort_properties(properties: &mut [EscherProperty]) {
    properties.sort_by_key(EscherProperty::property_number);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_rotation_property() {
        let data = [0x04, 0x00, 90, 0x00, 0x00, 0x00];
        let props = decode_property_list(&data, 0, 1).unwrap();
        assert_eq!(props.len(), 1);
        assert!(matches!(props[0], EscherProperty::Simple(_)));
        assert_eq!(props[0].property_number(), 4);
        assert!(!props[0].is_complex());
        assert_eq!(props[0].property_value(), 90);
        assert_eq!(encode_property_list(&props).unwrap(), data);
    }

    #[test]
    fn test_refined_kinds() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0x81, 0x01, 0x11, 0x22, 0x33, 0x00]);
        data.extend_from_slice(&[0xBF, 0x03, 0x01, 0x00, 0x01, 0x00]);
        data.extend_from_slice(&[0x44, 0x01, 0x04, 0x00, 0x00, 0x00]);
        let props = decode_property_list(&data, 0, 3).unwrap();
        assert_eq!(props[0].rgb_components(), Some((0x11, 0x22, 0x33)));
        assert_eq!(props[1].is_true(), Some(true));
        assert_eq!(props[2].shape_path(), Some(ShapePathType::Complex));
        assert_eq!(encode_property_list(&props).unwrap(), data);
    }

    #[test]
    fn test_complex_parts_follow_simple_parts() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0x80, 0x83, 0x04, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&[0x04, 0x00, 0x00, 0x00, 0x5A, 0x00]);
        data.extend_from_slice(&[0x81, 0x83, 0x02, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&[b'A', 0, b'B', 0]);
        data.extend_from_slice(&[b'C', 0]);
        let props = decode_property_list(&data, 0, 3).unwrap();
        assert_eq!(props[0].complex_data(), Some(&[b'A', 0, b'B', 0][..]));
        assert_eq!(props[1].property_value(), 0x005A_0000);
        assert_eq!(props[2].complex_data(), Some(&[b'C', 0][..]));
        assert_eq!(encode_property_list(&props).unwrap(), data);
    }

    #[test]
    fn test_complex_size_mismatch() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0x80, 0x83, 0x10, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&[1, 2, 3]);
        match decode_property_list(&data, 0, 1) {
            Err(Error::PropertySizeMismatch {
                property_number,
                declared,
                available,
            }) => {
                assert_eq!(property_number, 0x0380);
                assert_eq!(declared, 16);
                assert_eq!(available, 3);
            },
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_oversized_declared_lengths_fail_before_reading() {
        // 4095 blobs each claiming 0x7FFFFFFF bytes, with nothing after them.
        let mut data = Vec::new();
        for _ in 0..4095 {
            data.extend_from_slice(&[0x80, 0x83, 0xFF, 0xFF, 0xFF, 0x7F]);
        }
        match decode_property_list(&data, 0, 4095) {
            Err(Error::PropertySizeMismatch {
                property_number,
                declared,
                available,
            }) => {
                assert_eq!(property_number, 0x0380);
                assert_eq!(declared, 0x7FFF_FFFF);
                assert_eq!(available, 0);
            },
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_declared_total_counts_every_blob() {
        // Each blob fits alone; together they need 6 bytes and only 4 follow.
        let mut data = Vec::new();
        data.extend_from_slice(&[0x80, 0x83, 0x03, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&[0x81, 0x83, 0x03, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&[1, 2, 3, 4]);
        assert!(matches!(
            decode_property_list(&data, 0, 2),
            Err(Error::PropertySizeMismatch {
                property_number: 0x0381,
                declared: 3,
                available: 1,
            })
        ));
    }

    #[test]
    fn test_array_property_excluding_header() {
        // vertices: 2 elements of 4 bytes, declared length 8 (header excluded)
        let mut data = Vec::new();
        data.extend_from_slice(&[0x45, 0xC1, 0x08, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&[0x02, 0x00, 0x02, 0x00, 0xF0, 0xFF]);
        data.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let props = decode_property_list(&data, 0, 1).unwrap();
        let array = props[0].as_array().unwrap();
        assert!(!array.size_includes_header());
        assert_eq!(array.element_count(), 2);
        assert_eq!(array.element_size(), -16);
        assert_eq!(array.complex_data().len(), 14);
        assert_eq!(encode_property_list(&props).unwrap(), data);
    }

    #[test]
    fn test_empty_array_property_roundtrip() {
        let data = [0x45, 0xC1, 0x00, 0x00, 0x00, 0x00];
        let props = decode_property_list(&data, 0, 1).unwrap();
        let array = props[0].as_array().unwrap();
        assert!(array.is_empty_complex_part());
        assert_eq!(array.element_count(), 0);
        assert_eq!(encode_property_list(&props).unwrap(), data);
    }

    #[test]
    fn test_sort_properties() {
        let mut props = vec![
            EscherProperty::simple(0x0181, 1),
            EscherProperty::simple(0x0004, 2),
            EscherProperty::complex(0x0080, vec![0]),
        ];
        sort_properties(&mut props);
        let numbers: Vec<u16> = props.iter().map(EscherProperty::property_number).collect();
        assert_eq!(numbers, vec![0x0004, 0x0080, 0x0181]);
    }
}
