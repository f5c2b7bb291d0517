//! Little-endian binary primitives shared by the Escher and chart layers.
//!
//! Reads and writes are bounds-checked and go through zerocopy's
//! byte-order-aware integer types, so no unaligned access or panicking
//! slice index happens on malformed input.

use super::error::{Error, Result};
use zerocopy::{FromBytes, I16, I32, IntoBytes, LE, U16, U32};

#[inline]
fn check_read(data: &[u8], offset: usize, needed: usize) -> Result<()> {
    if offset.checked_add(needed).is_none_or(|end| end > data.len()) {
        return Err(Error::InsufficientData {
            offset,
            needed,
            available: data.len().saturating_sub(offset),
        });
    }
    Ok(())
}

#[inline]
fn check_write(data: &[u8], offset: usize, needed: usize) -> Result<()> {
    if offset.checked_add(needed).is_none_or(|end| end > data.len()) {
        return Err(Error::BufferTooSmall {
            offset,
            needed,
            available: data.len().saturating_sub(offset),
        });
    }
    Ok(())
}

/// Read a byte at the given offset.
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8> {
    check_read(data, offset, 1)?;
    Ok(data[offset])
}

/// Read a little-endian u16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use officeart::common::binary::read_u16_le;
/// let data = [0x34, 0x12, 0x78, 0x56];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0x5678);
/// ```
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> Result<u16> {
    check_read(data, offset, 2)?;
    U16::<LE>::read_from_bytes(&data[offset..offset + 2])
        .map(|v| v.get())
        .map_err(|_| Error::InsufficientData {
            offset,
            needed: 2,
            available: data.len() - offset,
        })
}

/// Read a little-endian i16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use officeart::common::binary::read_i16_le;
/// let data = [0xF0, 0xFF];
/// assert_eq!(read_i16_le(&data, 0).unwrap(), -16i16);
/// ```
#[inline]
pub fn read_i16_le(data: &[u8], offset: usize) -> Result<i16> {
    check_read(data, offset, 2)?;
    I16::<LE>::read_from_bytes(&data[offset..offset + 2])
        .map(|v| v.get())
        .map_err(|_| Error::InsufficientData {
            offset,
            needed: 2,
            available: data.len() - offset,
        })
}

/// Read a little-endian u32 from a byte slice at the given offset.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    check_read(data, offset, 4)?;
    U32::<LE>::read_from_bytes(&data[offset..offset + 4])
        .map(|v| v.get())
        .map_err(|_| Error::InsufficientData {
            offset,
            needed: 4,
            available: data.len() - offset,
        })
}

/// Read a little-endian i32 from a byte slice at the given offset.
#[inline]
pub fn read_i32_le(data: &[u8], offset: usize) -> Result<i32> {
    check_read(data, offset, 4)?;
    I32::<LE>::read_from_bytes(&data[offset..offset + 4])
        .map(|v| v.get())
        .map_err(|_| Error::InsufficientData {
            offset,
            needed: 4,
            available: data.len() - offset,
        })
}

/// Copy a fixed-size array (UIDs and similar) out of the buffer.
#[inline]
pub fn read_array<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    check_read(data, offset, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&data[offset..offset + N]);
    Ok(out)
}

/// Borrow `len` bytes starting at `offset`.
#[inline]
pub fn read_slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    check_read(data, offset, len)?;
    Ok(&data[offset..offset + len])
}

/// Write a byte at the given offset.
#[inline]
pub fn write_u8(data: &mut [u8], offset: usize, value: u8) -> Result<()> {
    check_write(data, offset, 1)?;
    data[offset] = value;
    Ok(())
}

/// Write a little-endian u16 at the given offset.
#[inline]
pub fn write_u16_le(data: &mut [u8], offset: usize, value: u16) -> Result<()> {
    check_write(data, offset, 2)?;
    data[offset..offset + 2].copy_from_slice(U16::<LE>::new(value).as_bytes());
    Ok(())
}

/// Write a little-endian i16 at the given offset.
#[inline]
pub fn write_i16_le(data: &mut [u8], offset: usize, value: i16) -> Result<()> {
    check_write(data, offset, 2)?;
    data[offset..offset + 2].copy_from_slice(I16::<LE>::new(value).as_bytes());
    Ok(())
}

/// Write a little-endian u32 at the given offset.
#[inline]
pub fn write_u32_le(data: &mut [u8], offset: usize, value: u32) -> Result<()> {
    check_write(data, offset, 4)?;
    data[offset..offset + 4].copy_from_slice(U32::<LE>::new(value).as_bytes());
    Ok(())
}

/// Write a little-endian i32 at the given offset.
#[inline]
pub fn write_i32_le(data: &mut [u8], offset: usize, value: i32) -> Result<()> {
    check_write(data, offset, 4)?;
    data[offset..offset + 4].copy_from_slice(I32::<LE>::new(value).as_bytes());
    Ok(())
}

/// Copy `bytes` into the buffer at the given offset.
#[inline]
pub fn write_slice(data: &mut [u8], offset: usize, bytes: &[u8]) -> Result<()> {
    check_write(data, offset, bytes.len())?;
    data[offset..offset + bytes.len()].copy_from_slice(bytes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_roundtrip() {
        let mut buf = [0u8; 12];
        write_u16_le(&mut buf, 0, 0xF00A).unwrap();
        write_i16_le(&mut buf, 2, -16).unwrap();
        write_u32_le(&mut buf, 4, 0xDEAD_BEEF).unwrap();
        write_i32_le(&mut buf, 8, -2).unwrap();

        assert_eq!(&buf[0..2], &[0x0A, 0xF0]);
        assert_eq!(read_u16_le(&buf, 0).unwrap(), 0xF00A);
        assert_eq!(read_i16_le(&buf, 2).unwrap(), -16);
        assert_eq!(read_u32_le(&buf, 4).unwrap(), 0xDEAD_BEEF);
        assert_eq!(read_i32_le(&buf, 8).unwrap(), -2);
    }

    #[test]
    fn test_out_of_bounds_read() {
        let data = [0x01, 0x02, 0x03];
        match read_u32_le(&data, 0) {
            Err(Error::InsufficientData {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 0);
                assert_eq!(needed, 4);
                assert_eq!(available, 3);
            },
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(read_u8(&data, 3).is_err());
        assert!(read_slice(&data, usize::MAX, 2).is_err());
    }

    #[test]
    fn test_out_of_bounds_write() {
        let mut buf = [0u8; 2];
        assert!(matches!(
            write_u32_le(&mut buf, 0, 1),
            Err(Error::BufferTooSmall { needed: 4, .. })
        ));
    }
}
