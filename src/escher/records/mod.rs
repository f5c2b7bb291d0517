//! Concrete Escher record kinds.
//!
//! Each leaf decodes its body with sequential little-endian reads at fixed
//! offsets. Bytes past the fixed layout are kept verbatim so that encoding
//! reproduces the input.

pub mod anchor;
pub mod blip;
pub mod bse;
pub mod colors;
pub mod drawing;
pub mod opaque;
pub mod opt;
pub mod shape;

pub use anchor::{AnchorLayout, EscherChildAnchorRecord, EscherClientAnchorRecord, EscherSpgrRecord};
pub use blip::{EscherBitmapBlip, EscherBlipRecord, EscherMetafileBlip};
pub use bse::EscherBseRecord;
pub use colors::EscherSplitMenuColorsRecord;
pub use drawing::{EscherDgRecord, EscherDggRecord, FileIdCluster};
pub use opaque::{EscherOpaqueRecord, EscherUnknownRecord};
pub use opt::EscherOptRecord;
pub use shape::{EscherSpRecord, ShapeFlags};

use super::header::{HEADER_SIZE, read_header};
use crate::common::error::{Error, Result};

/// Borrow the body of the record at `offset`, bounded by its declared length.
pub(crate) fn record_body(data: &[u8], offset: usize, record_id: u16) -> Result<&[u8]> {
    let (_, _, length) = read_header(data, offset)?;
    let start = offset + HEADER_SIZE;
    let needed = length as usize;
    let available = data.len().saturating_sub(start);
    if needed > available {
        return Err(Error::RecordTooShort {
            record_id,
            offset,
            needed,
            available,
        });
    }
    Ok(&data[start..start + needed])
}

/// Fail unless the body holds at least `needed` bytes.
pub(crate) fn require(body: &[u8], needed: usize, record_id: u16, offset: usize) -> Result<()> {
    if body.len() < needed {
        return Err(Error::RecordTooShort {
            record_id,
            offset,
            needed,
            available: body.len(),
        });
    }
    Ok(())
}
