//! officeart - OfficeArt (Escher) drawing records and BIFF chart aggregates
//!
//! This library reads and writes the two record layers that sit under the
//! drawings and charts of the Office binary formats (.doc, .xls, .ppt):
//!
//! - **Escher records**: the 8-byte-header record tree used for shapes,
//!   drawing groups, shape properties and pictures. Every record survives a
//!   decode/encode cycle byte for byte, including records this crate does
//!   not model.
//! - **Chart aggregates**: the BIFF chart substream grouped into its grammar
//!   (CHARTFORMATS, AXISPARENT, CRT, ...), with `StartBlock`/`EndBlock`
//!   markers rebuilt on write.
//!
//! The host file format (OLE storage, workbook streams) is not handled here;
//! callers hand in the bytes of a drawing or chart stream.
//!
//! # Example - Building and decoding a shape container
//!
//! ```
//! use officeart::escher::{
//!     EscherContainerRecord, EscherRecord, EscherSpRecord, ShapeFlags, decode_records, record_id,
//! };
//!
//! # fn main() -> officeart::Result<()> {
//! let mut container = EscherContainerRecord::new(record_id::SP_CONTAINER);
//! container.add_child(EscherRecord::Sp(EscherSpRecord::new(
//!     202,
//!     1025,
//!     ShapeFlags::HAVE_ANCHOR | ShapeFlags::HAVE_SPT,
//! )));
//!
//! let bytes = EscherRecord::Container(container).to_bytes()?;
//! assert_eq!(bytes.len(), 24);
//!
//! let records = decode_records(&bytes)?;
//! assert_eq!(records[0].child_records().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Re-serializing a chart substream
//!
//! ```no_run
//! use officeart::chart::{ChartSheet, ChartWriteOptions};
//!
//! # fn main() -> officeart::Result<()> {
//! # let stream: Vec<u8> = Vec::new();
//! let sheet = ChartSheet::from_bytes(&stream)?;
//! println!("{} series", sheet.formats.series.len());
//! let bytes = sheet.to_bytes(ChartWriteOptions::default())?;
//! # let _ = bytes;
//! # Ok(())
//! # }
//! ```

/// Binary primitives and the crate error type.
pub mod common;

/// OfficeArt (Escher) record codec
///
/// Headers, the record factory, containers, leaf records, shape
/// properties and picture blips.
pub mod escher;

/// BIFF chart record grammar
///
/// Groups a flat chart record stream into grammar nodes and writes it back
/// with block markers.
pub mod chart;

pub use common::error::{Error, Result};
