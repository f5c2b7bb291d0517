//! OfficeArt (Escher) drawing records.
//!
//! Escher is the drawing layer shared by the Office binary formats (DOC,
//! XLS, PPT). Records form a tree: containers hold child records, leaves
//! carry fixed layouts, and option records carry property tables.
//!
//! # Modules
//!
//! - `header`: the 8-byte record header codec
//! - `types`: record type ids and names
//! - `properties`: shape property tables (simple, complex and array properties)
//! - `records`: concrete leaf records
//! - `container`: container records and the child decoding loop
//! - `record`: the closed record enum with fill/serialize dispatch
//! - `factory`: id-to-kind resolution and decode options
//! - `listener`: serialization hooks
//! - `parser`: whole-buffer decode and encode
//! - `compression`: DEFLATE for metafile blips
//! - `dump`: textual tree listing

pub mod compression;
pub mod container;
pub mod dump;
pub mod factory;
pub mod header;
pub mod listener;
pub mod parser;
pub mod properties;
pub mod record;
pub mod records;
pub mod types;

pub use container::EscherContainerRecord;
pub use dump::dump_records;
pub use factory::{DecodeOptions, DefaultEscherRecordFactory, EscherRecordFactory};
pub use header::{EscherRecordHeader, HEADER_SIZE, RecordHeader, read_header, write_header};
pub use listener::{EscherSerializationListener, NullListener, OffsetRecorder};
pub use parser::{EscherParser, decode_records, encode_records, records_size, serialize_records};
pub use properties::{ArrayProperty, EscherProperty};
pub use record::EscherRecord;
pub use records::*;
pub use types::{EscherRecordType, record_id};
