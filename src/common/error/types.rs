//! Error enum shared by the Escher and chart layers.
use thiserror::Error;

/// Main error type for OfficeArt operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A fixed-size read ran past the end of the buffer
    #[error("Insufficient data at offset {offset}: need {needed} bytes, {available} available")]
    InsufficientData {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A record body is shorter than its fixed layout requires
    #[error(
        "Record 0x{record_id:04X} at offset {offset} is too short: need {needed} bytes, {available} available"
    )]
    RecordTooShort {
        record_id: u16,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A complex property declares more data than the record holds
    #[error(
        "Could not read complex property 0x{property_number:04X}: length was {declared}, but only {available} bytes left"
    )]
    PropertySizeMismatch {
        property_number: u16,
        declared: usize,
        available: usize,
    },

    /// The chart grammar expected a different record at a mandatory position
    #[error("Unexpected chart record at index {index}: expected 0x{expected:04X}, found {}", describe_found(.found))]
    UnexpectedRecord {
        index: usize,
        expected: u16,
        found: Option<u16>,
    },

    /// A value does not fit the width of its length field
    #[error("{field} is too long: {len} bytes, at most {max} fit")]
    FieldTooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A chart record body does not fit the 16-bit BIFF length field
    #[error("Chart record 0x{sid:04X} is too large: {len} bytes")]
    RecordTooLarge { sid: u16, len: usize },

    /// Block markers were left open at the end of a chart serialize pass
    #[error("Unbalanced chart block markers: {0} left open")]
    UnbalancedBlocks(usize),

    /// The serialize target cannot hold the record
    #[error("Buffer too small at offset {offset}: need {needed} bytes, {available} available")]
    BufferTooSmall {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Deflate or inflate failure in a picture payload
    #[error("Compression error: {0}")]
    Compression(String),
}

fn describe_found(found: &Option<u16>) -> String {
    match found {
        Some(sid) => format!("0x{sid:04X}"),
        None => "end of stream".to_string(),
    }
}

/// Result type for OfficeArt operations.
pub type Result<T> = std::result::Result<T, Error>;
