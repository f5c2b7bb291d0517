//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from
//! collaborator error types to the unified Error type.

use super::types::Error;

// The only I/O in this crate runs through flate2 streams over in-memory buffers.
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Compression(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_compression() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "corrupt deflate stream");
        let err: Error = io.into();
        assert!(matches!(err, Error::Compression(ref msg) if msg.contains("corrupt")));
    }
}
