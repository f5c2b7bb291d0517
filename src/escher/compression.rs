//! DEFLATE helpers for metafile picture payloads.
//!
//! MS-ODRAW stores compressed metafiles with a ZLIB wrapper (RFC 1950);
//! payloads without the `0x78` wrapper byte are decoded as raw DEFLATE.

use crate::common::error::{Error, Result};
use flate2::Compression;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use std::io::{Read, Write};

/// Compress `data` with a ZLIB wrapper.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Largest output pre-allocation per input byte; the hint comes from the file.
const MAX_HINT_RATIO: usize = 64;

/// Inflate `data`; `size_hint` pre-sizes the output buffer, capped relative
/// to the input length.
pub fn decompress(data: &[u8], size_hint: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(size_hint.min(data.len().saturating_mul(MAX_HINT_RATIO)));
    let result = if data.first() == Some(&0x78) {
        ZlibDecoder::new(data).read_to_end(&mut out)
    } else {
        DeflateDecoder::new(data).read_to_end(&mut out)
    };
    result.map_err(|e| Error::Compression(format!("Decompression failed: {e}")))?;
    Ok(out)
}
