//! Error types for OfficeArt record decoding and encoding.
//!
//! Every fatal condition carries the byte offset or record index and the
//! record id involved, so a malformed stream can be diagnosed from the
//! message alone.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
