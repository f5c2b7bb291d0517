//! Types and utilities shared by the Escher and chart layers.

// Submodule declarations
pub mod binary;
pub mod error;

// Re-exports for convenience
pub use error::{Error, Result};
