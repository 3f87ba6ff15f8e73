//! Crate-level error types.

use thiserror::Error;

use crate::header::HeaderError;

/// Errors that can occur while parsing an archive buffer.
///
/// All failures are terminal for the call that produced them; there is no
/// retry logic in this crate. The empty-name header that ends an archive
/// is normal control flow and never surfaces as an error.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An entry's declared data region extends past the end of the buffer.
    #[error("entry data out of bounds: {size} bytes at offset {offset}, buffer holds {available}")]
    OutOfBounds {
        /// Offset of the data region within the buffer.
        offset: usize,
        /// Size declared by the entry's header.
        size: u64,
        /// Total length of the buffer.
        available: usize,
    },

    /// A header field could not be decoded.
    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    /// The decompression stream rejected the input (wrong or unsupported
    /// format, corrupted stream).
    #[error("decompression failed")]
    Decompression(#[source] std::io::Error),
}

/// Result type for archive parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
