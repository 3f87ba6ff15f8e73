//! Buffer decompression ahead of parsing.
//!
//! The walker only ever sees a raw archive buffer; this module is the
//! single boundary where a compressed buffer is expanded, by wrapping the
//! input slice in the decoder matching the selected format and draining
//! it to completion.

use async_compression::tokio::bufread::{GzipDecoder, ZstdDecoder};
use log::debug;
use tokio::io::AsyncReadExt;

use crate::error::{ParseError, Result};

/// Compression formats understood by [`decompress`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// RFC 1952 gzip. The default.
    #[default]
    Gzip,
    /// Zstandard.
    Zstd,
    /// No compression; the buffer is already a raw archive.
    None,
}

/// Fully decompress `data` into a raw archive buffer.
///
/// The transform runs to completion before returning; the parser never
/// interleaves with it.
///
/// # Errors
///
/// Returns [`ParseError::Decompression`] if the decoder rejects the input.
pub async fn decompress(data: &[u8], compression: Compression) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    match compression {
        Compression::Gzip => {
            GzipDecoder::new(data)
                .read_to_end(&mut raw)
                .await
                .map_err(ParseError::Decompression)?;
        }
        Compression::Zstd => {
            ZstdDecoder::new(data)
                .read_to_end(&mut raw)
                .await
                .map_err(ParseError::Decompression)?;
        }
        Compression::None => raw.extend_from_slice(data),
    }
    debug!(
        "decompressed {} bytes to {} ({compression:?})",
        data.len(),
        raw.len()
    );
    Ok(raw)
}
