//! Block traversal over an in-memory archive buffer.
//!
//! The walker advances a cursor through consecutive 512-byte records: one
//! header block per member, followed by the member's data rounded up to
//! the next block boundary. The list ends at the first header whose name
//! decodes empty (an all-zero block), or when fewer than a full header's
//! worth of bytes remain.

use log::{debug, trace};

use crate::decompress::{decompress, Compression};
use crate::entry::{Attributes, Entry, EntryKind};
use crate::error::{ParseError, Result};
use crate::header::{UstarHeader, HEADER_SIZE};

/// Which parts of each entry to materialize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Listing {
    /// Metadata plus a borrowed window over each member's content.
    /// The default.
    #[default]
    Contents,
    /// Metadata only; no data windows are created and content bytes are
    /// never touched, so a truncated data region goes unnoticed.
    MetadataOnly,
}

/// Parse a raw USTAR buffer, including each member's content.
///
/// Returns the members in archive order. Each entry's `data` is a window
/// into the input buffer, which must outlive the entries.
///
/// # Errors
///
/// [`ParseError::OutOfBounds`] if a member's declared size reaches past
/// the end of the buffer, [`ParseError::Header`] if a numeric header field
/// is malformed.
pub fn parse(data: &[u8]) -> Result<Vec<Entry<'_>>> {
    parse_with(data, Listing::Contents)
}

/// Parse a raw USTAR buffer with an explicit listing mode.
pub fn parse_with(data: &[u8], listing: Listing) -> Result<Vec<Entry<'_>>> {
    let mut entries = Vec::new();
    let mut offset = 0usize;

    // Keep going while at least one full header block lies below the
    // cursor; a truncated trailing header is silently not processed.
    while data.len() > HEADER_SIZE && offset < data.len() - HEADER_SIZE {
        let header = UstarHeader::from_bytes(&data[offset..])?;

        // An all-zero block decodes to an empty name: end of the list.
        let name = header.name();
        if name.is_empty() {
            break;
        }

        let size = header.entry_size()?;
        let contents = match listing {
            Listing::MetadataOnly => None,
            Listing::Contents => Some(data_window(data, offset, size)?),
        };

        trace!("entry {name:?} ({size} bytes) at offset {offset}");
        entries.push(Entry {
            name,
            kind: EntryKind::from_byte(header.typeflag),
            size,
            attrs: Attributes {
                mode: header.mode_text(),
                uid: header.uid()?,
                gid: header.gid()?,
                mtime: header.mtime()?,
                user: header.username(),
                group: header.groupname(),
            },
            data: contents,
        });

        // Stride: the header block plus the data region rounded up to the
        // next block boundary. If the cursor would leave the addressable
        // range the loop condition could never hold again, so stop.
        let next = size
            .checked_next_multiple_of(512)
            .and_then(|padded| padded.checked_add(HEADER_SIZE as u64))
            .and_then(|stride| stride.checked_add(offset as u64))
            .and_then(|next| usize::try_from(next).ok());
        match next {
            Some(next) => offset = next,
            None => break,
        }
    }

    debug!("parsed {} entries from {} byte buffer", entries.len(), data.len());
    Ok(entries)
}

/// Slice out the data region of the entry whose header sits at `offset`.
fn data_window(data: &[u8], offset: usize, size: u64) -> Result<&[u8]> {
    let start = offset + HEADER_SIZE;
    let out_of_bounds = || ParseError::OutOfBounds {
        offset: start,
        size,
        available: data.len(),
    };
    let len = usize::try_from(size).map_err(|_| out_of_bounds())?;
    start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .ok_or_else(out_of_bounds)
}

/// An archive buffer held after decompression.
///
/// [`parse`] borrows entries straight from the caller's buffer, which a
/// compressed input cannot offer: the raw bytes only exist once the
/// decompression stage has run. `Archive` owns those bytes and hands out
/// the same borrowed entries over them.
#[derive(Debug, Clone)]
pub struct Archive {
    data: Vec<u8>,
}

impl Archive {
    /// Wrap an already-raw archive buffer.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Decompress `data` with the selected format and hold the result.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Decompression`] if the decoder rejects the
    /// input.
    pub async fn from_compressed(data: &[u8], compression: Compression) -> Result<Self> {
        Ok(Self::new(decompress(data, compression).await?))
    }

    /// The raw (decompressed) archive bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Parse the held buffer, including each member's content.
    ///
    /// # Errors
    ///
    /// Same as [`parse`].
    pub fn entries(&self) -> Result<Vec<Entry<'_>>> {
        parse(&self.data)
    }

    /// Parse the held buffer with an explicit listing mode.
    ///
    /// # Errors
    ///
    /// Same as [`parse_with`].
    pub fn entries_with(&self, listing: Listing) -> Result<Vec<Entry<'_>>> {
        parse_with(&self.data, listing)
    }
}

impl From<Vec<u8>> for Archive {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}
