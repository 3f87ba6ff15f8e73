//! In-memory USTAR archive reading.
//!
//! This crate parses a USTAR-formatted tar archive that is fully resident
//! in memory and returns its members as an ordered list of [`Entry`]
//! values. Parsing is a single synchronous pass: a fixed-offset header
//! decoder ([`UstarHeader`]) is driven across the buffer by a walker that
//! strides from block to block and stops at the archive's terminating
//! all-zero header. Member content is exposed as borrowed windows into the
//! source buffer, never copied.
//!
//! Compressed buffers are expanded up front by [`decompress`] (gzip by
//! default, zstd selectable) and the raw result parsed the same way;
//! [`Archive`] owns the decompressed bytes so the borrowed entries have a
//! place to live.
//!
//! Out of scope: writing archives, GNU/PAX extended headers (long names,
//! sparse files), multi-volume archives, checksum validation, and
//! incremental parsing of data not fully in memory.
//!
//! # Example
//!
//! ```
//! use tarbuf::{parse, EntryKind};
//!
//! // One header block, one content block, one terminating zero block.
//! let mut buf = vec![0u8; 1536];
//! buf[..5].copy_from_slice(b"a.txt"); // name
//! buf[100..104].copy_from_slice(b"0644"); // mode, kept as text
//! buf[108] = b'0'; // uid
//! buf[116] = b'0'; // gid
//! buf[124..129].copy_from_slice(b"00005"); // size
//! buf[136] = b'0'; // mtime
//! buf[156] = b'0'; // typeflag: regular file
//! buf[512..517].copy_from_slice(b"hello");
//!
//! let entries = parse(&buf)?;
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].name, "a.txt");
//! assert_eq!(entries[0].kind, EntryKind::File);
//! assert_eq!(entries[0].data, Some(&b"hello"[..]));
//! assert_eq!(entries[0].text().as_deref(), Some("hello"));
//! # Ok::<(), tarbuf::ParseError>(())
//! ```
//!
//! Compressed buffers go through [`Archive`]:
//!
//! ```no_run
//! # async fn demo(gz: &[u8]) -> Result<(), tarbuf::ParseError> {
//! use tarbuf::{Archive, Compression};
//!
//! let archive = Archive::from_compressed(gz, Compression::Gzip).await?;
//! for entry in archive.entries()? {
//!     println!("{} {} ({} bytes)", entry.kind, entry.name, entry.size);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

mod archive;
mod decompress;
mod entry;
mod error;
mod header;

pub use archive::{parse, parse_with, Archive, Listing};
pub use decompress::{decompress, Compression};
pub use entry::{Attributes, Entry, EntryKind};
pub use error::{ParseError, Result};
pub use header::{parse_octal, truncate_null, HeaderError, UstarHeader, HEADER_SIZE};
