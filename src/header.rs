//! Fixed-offset decoding of USTAR header blocks.
//!
//! Every archive member is preceded by a 512-byte header block. The fields
//! this crate decodes, with offsets relative to the block start:
//!
//! | Offset | Size | Field    | Encoding                        |
//! |--------|------|----------|---------------------------------|
//! | 0      | 100  | name     | null-terminated text            |
//! | 100    | 8    | mode     | octal text, kept as a string    |
//! | 108    | 8    | uid      | octal text                      |
//! | 116    | 8    | gid      | octal text                      |
//! | 124    | 12   | size     | octal text                      |
//! | 136    | 12   | mtime    | octal text (Unix epoch seconds) |
//! | 156    | 1    | typeflag | raw byte                        |
//! | 265    | 32   | uname    | null-terminated text            |
//! | 297    | 32   | gname    | null-terminated text            |
//!
//! The checksum (148), linkname (157), ustar magic (257) and version (263),
//! device numbers (329) and path prefix (345) occupy their slots in the
//! layout struct but are neither validated nor surfaced.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;
use zerocopy::{FromBytes, Immutable, KnownLayout};

/// Size of a tar header block in bytes.
pub const HEADER_SIZE: usize = 512;

/// Errors produced while decoding a single header block.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// The provided window is shorter than one header block.
    #[error("insufficient data: expected {HEADER_SIZE} bytes, got {0}")]
    InsufficientData(usize),

    /// A numeric field has no parseable leading octal digits, or its value
    /// overflows u64.
    #[error("malformed octal in {field} field: {bytes:?}")]
    MalformedField {
        /// Name of the offending header field.
        field: &'static str,
        /// The raw field bytes, for diagnostics.
        bytes: Vec<u8>,
    },
}

/// Result type for header decoding operations.
pub type Result<T> = std::result::Result<T, HeaderError>;

/// Raw 512-byte USTAR header block with named fields.
///
/// The struct is a direct image of the on-disk layout, accessed in place
/// via [`zerocopy`]; decoding a header allocates nothing.
#[derive(Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct UstarHeader {
    /// Member path (null-terminated if shorter than 100 bytes).
    pub name: [u8; 100],
    /// Permission bits in octal ASCII.
    pub mode: [u8; 8],
    /// Owner user ID in octal ASCII.
    pub uid: [u8; 8],
    /// Owner group ID in octal ASCII.
    pub gid: [u8; 8],
    /// Content size in octal ASCII.
    pub size: [u8; 12],
    /// Modification time as a Unix timestamp in octal ASCII.
    pub mtime: [u8; 12],
    /// Header checksum; not validated by this crate.
    pub checksum: [u8; 8],
    /// Entry type flag.
    pub typeflag: u8,
    /// Link target; not surfaced by this crate.
    pub linkname: [u8; 100],
    /// Format magic ("ustar\0"); ignored.
    pub magic: [u8; 6],
    /// Format version ("00"); ignored.
    pub version: [u8; 2],
    /// Owner user name (null-terminated).
    pub uname: [u8; 32],
    /// Owner group name (null-terminated).
    pub gname: [u8; 32],
    /// Device major number; ignored.
    pub devmajor: [u8; 8],
    /// Device minor number; ignored.
    pub devminor: [u8; 8],
    /// Path prefix for long names; ignored.
    pub prefix: [u8; 155],
    /// Padding to fill the 512-byte block.
    pub pad: [u8; 12],
}

impl UstarHeader {
    /// Decode the header block at the start of `bytes`.
    ///
    /// Returns a borrowed view; nothing is copied.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::InsufficientData`] if `bytes` is shorter than
    /// one full block.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(HeaderError::InsufficientData(bytes.len()));
        }
        Self::ref_from_bytes(&bytes[..HEADER_SIZE])
            .map_err(|_| HeaderError::InsufficientData(bytes.len()))
    }

    /// The member path, truncated at the first NUL.
    ///
    /// An all-zero header decodes to an empty name, which the walker treats
    /// as the end-of-archive marker.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        decode_text(&self.name)
    }

    /// The permission field as raw octal text (e.g. `"000644 "`).
    ///
    /// Kept as a string rather than parsed; callers that want the numeric
    /// bits can run it through [`parse_octal`].
    #[must_use]
    pub fn mode_text(&self) -> Cow<'_, str> {
        decode_text(&self.mode)
    }

    /// Owner user ID.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::MalformedField`] if the field is not octal.
    pub fn uid(&self) -> Result<u64> {
        parse_octal(&self.uid, "uid")
    }

    /// Owner group ID.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::MalformedField`] if the field is not octal.
    pub fn gid(&self) -> Result<u64> {
        parse_octal(&self.gid, "gid")
    }

    /// Content size in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::MalformedField`] if the field is not octal.
    pub fn entry_size(&self) -> Result<u64> {
        parse_octal(&self.size, "size")
    }

    /// Modification time, in seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::MalformedField`] if the field is not octal.
    pub fn mtime(&self) -> Result<u64> {
        parse_octal(&self.mtime, "mtime")
    }

    /// Owner user name, truncated at the first NUL.
    #[must_use]
    pub fn username(&self) -> Cow<'_, str> {
        decode_text(&self.uname)
    }

    /// Owner group name, truncated at the first NUL.
    #[must_use]
    pub fn groupname(&self) -> Cow<'_, str> {
        decode_text(&self.gname)
    }
}

impl fmt::Debug for UstarHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UstarHeader")
            .field("name", &self.name())
            .field("typeflag", &self.typeflag)
            .field("size", &self.entry_size().ok())
            .finish_non_exhaustive()
    }
}

/// Truncate a byte slice at the first NUL.
///
/// Used to extract null-terminated strings from fixed-size fields. A field
/// that fills its window with non-NUL bytes is returned in full.
///
/// # Example
///
/// ```
/// use tarbuf::truncate_null;
///
/// assert_eq!(truncate_null(b"hello\0world"), b"hello");
/// assert_eq!(truncate_null(b"no null here"), b"no null here");
/// ```
#[must_use]
pub fn truncate_null(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(pos) => &bytes[..pos],
        None => bytes,
    }
}

/// Decode a null-terminated text field, replacing invalid UTF-8 with U+FFFD.
fn decode_text(field: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(truncate_null(field))
}

/// Parse an octal ASCII field into a u64.
///
/// Leading spaces are skipped; parsing then consumes octal digits and stops
/// at the first other byte, so the historical NUL or space padding at the
/// tail of a field is tolerated:
///
/// - `"0000644\0"` → 420
/// - `"     123 "` → 83
/// - `"7\0garbage"` → 7
///
/// # Errors
///
/// Returns [`HeaderError::MalformedField`] if no leading octal digits exist
/// at all (an empty or fully non-numeric field), or if the value overflows.
pub fn parse_octal(field: &[u8], name: &'static str) -> Result<u64> {
    let malformed = || HeaderError::MalformedField {
        field: name,
        bytes: field.to_vec(),
    };

    let start = field.iter().position(|&b| b != b' ').unwrap_or(field.len());

    let mut value: u64 = 0;
    let mut digits = 0;
    for &byte in &field[start..] {
        if !byte.is_ascii_digit() || byte > b'7' {
            break;
        }
        value = value
            .checked_mul(8)
            .and_then(|v| v.checked_add(u64::from(byte - b'0')))
            .ok_or_else(malformed)?;
        digits += 1;
    }

    if digits == 0 {
        return Err(malformed());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        assert_eq!(size_of::<UstarHeader>(), HEADER_SIZE);
    }

    #[test]
    fn test_from_bytes_insufficient() {
        let short = [0u8; 100];
        let result = UstarHeader::from_bytes(&short);
        assert!(matches!(result, Err(HeaderError::InsufficientData(100))));
    }

    #[test]
    fn test_parse_octal() {
        assert_eq!(parse_octal(b"0000644\0", "mode").unwrap(), 0o644);
        assert_eq!(parse_octal(b"0000755\0", "mode").unwrap(), 0o755);
        assert_eq!(parse_octal(b"     123 ", "uid").unwrap(), 0o123);
        assert_eq!(parse_octal(b"0", "uid").unwrap(), 0);
        assert_eq!(parse_octal(b"77777777777\0", "size").unwrap(), 0o77777777777);
    }

    #[test]
    fn test_parse_octal_stops_at_first_invalid_digit() {
        // Everything after the leading run of digits is padding or garbage;
        // the leading run alone decides the value.
        assert_eq!(parse_octal(b"123zzz45", "size").unwrap(), 0o123);
        assert_eq!(parse_octal(b"7\0\0\0\0\0", "size").unwrap(), 7);
        assert_eq!(parse_octal(b"12 34", "size").unwrap(), 0o12);
        // 8 is not an octal digit.
        assert_eq!(parse_octal(b"1280", "size").unwrap(), 0o12);
    }

    #[test]
    fn test_parse_octal_no_digits() {
        assert!(parse_octal(b"", "uid").is_err());
        assert!(parse_octal(b"\0\0\0\0", "uid").is_err());
        assert!(parse_octal(b"        ", "uid").is_err());
        assert!(parse_octal(b"zzz", "uid").is_err());
        // Spaces are skipped but a NUL is not a digit.
        assert!(parse_octal(b"   \0\0\0", "uid").is_err());
    }

    #[test]
    fn test_parse_octal_overflow() {
        let field = [b'7'; 32];
        assert!(matches!(
            parse_octal(&field, "size"),
            Err(HeaderError::MalformedField { field: "size", .. })
        ));
    }

    #[test]
    fn test_truncate_null() {
        assert_eq!(truncate_null(b"hello\0world"), b"hello");
        assert_eq!(truncate_null(b"no null"), b"no null");
        assert_eq!(truncate_null(b"\0start"), b"");
        assert_eq!(truncate_null(b""), b"");
    }

    #[test]
    fn test_name_without_terminator_decodes_in_full() {
        let mut block = [0u8; HEADER_SIZE];
        block[..100].fill(b'x');
        let header = UstarHeader::from_bytes(&block).unwrap();
        assert_eq!(header.name().len(), 100);
    }

    #[test]
    fn test_accessors() {
        let mut block = [0u8; HEADER_SIZE];
        block[..5].copy_from_slice(b"a.txt");
        block[100..107].copy_from_slice(b"000644\0");
        block[108..112].copy_from_slice(b"1750");
        block[116..120].copy_from_slice(b"1750");
        block[124..129].copy_from_slice(b"00005");
        block[136..147].copy_from_slice(b"14632404747");
        block[156] = b'0';
        block[265..269].copy_from_slice(b"user");
        block[297..302].copy_from_slice(b"group");

        let header = UstarHeader::from_bytes(&block).unwrap();
        assert_eq!(header.name(), "a.txt");
        assert_eq!(header.mode_text(), "000644");
        assert_eq!(header.uid().unwrap(), 0o1750);
        assert_eq!(header.gid().unwrap(), 0o1750);
        assert_eq!(header.entry_size().unwrap(), 5);
        assert_eq!(header.mtime().unwrap(), 0o14632404747);
        assert_eq!(header.typeflag, b'0');
        assert_eq!(header.username(), "user");
        assert_eq!(header.groupname(), "group");
    }

    #[test]
    fn test_debug_impl() {
        let block = [0u8; HEADER_SIZE];
        let header = UstarHeader::from_bytes(&block).unwrap();
        let _ = format!("{header:?}");
    }
}
