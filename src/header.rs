//! Fixed-width binary header framing.
//!
//! Every chunked frame starts with a 15-byte header of big-endian unsigned
//! fields: mode (1 byte), chunk index (7 bytes), total chunks (7 bytes).
//! The layout is a wire constant shared with the companion app; encoder and
//! decoder must agree on it exactly, so a short or oversized header is a
//! hard error rather than something to paper over.

use thiserror::Error;

/// Field widths in declaration order: mode, chunk index, total chunks.
pub const FIELD_WIDTHS: [usize; 3] = [1, 7, 7];

/// Total header length in bytes.
pub const HEADER_LEN: usize = 15;

/// Errors from packing or parsing frame headers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Input does not hold the full fixed-width header.
    #[error("header size mismatch: need {expected} bytes, got {found}")]
    SizeMismatch { expected: usize, found: usize },

    /// A field value does not fit its declared byte width.
    #[error("value {value} does not fit in a {width}-byte header field")]
    ValueOverflow { value: u64, width: usize },

    /// The mode byte is neither chunk nor hash.
    #[error("unknown frame mode {0}")]
    UnknownMode(u64),

    /// A field width beyond the 8 bytes a `u64` field can carry.
    #[error("unsupported field width {0}")]
    UnsupportedWidth(usize),
}

/// Packs `fields` as consecutive big-endian unsigned integers of the given
/// byte widths, in order. Widths above 8 are unsupported.
pub fn pack_fields(fields: &[(u64, usize)]) -> Result<Vec<u8>, HeaderError> {
    let mut out = Vec::with_capacity(fields.iter().map(|&(_, width)| width).sum());
    for &(value, width) in fields {
        if width > 8 {
            return Err(HeaderError::UnsupportedWidth(width));
        }
        if width < 8 && value >> (8 * width) != 0 {
            return Err(HeaderError::ValueOverflow { value, width });
        }
        out.extend_from_slice(&value.to_be_bytes()[8 - width..]);
    }
    Ok(out)
}

/// Reverses [`pack_fields`]: reads one unsigned big-endian integer per width,
/// in order. Fails if a width is above 8 or `bytes` is shorter than the
/// widths require.
pub fn unpack_fields(bytes: &[u8], widths: &[usize]) -> Result<Vec<u64>, HeaderError> {
    if let Some(&width) = widths.iter().find(|&&width| width > 8) {
        return Err(HeaderError::UnsupportedWidth(width));
    }
    let expected: usize = widths.iter().sum();
    if bytes.len() < expected {
        return Err(HeaderError::SizeMismatch {
            expected,
            found: bytes.len(),
        });
    }

    let mut out = Vec::with_capacity(widths.len());
    let mut cursor = 0;
    for &width in widths {
        let mut buf = [0u8; 8];
        buf[8 - width..].copy_from_slice(&bytes[cursor..cursor + width]);
        out.push(u64::from_be_bytes(buf));
        cursor += width;
    }
    Ok(out)
}

/// What a chunked frame carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// One slice of the transfer payload.
    Chunk,
    /// The integrity hash of the whole payload.
    Hash,
}

impl FrameMode {
    pub fn as_u64(self) -> u64 {
        match self {
            FrameMode::Chunk => 0,
            FrameMode::Hash => 1,
        }
    }

    pub fn from_u64(value: u64) -> Result<Self, HeaderError> {
        match value {
            0 => Ok(FrameMode::Chunk),
            1 => Ok(FrameMode::Hash),
            other => Err(HeaderError::UnknownMode(other)),
        }
    }
}

/// Parsed form of the fixed 15-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub mode: FrameMode,
    /// 1-based chunk position; 0 for hash frames.
    pub chunk_index: u64,
    /// Total chunk count declared by the sender.
    pub total_chunks: u64,
}

impl FrameHeader {
    /// Header for payload chunk `index` (1-based) of `total`.
    pub fn chunk(index: u64, total: u64) -> Self {
        Self {
            mode: FrameMode::Chunk,
            chunk_index: index,
            total_chunks: total,
        }
    }

    /// Header for the integrity-hash frame of a `total`-chunk transfer.
    pub fn hash(total: u64) -> Self {
        Self {
            mode: FrameMode::Hash,
            chunk_index: 0,
            total_chunks: total,
        }
    }

    /// Serializes the header to its 15-byte wire form.
    pub fn pack(&self) -> Result<Vec<u8>, HeaderError> {
        pack_fields(&[
            (self.mode.as_u64(), FIELD_WIDTHS[0]),
            (self.chunk_index, FIELD_WIDTHS[1]),
            (self.total_chunks, FIELD_WIDTHS[2]),
        ])
    }

    /// Parses a header off the front of `bytes`, returning it together with
    /// the remaining payload bytes.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), HeaderError> {
        let fields = unpack_fields(bytes, &FIELD_WIDTHS)?;
        let header = Self {
            mode: FrameMode::from_u64(fields[0])?,
            chunk_index: fields[1],
            total_chunks: fields[2],
        };
        Ok((header, &bytes[HEADER_LEN..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_widths_sum_to_header_len() {
        assert_eq!(FIELD_WIDTHS.iter().sum::<usize>(), HEADER_LEN);
    }

    #[test]
    fn test_pack_parse_roundtrip() {
        let header = FrameHeader::chunk(3, 12);
        let bytes = header.pack().unwrap();
        assert_eq!(bytes.len(), HEADER_LEN);

        let (parsed, rest) = FrameHeader::parse(&bytes).unwrap();
        assert_eq!(parsed, header);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_parse_returns_payload_remainder() {
        let mut bytes = FrameHeader::hash(5).pack().unwrap();
        bytes.extend_from_slice(b"payload");

        let (parsed, rest) = FrameHeader::parse(&bytes).unwrap();
        assert_eq!(parsed.mode, FrameMode::Hash);
        assert_eq!(parsed.total_chunks, 5);
        assert_eq!(rest, b"payload");
    }

    #[test]
    fn test_big_endian_layout() {
        let bytes = FrameHeader::chunk(1, 2).pack().unwrap();
        // mode 0, then 1 and 2 right-aligned in their 7-byte fields.
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1..8], [0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(bytes[8..15], [0, 0, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn test_truncated_header_is_size_mismatch() {
        let bytes = FrameHeader::chunk(1, 1).pack().unwrap();
        let err = FrameHeader::parse(&bytes[..HEADER_LEN - 1]).unwrap_err();
        assert_eq!(
            err,
            HeaderError::SizeMismatch {
                expected: HEADER_LEN,
                found: HEADER_LEN - 1
            }
        );
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let mut bytes = FrameHeader::chunk(1, 1).pack().unwrap();
        bytes[0] = 9;
        assert_eq!(
            FrameHeader::parse(&bytes).unwrap_err(),
            HeaderError::UnknownMode(9)
        );
    }

    #[test]
    fn test_value_overflow_rejected() {
        let err = pack_fields(&[(256, 1)]).unwrap_err();
        assert_eq!(
            err,
            HeaderError::ValueOverflow {
                value: 256,
                width: 1
            }
        );
    }

    #[test]
    fn test_width_above_u64_rejected() {
        assert_eq!(
            pack_fields(&[(1, 9)]).unwrap_err(),
            HeaderError::UnsupportedWidth(9)
        );
        assert_eq!(
            unpack_fields(&[0u8; 16], &[9]).unwrap_err(),
            HeaderError::UnsupportedWidth(9)
        );
    }

    #[test]
    fn test_generic_fields_roundtrip() {
        let packed = pack_fields(&[(7, 2), (0x0123_4567, 4), (1, 1)]).unwrap();
        assert_eq!(packed.len(), 7);
        let values = unpack_fields(&packed, &[2, 4, 1]).unwrap();
        assert_eq!(values, vec![7, 0x0123_4567, 1]);
    }
}
