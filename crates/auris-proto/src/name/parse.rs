//! Name parsing with RFC 1035 label compression.
//!
//! The walk understands two label types, distinguished by the top two bits
//! of the length byte:
//!
//! ```text
//!   00xxxxxx  literal label of 0..=63 bytes (0 terminates the name)
//!   11xxxxxx  compression pointer; 14-bit offset into the message
//! ```
//!
//! The reserved `01`/`10` forms are rejected. Pointers may point forward
//! or backward, but never at themselves or past the parse limit, and a
//! single name may follow at most [`MAX_COMPRESSION_JUMPS`] of them.
//!
//! The consumed-byte count reported to the caller covers only the bytes
//! read sequentially from the starting offset: following a pointer ends
//! consumption after the two pointer bytes, no matter how much of the
//! message the pointed-to tail spans.

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};

use super::Name;

/// Maximum number of compression pointers a single name may follow.
///
/// Well-formed messages need at most a handful; this cap turns pointer
/// cycles that the self-reference check alone cannot catch into a parse
/// error instead of unbounded work.
pub const MAX_COMPRESSION_JUMPS: usize = 128;

/// Controls how [`NameParser`] treats compression and termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePolicy {
    /// Whether compression pointers are followed. Names inside a message
    /// allow them; standalone contexts such as query encoding do not.
    pub allow_compression: bool,
    /// Whether the name must end with an explicit zero label. RFC 6763
    /// TXT payloads may run to the end of the record data without one.
    pub require_terminator: bool,
}

impl NamePolicy {
    /// Compression allowed, terminator required. The policy for names
    /// embedded in a message.
    pub const MESSAGE: Self = Self {
        allow_compression: true,
        require_terminator: true,
    };

    /// Compression allowed, terminator optional. The policy for TXT
    /// record payloads.
    pub const CHARACTER_STRINGS: Self = Self {
        allow_compression: true,
        require_terminator: false,
    };
}

impl Default for NamePolicy {
    fn default() -> Self {
        Self::MESSAGE
    }
}

/// Parses names out of a message buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameParser {
    policy: NamePolicy,
}

impl NameParser {
    /// Creates a parser with the given policy.
    pub fn new(policy: NamePolicy) -> Self {
        Self { policy }
    }

    /// Parses a name starting at `offset`, bounded by the full buffer.
    ///
    /// Returns the flattened name and the number of bytes consumed at
    /// `offset` (see the module docs for how pointers affect the count).
    pub fn parse(&self, data: &[u8], offset: usize) -> Result<(Name, usize)> {
        self.parse_bounded(data, offset, data.len())
    }

    /// Parses a name starting at `offset`, treating `limit` as the end of
    /// the buffer. Compression pointers must target offsets below `limit`.
    pub fn parse_bounded(&self, data: &[u8], offset: usize, limit: usize) -> Result<(Name, usize)> {
        let mut wire: SmallVec<[u8; 64]> = SmallVec::new();
        let consumed = self.walk(data, offset, limit, |label| {
            wire.push(label.len() as u8);
            wire.extend_from_slice(label);
            Ok(())
        })?;
        wire.push(0);
        Ok((Name::from_wire_unchecked(wire), consumed))
    }

    /// Collects the labels at `offset` as borrowed slices.
    ///
    /// With [`NamePolicy::CHARACTER_STRINGS`] this decodes a TXT payload:
    /// each label is one character string, and the walk ends cleanly when
    /// the cursor lands exactly on `limit`.
    pub fn labels<'a>(
        &self,
        data: &'a [u8],
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<&'a [u8]>, usize)> {
        let mut labels = Vec::new();
        let consumed = self.walk(data, offset, limit, |label| {
            labels.push(label);
            Ok(())
        })?;
        Ok((labels, consumed))
    }

    /// The shared label walk. Calls `visit` for each label in order and
    /// returns the number of bytes consumed at `offset`.
    fn walk<'a>(
        &self,
        data: &'a [u8],
        offset: usize,
        limit: usize,
        mut visit: impl FnMut(&'a [u8]) -> Result<()>,
    ) -> Result<usize> {
        let limit = limit.min(data.len());
        let mut pos = offset;
        // Set when the first pointer is followed; after that the cursor no
        // longer tracks consumption.
        let mut pointed_consumed: Option<usize> = None;
        let mut jumps = 0usize;
        let mut name_len = 1usize; // account for the terminator up front

        loop {
            if pos >= limit {
                if pos == limit && !self.policy.require_terminator {
                    // Clean end without an explicit terminator. After a
                    // pointer the cursor can sit before `offset`, so only
                    // subtract when no pointer was followed.
                    return Ok(pointed_consumed.unwrap_or_else(|| pos - offset));
                }
                return Err(Error::unexpected_eof(pos));
            }

            let control = data[pos];
            match control & 0xC0 {
                0x00 => {
                    if control == 0 {
                        pos += 1;
                        return Ok(pointed_consumed.unwrap_or_else(|| pos - offset));
                    }
                    let len = control as usize;
                    debug_assert!(len <= MAX_LABEL_LENGTH);
                    let start = pos + 1;
                    if start + len > limit {
                        return Err(Error::unexpected_eof(start + len));
                    }
                    name_len += len + 1;
                    if name_len > MAX_NAME_LENGTH {
                        return Err(Error::NameTooLong { length: name_len });
                    }
                    visit(&data[start..start + len])?;
                    pos = start + len;
                }
                0xC0 => {
                    if !self.policy.allow_compression {
                        return Err(Error::CompressionNotAllowed { offset: pos });
                    }
                    if pos + 2 > limit {
                        return Err(Error::unexpected_eof(pos + 2));
                    }
                    let target =
                        usize::from(u16::from_be_bytes([control & 0x3F, data[pos + 1]]));
                    if target == pos || target >= limit {
                        return Err(Error::InvalidCompressionPointer {
                            offset: pos,
                            target,
                        });
                    }
                    jumps += 1;
                    if jumps > MAX_COMPRESSION_JUMPS {
                        return Err(Error::TooManyCompressionJumps {
                            max_jumps: MAX_COMPRESSION_JUMPS,
                        });
                    }
                    pointed_consumed.get_or_insert_with(|| pos + 2 - offset);
                    pos = target;
                }
                value => {
                    return Err(Error::UnsupportedLabelType { offset: pos, value });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &[u8], offset: usize) -> Result<(Name, usize)> {
        NameParser::new(NamePolicy::MESSAGE).parse(data, offset)
    }

    #[test]
    fn test_simple_name() {
        let data = b"\x04host\x05local\x00";
        let (name, consumed) = parse(data, 0).unwrap();
        assert_eq!(name.to_string(), "host.local");
        assert_eq!(consumed, 12);
    }

    #[test]
    fn test_root_name() {
        let data = b"\x00";
        let (name, consumed) = parse(data, 0).unwrap();
        assert!(name.is_root());
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_compression_pointer() {
        // "local" at 0, then "host" + pointer back to it at 7.
        let data = b"\x05local\x00\x04host\xC0\x00";
        let (name, consumed) = parse(data, 7).unwrap();
        assert_eq!(name.to_string(), "host.local");
        // Consumption stops after the two pointer bytes.
        assert_eq!(consumed, 7);
    }

    #[test]
    fn test_pointer_target_ending_before_start() {
        // The pointed-to name terminates at offset 7, before the parse
        // started at 8. The consumed count must come from the pointer
        // position, not from the final cursor.
        let data = b"\x05local\x00\x00\x04host\xC0\x00";
        let (name, consumed) = parse(data, 8).unwrap();
        assert_eq!(name.to_string(), "host.local");
        assert_eq!(consumed, 7);
    }

    #[test]
    fn test_forward_pointer() {
        let data = b"\x04host\xC0\x07\x05local\x00";
        let (name, _) = parse(data, 0).unwrap();
        assert_eq!(name.to_string(), "host.local");
    }

    #[test]
    fn test_self_pointer_rejected() {
        // A pointer at offset 0 targeting offset 0 loops forever.
        let data = b"\xC0\x00";
        assert!(matches!(
            parse(data, 0),
            Err(Error::InvalidCompressionPointer { offset: 0, target: 0 })
        ));
    }

    #[test]
    fn test_pointer_past_limit_rejected() {
        let data = b"\xC0\x20";
        assert!(matches!(
            parse(data, 0),
            Err(Error::InvalidCompressionPointer { .. })
        ));
    }

    #[test]
    fn test_two_pointer_cycle_rejected() {
        // Two pointers targeting each other pass the self-reference check
        // but trip the jump cap.
        let data = b"\xC0\x02\xC0\x00";
        assert!(matches!(
            parse(data, 0),
            Err(Error::TooManyCompressionJumps { .. })
        ));
    }

    #[test]
    fn test_compression_not_allowed() {
        let policy = NamePolicy {
            allow_compression: false,
            require_terminator: true,
        };
        let data = b"\x05local\x00\x04host\xC0\x00";
        assert!(matches!(
            NameParser::new(policy).parse(data, 7),
            Err(Error::CompressionNotAllowed { offset: 12 })
        ));
    }

    #[test]
    fn test_reserved_label_type_rejected() {
        let data = b"\x40host";
        assert!(matches!(
            parse(data, 0),
            Err(Error::UnsupportedLabelType { offset: 0, value: 0x40 })
        ));
    }

    #[test]
    fn test_truncated_label() {
        let data = b"\x04ho";
        assert!(parse(data, 0).is_err());
    }

    #[test]
    fn test_missing_terminator_rejected_by_default() {
        let data = b"\x04host";
        assert!(matches!(parse(data, 0), Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn test_character_strings_without_terminator() {
        // TXT payload style: strings run to the end of the data.
        let parser = NameParser::new(NamePolicy::CHARACTER_STRINGS);
        let data = b"\x04key=\x07value=1";
        let (labels, consumed) = parser.labels(data, 0, data.len()).unwrap();
        assert_eq!(labels, vec![b"key=".as_slice(), b"value=1".as_slice()]);
        assert_eq!(consumed, data.len());
    }

    #[test]
    fn test_character_strings_with_terminator() {
        // A trailing zero still terminates cleanly under the lenient
        // policy, and counts toward consumption.
        let parser = NameParser::new(NamePolicy::CHARACTER_STRINGS);
        let data = b"\x02ab\x00";
        let (labels, consumed) = parser.labels(data, 0, data.len()).unwrap();
        assert_eq!(labels, vec![b"ab".as_slice()]);
        assert_eq!(consumed, 4);
    }

    #[test]
    fn test_character_strings_truncated() {
        // A length byte promising more than remains is still an error.
        let parser = NameParser::new(NamePolicy::CHARACTER_STRINGS);
        let data = b"\x05ab";
        assert!(parser.labels(data, 0, data.len()).is_err());
    }

    #[test]
    fn test_bounded_parse_ignores_trailing_data() {
        let data = b"\x02ab\x00\xFF\xFF";
        let (name, consumed) = NameParser::new(NamePolicy::MESSAGE)
            .parse_bounded(data, 0, 4)
            .unwrap();
        assert_eq!(name.to_string(), "ab");
        assert_eq!(consumed, 4);
    }

    #[test]
    fn test_name_length_cap() {
        // 63-byte labels chained by pointers stay under the jump cap but
        // blow the 255-byte name limit.
        let mut data = Vec::new();
        for _ in 0..4 {
            let next = data.len() + 66;
            data.push(63);
            data.extend_from_slice(&[b'a'; 63]);
            data.extend_from_slice(&(next as u16 | 0xC000).to_be_bytes());
        }
        data.push(0);
        assert!(matches!(
            parse(&data, 0),
            Err(Error::NameTooLong { .. })
        ));
    }
}
