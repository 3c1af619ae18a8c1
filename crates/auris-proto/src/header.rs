//! DNS message header.
//!
//! The fixed 12-byte header at the start of every message:
//!
//! ```text
//!                                 1  1  1  1  1  1
//!   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                      ID                       |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    QDCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    ANCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    NSCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    ARCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! ```
//!
//! Opcode and rcode are kept as raw numbers here. Parsing only fails when
//! fewer than 12 bytes are available; values outside the registered
//! ranges pass through, so unusual traffic still gets decoded and shown.

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::wire::WireReader;
use crate::HEADER_SIZE;

bitflags! {
    /// Single-bit header flags (QR, AA, TC, RD, RA, Z, AD, CD).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HeaderFlags: u16 {
        /// Message is a response.
        const RESPONSE = 0x8000;
        /// Responder is authoritative for the name.
        const AUTHORITATIVE = 0x0400;
        /// Message was truncated by the transport.
        const TRUNCATED = 0x0200;
        /// Recursion desired.
        const RECURSION_DESIRED = 0x0100;
        /// Recursion available.
        const RECURSION_AVAILABLE = 0x0080;
        /// Reserved bit (must be zero, ignored on receive).
        const ZERO = 0x0040;
        /// Authentic data (DNSSEC).
        const AUTHENTIC_DATA = 0x0020;
        /// Checking disabled (DNSSEC).
        const CHECKING_DISABLED = 0x0010;
    }
}

/// Mask and shift for the opcode bits inside the flags word.
const OPCODE_MASK: u16 = 0x7800;
const OPCODE_SHIFT: u16 = 11;
/// Mask for the rcode bits.
const RCODE_MASK: u16 = 0x000F;

/// The fixed DNS message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Transaction identifier. Zero in most multicast mDNS traffic.
    pub id: u16,
    /// Single-bit flags.
    pub flags: HeaderFlags,
    /// Raw 4-bit opcode.
    pub opcode: u8,
    /// Raw 4-bit response code.
    pub rcode: u8,
    /// Number of entries in the question section.
    pub question_count: u16,
    /// Number of records in the answer section.
    pub answer_count: u16,
    /// Number of records in the authority section.
    pub authority_count: u16,
    /// Number of records in the additional section.
    pub additional_count: u16,
}

impl Header {
    /// Parses the header from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::buffer_too_short(HEADER_SIZE, data.len()));
        }
        let mut reader = WireReader::new(data);
        let id = reader.read_u16()?;
        let raw_flags = reader.read_u16()?;
        Ok(Self {
            id,
            flags: HeaderFlags::from_bits_truncate(raw_flags),
            opcode: ((raw_flags & OPCODE_MASK) >> OPCODE_SHIFT) as u8,
            rcode: (raw_flags & RCODE_MASK) as u8,
            question_count: reader.read_u16()?,
            answer_count: reader.read_u16()?,
            authority_count: reader.read_u16()?,
            additional_count: reader.read_u16()?,
        })
    }

    /// Returns true if this is a response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.flags.contains(HeaderFlags::RESPONSE)
    }

    /// Returns true if this is a query.
    #[inline]
    pub fn is_query(&self) -> bool {
        !self.is_response()
    }

    /// Total record count across the three record sections.
    pub fn record_count(&self) -> usize {
        usize::from(self.answer_count)
            + usize::from(self.authority_count)
            + usize::from(self.additional_count)
    }

    /// Encodes the header into its 12-byte wire form.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let raw_flags = self.flags.bits()
            | (u16::from(self.opcode) << OPCODE_SHIFT) & OPCODE_MASK
            | u16::from(self.rcode) & RCODE_MASK;

        let mut out = [0u8; HEADER_SIZE];
        out[0..2].copy_from_slice(&self.id.to_be_bytes());
        out[2..4].copy_from_slice(&raw_flags.to_be_bytes());
        out[4..6].copy_from_slice(&self.question_count.to_be_bytes());
        out[6..8].copy_from_slice(&self.answer_count.to_be_bytes());
        out[8..10].copy_from_slice(&self.authority_count.to_be_bytes());
        out[10..12].copy_from_slice(&self.additional_count.to_be_bytes());
        out
    }
}

impl Default for Header {
    fn default() -> Self {
        Self {
            id: 0,
            flags: HeaderFlags::empty(),
            opcode: 0,
            rcode: 0,
            question_count: 0,
            answer_count: 0,
            authority_count: 0,
            additional_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_header() {
        // id 0x1234, flags 0x8400 (QR + AA), one answer.
        let data = [
            0x12, 0x34, 0x84, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        ];
        let header = Header::parse(&data).unwrap();
        assert_eq!(header.id, 0x1234);
        assert!(header.is_response());
        assert!(header.flags.contains(HeaderFlags::AUTHORITATIVE));
        assert!(!header.flags.contains(HeaderFlags::TRUNCATED));
        assert_eq!(header.opcode, 0);
        assert_eq!(header.rcode, 0);
        assert_eq!(header.question_count, 0);
        assert_eq!(header.answer_count, 1);
        assert_eq!(header.record_count(), 1);
    }

    #[test]
    fn test_parse_extracts_opcode_and_rcode() {
        // Opcode 5 (UPDATE), rcode 3 (NXDOMAIN).
        let data = [
            0x00, 0x00, 0xA8, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        let header = Header::parse(&data).unwrap();
        assert_eq!(header.opcode, 5);
        assert_eq!(header.rcode, 3);
    }

    #[test]
    fn test_parse_keeps_unregistered_values() {
        // Opcode 15 and rcode 15 are unassigned but must not fail.
        let data = [
            0x00, 0x00, 0x78, 0x0F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        let header = Header::parse(&data).unwrap();
        assert_eq!(header.opcode, 15);
        assert_eq!(header.rcode, 15);
    }

    #[test]
    fn test_parse_too_short() {
        let data = [0x12, 0x34, 0x84];
        assert!(matches!(
            Header::parse(&data),
            Err(Error::BufferTooShort {
                expected: 12,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_encode_roundtrip() {
        let header = Header {
            id: 0xBEEF,
            flags: HeaderFlags::RESPONSE | HeaderFlags::AUTHORITATIVE,
            opcode: 0,
            rcode: 0,
            question_count: 1,
            answer_count: 2,
            authority_count: 0,
            additional_count: 3,
        };
        let parsed = Header::parse(&header.encode()).unwrap();
        assert_eq!(parsed, header);
    }
}
