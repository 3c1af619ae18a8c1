//! Question section entries.

use std::fmt;

use crate::class::Class;
use crate::error::Result;
use crate::name::{Name, NameParser, NamePolicy};
use crate::rtype::Type;
use crate::wire::WireReader;

/// One entry from a message's question section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// The name being asked about.
    pub name: Name,
    /// The requested record type.
    pub qtype: Type,
    /// The question class, mDNS unicast-response bit included.
    pub qclass: Class,
}

impl Question {
    /// Parses a question at `offset` within `data`.
    ///
    /// Returns the question and the number of bytes it occupies at
    /// `offset`.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (name, name_len) = NameParser::new(NamePolicy::MESSAGE).parse(data, offset)?;
        let mut reader = WireReader::at(data, offset + name_len);
        let qtype = Type::from(reader.read_u16()?);
        let qclass = Class::from_wire(reader.read_u16()?);
        Ok((
            Self {
                name,
                qtype,
                qclass,
            },
            name_len + 4,
        ))
    }

    /// Returns true if the questioner asked for a unicast response
    /// (RFC 6762 §5.4, the QU bit).
    pub fn unicast_response(&self) -> bool {
        self.qclass.mdns_bit()
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.qclass, self.qtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtype::RecordType;

    #[test]
    fn test_parse_question() {
        let mut data = Vec::new();
        data.extend_from_slice(b"\x04host\x05local\x00");
        data.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]); // A IN
        let (question, consumed) = Question::parse(&data, 0).unwrap();
        assert_eq!(question.name.to_string(), "host.local");
        assert_eq!(question.qtype, Type::Known(RecordType::A));
        assert!(question.qclass.is_internet());
        assert!(!question.unicast_response());
        assert_eq!(consumed, data.len());
    }

    #[test]
    fn test_parse_question_qu_bit() {
        let mut data = Vec::new();
        data.extend_from_slice(b"\x04host\x05local\x00");
        data.extend_from_slice(&[0x00, 0xFF, 0x80, 0x01]); // ANY IN + QU
        let (question, _) = Question::parse(&data, 0).unwrap();
        assert!(question.unicast_response());
        assert!(question.qclass.is_internet());
    }

    #[test]
    fn test_parse_question_truncated() {
        let data = b"\x04host\x05local\x00\x00\x01";
        assert!(Question::parse(data, 0).is_err());
    }

    #[test]
    fn test_question_display() {
        let data = b"\x01a\x05local\x00\x00\x0C\x00\x01";
        let (question, _) = Question::parse(data, 0).unwrap();
        assert_eq!(question.to_string(), "a.local IN PTR");
    }
}
