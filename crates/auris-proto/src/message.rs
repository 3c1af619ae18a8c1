//! Whole-message parsing.

use crate::error::Result;
use crate::header::Header;
use crate::question::Question;
use crate::record::ResourceRecord;
use crate::HEADER_SIZE;

// Smallest possible wire sizes: a root-name question and a root-name,
// empty-rdata record. Section preallocation is capped by these so a
// forged header count cannot reserve more slots than the datagram could
// possibly hold.
const MIN_QUESTION_LEN: usize = 5;
const MIN_RECORD_LEN: usize = 11;

fn section_capacity(count: u16, remaining: usize, min_entry: usize) -> usize {
    usize::from(count).min(remaining / min_entry)
}

/// A fully parsed DNS message, borrowing the datagram buffer.
///
/// Section lengths follow the header counts; a count that promises more
/// entries than the datagram holds fails the whole parse. Trailing bytes
/// after the last counted record are ignored.
#[derive(Debug, Clone)]
pub struct Message<'a> {
    /// The fixed header.
    pub header: Header,
    /// Question section.
    pub questions: Vec<Question>,
    /// Answer section.
    pub answers: Vec<ResourceRecord<'a>>,
    /// Authority section.
    pub authorities: Vec<ResourceRecord<'a>>,
    /// Additional section.
    pub additionals: Vec<ResourceRecord<'a>>,
}

impl<'a> Message<'a> {
    /// Parses a message from a datagram.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let header = Header::parse(data)?;
        let mut offset = HEADER_SIZE;

        let mut questions = Vec::with_capacity(section_capacity(
            header.question_count,
            data.len() - offset,
            MIN_QUESTION_LEN,
        ));
        for _ in 0..header.question_count {
            let (question, consumed) = Question::parse(data, offset)?;
            questions.push(question);
            offset += consumed;
        }

        let mut parse_section = |count: u16| -> Result<Vec<ResourceRecord<'a>>> {
            let mut records = Vec::with_capacity(section_capacity(
                count,
                data.len().saturating_sub(offset),
                MIN_RECORD_LEN,
            ));
            for _ in 0..count {
                let (record, consumed) = ResourceRecord::parse(data, offset)?;
                records.push(record);
                offset += consumed;
            }
            Ok(records)
        };

        let answers = parse_section(header.answer_count)?;
        let authorities = parse_section(header.authority_count)?;
        let additionals = parse_section(header.additional_count)?;

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }

    /// Iterates over all records in section order.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord<'a>> {
        self.answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter())
    }

    /// Returns true if the message carries no questions and no records.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty() && self.records().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdata::RData;
    use crate::rtype::{RecordType, Type};
    use std::net::Ipv4Addr;

    /// A response announcing host.local A 192.168.1.1, TTL 120.
    fn announcement() -> Vec<u8> {
        let mut data = Vec::new();
        // id 0x1234, flags 0x8400, one answer.
        data.extend_from_slice(&[
            0x12, 0x34, 0x84, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        ]);
        data.extend_from_slice(b"\x04host\x05local\x00");
        data.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        data.extend_from_slice(&120u32.to_be_bytes());
        data.extend_from_slice(&4u16.to_be_bytes());
        data.extend_from_slice(&[192, 168, 1, 1]);
        data
    }

    #[test]
    fn test_parse_announcement() {
        let data = announcement();
        let message = Message::parse(&data).unwrap();

        assert_eq!(message.header.id, 0x1234);
        assert!(message.header.is_response());
        assert!(message.questions.is_empty());
        assert_eq!(message.answers.len(), 1);
        assert!(message.authorities.is_empty());
        assert!(message.additionals.is_empty());

        let answer = &message.answers[0];
        assert_eq!(answer.name.to_string(), "host.local");
        assert_eq!(answer.rtype, Type::Known(RecordType::A));
        assert_eq!(answer.ttl, 120);
        assert_eq!(
            answer.data().unwrap(),
            RData::A(Ipv4Addr::new(192, 168, 1, 1))
        );
    }

    #[test]
    fn test_parse_query_with_question() {
        let mut data = Vec::new();
        data.extend_from_slice(&[
            0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]);
        data.extend_from_slice(b"\x05_http\x04_tcp\x05local\x00");
        data.extend_from_slice(&[0x00, 0x0C, 0x00, 0x01]); // PTR IN
        let message = Message::parse(&data).unwrap();
        assert!(message.header.is_query());
        assert_eq!(message.questions.len(), 1);
        assert_eq!(message.questions[0].name.to_string(), "_http._tcp.local");
    }

    #[test]
    fn test_count_exceeding_data_rejected() {
        let mut data = announcement();
        // Claim a second answer that is not there.
        data[7] = 2;
        assert!(Message::parse(&data).is_err());
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut data = announcement();
        data.extend_from_slice(&[0xFF; 8]);
        let message = Message::parse(&data).unwrap();
        assert_eq!(message.answers.len(), 1);
    }

    #[test]
    fn test_forged_counts_capped() {
        // Maximal counts in every section with an empty body: the parse
        // fails on the first missing question, and the capacity cap
        // keeps the claimed 65535-entry sections from preallocating.
        let data = [
            0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        ];
        assert!(Message::parse(&data).is_err());
        assert_eq!(section_capacity(0xFFFF, 0, MIN_RECORD_LEN), 0);
        assert_eq!(section_capacity(0xFFFF, 64, MIN_QUESTION_LEN), 12);
        assert_eq!(section_capacity(1, 512, MIN_RECORD_LEN), 1);
    }

    #[test]
    fn test_short_datagram_rejected() {
        assert!(Message::parse(&[0x12, 0x34]).is_err());
    }

    #[test]
    fn test_records_iterates_all_sections() {
        let mut data = Vec::new();
        data.extend_from_slice(&[
            0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
        ]);
        for _ in 0..2 {
            data.extend_from_slice(b"\x01a\x05local\x00");
            data.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
            data.extend_from_slice(&60u32.to_be_bytes());
            data.extend_from_slice(&4u16.to_be_bytes());
            data.extend_from_slice(&[10, 0, 0, 1]);
        }
        let message = Message::parse(&data).unwrap();
        assert_eq!(message.records().count(), 2);
        assert!(!message.is_empty());
    }
}
