//! Resource records.
//!
//! A parsed record borrows the datagram it came from: the payload is kept
//! as an offset/length span into the message and interpreted on demand by
//! [`ResourceRecord::data`]. Parsing validates the span against the
//! message bounds, so a record that claims more payload than the datagram
//! holds is rejected up front.

use std::fmt;

use crate::class::Class;
use crate::error::{Error, Result};
use crate::name::{Name, NameParser, NamePolicy};
use crate::rdata::RData;
use crate::rtype::Type;
use crate::wire::WireReader;

/// One record from the answer, authority, or additional section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord<'a> {
    /// The name the record is about.
    pub name: Name,
    /// The record type.
    pub rtype: Type,
    /// The record class, mDNS cache-flush bit included.
    pub class: Class,
    /// Time to live in seconds. Zero in mDNS goodbye announcements.
    pub ttl: u32,
    /// The full message, needed to resolve compression in the payload.
    message: &'a [u8],
    /// Payload offset within the message.
    rdata_offset: usize,
    /// Payload length in bytes.
    rdata_len: usize,
}

impl<'a> ResourceRecord<'a> {
    /// Parses a record at `offset` within `message`.
    ///
    /// Returns the record and the number of bytes it occupies at
    /// `offset`, payload included.
    pub fn parse(message: &'a [u8], offset: usize) -> Result<(Self, usize)> {
        let (name, name_len) = NameParser::new(NamePolicy::MESSAGE).parse(message, offset)?;
        let mut reader = WireReader::at(message, offset + name_len);
        let rtype = Type::from(reader.read_u16()?);
        let class = Class::from_wire(reader.read_u16()?);
        let ttl = reader.read_u32()?;
        let rdata_len = usize::from(reader.read_u16()?);

        let rdata_offset = reader.position();
        if rdata_offset + rdata_len > message.len() {
            return Err(Error::unexpected_eof(rdata_offset + rdata_len));
        }

        let consumed = name_len + 10 + rdata_len;
        Ok((
            Self {
                name,
                rtype,
                class,
                ttl,
                message,
                rdata_offset,
                rdata_len,
            },
            consumed,
        ))
    }

    /// Returns the raw payload bytes.
    pub fn rdata(&self) -> &'a [u8] {
        &self.message[self.rdata_offset..self.rdata_offset + self.rdata_len]
    }

    /// Returns the payload length in bytes.
    pub fn rdata_len(&self) -> usize {
        self.rdata_len
    }

    /// Interprets the payload according to the record type.
    ///
    /// Fails when a known type's payload does not match its layout; the
    /// record itself remains usable and [`ResourceRecord::rdata`] still
    /// returns the raw bytes.
    pub fn data(&self) -> Result<RData<'a>> {
        RData::parse(self.rtype, self.message, self.rdata_offset, self.rdata_len)
    }

    /// Returns true if the mDNS cache-flush bit is set (RFC 6762 §10.2).
    pub fn cache_flush(&self) -> bool {
        self.class.mdns_bit()
    }
}

impl fmt::Display for ResourceRecord<'_> {
    /// Zone-file style: name, TTL, class, type, then the payload. A
    /// payload that fails interpretation falls back to the RFC 3597
    /// opaque form rather than erroring the whole line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} ",
            self.name, self.ttl, self.class, self.rtype
        )?;
        match self.data() {
            Ok(rdata) => rdata.fmt(f),
            Err(_) => RData::Opaque(self.rdata()).fmt(f),
        }
    }
}
