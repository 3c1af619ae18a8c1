//! Interpreted record payloads.
//!
//! [`RData`] covers the payloads mDNS service discovery revolves around
//! (A, AAAA, PTR, SRV, TXT). Everything else is carried as an opaque byte
//! span and displayed in RFC 3597 generic form, so unknown record types
//! flow through untouched.
//!
//! Interpretation happens against the whole message buffer rather than the
//! payload alone: PTR and SRV payloads routinely contain compression
//! pointers back into the message.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{Error, Result};
use crate::name::{Name, NameParser, NamePolicy};
use crate::rtype::{RecordType, Type};

/// An interpreted record payload, borrowing the message buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData<'a> {
    /// IPv4 address.
    A(Ipv4Addr),
    /// IPv6 address.
    Aaaa(Ipv6Addr),
    /// Pointer to another name. mDNS service enumeration lives here.
    Ptr(Name),
    /// Service locator.
    Srv {
        /// Lower values are preferred.
        priority: u16,
        /// Relative weight among equal priorities.
        weight: u16,
        /// The port the service listens on.
        port: u16,
        /// The host providing the service.
        target: Name,
    },
    /// Text strings. RFC 6763 key/value pairs in practice.
    Txt(Vec<&'a [u8]>),
    /// Any payload this crate does not interpret.
    Opaque(&'a [u8]),
}

impl<'a> RData<'a> {
    /// Interprets the payload at `message[offset..offset + len]` as the
    /// given record type.
    ///
    /// `message` must be the full datagram so that compression pointers in
    /// PTR and SRV payloads resolve. Callers are expected to have bounds
    /// checked the span already; a span past the end of `message` fails.
    pub fn parse(rtype: Type, message: &'a [u8], offset: usize, len: usize) -> Result<Self> {
        let end = offset + len;
        let rdata = message
            .get(offset..end)
            .ok_or_else(|| Error::unexpected_eof(end))?;

        let Some(known) = rtype.known() else {
            return Ok(Self::Opaque(rdata));
        };

        match known {
            RecordType::A => {
                let octets: [u8; 4] = rdata
                    .try_into()
                    .map_err(|_| Error::invalid_rdata("A", format!("{len} bytes, want 4")))?;
                Ok(Self::A(Ipv4Addr::from(octets)))
            }
            RecordType::AAAA => {
                let octets: [u8; 16] = rdata
                    .try_into()
                    .map_err(|_| Error::invalid_rdata("AAAA", format!("{len} bytes, want 16")))?;
                Ok(Self::Aaaa(Ipv6Addr::from(octets)))
            }
            RecordType::PTR => {
                let (name, _) =
                    NameParser::new(NamePolicy::MESSAGE).parse_bounded(message, offset, end)?;
                Ok(Self::Ptr(name))
            }
            RecordType::SRV => {
                if len < 6 {
                    return Err(Error::invalid_rdata("SRV", format!("{len} bytes, want >=6")));
                }
                let priority = u16::from_be_bytes([rdata[0], rdata[1]]);
                let weight = u16::from_be_bytes([rdata[2], rdata[3]]);
                let port = u16::from_be_bytes([rdata[4], rdata[5]]);
                // The target may compress against earlier message content,
                // so the parse sees the whole message; the sequential part
                // still has to fit inside the payload.
                let (target, consumed) = NameParser::new(NamePolicy::MESSAGE)
                    .parse(message, offset + 6)?;
                if consumed > len - 6 {
                    return Err(Error::invalid_rdata("SRV", "target name overruns payload"));
                }
                Ok(Self::Srv {
                    priority,
                    weight,
                    port,
                    target,
                })
            }
            RecordType::TXT => {
                // RFC 6763 permits a payload that ends without a zero
                // label, hence the lenient policy.
                let (strings, _) = NameParser::new(NamePolicy::CHARACTER_STRINGS)
                    .labels(message, offset, end)?;
                Ok(Self::Txt(strings))
            }
            _ => Ok(Self::Opaque(rdata)),
        }
    }

    /// Returns the record type this payload corresponds to, where it is
    /// determined by the variant.
    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            Self::A(_) => Some(RecordType::A),
            Self::Aaaa(_) => Some(RecordType::AAAA),
            Self::Ptr(_) => Some(RecordType::PTR),
            Self::Srv { .. } => Some(RecordType::SRV),
            Self::Txt(_) => Some(RecordType::TXT),
            Self::Opaque(_) => None,
        }
    }
}

impl fmt::Display for RData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(addr) => addr.fmt(f),
            Self::Aaaa(addr) => addr.fmt(f),
            Self::Ptr(name) => name.fmt(f),
            Self::Srv {
                priority,
                weight,
                port,
                target,
            } => write!(f, "{priority} {weight} {port} {target}"),
            Self::Txt(strings) => {
                let mut first = true;
                for string in strings {
                    if !first {
                        f.write_str(" ")?;
                    }
                    first = false;
                    fmt_txt_string(f, string)?;
                }
                Ok(())
            }
            // RFC 3597 generic presentation.
            Self::Opaque(bytes) => {
                write!(f, "\\# {}", bytes.len())?;
                if !bytes.is_empty() {
                    f.write_str(" ")?;
                    for byte in *bytes {
                        write!(f, "{byte:02x}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Writes one TXT character string, quoting and escaping it.
fn fmt_txt_string(f: &mut fmt::Formatter<'_>, string: &[u8]) -> fmt::Result {
    f.write_str("\"")?;
    for &byte in string {
        match byte {
            b'"' | b'\\' => write!(f, "\\{}", byte as char)?,
            0x20..=0x7E => write!(f, "{}", byte as char)?,
            _ => write!(f, "\\{byte:03}")?,
        }
    }
    f.write_str("\"")
}
