//! Resource record types.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Record types this crate knows by name.
///
/// The set covers the RFC 1035 types plus the types mDNS service
/// discovery actually uses (AAAA, SRV). Anything else still decodes; it
/// just prints as `TYPE{n}` (RFC 3597) with an opaque payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum RecordType {
    /// IPv4 host address.
    A = 1,
    /// Authoritative name server.
    NS = 2,
    /// Canonical name (alias).
    CNAME = 5,
    /// Start of authority.
    SOA = 6,
    /// Null record (experimental, RFC 1035).
    NULL = 10,
    /// Well-known service description (obsolete).
    WKS = 11,
    /// Domain name pointer.
    PTR = 12,
    /// Host information.
    HINFO = 13,
    /// Mailbox information.
    MINFO = 14,
    /// Mail exchange.
    MX = 15,
    /// Text strings.
    TXT = 16,
    /// IPv6 host address (RFC 3596).
    AAAA = 28,
    /// Service locator (RFC 2782).
    SRV = 33,
    /// Any type (query-only, RFC 1035 QTYPE `*`).
    ANY = 255,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::NULL => "NULL",
            Self::WKS => "WKS",
            Self::PTR => "PTR",
            Self::HINFO => "HINFO",
            Self::MINFO => "MINFO",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::AAAA => "AAAA",
            Self::SRV => "SRV",
            Self::ANY => "ANY",
        };
        f.write_str(name)
    }
}

/// A record type as it appears on the wire.
///
/// Every 16-bit value is representable; unrecognized values are carried
/// through rather than rejected, since a monitor must not drop traffic it
/// cannot name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// A type this crate knows by name.
    Known(RecordType),
    /// Any other type value.
    Unknown(u16),
}

impl Type {
    /// Returns the wire value.
    pub fn value(&self) -> u16 {
        match self {
            Self::Known(rtype) => (*rtype).into(),
            Self::Unknown(value) => *value,
        }
    }

    /// Returns the known record type, if any.
    pub fn known(&self) -> Option<RecordType> {
        match self {
            Self::Known(rtype) => Some(*rtype),
            Self::Unknown(_) => None,
        }
    }
}

impl From<u16> for Type {
    fn from(value: u16) -> Self {
        match RecordType::try_from(value) {
            Ok(rtype) => Self::Known(rtype),
            Err(_) => Self::Unknown(value),
        }
    }
}

impl From<RecordType> for Type {
    fn from(rtype: RecordType) -> Self {
        Self::Known(rtype)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(rtype) => rtype.fmt(f),
            // RFC 3597 presentation for unknown types.
            Self::Unknown(value) => write!(f, "TYPE{value}"),
        }
    }
}
