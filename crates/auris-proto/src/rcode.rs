//! DNS response codes.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// DNS response codes.
///
/// Values up to 15 fit the header's 4-bit RCODE field; 16 and above are
/// EDNS extended codes, listed for completeness of the name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ResponseCode {
    /// No error.
    NoError = 0,
    /// Format error: the server could not interpret the query.
    FormErr = 1,
    /// Server failure.
    ServFail = 2,
    /// Name does not exist.
    NxDomain = 3,
    /// Query kind not implemented.
    NotImp = 4,
    /// Query refused by policy.
    Refused = 5,
    /// A name exists when it should not (RFC 2136).
    YxDomain = 6,
    /// An RRset exists when it should not (RFC 2136).
    YxRrSet = 7,
    /// An RRset that should exist does not (RFC 2136).
    NxRrSet = 8,
    /// Server is not authoritative for the zone (RFC 2136).
    NotAuth = 9,
    /// A name is not within the zone (RFC 2136).
    NotZone = 10,
    /// Bad OPT version (RFC 6891, extended rcode).
    BadVers = 16,
    /// Key not recognized (RFC 8945).
    BadKey = 17,
    /// Signature out of time window (RFC 8945).
    BadTime = 18,
    /// Bad TKEY mode (RFC 2930).
    BadMode = 19,
    /// Duplicate key name (RFC 2930).
    BadName = 20,
    /// Algorithm not supported (RFC 2930).
    BadAlg = 21,
    /// Bad truncation (RFC 8945).
    BadTrunc = 22,
    /// Bad or missing server cookie (RFC 7873).
    BadCookie = 23,
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoError => "NOERROR",
            Self::FormErr => "FORMERR",
            Self::ServFail => "SERVFAIL",
            Self::NxDomain => "NXDOMAIN",
            Self::NotImp => "NOTIMP",
            Self::Refused => "REFUSED",
            Self::YxDomain => "YXDOMAIN",
            Self::YxRrSet => "YXRRSET",
            Self::NxRrSet => "NXRRSET",
            Self::NotAuth => "NOTAUTH",
            Self::NotZone => "NOTZONE",
            Self::BadVers => "BADVERS",
            Self::BadKey => "BADKEY",
            Self::BadTime => "BADTIME",
            Self::BadMode => "BADMODE",
            Self::BadName => "BADNAME",
            Self::BadAlg => "BADALG",
            Self::BadTrunc => "BADTRUNC",
            Self::BadCookie => "BADCOOKIE",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rcode_roundtrip() {
        assert_eq!(ResponseCode::try_from(0u8).unwrap(), ResponseCode::NoError);
        assert_eq!(ResponseCode::try_from(3u8).unwrap(), ResponseCode::NxDomain);
        assert!(ResponseCode::try_from(11u8).is_err());
    }

    #[test]
    fn test_rcode_display() {
        assert_eq!(ResponseCode::NoError.to_string(), "NOERROR");
        assert_eq!(ResponseCode::NxDomain.to_string(), "NXDOMAIN");
    }
}
