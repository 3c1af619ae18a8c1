//! DNS operation codes.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// DNS header OPCODE values (header bits 11..=14).
///
/// mDNS traffic uses [`OpCode::Query`] essentially exclusively; anything
/// else is displayed by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    /// Standard query (RFC 1035).
    Query = 0,
    /// Inverse query (obsolete, RFC 3425).
    IQuery = 1,
    /// Server status request.
    Status = 2,
    /// Zone change notification (RFC 1996).
    Notify = 4,
    /// Dynamic update (RFC 2136).
    Update = 5,
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Query => "QUERY",
            Self::IQuery => "IQUERY",
            Self::Status => "STATUS",
            Self::Notify => "NOTIFY",
            Self::Update => "UPDATE",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        assert_eq!(OpCode::try_from(0u8).unwrap(), OpCode::Query);
        assert_eq!(u8::from(OpCode::Notify), 4);
        assert!(OpCode::try_from(3u8).is_err());
    }

    #[test]
    fn test_opcode_display() {
        assert_eq!(OpCode::Query.to_string(), "QUERY");
        assert_eq!(OpCode::Update.to_string(), "UPDATE");
    }
}
