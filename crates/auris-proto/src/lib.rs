//! # Auris DNS Protocol Library
//!
//! Wire-format types and parsing for multicast DNS traffic inspection,
//! following RFC 1035 with the mDNS clarifications from RFC 6762/6763.
//!
//! Decoded messages and records are *views*: they borrow the datagram
//! buffer they were parsed from and never copy record payloads. Payload
//! interpretation (A/AAAA/PTR/SRV/TXT) happens lazily via
//! [`record::ResourceRecord::data`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use auris_proto::Message;
//!
//! let datagram: &[u8] = &[/* received bytes */];
//! let message = Message::parse(datagram)?;
//! for answer in &message.answers {
//!     println!("{}", answer);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod class;
pub mod error;
pub mod header;
pub mod message;
pub mod name;
pub mod opcode;
pub mod query;
pub mod question;
pub mod rcode;
pub mod rdata;
pub mod record;
pub mod rtype;
pub mod wire;

// Re-exports for convenience
pub use class::{Class, RecordClass};
pub use error::{Error, Result};
pub use header::{Header, HeaderFlags};
pub use message::Message;
pub use name::{Name, NameParser, NamePolicy};
pub use opcode::OpCode;
pub use query::encode_query;
pub use question::Question;
pub use rcode::ResponseCode;
pub use rdata::RData;
pub use record::ResourceRecord;
pub use rtype::{RecordType, Type};

/// Maximum length of a DNS label (63 bytes per RFC 1035).
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of a domain name in wire format (255 bytes per RFC 1035).
pub const MAX_NAME_LENGTH: usize = 255;

/// Size of the fixed DNS message header in bytes.
pub const HEADER_SIZE: usize = 12;
