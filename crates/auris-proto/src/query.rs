//! Query encoding.
//!
//! The one message this crate writes: a single-question query, used to
//! probe the network into answering. Names are written uncompressed.

use bytes::{BufMut, Bytes, BytesMut};

use crate::class::Class;
use crate::header::Header;
use crate::name::Name;
use crate::rtype::RecordType;
use crate::HEADER_SIZE;

/// Encodes a single-question query.
///
/// `unicast_response` sets the mDNS QU bit on the question class
/// (RFC 6762 §5.4). Multicast queries conventionally carry id zero.
pub fn encode_query(id: u16, name: &Name, rtype: RecordType, unicast_response: bool) -> Bytes {
    let header = Header {
        id,
        question_count: 1,
        ..Header::default()
    };

    let mut qclass = u16::from(crate::class::RecordClass::IN);
    if unicast_response {
        qclass |= Class::MDNS_BIT;
    }

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + name.wire_len() + 4);
    buf.put_slice(&header.encode());
    buf.put_slice(name.wire());
    buf.put_u16(rtype.into());
    buf.put_u16(qclass);
    buf.freeze()
}
