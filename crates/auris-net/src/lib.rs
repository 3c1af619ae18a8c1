//! # Auris Network Layer
//!
//! Multicast UDP transport and network interface enumeration for mDNS
//! monitoring. The pieces fit together like this:
//!
//! - [`InterfaceDirectory`] enumerates the host's interfaces and their
//!   addresses, so the caller can decide which ones to watch.
//! - [`MulticastSocket`] binds the mDNS port, joins the multicast group
//!   per interface, and receives datagrams together with their packet
//!   metadata (destination address, arriving interface).
//! - [`ListenerLoop`] drives one socket until cancelled, handing every
//!   datagram to a [`DatagramHandler`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod iface;
pub mod link;
pub mod listener;
pub mod pktinfo;
pub mod socket;

pub use error::{NetError, Result};
pub use iface::{InterfaceAddress, InterfaceDirectory, InterfaceInfo};
pub use link::LinkAddr;
pub use listener::{DatagramHandler, ListenerLoop};
pub use pktinfo::ReceiveMetadata;
pub use socket::{Family, MulticastSocket};

use std::net::{Ipv4Addr, Ipv6Addr};

/// The mDNS UDP port (RFC 6762).
pub const MDNS_PORT: u16 = 5353;

/// The IPv4 mDNS multicast group.
pub const MDNS_GROUP_V4: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);

/// The IPv6 mDNS multicast group (link-local scope).
pub const MDNS_GROUP_V6: Ipv6Addr = Ipv6Addr::new(0xFF02, 0, 0, 0, 0, 0, 0, 0xFB);

/// Largest datagram we accept. DNS over UDP caps at 64 KiB.
pub const MAX_DATAGRAM: usize = 65535;
