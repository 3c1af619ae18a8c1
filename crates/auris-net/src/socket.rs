//! The mDNS multicast socket.
//!
//! One socket per address family, bound to the wildcard address on the
//! mDNS port with `SO_REUSEADDR`/`SO_REUSEPORT` so it coexists with a
//! local responder. Multicast membership is joined per interface, and
//! PKTINFO ancillary data is enabled so receives carry their destination
//! address and arriving interface.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::os::unix::io::AsRawFd;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::io::unix::AsyncFd;
use tokio::io::Interest;

use crate::error::{NetError, Result};
use crate::iface::InterfaceInfo;
use crate::pktinfo::{self, ReceiveMetadata};
use crate::{MDNS_GROUP_V4, MDNS_GROUP_V6};

/// Address family of a [`MulticastSocket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// IPv4.
    V4,
    /// IPv6.
    V6,
}

impl Family {
    /// The mDNS multicast group for this family.
    pub fn group(&self) -> IpAddr {
        match self {
            Self::V4 => IpAddr::V4(MDNS_GROUP_V4),
            Self::V6 => IpAddr::V6(MDNS_GROUP_V6),
        }
    }

    /// The wildcard address for this family.
    pub fn unspecified(&self) -> IpAddr {
        match self {
            Self::V4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Self::V6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        }
    }

    /// Human-readable family name for log and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::V4 => "IPv4",
            Self::V6 => "IPv6",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A nonblocking multicast UDP socket driven by the tokio reactor.
#[derive(Debug)]
pub struct MulticastSocket {
    inner: AsyncFd<UdpSocket>,
    family: Family,
    local_addr: SocketAddr,
}

impl MulticastSocket {
    /// Creates a socket for `family`, bound to the wildcard address on
    /// `port`, with reuse options and PKTINFO enabled.
    pub fn bind(family: Family, port: u16) -> Result<Self> {
        let domain = match family {
            Family::V4 => Domain::IPV4,
            Family::V6 => Domain::IPV6,
        };
        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))
            .map_err(NetError::socket)?;

        // Share the port with any local mDNS responder.
        socket.set_reuse_address(true).map_err(NetError::socket)?;
        socket.set_reuse_port(true).map_err(NetError::socket)?;
        if family == Family::V6 {
            socket.set_only_v6(true).map_err(NetError::socket)?;
        }
        socket.set_nonblocking(true).map_err(NetError::socket)?;
        pktinfo::enable_pktinfo(socket.as_raw_fd(), family).map_err(NetError::socket)?;

        let requested = SocketAddr::new(family.unspecified(), port);
        socket
            .bind(&requested.into())
            .map_err(|source| NetError::Bind {
                addr: requested,
                source,
            })?;
        // Re-query so port 0 reports the port actually assigned.
        let local_addr = socket
            .local_addr()
            .map_err(NetError::socket)?
            .as_socket()
            .unwrap_or(requested);

        let inner = AsyncFd::with_interest(
            socket.into(),
            Interest::READABLE | Interest::WRITABLE,
        )
        .map_err(NetError::socket)?;

        Ok(Self {
            inner,
            family,
            local_addr,
        })
    }

    /// Returns the socket's address family.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Returns the bound local address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Joins the family's mDNS group on the given interface.
    ///
    /// IPv4 membership is keyed by the interface's address, IPv6 by its
    /// kernel index.
    pub fn join_group(&self, iface: &InterfaceInfo) -> Result<()> {
        let socket = self.inner.get_ref();
        match self.family {
            Family::V4 => {
                let addr = iface.ipv4().ok_or_else(|| NetError::NoUsableAddress {
                    interface: iface.name.clone(),
                    family: self.family.label(),
                })?;
                socket.join_multicast_v4(&MDNS_GROUP_V4, &addr)
            }
            Family::V6 => socket.join_multicast_v6(&MDNS_GROUP_V6, iface.index),
        }
        .map_err(|source| NetError::JoinGroup {
            group: self.family.group(),
            interface: iface.name.clone(),
            source,
        })
    }

    /// Receives one datagram and its metadata.
    pub async fn recv(&self, buf: &mut [u8]) -> Result<(usize, ReceiveMetadata)> {
        loop {
            let mut guard = self
                .inner
                .readable()
                .await
                .map_err(NetError::recv)?;
            match pktinfo::recv_with_pktinfo(self.inner.get_ref(), buf) {
                Ok(result) => return Ok(result),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    guard.clear_ready();
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(NetError::recv(err)),
            }
        }
    }

    /// Sends a datagram to `target`.
    pub async fn send_to(&self, payload: &[u8], target: SocketAddr) -> Result<usize> {
        loop {
            let mut guard = self
                .inner
                .writable()
                .await
                .map_err(|source| NetError::Send { target, source })?;
            match self.inner.get_ref().send_to(payload, target) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    guard.clear_ready();
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(NetError::Send { target, source: err }),
            }
        }
    }
}
