//! Network layer error types.

use std::io;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Result type alias for network operations.
pub type Result<T> = std::result::Result<T, NetError>;

/// Errors from socket setup, multicast membership, and I/O.
#[derive(Error, Debug)]
pub enum NetError {
    /// Socket creation or option setup failed.
    #[error("socket setup failed: {source}")]
    Socket {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Binding the local address failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Joining a multicast group on an interface failed.
    #[error("failed to join {group} on {interface}: {source}")]
    JoinGroup {
        /// The multicast group.
        group: IpAddr,
        /// Interface name.
        interface: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Receiving a datagram failed.
    #[error("receive failed: {source}")]
    Recv {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Sending a datagram failed.
    #[error("send to {target} failed: {source}")]
    Send {
        /// The destination address.
        target: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Interface enumeration failed.
    #[error("interface enumeration failed: {source}")]
    Interfaces {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An interface has no address usable for the requested family.
    #[error("interface {interface} has no usable {family} address")]
    NoUsableAddress {
        /// Interface name.
        interface: String,
        /// Address family, `"IPv4"` or `"IPv6"`.
        family: &'static str,
    },
}

impl NetError {
    /// Wraps an I/O error from socket setup.
    pub fn socket(source: io::Error) -> Self {
        Self::Socket { source }
    }

    /// Wraps an I/O error from a receive.
    pub fn recv(source: io::Error) -> Self {
        Self::Recv { source }
    }

    /// Wraps an I/O error from interface enumeration.
    pub fn interfaces(source: io::Error) -> Self {
        Self::Interfaces { source }
    }
}
