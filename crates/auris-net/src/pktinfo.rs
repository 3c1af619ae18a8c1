//! Per-datagram packet metadata via `IP_PKTINFO` / `IPV6_RECVPKTINFO`.
//!
//! A socket bound to the wildcard address and joined to a multicast group
//! on several interfaces cannot tell datagrams apart without ancillary
//! data. The kernel supplies it once the PKTINFO option is enabled, and
//! [`recv_with_pktinfo`] pulls out the destination address and arriving
//! interface alongside each datagram.
//!
//! The receive path is non-blocking (`MSG_DONTWAIT`); callers pair it
//! with readiness notification.

use std::io;
use std::mem;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::os::unix::io::{AsRawFd, RawFd};

use crate::socket::Family;

/// Metadata attached to one received datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveMetadata {
    /// The sender, when the kernel reported one.
    pub source: Option<SocketAddr>,
    /// The destination address of the datagram. Distinguishes multicast
    /// traffic from unicast sent straight at us.
    pub destination: Option<IpAddr>,
    /// Kernel index of the interface the datagram arrived on.
    pub interface_index: Option<u32>,
    /// True when the ancillary buffer filled completely, in which case
    /// some control message may have been dropped.
    pub control_truncated: bool,
}

#[cfg(target_os = "linux")]
const IP_PKTINFO_OPT: libc::c_int = libc::IP_PKTINFO;
#[cfg(target_os = "macos")]
const IP_PKTINFO_OPT: libc::c_int = libc::IP_RECVPKTINFO;

/// Enables PKTINFO ancillary data for the socket's address family.
pub fn enable_pktinfo(fd: RawFd, family: Family) -> io::Result<()> {
    let (level, option) = match family {
        Family::V4 => (libc::IPPROTO_IP, IP_PKTINFO_OPT),
        Family::V6 => (libc::IPPROTO_IPV6, libc::IPV6_RECVPKTINFO),
    };
    let val: libc::c_int = 1;
    let rc = unsafe {
        libc::setsockopt(
            fd,
            level,
            option,
            &val as *const libc::c_int as *const libc::c_void,
            mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Ancillary buffer sized for both PKTINFO layouts with headroom, and
/// aligned the way `cmsg(3)` requires.
#[repr(align(8))]
struct ControlBuffer([u8; 256]);

/// Receives one datagram with its metadata, without blocking.
///
/// Returns `WouldBlock` when nothing is queued.
pub(crate) fn recv_with_pktinfo(
    socket: &std::net::UdpSocket,
    buf: &mut [u8],
) -> io::Result<(usize, ReceiveMetadata)> {
    let fd = socket.as_raw_fd();
    let mut iov = libc::iovec {
        iov_base: buf.as_mut_ptr() as *mut libc::c_void,
        iov_len: buf.len(),
    };
    let mut src: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut control = ControlBuffer([0u8; 256]);

    let mut msg: libc::msghdr = unsafe { mem::zeroed() };
    msg.msg_name = &mut src as *mut libc::sockaddr_storage as *mut libc::c_void;
    msg.msg_namelen = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
    msg.msg_iov = &mut iov;
    msg.msg_iovlen = 1;
    msg.msg_control = control.0.as_mut_ptr() as *mut libc::c_void;
    msg.msg_controllen = control.0.len() as _;

    let n = unsafe { libc::recvmsg(fd, &mut msg, libc::MSG_DONTWAIT) };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }

    let mut meta = ReceiveMetadata {
        source: sockaddr_storage_to_addr(&src, msg.msg_namelen as usize),
        destination: None,
        interface_index: None,
        // An exactly-full control buffer cannot be told apart from a
        // truncated one, so treat it as suspect too.
        control_truncated: msg.msg_flags & libc::MSG_CTRUNC != 0
            || msg.msg_controllen as usize == control.0.len(),
    };

    // Safety: the kernel filled msg_control/msg_controllen; the CMSG
    // macros walk only within that region.
    unsafe {
        let mut cmsg = libc::CMSG_FIRSTHDR(&msg);
        while !cmsg.is_null() {
            let header = &*cmsg;
            if header.cmsg_level == libc::IPPROTO_IP && header.cmsg_type == libc::IP_PKTINFO {
                let info = &*(libc::CMSG_DATA(cmsg) as *const libc::in_pktinfo);
                meta.destination = Some(IpAddr::V4(Ipv4Addr::from(u32::from_be(
                    info.ipi_addr.s_addr,
                ))));
                meta.interface_index = Some(info.ipi_ifindex as u32);
            } else if header.cmsg_level == libc::IPPROTO_IPV6
                && header.cmsg_type == libc::IPV6_PKTINFO
            {
                let info = &*(libc::CMSG_DATA(cmsg) as *const libc::in6_pktinfo);
                meta.destination = Some(IpAddr::V6(Ipv6Addr::from(info.ipi6_addr.s6_addr)));
                meta.interface_index = Some(info.ipi6_ifindex);
            }
            cmsg = libc::CMSG_NXTHDR(&msg, cmsg);
        }
    }

    Ok((n as usize, meta))
}

/// Decodes the source address the kernel wrote into `msg_name`.
fn sockaddr_storage_to_addr(
    storage: &libc::sockaddr_storage,
    len: usize,
) -> Option<SocketAddr> {
    match i32::from(storage.ss_family) {
        libc::AF_INET if len >= mem::size_of::<libc::sockaddr_in>() => {
            // Safety: family and length both say this is a sockaddr_in.
            let sin = unsafe { &*(storage as *const _ as *const libc::sockaddr_in) };
            Some(SocketAddr::V4(SocketAddrV4::new(
                Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr)),
                u16::from_be(sin.sin_port),
            )))
        }
        libc::AF_INET6 if len >= mem::size_of::<libc::sockaddr_in6>() => {
            let sin6 = unsafe { &*(storage as *const _ as *const libc::sockaddr_in6) };
            Some(SocketAddr::V6(SocketAddrV6::new(
                Ipv6Addr::from(sin6.sin6_addr.s6_addr),
                u16::from_be(sin6.sin6_port),
                sin6.sin6_flowinfo,
                sin6.sin6_scope_id,
            )))
        }
        _ => None,
    }
}
