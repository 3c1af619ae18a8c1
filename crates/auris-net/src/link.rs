//! Link-layer (hardware) addresses.

use std::fmt;

/// A 48-bit link-layer address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkAddr(pub [u8; 6]);

impl LinkAddr {
    /// Returns true for the all-zero address, which some virtual
    /// interfaces report.
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }
}

impl fmt::Display for LinkAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Extracts the link-layer address from a `getifaddrs` entry, if the
/// entry is of the platform's link-layer family.
///
/// # Safety
///
/// `ifa` must point to a live entry from `getifaddrs`.
#[cfg(target_os = "linux")]
pub(crate) unsafe fn from_ifaddrs(ifa: &libc::ifaddrs) -> Option<LinkAddr> {
    let addr = ifa.ifa_addr;
    if addr.is_null() || i32::from((*addr).sa_family) != libc::AF_PACKET {
        return None;
    }
    let ll = &*(addr as *const libc::sockaddr_ll);
    if ll.sll_halen as usize != 6 {
        return None;
    }
    let mut octets = [0u8; 6];
    octets.copy_from_slice(&ll.sll_addr[..6]);
    Some(LinkAddr(octets))
}

/// Extracts the link-layer address from a `getifaddrs` entry, if the
/// entry is of the platform's link-layer family.
///
/// # Safety
///
/// `ifa` must point to a live entry from `getifaddrs`.
#[cfg(target_os = "macos")]
pub(crate) unsafe fn from_ifaddrs(ifa: &libc::ifaddrs) -> Option<LinkAddr> {
    let addr = ifa.ifa_addr;
    if addr.is_null() || i32::from((*addr).sa_family) != libc::AF_LINK {
        return None;
    }
    let dl = &*(addr as *const libc::sockaddr_dl);
    if dl.sdl_alen as usize != 6 {
        return None;
    }
    // The address follows the interface name inside sdl_data.
    let start = dl.sdl_nlen as usize;
    let data = dl.sdl_data.as_ptr() as *const u8;
    let mut octets = [0u8; 6];
    for (i, octet) in octets.iter_mut().enumerate() {
        *octet = *data.add(start + i);
    }
    Some(LinkAddr(octets))
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub(crate) unsafe fn from_ifaddrs(_ifa: &libc::ifaddrs) -> Option<LinkAddr> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let addr = LinkAddr([0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01]);
        assert_eq!(addr.to_string(), "de:ad:be:ef:00:01");
    }

    #[test]
    fn test_is_zero() {
        assert!(LinkAddr([0; 6]).is_zero());
        assert!(!LinkAddr([0, 0, 0, 0, 0, 1]).is_zero());
    }
}
