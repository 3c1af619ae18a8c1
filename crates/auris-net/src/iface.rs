//! Network interface enumeration.
//!
//! Walks `getifaddrs(3)` and groups the per-address entries by interface,
//! so one [`InterfaceInfo`] carries all of an interface's addresses plus
//! its link-layer address where the platform exposes one.

use std::ffi::CStr;
use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::{NetError, Result};
use crate::link::{self, LinkAddr};

/// One address assigned to an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceAddress {
    /// The address itself.
    pub addr: IpAddr,
    /// The netmask, when the system reports one.
    pub netmask: Option<IpAddr>,
}

/// A network interface and everything assigned to it.
#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    /// Interface name, e.g. `eth0`.
    pub name: String,
    /// Kernel interface index, used for IPv6 multicast membership.
    pub index: u32,
    /// All IP addresses on the interface.
    pub addresses: Vec<InterfaceAddress>,
    /// Link-layer address, where the platform exposes one.
    pub link: Option<LinkAddr>,
    /// Interface is administratively up.
    pub up: bool,
    /// Interface is the loopback device.
    pub loopback: bool,
    /// Interface supports multicast.
    pub multicast: bool,
}

impl InterfaceInfo {
    /// Returns the interface's first IPv4 address, if any.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.addresses.iter().find_map(|a| match a.addr {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
    }

    /// Returns the interface's first IPv6 address, if any.
    pub fn ipv6(&self) -> Option<Ipv6Addr> {
        self.addresses.iter().find_map(|a| match a.addr {
            IpAddr::V4(_) => None,
            IpAddr::V6(v6) => Some(v6),
        })
    }

    /// Returns true if any assigned address equals `ip`.
    pub fn has_address(&self, ip: IpAddr) -> bool {
        self.addresses.iter().any(|a| a.addr == ip)
    }

    /// Returns true if the interface can usefully receive multicast.
    pub fn usable(&self) -> bool {
        self.up && self.multicast && !self.addresses.is_empty()
    }
}

impl fmt::Display for InterfaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.index)?;
        if let Some(link) = &self.link {
            write!(f, " {link}")?;
        }
        for address in &self.addresses {
            write!(f, " {}", address.addr)?;
        }
        Ok(())
    }
}

/// A snapshot of the host's network interfaces.
#[derive(Debug, Clone, Default)]
pub struct InterfaceDirectory {
    interfaces: Vec<InterfaceInfo>,
}

impl InterfaceDirectory {
    /// Enumerates the host's interfaces.
    pub fn discover() -> Result<Self> {
        let mut directory = Self::default();
        directory.refresh()?;
        Ok(directory)
    }

    /// Re-enumerates, replacing the snapshot.
    pub fn refresh(&mut self) -> Result<()> {
        self.interfaces = enumerate()?;
        Ok(())
    }

    /// Iterates over the interfaces in system order.
    pub fn iter(&self) -> impl Iterator<Item = &InterfaceInfo> {
        self.interfaces.iter()
    }

    /// Returns the number of interfaces.
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    /// Returns true if no interfaces were found.
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Finds an interface by exact name.
    pub fn lookup_by_name(&self, name: &str) -> Option<&InterfaceInfo> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Finds the interface holding the given address.
    pub fn lookup_by_ip(&self, ip: IpAddr) -> Option<&InterfaceInfo> {
        self.interfaces.iter().find(|i| i.has_address(ip))
    }

    /// Finds the interface with the given kernel index.
    pub fn lookup_by_index(&self, index: u32) -> Option<&InterfaceInfo> {
        self.interfaces.iter().find(|i| i.index == index)
    }
}

/// Walks `getifaddrs`, merging the one-entry-per-address list into
/// one record per interface, keyed by kernel index.
fn enumerate() -> Result<Vec<InterfaceInfo>> {
    let mut head: *mut libc::ifaddrs = std::ptr::null_mut();
    if unsafe { libc::getifaddrs(&mut head) } != 0 {
        return Err(NetError::interfaces(io::Error::last_os_error()));
    }

    let mut interfaces: Vec<InterfaceInfo> = Vec::new();
    let mut cursor = head;
    while !cursor.is_null() {
        // Safety: getifaddrs returned a valid list; entries stay live
        // until freeifaddrs below.
        let ifa = unsafe { &*cursor };
        cursor = ifa.ifa_next;

        if ifa.ifa_name.is_null() {
            continue;
        }
        let name = unsafe { CStr::from_ptr(ifa.ifa_name) }
            .to_string_lossy()
            .into_owned();
        let index = unsafe { libc::if_nametoindex(ifa.ifa_name) };

        // Merge on the kernel index; two interfaces can share a name
        // transiently during a rename. Index 0 means the lookup failed,
        // in which case the name is all there is to key on.
        let found = interfaces.iter().position(|i| {
            if index != 0 {
                i.index == index
            } else {
                i.index == 0 && i.name == name
            }
        });
        let position = match found {
            Some(position) => position,
            None => {
                let flags = ifa.ifa_flags;
                interfaces.push(InterfaceInfo {
                    name,
                    index,
                    addresses: Vec::new(),
                    link: None,
                    up: flags & libc::IFF_UP as u32 != 0,
                    loopback: flags & libc::IFF_LOOPBACK as u32 != 0,
                    multicast: flags & libc::IFF_MULTICAST as u32 != 0,
                });
                interfaces.len() - 1
            }
        };
        let entry = &mut interfaces[position];

        if let Some(link) = unsafe { link::from_ifaddrs(ifa) } {
            entry.link = Some(link);
        } else if let Some(addr) = unsafe { sockaddr_to_ip(ifa.ifa_addr) } {
            let netmask = unsafe { sockaddr_to_ip(ifa.ifa_netmask) };
            entry.addresses.push(InterfaceAddress { addr, netmask });
        }
    }

    unsafe { libc::freeifaddrs(head) };
    Ok(interfaces)
}

/// Converts an IPv4 or IPv6 `sockaddr` to an [`IpAddr`]. Other families
/// return `None`.
///
/// # Safety
///
/// `sa`, if non-null, must point to a sockaddr of at least the size its
/// family implies.
unsafe fn sockaddr_to_ip(sa: *const libc::sockaddr) -> Option<IpAddr> {
    if sa.is_null() {
        return None;
    }
    match i32::from((*sa).sa_family) {
        libc::AF_INET => {
            let sin = &*(sa as *const libc::sockaddr_in);
            Some(IpAddr::V4(Ipv4Addr::from(u32::from_be(
                sin.sin_addr.s_addr,
            ))))
        }
        libc::AF_INET6 => {
            let sin6 = &*(sa as *const libc::sockaddr_in6);
            Some(IpAddr::V6(Ipv6Addr::from(sin6.sin6_addr.s6_addr)))
        }
        _ => None,
    }
}
