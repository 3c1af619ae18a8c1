//! Resource record classes.
//!
//! mDNS overloads the top bit of the class field: in a resource record it
//! is the cache-flush bit, in a question it requests a unicast response
//! (RFC 6762 §10.2, §5.4). [`Class`] keeps the raw wire value and strips
//! that bit before naming the class, so `IN | 0x8000` still reads as IN.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Record classes known by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum RecordClass {
    /// Internet. Effectively the only class seen in practice.
    IN = 1,
    /// CSNET (obsolete).
    CS = 2,
    /// Chaos.
    CH = 3,
    /// Hesiod.
    HS = 4,
    /// Any class (query-only).
    ANY = 255,
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IN => "IN",
            Self::CS => "CS",
            Self::CH => "CH",
            Self::HS => "HS",
            Self::ANY => "ANY",
        };
        f.write_str(name)
    }
}

/// A class field as it appears on the wire, mDNS top bit included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Class {
    raw: u16,
}

impl Class {
    /// The mDNS cache-flush / unicast-response bit.
    pub const MDNS_BIT: u16 = 0x8000;

    /// Wraps a raw wire value.
    pub const fn from_wire(raw: u16) -> Self {
        Self { raw }
    }

    /// The Internet class without the mDNS bit.
    pub const IN: Self = Self { raw: 1 };

    /// Returns the raw wire value, mDNS bit included.
    pub const fn raw(&self) -> u16 {
        self.raw
    }

    /// Returns true if the mDNS top bit is set.
    pub const fn mdns_bit(&self) -> bool {
        self.raw & Self::MDNS_BIT != 0
    }

    /// Returns the class value with the mDNS bit stripped.
    pub const fn value(&self) -> u16 {
        self.raw & !Self::MDNS_BIT
    }

    /// Returns the named class, if the low 15 bits match one.
    pub fn record_class(&self) -> Option<RecordClass> {
        RecordClass::try_from(self.value()).ok()
    }

    /// Returns true if the class (mDNS bit aside) is IN.
    pub fn is_internet(&self) -> bool {
        self.value() == RecordClass::IN as u16
    }
}

impl From<u16> for Class {
    fn from(raw: u16) -> Self {
        Self::from_wire(raw)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record_class() {
            Some(class) => class.fmt(f),
            None => write!(f, "CLASS{}", self.value()),
        }
    }
}
