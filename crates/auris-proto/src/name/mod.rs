//! Domain names.
//!
//! A [`Name`] holds the uncompressed wire form of a domain name: a
//! sequence of length-prefixed labels ending in a zero byte. Parsing a
//! compressed name from a message flattens it, so a `Name` never contains
//! compression pointers and is valid on its own.
//!
//! Comparison and hashing are case-insensitive over ASCII, matching how
//! names compare on the wire.

mod parse;

pub use parse::{NameParser, NamePolicy, MAX_COMPRESSION_JUMPS};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};

/// A domain name in uncompressed wire format.
#[derive(Debug, Clone, Eq)]
pub struct Name {
    /// Length-prefixed labels followed by the zero terminator.
    /// Inline storage covers typical mDNS service names without allocating.
    wire: SmallVec<[u8; 64]>,
}

impl Name {
    /// Returns the root name (a single zero byte).
    pub fn root() -> Self {
        let mut wire = SmallVec::new();
        wire.push(0);
        Self { wire }
    }

    /// Builds a name from already-validated uncompressed wire bytes.
    pub(crate) fn from_wire_unchecked(wire: SmallVec<[u8; 64]>) -> Self {
        Self { wire }
    }

    /// Returns the uncompressed wire representation, terminator included.
    #[inline]
    pub fn wire(&self) -> &[u8] {
        &self.wire
    }

    /// Returns the wire-format length in bytes, terminator included.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.wire.len()
    }

    /// Returns true if this is the root name.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.wire.len() == 1
    }

    /// Returns the number of labels, not counting the root.
    pub fn label_count(&self) -> usize {
        self.labels().count()
    }

    /// Iterates over the labels from leftmost to rightmost.
    pub fn labels(&self) -> LabelIter<'_> {
        LabelIter {
            wire: &self.wire,
            pos: 0,
        }
    }

    /// Returns true if `self` ends with the labels of `suffix`.
    ///
    /// The root name is a suffix of every name.
    pub fn ends_with(&self, suffix: &Name) -> bool {
        let own: Vec<&[u8]> = self.labels().collect();
        let other: Vec<&[u8]> = suffix.labels().collect();
        if other.len() > own.len() {
            return false;
        }
        own.iter()
            .rev()
            .zip(other.iter().rev())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.wire.len() == other.wire.len() && self.wire.eq_ignore_ascii_case(&other.wire)
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in &self.wire {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl FromStr for Name {
    type Err = Error;

    /// Parses a dotted name such as `"host.local"`.
    ///
    /// A trailing dot is accepted and ignored; the empty string and `"."`
    /// both produce the root name. Escape sequences are not supported.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s == "." {
            return Ok(Self::root());
        }
        let s = s.strip_suffix('.').unwrap_or(s);

        let mut wire = SmallVec::new();
        for label in s.split('.') {
            let bytes = label.as_bytes();
            if bytes.is_empty() {
                return Err(Error::invalid_data(0, "empty label"));
            }
            if bytes.len() > MAX_LABEL_LENGTH {
                return Err(Error::LabelTooLong { length: bytes.len() });
            }
            wire.push(bytes.len() as u8);
            wire.extend_from_slice(bytes);
        }
        wire.push(0);

        if wire.len() > MAX_NAME_LENGTH {
            return Err(Error::NameTooLong { length: wire.len() });
        }
        Ok(Self { wire })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        let mut first = true;
        for label in self.labels() {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            fmt_label(f, label)?;
        }
        Ok(())
    }
}

/// Writes one label with RFC 1035 presentation-format escaping.
fn fmt_label(f: &mut fmt::Formatter<'_>, label: &[u8]) -> fmt::Result {
    for &byte in label {
        match byte {
            b'.' | b'\\' => write!(f, "\\{}", byte as char)?,
            0x21..=0x7E => write!(f, "{}", byte as char)?,
            _ => write!(f, "\\{byte:03}")?,
        }
    }
    Ok(())
}

/// Iterator over the labels of a [`Name`].
#[derive(Debug, Clone)]
pub struct LabelIter<'a> {
    wire: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for LabelIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let len = *self.wire.get(self.pos)? as usize;
        if len == 0 {
            return None;
        }
        let start = self.pos + 1;
        let label = self.wire.get(start..start + len)?;
        self.pos = start + len;
        Some(label)
    }
}
