//! Sequential IPv4 block allocation.
//!
//! Carves fixed-size subnets out of the VPC range in order, so blocks never
//! overlap and never leave the parent range.

use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{Result, SynthError};

/// An IPv4 network in CIDR notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    base: Ipv4Addr,
    mask: u8,
}

impl Cidr {
    pub fn new(base: Ipv4Addr, mask: u8) -> Self {
        Self { base, mask }
    }

    fn start(&self) -> u64 {
        u64::from(u32::from(self.base))
    }

    fn size(&self) -> u64 {
        1u64 << (32 - u32::from(self.mask))
    }

    /// One past the last address.
    fn end(&self) -> u64 {
        self.start() + self.size()
    }

    /// Whether two blocks share any address.
    pub fn overlaps(&self, other: &Cidr) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }

    /// Whether `other` lies entirely inside this block.
    pub fn contains(&self, other: &Cidr) -> bool {
        other.start() >= self.start() && other.end() <= self.end()
    }
}

impl FromStr for Cidr {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (addr, mask) = s
            .split_once('/')
            .ok_or_else(|| format!("missing prefix length in '{}'", s))?;
        let base: Ipv4Addr = addr.parse().map_err(|e| format!("{}: {}", s, e))?;
        let mask: u8 = mask.parse().map_err(|e| format!("{}: {}", s, e))?;
        if mask > 32 {
            return Err(format!("prefix length {} out of range", mask));
        }
        Ok(Self { base, mask })
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.mask)
    }
}

/// Hands out consecutive blocks from a parent range.
#[derive(Debug)]
pub struct Allocator {
    parent: Cidr,
    next: u64,
}

impl Allocator {
    pub fn new(parent: Cidr) -> Self {
        Self {
            next: parent.start(),
            parent,
        }
    }

    /// Allocate the next aligned block with prefix length `mask`.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::AddressSpaceExhausted` if the block would leave
    /// the parent range or is larger than it.
    pub fn allocate(&mut self, mask: u8) -> Result<Cidr> {
        let exhausted = || SynthError::AddressSpaceExhausted {
            base: self.parent.to_string(),
            mask,
        };

        if mask < self.parent.mask || mask > 32 {
            return Err(exhausted().into());
        }

        let size = 1u64 << (32 - u32::from(mask));
        let aligned = self.next.div_ceil(size) * size;
        if aligned + size > self.parent.end() {
            return Err(exhausted().into());
        }

        let block = Cidr::new(Ipv4Addr::from(aligned as u32), mask);
        self.next = aligned + size;
        Ok(block)
    }
}
