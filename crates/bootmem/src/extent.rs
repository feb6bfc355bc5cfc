//! Half-open physical address ranges.

use core::fmt;

use crate::{HumanSize, PhysicalAddress};

/// A contiguous range of physical memory, `[base, base + size)`.
///
/// An `Extent` can only be built through [`Extent::try_new`], which guarantees
/// that `base + size` fits in the address space, so [`end`](Self::end) never
/// overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    base: PhysicalAddress,
    size: u64,
}

impl Extent {
    /// Creates a new extent, or `None` if `base + size` overflows.
    pub const fn try_new(base: PhysicalAddress, size: u64) -> Option<Self> {
        match base.checked_add(size) {
            Some(_) => Some(Self { base, size }),
            None => None,
        }
    }

    /// Creates the extent `[base, end)`. `end` must not be below `base`.
    pub(crate) const fn between(base: PhysicalAddress, end: PhysicalAddress) -> Self {
        Self {
            base,
            size: end.offset_from(base),
        }
    }

    /// Returns the base address of this extent.
    pub const fn base(&self) -> PhysicalAddress {
        self.base
    }

    /// Returns the size of this extent in bytes.
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the end address (exclusive) of this extent.
    pub const fn end(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.base.as_u64() + self.size)
    }

    /// Returns true if this extent covers no bytes.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns true if this extent shares at least one byte with `other`.
    pub const fn overlaps(&self, other: &Extent) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.base.as_u64() < other.end().as_u64()
            && other.base.as_u64() < self.end().as_u64()
    }

    /// Returns true if this extent ends exactly where `other` begins, or vice versa.
    pub const fn adjacent(&self, other: &Extent) -> bool {
        self.end().as_u64() == other.base.as_u64() || other.end().as_u64() == self.base.as_u64()
    }

    /// Returns true if `other` lies entirely within this extent.
    pub const fn contains(&self, other: &Extent) -> bool {
        other.base.as_u64() >= self.base.as_u64() && other.end().as_u64() <= self.end().as_u64()
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) {}",
            self.base,
            self.end(),
            HumanSize(self.size)
        )
    }
}
