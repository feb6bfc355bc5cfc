//! Physical address type for boot-time memory bookkeeping.
//!
//! Addresses are always 64 bits wide regardless of the pointer width of the
//! firmware running the registry, since banks described by hardware may live
//! above the 4GiB line even on 32-bit boards.

use core::fmt;

use crate::HumanAddress;

/// A physical memory address.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PhysicalAddress(u64);

impl PhysicalAddress {
    /// Creates a new physical address.
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw address value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Adds a byte offset, returning `None` if the result leaves the address space.
    #[inline]
    pub const fn checked_add(self, offset: u64) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(addr) => Some(Self(addr)),
            None => None,
        }
    }

    /// Rounds the address up to the next multiple of `align`.
    ///
    /// `align` must be a power of two. Returns `None` if rounding up would
    /// overflow the address space.
    #[inline]
    pub const fn align_up(self, align: u64) -> Option<Self> {
        debug_assert!(align.is_power_of_two());
        let mask = align - 1;
        match self.0.checked_add(mask) {
            Some(addr) => Some(Self(addr & !mask)),
            None => None,
        }
    }

    /// Returns true if the address is a multiple of `align`.
    #[inline]
    pub const fn is_aligned(self, align: u64) -> bool {
        self.0 & (align - 1) == 0
    }

    /// Returns the number of bytes from `earlier` up to this address.
    ///
    /// Saturates to zero if `earlier` is above this address.
    #[inline]
    pub const fn offset_from(self, earlier: PhysicalAddress) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl From<u64> for PhysicalAddress {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<PhysicalAddress> for u64 {
    #[inline]
    fn from(value: PhysicalAddress) -> Self {
        value.0
    }
}

impl fmt::Debug for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhysicalAddress({})", HumanAddress(self.0))
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&HumanAddress(self.0), f)
    }
}

impl fmt::LowerHex for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
