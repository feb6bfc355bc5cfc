//! Regions tracked by the registry.

use alloc::string::String;
use core::fmt;

use crate::{Extent, PhysicalAddress};

/// Opaque identifier for a registered region.
///
/// Handles are never reused within a boot run, so a handle kept after its
/// reservation was freed will simply be reported as not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionHandle(u64);

impl RegionHandle {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw handle value.
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a region represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// A top-level bank of RAM discovered from the hardware description.
    Bank,
    /// A named sub-range carved out of exactly one bank.
    Reservation,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bank => f.write_str("Bank"),
            Self::Reservation => f.write_str("Reservation"),
        }
    }
}

/// A bank or reservation as stored by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub(crate) handle: RegionHandle,
    pub(crate) name: String,
    pub(crate) extent: Extent,
    pub(crate) kind: RegionKind,
    pub(crate) parent: Option<RegionHandle>,
}

impl Region {
    pub fn handle(&self) -> RegionHandle {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn base(&self) -> PhysicalAddress {
        self.extent.base()
    }

    pub fn size(&self) -> u64 {
        self.extent.size()
    }

    /// Exclusive end address.
    pub fn end(&self) -> PhysicalAddress {
        self.extent.end()
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    /// The owning bank; `None` for banks.
    pub fn parent(&self) -> Option<RegionHandle> {
        self.parent
    }

    pub fn is_bank(&self) -> bool {
        self.kind == RegionKind::Bank
    }
}
