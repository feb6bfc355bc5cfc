//! Registration of RAM banks found while probing the board.
//!
//! Banks come from whatever hardware description the board uses: `memory`
//! nodes of a device tree, or a static table compiled into the board file.
//! Parsing those formats is the caller's job; this module only needs the
//! resulting base/size pairs.
//!
//! # Registering a memory description
//!
//! Implement [`BootMemoryRegion`] on the entry type produced by the parser,
//! then hand the entries to [`RegionRegistry::add_memory_banks`]:
//!
//! ```
//! use bootmem::{BootMemoryRegion, PhysicalAddress, RegionRegistry};
//!
//! struct MemoryNode {
//!     reg: (u64, u64),
//!     okay: bool,
//! }
//!
//! impl BootMemoryRegion for MemoryNode {
//!     fn base(&self) -> PhysicalAddress {
//!         PhysicalAddress::new(self.reg.0)
//!     }
//!
//!     fn size(&self) -> u64 {
//!         self.reg.1
//!     }
//!
//!     fn is_usable(&self) -> bool {
//!         self.okay
//!     }
//! }
//!
//! let nodes = [
//!     MemoryNode { reg: (0x8000_0000, 0x4000_0000), okay: true },
//!     MemoryNode { reg: (0xC000_0000, 0x1000_0000), okay: false },
//! ];
//!
//! let mut registry = RegionRegistry::new();
//! assert_eq!(registry.add_memory_banks(&nodes, false), Ok(1));
//! assert!(registry.find_by_name("ram0").is_some());
//! ```

use alloc::format;
use core::fmt;

use crate::{PhysicalAddress, RegionError, RegionHandle, RegionKind, RegionRegistry};

/// Prefix of the generated bank names (`ram0`, `ram1`, ...).
pub const BANK_NAME_PREFIX: &str = "ram";

/// A single entry of a boot-time memory description.
///
/// Implement this trait on the parser's entry type so its banks can be
/// registered with [`RegionRegistry::add_memory_banks`].
pub trait BootMemoryRegion {
    /// Returns the base physical address of this bank.
    fn base(&self) -> PhysicalAddress;

    /// Returns the size of this bank in bytes.
    fn size(&self) -> u64;

    /// Returns whether this bank should be used.
    ///
    /// Entries that describe disabled memory should return `false`.
    fn is_usable(&self) -> bool {
        true
    }
}

/// Plain `(base, size)` tuples, as produced by a `reg` property decoder.
impl BootMemoryRegion for (u64, u64) {
    fn base(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.0)
    }

    fn size(&self) -> u64 {
        self.1
    }
}

/// One-line description of a newly registered bank, `name: size@base`.
///
/// ```
/// use bootmem::{BankSummary, PhysicalAddress};
///
/// let summary = BankSummary::new("ram0", PhysicalAddress::new(0x2000_0000), 0x0200_0000);
/// assert_eq!(summary.to_string(), "ram0: 0x2000000@0x20000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankSummary<'a> {
    name: &'a str,
    base: PhysicalAddress,
    size: u64,
}

impl<'a> BankSummary<'a> {
    pub const fn new(name: &'a str, base: PhysicalAddress, size: u64) -> Self {
        Self { name, base, size }
    }
}

impl fmt::Display for BankSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#x}@{:#x}", self.name, self.size, self.base)
    }
}

impl RegionRegistry {
    /// Registers a discovered bank under the next free `ramN` name.
    ///
    /// The bank index only advances when registration succeeds, so the banks
    /// of one boot run are always named `ram0`, `ram1`, ... in call order.
    /// With `verbose` set, a [`BankSummary`] line is logged at info level.
    ///
    /// Errors from [`RegionRegistry::add`] are returned unchanged; an
    /// overlapping memory description shows up as [`RegionError::Overlap`].
    pub fn add_memory_bank(
        &mut self,
        base: PhysicalAddress,
        size: u64,
        verbose: bool,
    ) -> Result<RegionHandle, RegionError> {
        let name = format!("{}{}", BANK_NAME_PREFIX, self.next_bank_index);
        let handle = self.add(&name, base, size, RegionKind::Bank, None)?;
        self.next_bank_index += 1;

        if verbose {
            log::info!("{}", BankSummary::new(&name, base, size));
        }

        Ok(handle)
    }

    /// Registers every usable, non-empty entry of a memory description.
    ///
    /// Entries are processed in order. A failing entry does not stop the
    /// walk; the remaining entries are still registered and the first error
    /// is returned once all of them have been tried. On success, returns the
    /// number of banks added.
    pub fn add_memory_banks<R: BootMemoryRegion>(
        &mut self,
        entries: &[R],
        verbose: bool,
    ) -> Result<usize, RegionError> {
        let mut added = 0;
        let mut first_error = None;

        for entry in entries {
            if entry.size() == 0 || !entry.is_usable() {
                continue;
            }

            match self.add_memory_bank(entry.base(), entry.size(), verbose) {
                Ok(_) => added += 1,
                Err(err) => {
                    log::warn!(
                        "skipping memory bank {:#x}@{:#x}: {}",
                        entry.size(),
                        entry.base(),
                        err
                    );
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(added),
        }
    }
}
