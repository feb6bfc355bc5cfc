#![cfg_attr(not(test), no_std)]

//! # Boot Memory (bootmem)
//!
//! Bookkeeping for physical RAM during early boot, before any real memory
//! manager exists. It provides:
//!
//! - A registry of RAM banks discovered from the board's hardware description.
//! - Named reservations carved out of those banks, either at a fixed address or
//!   placed first-fit, for device trees, kernel images, ramdisks and the like.
//! - Memory map snapshots and summaries for console reporting.
//!
//! ```
//! use bootmem::{PhysicalAddress, RegionRegistry};
//!
//! let mut registry = RegionRegistry::new();
//! registry.add_memory_bank(PhysicalAddress::new(0x2000_0000), 0x0200_0000, false)?;
//!
//! let (dtb, _) = registry.alloc("dtb", 0x8000, Some(0x1000), Some("ram0"))?;
//! assert_eq!(dtb, PhysicalAddress::new(0x2000_0000));
//! # Ok::<(), bootmem::RegionError>(())
//! ```

extern crate alloc;

mod address;
mod allocator;
mod diagnostics;
mod discovery;
mod error;
mod extent;
pub mod global;
mod human_address;
mod human_size;
mod region;
mod registry;

pub use address::PhysicalAddress;
pub use allocator::DEFAULT_ALIGNMENT;
pub use diagnostics::{MapEntry, MemorySummary, Snapshot, Utilization};
pub use discovery::{BANK_NAME_PREFIX, BankSummary, BootMemoryRegion};
pub use error::RegionError;
pub use extent::Extent;
pub use human_address::HumanAddress;
pub use human_size::HumanSize;
pub use region::{Region, RegionHandle, RegionKind};
pub use registry::RegionRegistry;
