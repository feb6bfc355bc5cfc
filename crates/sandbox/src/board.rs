//! Static memory description of the sandbox board.

use bootmem::{BootMemoryRegion, PhysicalAddress, RegionError};

const MIB: u64 = 1024 * 1024;

/// Status of a memory node, as a device tree would report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankStatus {
    Okay,
    Disabled,
}

/// One entry of the board's memory table.
#[derive(Debug, Clone, Copy)]
pub struct BoardBank {
    pub base: u64,
    pub size: u64,
    pub status: BankStatus,
}

impl BootMemoryRegion for BoardBank {
    fn base(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.base)
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn is_usable(&self) -> bool {
        self.status == BankStatus::Okay
    }
}

/// SDRAM populated on the sandbox board.
pub const BANKS: &[BoardBank] = &[
    BoardBank {
        base: 0x2000_0000,
        size: 32 * MIB,
        status: BankStatus::Okay,
    },
    BoardBank {
        base: 0x8000_0000,
        size: 256 * MIB,
        status: BankStatus::Okay,
    },
    // Second chip select, not fitted on this board revision.
    BoardBank {
        base: 0xC000_0000,
        size: 256 * MIB,
        status: BankStatus::Disabled,
    },
];

/// Registers the board's banks with the shared registry.
pub fn probe_memory(verbose: bool) -> Result<usize, RegionError> {
    let added = bootmem::global::sdram().add_memory_banks(BANKS, verbose)?;
    log::debug!("probed {} memory banks", added);
    Ok(added)
}
