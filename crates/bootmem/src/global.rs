//! The process-wide SDRAM registry.
//!
//! Board code registers banks here during probe and later boot stages reserve
//! from it. The mutex is only the single exclusion boundary around the
//! registry for hosts that run more than one thread (a simulator, for
//! instance). On a real board the boot flow is single-threaded and the lock is
//! never contended; interrupt handlers must not touch the registry at all.

use spin::{Mutex, MutexGuard};

use crate::RegionRegistry;

/// The registry shared by the whole boot process.
pub static SDRAM: Mutex<RegionRegistry> = Mutex::new(RegionRegistry::new());

/// Locks and returns the shared registry.
pub fn sdram() -> MutexGuard<'static, RegionRegistry> {
    SDRAM.lock()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PhysicalAddress;

    #[test]
    fn shared_registry_persists_between_locks() {
        let handle = sdram()
            .add_memory_bank(PhysicalAddress::new(0x4_0000_0000), 0x1000_0000, false)
            .unwrap();

        let registry = sdram();
        let bank = registry.get(handle).unwrap();
        assert!(bank.name().starts_with("ram"));
        assert_eq!(bank.base(), PhysicalAddress::new(0x4_0000_0000));
    }
}
