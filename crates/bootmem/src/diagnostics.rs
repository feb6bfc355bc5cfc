//! Read-only views of the registry for memory map reporting.
//!
//! A [`Snapshot`] owns copies of everything it shows, so it can be handed to
//! a console or log sink after the registry has moved on.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::{HumanSize, PhysicalAddress, RegionKind, RegionRegistry};

/// Share of a total held by some part of it, shown as a percentage with two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utilization {
    used: u64,
    total: u64,
}

impl Utilization {
    pub const fn new(used: u64, total: u64) -> Self {
        Self { used, total }
    }

    pub const fn used(&self) -> u64 {
        self.used
    }

    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Hundredths of a percent, truncated.
    pub const fn basis_points(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        (self.used as u128 * 10_000 / self.total as u128) as u64
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bp = self.basis_points();
        write!(f, "{}.{:02}%", bp / 100, bp % 100)
    }
}

/// One line of a memory map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub name: String,
    /// Name of the owning bank, for reservations.
    pub parent: Option<String>,
    pub base: PhysicalAddress,
    /// Exclusive end address.
    pub end: PhysicalAddress,
    pub size: u64,
    pub kind: RegionKind,
    /// For a bank, how much of it is reserved; for a reservation, its share of the bank.
    pub utilization: Utilization,
}

impl fmt::Display for MapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} {} ", self.base, self.end, HumanSize(self.size))?;
        match &self.parent {
            None => write!(f, "{} ({} used)", self.name, self.utilization),
            Some(bank) => write!(
                f,
                "{}/{} ({} of {})",
                bank, self.name, self.utilization, bank
            ),
        }
    }
}

/// Ordered copy of the registry: each bank followed by its reservations, by
/// ascending address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<MapEntry>,
}

impl Snapshot {
    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    pub fn iter(&self) -> core::slice::Iter<'_, MapEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a MapEntry;
    type IntoIter = core::slice::Iter<'a, MapEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            if entry.kind == RegionKind::Reservation {
                f.write_str("  ")?;
            }
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Total RAM and bank count, e.g. `160MiB across 2 banks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySummary {
    pub total: u64,
    pub banks: usize,
}

impl fmt::Display for MemorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.banks > 1 {
            write!(f, "{} across {} banks", HumanSize(self.total), self.banks)
        } else {
            write!(f, "{}", HumanSize(self.total))
        }
    }
}

impl RegionRegistry {
    /// Copies the current memory map.
    pub fn snapshot(&self) -> Snapshot {
        let mut entries = Vec::with_capacity(self.len());

        for node in self.bank_nodes() {
            let bank = &node.region;
            entries.push(MapEntry {
                name: bank.name().to_owned(),
                parent: None,
                base: bank.base(),
                end: bank.end(),
                size: bank.size(),
                kind: RegionKind::Bank,
                utilization: Utilization::new(node.reserved_bytes(), bank.size()),
            });

            entries.extend(node.reservations.iter().map(|reservation| MapEntry {
                name: reservation.name().to_owned(),
                parent: Some(bank.name().to_owned()),
                base: reservation.base(),
                end: reservation.end(),
                size: reservation.size(),
                kind: RegionKind::Reservation,
                utilization: Utilization::new(reservation.size(), bank.size()),
            }));
        }

        Snapshot { entries }
    }

    /// Sums the size of every bank.
    pub fn memory_summary(&self) -> MemorySummary {
        self.banks().fold(
            MemorySummary { total: 0, banks: 0 },
            |summary, bank| MemorySummary {
                total: summary.total.saturating_add(bank.size()),
                banks: summary.banks + 1,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn addr(value: u64) -> PhysicalAddress {
        PhysicalAddress::new(value)
    }

    #[test]
    fn empty_registry_has_empty_snapshot() {
        let registry = RegionRegistry::new();
        let snapshot = registry.snapshot();

        assert!(snapshot.is_empty());
        assert_eq!(format!("{}", snapshot), "");
        assert_eq!(format!("{}", registry.memory_summary()), "0B");
    }

    #[test]
    fn snapshot_after_boot_image_sequence() {
        let mut registry = RegionRegistry::new();
        registry
            .add_memory_bank(addr(0x2000_0000), 32 * MIB, false)
            .unwrap();
        let (_, dtb) = registry
            .alloc("dtb", 0x8000, Some(0x1000), Some("ram0"))
            .unwrap();
        registry
            .alloc("stack", 0x4000, Some(0x1000), Some("ram0"))
            .unwrap();
        registry.free(dtb).unwrap();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);

        let bank = &snapshot.entries()[0];
        assert_eq!(bank.name, "ram0");
        assert_eq!(bank.kind, RegionKind::Bank);
        assert_eq!(bank.parent, None);
        assert_eq!((bank.base, bank.end), (addr(0x2000_0000), addr(0x2200_0000)));
        assert_eq!(bank.utilization.used(), 0x4000);

        let stack = &snapshot.entries()[1];
        assert_eq!(stack.name, "stack");
        assert_eq!(stack.parent.as_deref(), Some("ram0"));
        assert_eq!(stack.kind, RegionKind::Reservation);
        assert_eq!((stack.base, stack.end), (addr(0x2000_8000), addr(0x2000_C000)));
        assert_eq!(stack.size, 0x4000);

        assert_eq!(
            format!("{}", snapshot),
            "0x2000_0000 - 0x2200_0000 32MiB ram0 (0.04% used)\n  \
             0x2000_8000 - 0x2000_C000 16KiB ram0/stack (0.04% of ram0)\n"
        );
    }

    #[test]
    fn snapshot_orders_banks_and_reservations_by_address() {
        let mut registry = RegionRegistry::new();
        registry
            .add_memory_bank(addr(0x8000_0000), 128 * MIB, false)
            .unwrap();
        registry
            .add_memory_bank(addr(0x2000_0000), 32 * MIB, false)
            .unwrap();
        registry
            .request_at("initrd", addr(0x8400_0000), 16 * MIB)
            .unwrap();
        registry
            .request_at("zimage", addr(0x8000_8000), 8 * MIB)
            .unwrap();

        let order: Vec<_> = registry
            .snapshot()
            .iter()
            .map(|entry| entry.name.clone())
            .collect();
        assert_eq!(order, ["ram1", "ram0", "zimage", "initrd"]);

        let snapshot = registry.snapshot();
        let ram0 = snapshot.iter().find(|e| e.name == "ram0").unwrap();
        assert_eq!(format!("{}", ram0.utilization), "18.75%");
    }

    #[test]
    fn snapshot_is_unaffected_by_later_changes() {
        let mut registry = RegionRegistry::new();
        registry
            .add_memory_bank(addr(0x2000_0000), 32 * MIB, false)
            .unwrap();
        let before = registry.snapshot();

        registry.alloc("heap", MIB, None, None).unwrap();
        assert_eq!(before.len(), 1);
        assert_ne!(registry.snapshot(), before);
    }

    #[test]
    fn utilization_rounds_down() {
        assert_eq!(format!("{}", Utilization::new(1, 3)), "33.33%");
        assert_eq!(format!("{}", Utilization::new(3, 3)), "100.00%");
        assert_eq!(format!("{}", Utilization::new(0, 0)), "0.00%");
        assert_eq!(Utilization::new(u64::MAX, u64::MAX).basis_points(), 10_000);
    }

    #[test]
    fn summary_counts_banks() {
        let mut registry = RegionRegistry::new();
        registry
            .add_memory_bank(addr(0x2000_0000), 32 * MIB, false)
            .unwrap();
        assert_eq!(format!("{}", registry.memory_summary()), "32MiB");

        registry
            .add_memory_bank(addr(0x8000_0000), 128 * MIB, false)
            .unwrap();
        let summary = registry.memory_summary();
        assert_eq!(summary, MemorySummary { total: 160 * MIB, banks: 2 });
        assert_eq!(format!("{}", summary), "160MiB across 2 banks");
    }
}
