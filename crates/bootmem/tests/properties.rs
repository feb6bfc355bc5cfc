use bootmem::{
    PhysicalAddress, Region, RegionError, RegionHandle, RegionKind, RegionRegistry,
};
use proptest::prelude::*;

const BANK_BASE: u64 = 0x2000_0000;
const BANK_SIZE: u64 = 0x0010_0000;

fn addr(value: u64) -> PhysicalAddress {
    PhysicalAddress::new(value)
}

fn intersects(a: (u64, u64), b: (u64, u64)) -> bool {
    a.0 < b.0 + b.1 && b.0 < a.0 + a.1
}

/// Checks that siblings are disjoint and reservations sit inside their bank.
fn assert_consistent(registry: &RegionRegistry) {
    let banks: Vec<&Region> = registry.banks().collect();
    for pair in banks.windows(2) {
        assert!(pair[0].end() <= pair[1].base(), "{:?}", pair);
    }

    for bank in banks {
        let reservations = registry.reservations(bank.handle()).unwrap();
        for reservation in reservations {
            assert!(bank.extent().contains(&reservation.extent()));
            assert_eq!(reservation.parent(), Some(bank.handle()));
        }
        for pair in reservations.windows(2) {
            assert!(pair[0].end() <= pair[1].base(), "{:?}", pair);
        }
    }
}

#[derive(Debug, Clone)]
enum Op {
    Alloc { size: u64, align_shift: u32 },
    Free(usize),
    Fixed { offset: u64, size: u64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1u64..0x4_0000, 0u32..16).prop_map(|(size, align_shift)| Op::Alloc { size, align_shift }),
        2 => any::<usize>().prop_map(Op::Free),
        1 => (0u64..BANK_SIZE, 1u64..0x2_0000).prop_map(|(offset, size)| Op::Fixed { offset, size }),
    ]
}

proptest! {
    #[test]
    fn disjoint_banks_are_all_accepted(sizes in prop::collection::vec((1u64..0x1000, 0u64..0x1000), 1..24)) {
        let mut registry = RegionRegistry::new();
        let mut base = 0x1000u64;
        let mut expected = Vec::new();

        for (index, (size, gap)) in sizes.iter().enumerate() {
            let name = format!("bank{}", index);
            registry.add(&name, addr(base), *size, RegionKind::Bank, None).unwrap();
            expected.push((name, base, *size));
            base += size + gap;
        }

        let listed: Vec<_> = registry
            .list()
            .map(|r| (r.name().to_owned(), r.base().as_u64(), r.size()))
            .collect();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn sibling_overlap_is_detected(
        a in (0u64..0x1_0000, 1u64..0x1000),
        b in (0u64..0x1_0000, 1u64..0x1000),
    ) {
        let mut registry = RegionRegistry::new();
        registry.add("a", addr(a.0), a.1, RegionKind::Bank, None).unwrap();
        let result = registry.add("b", addr(b.0), b.1, RegionKind::Bank, None);

        if intersects(a, b) {
            prop_assert_eq!(result, Err(RegionError::Overlap));
            prop_assert_eq!(registry.len(), 1);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(registry.len(), 2);
        }
    }

    #[test]
    fn reservation_overlap_is_detected(
        a in (0u64..0x8000, 1u64..0x1000),
        b in (0u64..0x8000, 1u64..0x1000),
    ) {
        let mut registry = RegionRegistry::new();
        let bank = registry
            .add("ram0", addr(BANK_BASE), BANK_SIZE, RegionKind::Bank, None)
            .unwrap();
        registry
            .add("a", addr(BANK_BASE + a.0), a.1, RegionKind::Reservation, Some(bank))
            .unwrap();
        let result = registry.add("b", addr(BANK_BASE + b.0), b.1, RegionKind::Reservation, Some(bank));

        prop_assert_eq!(result.is_err(), intersects(a, b));
    }

    #[test]
    fn alloc_and_free_keep_regions_disjoint(ops in prop::collection::vec(op(), 1..64)) {
        let mut registry = RegionRegistry::new();
        registry.add_memory_bank(addr(BANK_BASE), BANK_SIZE, false).unwrap();
        registry.add_memory_bank(addr(BANK_BASE + 2 * BANK_SIZE), BANK_SIZE, false).unwrap();
        let mut live: Vec<RegionHandle> = Vec::new();

        for op in ops {
            let before = registry.snapshot();
            match op {
                Op::Alloc { size, align_shift } => {
                    let align = 1u64 << align_shift;
                    match registry.alloc("buf", size, Some(align), None) {
                        Ok((base, handle)) => {
                            prop_assert!(base.is_aligned(align));
                            prop_assert_eq!(registry.get(handle).unwrap().size(), size);
                            live.push(handle);
                        }
                        Err(RegionError::OutOfMemory { .. }) => {
                            prop_assert_eq!(registry.snapshot(), before);
                        }
                        Err(err) => prop_assert!(false, "unexpected error {:?}", err),
                    }
                }
                Op::Free(index) => {
                    if !live.is_empty() {
                        let handle = live.swap_remove(index % live.len());
                        registry.free(handle).unwrap();
                        prop_assert!(registry.get(handle).is_none());
                    }
                }
                Op::Fixed { offset, size } => {
                    if let Ok(handle) = registry.request_at("fixed", addr(BANK_BASE + offset), size) {
                        live.push(handle);
                    } else {
                        prop_assert_eq!(registry.snapshot(), before);
                    }
                }
            }
            assert_consistent(&registry);
        }
    }

    #[test]
    fn freed_range_is_reused(size in 1u64..0x1_0000, align_shift in 0u32..13) {
        let align = 1u64 << align_shift;
        let mut registry = RegionRegistry::new();
        registry.add_memory_bank(addr(BANK_BASE), BANK_SIZE, false).unwrap();

        let (first, handle) = registry.alloc("img", size, Some(align), Some("ram0")).unwrap();
        registry.free(handle).unwrap();
        let (second, _) = registry.alloc("img", size, Some(align), Some("ram0")).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn zero_size_never_allocates(align_shift in 0u32..20, pick_bank in any::<bool>()) {
        let mut registry = RegionRegistry::new();
        registry.add_memory_bank(addr(BANK_BASE), BANK_SIZE, false).unwrap();
        let before = registry.snapshot();

        let bank = if pick_bank { Some("ram0") } else { None };
        prop_assert_eq!(
            registry.alloc("empty", 0, Some(1 << align_shift), bank),
            Err(RegionError::InvalidArgument)
        );
        prop_assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn oversized_request_is_out_of_memory(extra in 1u64..0x1_0000, split in 0x1000u64..0xF_0000) {
        let mut registry = RegionRegistry::new();
        registry.add_memory_bank(addr(BANK_BASE), BANK_SIZE, false).unwrap();
        registry.request_at("wall", addr(BANK_BASE + split), 0x1000).unwrap();
        let before = registry.snapshot();

        let largest = split.max(BANK_SIZE - split - 0x1000);
        let result = registry.alloc("big", largest + extra, Some(1), None);

        prop_assert_eq!(
            result,
            Err(RegionError::OutOfMemory {
                requested: largest + extra,
                available: BANK_SIZE - 0x1000,
            })
        );
        prop_assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn discovered_banks_are_numbered_sequentially(count in 1usize..32) {
        let mut registry = RegionRegistry::new();
        for index in 0..count {
            let base = BANK_BASE + index as u64 * BANK_SIZE;
            registry.add_memory_bank(addr(base), BANK_SIZE, false).unwrap();
        }

        let names: Vec<String> = registry.banks().map(|bank| bank.name().to_owned()).collect();
        let expected: Vec<String> = (0..count).map(|index| format!("ram{}", index)).collect();
        prop_assert_eq!(names, expected);
    }
}
