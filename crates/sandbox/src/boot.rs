//! Reservations made while preparing to boot an operating system.

use bootmem::{PhysicalAddress, RegionError, RegionHandle, RegionRegistry};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

/// Space kept for the bootloader itself at the top of the first bank.
pub const BOOTLOADER_SIZE: u64 = MIB;

/// A buffer a later boot stage needs in RAM.
#[derive(Debug, Clone, Copy)]
pub struct BootImage {
    pub tag: &'static str,
    pub size: u64,
    pub align: u64,
    /// Bank the image must live in, if any.
    pub bank: Option<&'static str>,
}

/// Images placed for a typical kernel boot, in placement order.
pub const IMAGES: &[BootImage] = &[
    BootImage {
        tag: "dtb",
        size: 32 * KIB,
        align: 4 * KIB,
        bank: Some("ram0"),
    },
    BootImage {
        tag: "stack",
        size: 16 * KIB,
        align: 4 * KIB,
        bank: Some("ram0"),
    },
    BootImage {
        tag: "malloc",
        size: 4 * MIB,
        align: 4 * KIB,
        bank: Some("ram0"),
    },
    BootImage {
        tag: "zimage",
        size: 8 * MIB,
        align: 2 * MIB,
        bank: None,
    },
    BootImage {
        tag: "initrd",
        size: 16 * MIB,
        align: 4 * KIB,
        bank: None,
    },
];

/// Reserves the bootloader's own image at the top of the lowest bank.
pub fn reserve_bootloader(registry: &mut RegionRegistry) -> Result<RegionHandle, RegionError> {
    let end = registry.banks().next().ok_or(RegionError::NotFound)?.end();
    let base = end.as_u64().saturating_sub(BOOTLOADER_SIZE);
    registry.request_at("barebox", PhysicalAddress::new(base), BOOTLOADER_SIZE)
}

/// Places every image in `images`, stopping at the first one that does not fit.
pub fn place_images(
    registry: &mut RegionRegistry,
    images: &[BootImage],
) -> Result<Vec<(PhysicalAddress, RegionHandle)>, RegionError> {
    images
        .iter()
        .map(|image| {
            let placed = registry.alloc(image.tag, image.size, Some(image.align), image.bank)?;
            log::info!("{} at {} ({:#x} bytes)", image.tag, placed.0, image.size);
            Ok(placed)
        })
        .collect()
}
