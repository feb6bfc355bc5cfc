//! First-fit reservation of bank memory for later boot stages.
//!
//! Free space is never stored. Each request walks the gaps between a bank's
//! live reservations in ascending address order and takes the first gap that
//! can hold the aligned request, then records the result as a reservation
//! through [`RegionRegistry::add`]. Boot runs only ever hold a few dozen
//! reservations, so recomputing the gaps on every call is cheap.

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::{iter, slice};

use crate::registry::BankNode;
use crate::{Extent, PhysicalAddress, Region, RegionError, RegionHandle, RegionKind, RegionRegistry};

/// Alignment used when a request does not ask for one: the pointer width.
pub const DEFAULT_ALIGNMENT: u64 = core::mem::size_of::<usize>() as u64;

/// Iterates over the free gaps of a bank in ascending address order.
fn gaps(node: &BankNode) -> impl Iterator<Item = Extent> + '_ {
    let bank = node.region.extent;
    let mut cursor = bank.base();
    // An empty extent at the bank's end closes the final gap.
    let tail = Extent::between(bank.end(), bank.end());

    node.reservations
        .iter()
        .map(Region::extent)
        .chain(iter::once(tail))
        .filter_map(move |used| {
            let gap = Extent::between(cursor, used.base());
            cursor = used.end();
            (!gap.is_empty()).then_some(gap)
        })
}

/// Finds the lowest aligned address in the bank where `size` bytes fit.
fn first_fit(node: &BankNode, size: u64, align: u64) -> Option<PhysicalAddress> {
    gaps(node).find_map(|gap| {
        let start = gap.base().align_up(align)?;
        let end = start.checked_add(size)?;
        (end <= gap.end()).then_some(start)
    })
}

impl RegionRegistry {
    /// Reserves `size` bytes aligned to `align` and returns the base address
    /// and handle of the new reservation.
    ///
    /// With `bank` set, only that bank is searched; otherwise banks are tried
    /// in ascending address order. `align` defaults to [`DEFAULT_ALIGNMENT`].
    /// The reservation is named `tag`, or `tag.N` with the smallest `N` that
    /// makes the name unique.
    ///
    /// # Errors
    ///
    /// * [`RegionError::InvalidArgument`] for an empty tag, zero size, or an
    ///   alignment that is not a power of two.
    /// * [`RegionError::NotFound`] if `bank` does not name a bank.
    /// * [`RegionError::OutOfMemory`] if no searched bank has room. The error
    ///   reports the free bytes of every searched bank.
    pub fn alloc(
        &mut self,
        tag: &str,
        size: u64,
        align: Option<u64>,
        bank: Option<&str>,
    ) -> Result<(PhysicalAddress, RegionHandle), RegionError> {
        let align = align.unwrap_or(DEFAULT_ALIGNMENT);
        if tag.is_empty() || size == 0 || !align.is_power_of_two() {
            log::debug!(
                "rejecting allocation {:?}: size {:#x}, alignment {:#x}",
                tag,
                size,
                align
            );
            return Err(RegionError::InvalidArgument);
        }

        let candidates = match bank {
            Some(name) => {
                let node = self
                    .find_by_name(name)
                    .filter(|region| region.is_bank())
                    .and_then(|region| self.bank_node(region.handle()))
                    .ok_or(RegionError::NotFound)?;
                slice::from_ref(node)
            }
            None => self.bank_nodes(),
        };

        let mut available: u64 = 0;
        let mut placement = None;
        for node in candidates {
            let free = node.region.size() - node.reserved_bytes();
            available = available.saturating_add(free);
            if free < size {
                continue;
            }
            if let Some(base) = first_fit(node, size, align) {
                placement = Some((node.region.handle(), base));
                break;
            }
        }

        let Some((parent, base)) = placement else {
            log::debug!(
                "no room for {:?}: {:#x} bytes aligned to {:#x}, {:#x} bytes free",
                tag,
                size,
                align,
                available
            );
            return Err(RegionError::OutOfMemory {
                requested: size,
                available,
            });
        };

        let name = self.unique_name(tag);
        let handle = self.add(&name, base, size, RegionKind::Reservation, Some(parent))?;
        Ok((base, handle))
    }

    /// Reserves the exact range `[base, base + size)` inside whichever bank
    /// contains it.
    ///
    /// Used for memory whose location is dictated from outside, such as an
    /// image the previous stage already loaded or a firmware-owned area.
    ///
    /// # Errors
    ///
    /// * [`RegionError::InvalidArgument`] for an empty tag, zero size, or a
    ///   range that overflows the address space.
    /// * [`RegionError::OutOfBounds`] if no bank fully contains the range.
    /// * [`RegionError::Overlap`] if the range intersects a live reservation.
    pub fn request_at(
        &mut self,
        tag: &str,
        base: PhysicalAddress,
        size: u64,
    ) -> Result<RegionHandle, RegionError> {
        if tag.is_empty() || size == 0 {
            return Err(RegionError::InvalidArgument);
        }
        let extent = Extent::try_new(base, size).ok_or(RegionError::InvalidArgument)?;

        let Some(parent) = self
            .banks()
            .find(|bank| bank.extent().contains(&extent))
            .map(Region::handle)
        else {
            log::debug!("{:?} {} is not inside any bank", tag, extent);
            return Err(RegionError::OutOfBounds);
        };

        let name = self.unique_name(tag);
        self.add(&name, base, size, RegionKind::Reservation, Some(parent))
    }

    /// Releases a reservation so its range can be handed out again.
    ///
    /// # Errors
    ///
    /// * [`RegionError::NotFound`] if the handle is unknown or already freed.
    /// * [`RegionError::InvalidArgument`] if the handle names a bank.
    pub fn free(&mut self, handle: RegionHandle) -> Result<(), RegionError> {
        let region = self.get(handle).ok_or(RegionError::NotFound)?;
        if region.is_bank() {
            return Err(RegionError::InvalidArgument);
        }
        self.remove(handle)
    }

    /// Returns the free gaps of a bank in ascending address order.
    pub fn free_ranges(&self, bank: RegionHandle) -> Result<Vec<Extent>, RegionError> {
        let node = self.bank_node(bank).ok_or(RegionError::NotFound)?;
        Ok(gaps(node).collect())
    }

    /// Returns the number of unreserved bytes in a bank.
    pub fn free_bytes(&self, bank: RegionHandle) -> Result<u64, RegionError> {
        let node = self.bank_node(bank).ok_or(RegionError::NotFound)?;
        Ok(node.region.size() - node.reserved_bytes())
    }

    /// Returns the span from the start of the lowest bank up to its first
    /// reservation, or the whole bank if it has none.
    ///
    /// The result may be empty when a reservation sits right at the bank's
    /// base. Returns `None` when no bank is registered.
    pub fn leading_free_space(&self) -> Option<Extent> {
        let node = self.bank_nodes().first()?;
        let bank = node.region.extent;
        let end = node
            .reservations
            .first()
            .map_or(bank.end(), Region::base);
        Some(Extent::between(bank.base(), end))
    }

    fn unique_name(&self, tag: &str) -> String {
        if self.find_by_name(tag).is_none() {
            return tag.to_owned();
        }

        let mut suffix = 1u32;
        loop {
            let candidate = format!("{}.{}", tag, suffix);
            if self.find_by_name(&candidate).is_none() {
                return candidate;
            }
            suffix += 1;
        }
    }
}
