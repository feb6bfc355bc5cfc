//! Authoritative store of banks and reservations.
//!
//! The registry keeps a two-level structure: a list of banks sorted by base
//! address, each owning a list of its reservations, also sorted by base
//! address. Sorting is only used to make enumeration and free-range
//! computation cheap; overlap checks are plain linear scans, which is plenty
//! for the few dozen regions a boot run ever tracks.
//!
//! All mutating operations validate the request completely before touching
//! any state, so a failed call never leaves a partial update behind.

use alloc::borrow::ToOwned;
use alloc::vec::Vec;
use core::iter;

use crate::{Extent, PhysicalAddress, Region, RegionError, RegionHandle, RegionKind};

/// A bank and the reservations carved out of it.
#[derive(Debug)]
pub(crate) struct BankNode {
    pub(crate) region: Region,
    /// Sorted by ascending base address.
    pub(crate) reservations: Vec<Region>,
}

impl BankNode {
    /// Total bytes held by reservations in this bank.
    pub(crate) fn reserved_bytes(&self) -> u64 {
        self.reservations.iter().map(Region::size).sum()
    }
}

enum Location {
    Bank(usize),
    Reservation(usize, usize),
}

/// Registry of every bank and reservation known to the boot process.
///
/// There is exactly one logical owner of a registry. It contains no locking
/// of its own; see [`crate::global`] for the shared instance used by board
/// code.
#[derive(Debug)]
pub struct RegionRegistry {
    /// Sorted by ascending base address.
    banks: Vec<BankNode>,
    next_handle: u64,
    /// Index used to name the next discovered bank.
    pub(crate) next_bank_index: u32,
}

impl RegionRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            banks: Vec::new(),
            next_handle: 1,
            next_bank_index: 0,
        }
    }

    /// Registers a new region.
    ///
    /// Banks must be passed without a parent; reservations must name the bank
    /// they are carved from.
    ///
    /// # Errors
    ///
    /// * [`RegionError::InvalidArgument`] for an empty name, zero size, an extent
    ///   that overflows the address space, or a kind/parent mismatch.
    /// * [`RegionError::DuplicateName`] if `name` is already registered.
    /// * [`RegionError::NotFound`] if `parent` is not a registered bank.
    /// * [`RegionError::OutOfBounds`] if a reservation does not fit inside its bank.
    /// * [`RegionError::Overlap`] if the extent intersects a sibling.
    pub fn add(
        &mut self,
        name: &str,
        base: PhysicalAddress,
        size: u64,
        kind: RegionKind,
        parent: Option<RegionHandle>,
    ) -> Result<RegionHandle, RegionError> {
        if name.is_empty() || size == 0 {
            log::debug!("rejecting region {:?}: empty name or zero size", name);
            return Err(RegionError::InvalidArgument);
        }
        let Some(extent) = Extent::try_new(base, size) else {
            log::debug!("rejecting region {}: {:#x}@{} overflows", name, size, base);
            return Err(RegionError::InvalidArgument);
        };
        match (kind, parent) {
            (RegionKind::Bank, None) | (RegionKind::Reservation, Some(_)) => {}
            _ => return Err(RegionError::InvalidArgument),
        }
        if self.find_by_name(name).is_some() {
            return Err(RegionError::DuplicateName);
        }

        let handle = RegionHandle::new(self.next_handle);
        let region = Region {
            handle,
            name: name.to_owned(),
            extent,
            kind,
            parent,
        };

        match parent {
            None => {
                if let Some(other) = self.banks.iter().find(|b| b.region.extent.overlaps(&extent)) {
                    log::debug!(
                        "bank {} {} overlaps {} {}",
                        name,
                        extent,
                        other.region.name,
                        other.region.extent
                    );
                    return Err(RegionError::Overlap);
                }
                let index = self.banks.partition_point(|b| b.region.base() < base);
                self.banks.insert(
                    index,
                    BankNode {
                        region,
                        reservations: Vec::new(),
                    },
                );
            }
            Some(parent) => {
                let bank = self
                    .banks
                    .iter_mut()
                    .find(|b| b.region.handle == parent)
                    .ok_or(RegionError::NotFound)?;
                if !bank.region.extent.contains(&extent) {
                    log::debug!(
                        "reservation {} {} outside bank {} {}",
                        name,
                        extent,
                        bank.region.name,
                        bank.region.extent
                    );
                    return Err(RegionError::OutOfBounds);
                }
                if let Some(other) = bank.reservations.iter().find(|r| r.extent.overlaps(&extent)) {
                    log::debug!(
                        "reservation {} {} overlaps {} {}",
                        name,
                        extent,
                        other.name,
                        other.extent
                    );
                    return Err(RegionError::Overlap);
                }
                let index = bank.reservations.partition_point(|r| r.base() < base);
                bank.reservations.insert(index, region);
            }
        }

        self.next_handle += 1;
        log::trace!("registered {} {} {} as {}", kind, name, extent, handle);
        Ok(handle)
    }

    /// Removes a region.
    ///
    /// # Errors
    ///
    /// * [`RegionError::NotFound`] if the handle is unknown.
    /// * [`RegionError::BankNotEmpty`] if the handle names a bank that still
    ///   owns reservations.
    pub fn remove(&mut self, handle: RegionHandle) -> Result<(), RegionError> {
        let removed = match self.locate(handle).ok_or(RegionError::NotFound)? {
            Location::Bank(index) => {
                if !self.banks[index].reservations.is_empty() {
                    return Err(RegionError::BankNotEmpty);
                }
                self.banks.remove(index).region
            }
            Location::Reservation(bank, index) => self.banks[bank].reservations.remove(index),
        };

        log::trace!("removed {} {} {}", removed.kind, removed.name, removed.extent);
        Ok(())
    }

    /// Looks up a region by handle.
    pub fn get(&self, handle: RegionHandle) -> Option<&Region> {
        match self.locate(handle)? {
            Location::Bank(index) => Some(&self.banks[index].region),
            Location::Reservation(bank, index) => Some(&self.banks[bank].reservations[index]),
        }
    }

    /// Looks up a region by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Region> {
        self.list().find(|region| region.name == name)
    }

    /// Iterates over every region: banks by ascending base, each followed by
    /// its reservations by ascending base.
    pub fn list(&self) -> impl Iterator<Item = &Region> {
        self.banks
            .iter()
            .flat_map(|bank| iter::once(&bank.region).chain(bank.reservations.iter()))
    }

    /// Iterates over the banks by ascending base.
    pub fn banks(&self) -> impl Iterator<Item = &Region> {
        self.banks.iter().map(|bank| &bank.region)
    }

    /// Returns the reservations of a bank, sorted by base, or `None` if the
    /// handle is not a bank.
    pub fn reservations(&self, bank: RegionHandle) -> Option<&[Region]> {
        self.bank_node(bank).map(|node| node.reservations.as_slice())
    }

    /// Number of registered regions, banks and reservations together.
    pub fn len(&self) -> usize {
        self.banks.iter().map(|bank| 1 + bank.reservations.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    pub(crate) fn bank_nodes(&self) -> &[BankNode] {
        &self.banks
    }

    pub(crate) fn bank_node(&self, handle: RegionHandle) -> Option<&BankNode> {
        self.banks.iter().find(|bank| bank.region.handle == handle)
    }

    fn locate(&self, handle: RegionHandle) -> Option<Location> {
        for (bank_index, bank) in self.banks.iter().enumerate() {
            if bank.region.handle == handle {
                return Some(Location::Bank(bank_index));
            }
            if let Some(index) = bank.reservations.iter().position(|r| r.handle == handle) {
                return Some(Location::Reservation(bank_index, index));
            }
        }
        None
    }
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
