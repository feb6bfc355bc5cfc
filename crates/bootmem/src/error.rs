use core::fmt;

use crate::HumanSize;

/// Errors returned by the region registry and the allocator built on it.
///
/// Every operation that returns one of these leaves the registry exactly as
/// it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    /// A region with the requested name is already registered.
    DuplicateName,
    /// The proposed extent intersects a sibling region.
    Overlap,
    /// A reservation does not fit inside its parent bank.
    OutOfBounds,
    /// No bank has a free range large enough for the request.
    OutOfMemory {
        /// Bytes requested by the caller.
        requested: u64,
        /// Total free bytes in the banks that were searched.
        available: u64,
    },
    /// Zero size, bad alignment, address overflow, or an inconsistent kind/parent pair.
    InvalidArgument,
    /// No region matches the given handle or name.
    NotFound,
    /// The bank still owns live reservations.
    BankNotEmpty,
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName => f.write_str("region name already in use"),
            Self::Overlap => f.write_str("region overlaps an existing region"),
            Self::OutOfBounds => f.write_str("reservation lies outside its bank"),
            Self::OutOfMemory {
                requested,
                available,
            } => write!(
                f,
                "out of memory: requested {}, {} free",
                HumanSize(*requested),
                HumanSize(*available)
            ),
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::NotFound => f.write_str("no such region"),
            Self::BankNotEmpty => f.write_str("bank still has reservations"),
        }
    }
}

impl core::error::Error for RegionError {}
