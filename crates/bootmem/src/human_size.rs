//! Human-readable size formatting for memory values.

use core::fmt;

/// Wraps a size in bytes and formats it as a human-readable value with binary SI prefixes.
///
/// Binary SI prefixes (KiB, MiB, GiB, etc.) are always used, where each unit is 1024 times
/// the previous unit. Values are truncated to at most 2 decimal places, omitting trailing
/// zeros.
///
/// # Examples
///
/// ```
/// use bootmem::HumanSize;
///
/// assert_eq!(format!("{}", HumanSize(0)), "0B");
/// assert_eq!(format!("{}", HumanSize(1023)), "1023B");
/// assert_eq!(format!("{}", HumanSize(0x8000)), "32KiB");
/// assert_eq!(format!("{}", HumanSize(1536)), "1.5KiB");
/// assert_eq!(format!("{}", HumanSize(0x0200_0000)), "32MiB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct HumanSize(pub u64);

impl From<u32> for HumanSize {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value as u64)
    }
}

impl From<u64> for HumanSize {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for HumanSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

        let bytes = self.0;
        let mut unit = 0;
        while unit + 1 < UNITS.len() && bytes >> (10 * (unit + 1)) != 0 {
            unit += 1;
        }

        let shift = 10 * unit as u32;
        let whole = bytes >> shift;
        let remainder = bytes & ((1u64 << shift) - 1);
        // Hundredths of a unit, truncated. u128 keeps the EiB range exact.
        let hundredths = ((remainder as u128 * 100) >> shift) as u64;

        match hundredths {
            0 => write!(f, "{}{}", whole, UNITS[unit]),
            h if h % 10 == 0 => write!(f, "{}.{}{}", whole, h / 10, UNITS[unit]),
            h => write!(f, "{}.{:02}{}", whole, h, UNITS[unit]),
        }
    }
}
