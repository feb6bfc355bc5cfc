//! Human-readable address formatting for memory map output.

use core::fmt;

/// Wraps an address and formats it as an uppercase hexadecimal value with `0x` prefix
/// and `_` digit separators every 4 digits.
///
/// # Examples
///
/// ```
/// use bootmem::HumanAddress;
///
/// assert_eq!(format!("{}", HumanAddress(0x0)), "0x0");
/// assert_eq!(format!("{}", HumanAddress(0x1000)), "0x1000");
/// assert_eq!(format!("{}", HumanAddress(0x2000_C000)), "0x2000_C000");
/// assert_eq!(format!("{}", HumanAddress(0x1_0000_0000)), "0x1_0000_0000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct HumanAddress(pub u64);

impl From<u32> for HumanAddress {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value as u64)
    }
}

impl From<u64> for HumanAddress {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<crate::PhysicalAddress> for HumanAddress {
    #[inline]
    fn from(value: crate::PhysicalAddress) -> Self {
        Self(value.as_u64())
    }
}

impl fmt::Display for HumanAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let value = self.0;
        let bits = u64::BITS - value.leading_zeros();
        let num_digits = bits.div_ceil(4).max(1);

        f.write_str("0x")?;
        for index in (0..num_digits).rev() {
            let nibble = (value >> (index * 4)) & 0xF;
            f.write_fmt(format_args!("{}", DIGITS[nibble as usize] as char))?;
            if index != 0 && index % 4 == 0 {
                f.write_str("_")?;
            }
        }

        Ok(())
    }
}
