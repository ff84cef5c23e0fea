//! A small u4/nibble implementation.
//!
//! HID++2.0 packs the function ID and the software ID into a single byte, the
//! function ID taking the 4 high and the software ID taking the 4 low bits.

use std::fmt;

use thiserror::Error;

/// Represents an unsigned 4-bit value (nibble) encoded as a byte.
///
/// The inner byte never exceeds `0x0f`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct U4(u8);

impl U4 {
    /// The smallest nibble, `0x0`.
    pub const MIN: U4 = U4(0x0);

    /// The largest nibble, `0xf`.
    pub const MAX: U4 = U4(0xf);

    /// Constructs a nibble from a byte, returning [`None`] if the value does
    /// not fit into 4 bits.
    pub const fn new(raw: u8) -> Option<Self> {
        if raw > 0x0f { None } else { Some(Self(raw)) }
    }

    /// Constructs a nibble from the 4 low/rightmost bits of a byte, silently
    /// discarding the high bits.
    pub const fn from_lo(raw: u8) -> Self {
        Self(raw & 0x0f)
    }

    /// Constructs a nibble from the 4 high/leftmost bits of a byte.
    pub const fn from_hi(raw: u8) -> Self {
        Self(raw >> 4)
    }

    /// Returns the nibble as a byte with the value set as the 4 low bits.
    pub const fn to_lo(self) -> u8 {
        self.0
    }

    /// Returns the nibble as a byte with the value set as the 4 high bits.
    pub const fn to_hi(self) -> u8 {
        self.0 << 4
    }

    /// The nibble following this one, wrapping around from `0xf` to `0x0`.
    pub const fn wrapping_next(self) -> Self {
        Self((self.0 + 1) & 0x0f)
    }
}

impl TryFrom<u8> for U4 {
    type Error = NibbleOverflow;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(NibbleOverflow(value))
    }
}

impl From<U4> for u8 {
    fn from(value: U4) -> Self {
        value.0
    }
}

impl fmt::Display for U4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for U4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Indicates that a byte was too large to be represented as a [`U4`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
#[error("{0:#04x} does not fit into 4 bits")]
pub struct NibbleOverflow(pub u8);

/// Combines two nibbles to a byte, with `hi` being set to the 4 leftmost and
/// `lo` being set to the 4 rightmost bits.
pub const fn combine(hi: U4, lo: U4) -> u8 {
    hi.to_hi() | lo.to_lo()
}

/// Splits a byte into its high and low nibble. This is the inverse of
/// [`combine`].
pub const fn split(byte: u8) -> (U4, U4) {
    (U4::from_hi(byte), U4::from_lo(byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_values_wider_than_four_bits() {
        assert_eq!(U4::new(0x0f), Some(U4::MAX));
        assert_eq!(U4::new(0x10), None);
        assert_eq!(U4::try_from(0xab), Err(NibbleOverflow(0xab)));
    }

    #[test]
    fn masking_constructors_keep_the_selected_half() {
        assert_eq!(U4::from_lo(0xab).to_lo(), 0x0b);
        assert_eq!(U4::from_hi(0xab).to_lo(), 0x0a);
        assert_eq!(U4::from_lo(0x03).to_hi(), 0x30);
    }

    #[test]
    fn combine_and_split_are_inverse() {
        for hi in [0u8, 1, 15] {
            for lo in [0u8, 1, 15] {
                let byte = combine(U4::from_lo(hi), U4::from_lo(lo));
                assert_eq!(byte, (hi << 4) | lo);
                assert_eq!(split(byte), (U4::from_lo(hi), U4::from_lo(lo)));
            }
        }
    }

    #[test]
    fn wrapping_next_rolls_over() {
        assert_eq!(U4::from_lo(0x3).wrapping_next(), U4::from_lo(0x4));
        assert_eq!(U4::MAX.wrapping_next(), U4::MIN);
    }
}
