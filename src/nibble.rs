use std::ops::{Index, IndexMut};

/// A 4-bit unsigned integer (nibble).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub struct u4(u8);

/// Returned when converting a value above 0xF into a [`u4`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("value {0:#04X} does not fit in a nibble")]
pub struct NibbleOutOfRange(pub u8);

impl u4 {
    /// Creates a new `u4` from a `u8`.
    ///
    /// Panics if the value is greater than 0x0F.
    pub const fn new(value: u8) -> Self {
        assert!(value <= 0x0F, "u4 value must be in range 0x0-0xF");
        Self(value)
    }

    /// Creates a `u4` from the low four bits of `value`.
    pub const fn from_low_bits(value: u8) -> Self {
        Self(value & 0x0F)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for u4 {
    type Error = NibbleOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 0x0F {
            Ok(Self(value))
        } else {
            Err(NibbleOutOfRange(value))
        }
    }
}

impl From<u4> for usize {
    fn from(v: u4) -> usize {
        v.0 as usize
    }
}

impl From<u4> for u8 {
    fn from(v: u4) -> u8 {
        v.0
    }
}

impl std::fmt::UpperHex for u4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::UpperHex::fmt(&self.0, f)
    }
}

impl<T> Index<u4> for [T; 16] {
    type Output = T;

    fn index(&self, index: u4) -> &Self::Output {
        &self[index.0 as usize]
    }
}

impl<T> IndexMut<u4> for [T; 16] {
    fn index_mut(&mut self, index: u4) -> &mut Self::Output {
        &mut self[index.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_from_rejects_values_above_f() {
        assert_eq!(u4::try_from(0x0F).map(u8::from), Ok(0x0F));
        assert_eq!(u4::try_from(0x10), Err(NibbleOutOfRange(0x10)));
    }

    #[test]
    fn from_low_bits_masks() {
        assert_eq!(u4::from_low_bits(0xAB).get(), 0x0B);
    }

    #[test]
    fn indexes_sixteen_element_arrays() {
        let mut regs = [0u8; 16];
        regs[u4::new(0xF)] = 7;
        assert_eq!(regs[15], 7);
    }
}
