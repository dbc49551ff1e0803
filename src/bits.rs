//! Compact protocol bit fields.
//!
//! A [`BitString`] is an ordered run of up to [`MAX_BITS`] binary digits packed
//! into a `u32`. Index 0 is the leftmost (first appended) bit, which matches the
//! way both command layouts are written down: `"1101000100000"` reads left to
//! right in the same order the bits are appended.
//!
//! The fan protocol transmits a field in this order (MSB-first). The mattress
//! protocol transmits it back to front (LSB-first), see [`BitString::reversed`].

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// Capacity of a [`BitString`] in bits.
pub const MAX_BITS: u8 = 32;

/// An ordered sequence of at most 32 bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitString {
    /// The bits, right-aligned: the last appended bit is bit 0 of the integer.
    bits: u32,
    len: u8,
}

impl BitString {
    /// An empty bit string.
    pub const fn new() -> Self {
        Self { bits: 0, len: 0 }
    }

    /// Builds a `len`-bit string from the low `len` bits of `value`, most
    /// significant bit first.
    ///
    /// Bits of `value` above `len` are discarded.
    pub fn from_value(value: u32, len: u8) -> Result<Self> {
        if len > MAX_BITS {
            return Err(Error::BitStringTooLong { len: len as usize });
        }
        Ok(Self::from_value_truncated(value, len))
    }

    pub(crate) const fn from_value_truncated(value: u32, len: u8) -> Self {
        let mask = if len >= MAX_BITS {
            u32::MAX
        } else {
            (1u32 << len) - 1
        };
        Self {
            bits: value & mask,
            len,
        }
    }

    /// Builds a bit string from a slice of bits.
    pub fn from_bits(bits: &[bool]) -> Result<Self> {
        if bits.len() > MAX_BITS as usize {
            return Err(Error::BitStringTooLong { len: bits.len() });
        }
        let mut out = Self::new();
        for &bit in bits {
            out.push_unchecked(bit);
        }
        Ok(out)
    }

    /// Number of bits held.
    pub const fn len(&self) -> u8 {
        self.len
    }

    /// Returns `true` if there are no bits.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bits as an integer, first bit most significant.
    pub const fn value(&self) -> u32 {
        self.bits
    }

    /// Returns the bit at `index`, counting from the left.
    pub fn get(&self, index: u8) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some((self.bits >> (self.len - 1 - index)) & 1 == 1)
    }

    /// Appends a single bit on the right.
    pub fn push(&mut self, bit: bool) -> Result<()> {
        if self.len >= MAX_BITS {
            return Err(Error::BitStringTooLong {
                len: self.len as usize + 1,
            });
        }
        self.push_unchecked(bit);
        Ok(())
    }

    fn push_unchecked(&mut self, bit: bool) {
        self.bits = (self.bits << 1) | bit as u32;
        self.len += 1;
    }

    /// Appends `other` on the right.
    pub fn append(&mut self, other: &BitString) -> Result<()> {
        let total = self.len as usize + other.len as usize;
        if total > MAX_BITS as usize {
            return Err(Error::BitStringTooLong { len: total });
        }
        for bit in other.iter() {
            self.push_unchecked(bit);
        }
        Ok(())
    }

    /// Returns the concatenation of `self` and `other`.
    pub fn concat(mut self, other: &BitString) -> Result<Self> {
        self.append(other)?;
        Ok(self)
    }

    /// Returns the bits in reverse order.
    pub fn reversed(&self) -> Self {
        if self.len == 0 {
            return *self;
        }
        let bits = self.bits.reverse_bits() >> (u32::BITS - self.len as u32);
        Self {
            bits,
            len: self.len,
        }
    }

    /// Number of `1` bits.
    pub const fn count_ones(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Iterates the bits from left to right.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bits: self,
            index: 0,
        }
    }
}

/// Left-to-right iterator over a [`BitString`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    bits: &'a BitString,
    index: u8,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.index)?;
        self.index += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.bits.len - self.index) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a BitString {
    type Item = bool;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl FromStr for BitString {
    type Err = Error;

    /// Parses text such as `"01101"`.
    fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_BITS as usize {
            return Err(Error::BitStringTooLong { len: s.len() });
        }
        let mut out = Self::new();
        for c in s.bytes() {
            match c {
                b'0' => out.push_unchecked(false),
                b'1' => out.push_unchecked(true),
                _ => return Err(Error::InvalidBitChar),
            }
        }
        Ok(out)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString(\"{}\")", self)
    }
}

#[cfg(feature = "defmt-0-3")]
impl defmt::Format for BitString {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "BitString({=u32:b}, len={=u8})", self.bits, self.len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let b = bits("1101000100000");
        assert_eq!(b.len(), 13);
        assert_eq!(b.value(), 0b1101000100000);
        assert_eq!(std::format!("{}", b), "1101000100000");
    }

    #[test]
    fn test_parse_keeps_leading_zeros() {
        let b = bits("0001");
        assert_eq!(b.len(), 4);
        assert_eq!(b.get(0), Some(false));
        assert_eq!(b.get(3), Some(true));
        assert_eq!(b.get(4), None);
    }

    #[test]
    fn test_parse_rejects_other_characters() {
        assert_eq!("10a1".parse::<BitString>(), Err(Error::InvalidBitChar));
        assert_eq!("10 1".parse::<BitString>(), Err(Error::InvalidBitChar));
    }

    #[test]
    fn test_parse_rejects_more_than_capacity() {
        let long = "1".repeat(33);
        assert_eq!(
            long.parse::<BitString>(),
            Err(Error::BitStringTooLong { len: 33 })
        );
        assert_eq!(bits(&"1".repeat(32)).value(), u32::MAX);
    }

    #[test]
    fn test_empty() {
        let b = bits("");
        assert!(b.is_empty());
        assert_eq!(b.iter().count(), 0);
        assert_eq!(b.reversed(), b);
    }

    #[test]
    fn test_from_value_truncates_high_bits() {
        let b = BitString::from_value(0b1_0110, 4).unwrap();
        assert_eq!(std::format!("{}", b), "0110");
        assert!(BitString::from_value(0, 33).is_err());
    }

    #[test]
    fn test_append_and_concat() {
        let mut b = bits("1");
        b.append(&bits("1010")).unwrap();
        let b = b.concat(&bits("00100000")).unwrap();
        assert_eq!(b, bits("1101000100000"));
    }

    #[test]
    fn test_append_overflow_leaves_string_untouched() {
        let mut b = bits(&"0".repeat(30));
        assert_eq!(
            b.append(&bits("111")),
            Err(Error::BitStringTooLong { len: 33 })
        );
        assert_eq!(b.len(), 30);
        assert_eq!(b.count_ones(), 0);
    }

    #[test]
    fn test_push_full_string() {
        let mut b = bits(&"1".repeat(31));
        b.push(false).unwrap();
        assert_eq!(b.len(), 32);
        assert!(b.push(true).is_err());
    }

    #[test]
    fn test_reversed() {
        assert_eq!(bits("110").reversed(), bits("011"));
        assert_eq!(bits("0000111").reversed(), bits("1110000"));
        assert_eq!(bits("10101").reversed(), bits("10101"));
    }

    #[test]
    fn test_iter_and_from_bits() {
        let b = bits("1001");
        let collected: Vec<bool> = b.iter().collect();
        assert_eq!(collected, [true, false, false, true]);
        assert_eq!(BitString::from_bits(&collected).unwrap(), b);
        assert_eq!(b.iter().len(), 4);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(std::format!("{:?}", bits("01")), "BitString(\"01\")");
    }
}
