use std::fmt;

use crate::error::{HuffmanError, Result};

/// Growable bit sequence packed most-significant-bit first.
///
/// `bit_count` is the exact number of meaningful bits. Unused low-order bits
/// of the last byte are always zero.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        BitVec {
            bits: Vec::with_capacity(bit_capacity.div_ceil(8)),
            bit_count: 0,
        }
    }

    /// Unpacks the first `bit_count` bits of `bytes`.
    ///
    /// `bytes` must be exactly `ceil(bit_count / 8)` long; anything else means
    /// the length field and the payload disagree.
    pub fn from_packed(bytes: &[u8], bit_count: usize) -> Result<Self> {
        let expected = bit_count.div_ceil(8);
        if bytes.len() != expected {
            return Err(HuffmanError::corrupt(format!(
                "payload holds {} bytes but {} bits need {}",
                bytes.len(),
                bit_count,
                expected
            )));
        }
        let mut bits = bytes.to_vec();
        let used = bit_count % 8;
        if used != 0 {
            if let Some(last) = bits.last_mut() {
                *last &= 0xFFu8 << (8 - used);
            }
        }
        Ok(BitVec { bits, bit_count })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bits
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    /// Appends all bits of `other`.
    pub fn extend(&mut self, other: &BitVec) {
        if self.bit_count % 8 == 0 {
            self.bits.extend_from_slice(&other.bits);
            self.bit_count += other.bit_count;
            return;
        }
        for bit in other.iter() {
            self.push_bit(bit);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).map(move |i| self.bits[i / 8] >> (7 - i % 8) & 1 == 1)
    }

    /// True if every bit of `self` matches the start of `other`.
    pub fn is_prefix_of(&self, other: &BitVec) -> bool {
        self.bit_count <= other.bit_count && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bv = BitVec::new();
        for bit in iter {
            bv.push_bit(bit);
        }
        bv
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
