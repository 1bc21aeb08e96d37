//! Fixed-size bit table backing a Bloom filter

use bit_vec::BitVec;

/// A bit array sized once, at filter construction, to the table length.
///
/// Bits are only ever turned on; there is no way to clear a single bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitTable {
    bits: BitVec,
}

impl BitTable {
    /// Create a table of `len` bits, all unset
    pub fn new(len: usize) -> Self {
        BitTable {
            bits: BitVec::from_elem(len, false),
        }
    }

    /// Number of bits in the table
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Read a bit. Out-of-range indices read as unset.
    pub fn get(&self, index: usize) -> bool {
        self.bits.get(index).unwrap_or(false)
    }

    /// Turn a bit on. Setting an already-set bit is a no-op, and so is an
    /// out-of-range index.
    pub fn set(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, true);
        }
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&bit| bit).count()
    }

    /// Iterate over every bit in index order
    pub fn iter(&self) -> bit_vec::Iter<'_> {
        self.bits.iter()
    }

    /// Raw bytes of the table, most significant bit first within each byte
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.to_bytes()
    }
}
