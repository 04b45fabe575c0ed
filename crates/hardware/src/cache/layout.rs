//! Address Decomposition.
//!
//! Splits a word-aligned 32-bit address into block offset, line index and tag
//! using masks precomputed from the cache geometry:
//!
//! ```text
//!  31                                    0
//! +-----------+------------+-----------+----+
//! |    tag    | line index |   block   | 00 |
//! +-----------+------------+-----------+----+
//! ```
//!
//! Masks are rebuilt whenever the configuration changes. Shifts are done in
//! `u64` so that a zero-width field at the top of the address is well defined.

use crate::common::constants::{ADDRESS_BITS, BYTE_OFFSET_BITS};
use crate::config::CacheConfig;

/// Returns a mask with the low `bits` bits set.
#[inline]
const fn bitmask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

/// Precomputed field masks for one cache geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressLayout {
    block_bits: u32,
    line_bits: u32,
    block_mask: u32,
    line_mask: u32,
    tag_mask: u32,
}

impl AddressLayout {
    /// Computes the masks for `config`.
    ///
    /// The configuration must already be validated.
    pub const fn new(config: &CacheConfig) -> Self {
        let mut offset = BYTE_OFFSET_BITS;

        let block_mask = (bitmask(config.block_bits) << offset) as u32;
        offset += config.block_bits;

        let line_mask = (bitmask(config.line_bits) << offset) as u32;
        offset += config.line_bits;

        let tag_mask = (bitmask(ADDRESS_BITS - offset) << offset) as u32;

        Self {
            block_bits: config.block_bits,
            line_bits: config.line_bits,
            block_mask,
            line_mask,
            tag_mask,
        }
    }

    /// Word index within the way.
    #[inline]
    pub const fn block_index(&self, address: u32) -> u32 {
        ((address & self.block_mask) as u64 >> BYTE_OFFSET_BITS) as u32
    }

    /// Line (set) index.
    #[inline]
    pub const fn line_index(&self, address: u32) -> u32 {
        ((address & self.line_mask) as u64 >> (BYTE_OFFSET_BITS + self.block_bits)) as u32
    }

    /// Tag bits of the address.
    #[inline]
    pub const fn tag(&self, address: u32) -> u32 {
        ((address & self.tag_mask) as u64 >> (BYTE_OFFSET_BITS + self.block_bits + self.line_bits))
            as u32
    }

    /// Reassembles the word-aligned address of `(tag, line, block)`.
    ///
    /// Fields wider than their mask are truncated.
    pub const fn build_address(&self, tag: u32, line: u32, block: u32) -> u32 {
        let tag_part = (tag as u64) << (BYTE_OFFSET_BITS + self.block_bits + self.line_bits);
        let line_part = (line as u64) << (BYTE_OFFSET_BITS + self.block_bits);
        let block_part = (block as u64) << BYTE_OFFSET_BITS;
        (tag_part as u32 & self.tag_mask)
            | (line_part as u32 & self.line_mask)
            | (block_part as u32 & self.block_mask)
    }

    /// Mask selecting the block-offset field.
    pub const fn block_mask(&self) -> u32 {
        self.block_mask
    }

    /// Mask selecting the line-index field.
    pub const fn line_mask(&self) -> u32 {
        self.line_mask
    }

    /// Mask selecting the tag field.
    pub const fn tag_mask(&self) -> u32 {
        self.tag_mask
    }

    /// Width of the tag field.
    pub const fn tag_bits(&self) -> u32 {
        self.tag_mask.count_ones()
    }
}
