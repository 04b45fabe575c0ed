//! Global Cache Model Constants.
//!
//! This module defines the fixed parameters of the modeled machine. It includes:
//! 1. **Address Constants:** Address width and the byte-offset bits masked off every access.
//! 2. **Geometry Limits:** Upper bound on associativity.
//! 3. **Simulation Constants:** Undo depth and the default random replacement seed.

/// Width of a memory address in the modeled ISA (RV32).
pub const ADDRESS_BITS: u32 = 32;

/// Number of low address bits selecting a byte within a 32-bit word.
///
/// Accesses are word-granular, so these bits are cleared before decomposition.
pub const BYTE_OFFSET_BITS: u32 = 2;

/// Mask clearing the byte offset of an address.
pub const WORD_ALIGN_MASK: u32 = !((1 << BYTE_OFFSET_BITS) - 1);

/// Number of data bits held by one cache block (one 32-bit word).
pub const WORD_BITS: u64 = 32;

/// Largest supported associativity, as a bit count (2^5 = 32 ways).
pub const MAX_WAY_BITS: u32 = 5;

/// Number of accesses that can be reverted with `undo`.
pub const DEFAULT_UNDO_DEPTH: usize = 100;

/// Seed used for random replacement when none is supplied.
pub const DEFAULT_RANDOM_SEED: u64 = 0x5EED_CAC4E;
