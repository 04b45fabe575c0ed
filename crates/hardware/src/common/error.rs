//! Error definitions.
//!
//! This module defines the recoverable error types of the cache engine. It provides:
//! 1. **Configuration Errors:** Invalid cache geometry rejected at the setter boundary.
//! 2. **Hierarchy Errors:** Level enable/disable requests that break the L1→L2→L3 chain.
//! 3. **Trace Errors:** I/O and parse failures while reading access traces.
//!
//! Broken replacement bookkeeping is not represented here; it is an internal fault and panics.

use thiserror::Error;

use super::constants::{ADDRESS_BITS, BYTE_OFFSET_BITS, MAX_WAY_BITS};
use crate::hierarchy::CacheLevel;

/// A cache configuration that cannot be applied.
///
/// When a setter returns one of these, the previous configuration stays in force.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Associativity exceeds the supported maximum.
    #[error("way bits {0} exceed the maximum of {max}", max = MAX_WAY_BITS)]
    WayBitsOutOfRange(u32),

    /// Block-offset and line-index bits leave no room in the address.
    #[error(
        "block bits ({block_bits}) + line bits ({line_bits}) exceed the {available} index bits of a {width}-bit address",
        available = ADDRESS_BITS - BYTE_OFFSET_BITS,
        width = ADDRESS_BITS
    )]
    AddressBitsExceeded {
        /// Requested block-offset bits.
        block_bits: u32,
        /// Requested line-index bits.
        line_bits: u32,
    },

    /// A count supplied in elements rather than bits is not a power of two.
    #[error("{field} count {value} is not a power of two")]
    NotPowerOfTwo {
        /// Name of the offending field (`blocks`, `lines` or `ways`).
        field: &'static str,
        /// The rejected count.
        value: u32,
    },

    /// A configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rejected cache hierarchy operation.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// The level above the requested one is not enabled.
    #[error("cannot enable {level}: {parent} is not enabled")]
    ParentDisabled {
        /// Level that was requested.
        level: CacheLevel,
        /// Its missing parent.
        parent: CacheLevel,
    },

    /// The level below the requested one is still enabled.
    #[error("cannot disable {level}: {child} is still enabled")]
    DependentLevelEnabled {
        /// Level that was requested.
        level: CacheLevel,
        /// Its enabled child.
        child: CacheLevel,
    },

    /// The addressed level does not exist.
    #[error("{0} is not enabled")]
    LevelDisabled(CacheLevel),

    /// The level configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failure while loading a memory-access trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be read.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// A trace line is malformed.
    #[error("line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}
