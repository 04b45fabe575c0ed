//! Cache Line and Way storage.
//!
//! Lines are materialized lazily: a line index that was never accessed has no
//! entry and reads as all-invalid. Within a line, ways are keyed by way index
//! and are likewise created on first use. Ordered maps keep way iteration in
//! index order, so "first invalid way" is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// LRU rank carried by an invalid way.
///
/// Larger ranks are less recently used, so an invalid way always looks like the
/// oldest entry and is preferred as a fill target.
pub const INVALID_LRU: u32 = u32::MAX;

/// Metadata of one way. No data is stored; the model tracks tags only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheWay {
    /// Tag of the block currently held.
    pub tag: u32,
    /// Whether the way holds a block.
    pub valid: bool,
    /// Whether the block was written since it was loaded (write-back only).
    pub dirty: bool,
    /// Block indices written since the way was filled.
    pub dirty_blocks: BTreeSet<u32>,
    /// Recency rank; 0 is most recently used.
    pub lru: u32,
}

impl Default for CacheWay {
    fn default() -> Self {
        Self {
            tag: 0,
            valid: false,
            dirty: false,
            dirty_blocks: BTreeSet::new(),
            lru: INVALID_LRU,
        }
    }
}

/// One cache set: way index to way metadata.
pub type CacheLine = BTreeMap<u32, CacheWay>;
