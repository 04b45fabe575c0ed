//! Per-access outcome records.

use serde::Serialize;

use crate::common::AccessType;

/// Position of an access inside the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheIndex {
    /// Line (set) index.
    pub line: u32,
    /// Resolved way; `None` when a missed write did not allocate.
    pub way: Option<u32>,
    /// Word index within the way.
    pub block: u32,
}

/// Outcome of a single cache access, reported to observers.
///
/// Transactions are values; the cache keeps the most recent ones only for undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheTransaction {
    /// Word-aligned address that was accessed.
    pub address: u32,
    /// Read or write.
    pub access: AccessType,
    /// Where the access landed.
    pub index: CacheIndex,
    /// Tag computed from the address.
    pub tag: u32,
    /// The tag was found in a valid way.
    pub is_hit: bool,
    /// The access wrote to backing storage: a dirty eviction, a write-through
    /// write, or a write miss that bypassed the cache.
    pub is_writeback: bool,
    /// The resolved way went from invalid to valid.
    pub trans_to_valid: bool,
    /// The resolved way now holds a different block than before.
    pub tag_changed: bool,
}

impl CacheTransaction {
    pub(crate) const fn new(address: u32, access: AccessType, index: CacheIndex, tag: u32) -> Self {
        Self {
            address,
            access,
            index,
            tag,
            is_hit: false,
            is_writeback: false,
            trans_to_valid: false,
            tag_changed: false,
        }
    }
}
