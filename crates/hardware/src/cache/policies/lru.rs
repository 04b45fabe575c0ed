//! Least Recently Used (LRU) Replacement Policy.
//!
//! Each way carries a rank: 0 is the most recently used, larger is older. Among
//! the valid ways of a line the ranks always form the permutation `0..k` for `k`
//! valid ways. Invalid ways carry [`INVALID_LRU`] so they sort as the oldest.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()`: O(W) where W is the number of ways (associativity)
//!   - `select_victim()`: O(W)
//! - **Space Complexity:** O(S × W) ranks of `way_bits` bits each

use crate::cache::line::{CacheLine, INVALID_LRU};

/// Marks `way` as most recently used.
///
/// Every other valid way that was more recent than `way` ages by one.
pub fn touch(line: &mut CacheLine, way: u32) {
    let previous = line.get(&way).map_or(INVALID_LRU, |entry| entry.lru);

    for (&idx, entry) in line.iter_mut() {
        if idx != way && entry.valid && entry.lru < previous {
            entry.lru += 1;
        }
    }

    if let Some(entry) = line.get_mut(&way) {
        entry.lru = 0;
    }
}

/// Reverts a [`touch`] of `way` whose rank before the access was `old_rank`.
///
/// Every other valid way at or below `old_rank` was aged by the touch and is
/// rejuvenated by one; `way` gets `old_rank` back.
pub fn revert(line: &mut CacheLine, way: u32, old_rank: u32) {
    for (&idx, entry) in line.iter_mut() {
        if idx != way && entry.valid && entry.lru <= old_rank {
            entry.lru = entry.lru.saturating_sub(1);
        }
    }

    if let Some(entry) = line.get_mut(&way) {
        entry.lru = old_rank;
    }
}

/// Picks the way to fill in a line with `ways` ways.
///
/// All ways are materialized first. The lowest-indexed invalid way wins;
/// otherwise the way holding rank `ways - 1`. Returns `None` only if no valid
/// way holds that rank, which means the rank bookkeeping is corrupt.
pub fn select_victim(line: &mut CacheLine, ways: u32) -> Option<u32> {
    for idx in 0..ways {
        let _ = line.entry(idx).or_default();
    }

    if let Some((&idx, _)) = line.iter().find(|(_, entry)| !entry.valid) {
        return Some(idx);
    }

    let oldest = ways - 1;
    line.iter()
        .find(|(_, entry)| entry.lru == oldest)
        .map(|(&idx, _)| idx)
}
