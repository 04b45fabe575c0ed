//! Trace replay through a cache hierarchy.

use serde::Serialize;
use tracing::debug;

use super::trace::TraceRecord;
use crate::hierarchy::{CacheHierarchy, CacheLevel};

/// Where the accesses of a replayed trace were served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReplaySummary {
    /// Accesses replayed.
    pub accesses: u64,
    /// Hits per level, indexed by [`CacheLevel::index`].
    pub served_by: [u64; 3],
    /// Accesses that missed every enabled level.
    pub memory: u64,
}

impl ReplaySummary {
    /// Hits served by `level`.
    pub const fn served_by(&self, level: CacheLevel) -> u64 {
        self.served_by[level.index()]
    }
}

/// Presents every record to `hierarchy` in order.
pub fn replay(hierarchy: &mut CacheHierarchy, records: &[TraceRecord]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for record in records {
        let outcome = hierarchy.access(record.address, record.access);
        summary.accesses += 1;
        match outcome.served_by() {
            Some(level) => summary.served_by[level.index()] += 1,
            None => summary.memory += 1,
        }
    }
    debug!(
        accesses = summary.accesses,
        memory = summary.memory,
        "trace replayed"
    );
    summary
}
