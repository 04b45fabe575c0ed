//! Access Trace.
//!
//! Every access appends a cumulative counter entry derived from the previous
//! one, giving a full history suitable for plotting hit rate over time. The
//! trace is cleared whenever the cache is reset or reconfigured.

use serde::Serialize;

use super::transaction::CacheTransaction;
use crate::common::AccessType;

/// Cumulative counters after one access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AccessTraceEntry {
    /// Hits so far.
    pub hits: u64,
    /// Misses so far.
    pub misses: u64,
    /// Reads so far.
    pub reads: u64,
    /// Writes so far.
    pub writes: u64,
    /// Accesses that wrote to backing storage so far.
    pub writebacks: u64,
}

impl AccessTraceEntry {
    /// Derives the entry following `self` after `transaction`.
    pub fn record(&self, transaction: &CacheTransaction) -> Self {
        Self {
            hits: self.hits + u64::from(transaction.is_hit),
            misses: self.misses + u64::from(!transaction.is_hit),
            reads: self.reads + u64::from(transaction.access == AccessType::Read),
            writes: self.writes + u64::from(transaction.access == AccessType::Write),
            writebacks: self.writebacks + u64::from(transaction.is_writeback),
        }
    }

    /// Total accesses counted by this entry.
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// `hits / (hits + misses)`, or 0 before any access.
    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

/// History of cumulative counters, one entry per access.
#[derive(Debug, Clone, Default)]
pub struct AccessTrace {
    entries: Vec<AccessTraceEntry>,
}

impl AccessTrace {
    /// Appends the entry for `transaction`.
    pub fn push(&mut self, transaction: &CacheTransaction) {
        let next = self.latest().record(transaction);
        self.entries.push(next);
    }

    /// Removes the most recent entry.
    pub fn pop(&mut self) -> Option<AccessTraceEntry> {
        self.entries.pop()
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Counters after the most recent access (all zero when empty).
    pub fn latest(&self) -> AccessTraceEntry {
        self.entries.last().copied().unwrap_or_default()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[AccessTraceEntry] {
        &self.entries
    }

    /// Number of recorded accesses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no access has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
