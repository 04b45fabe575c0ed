//! Cache event observers.
//!
//! Visualization and statistics collaborators implement [`CacheObserver`] and are
//! handed to the cache with `subscribe`. Every method has a no-op default so an
//! observer only implements the events it cares about. Observers are notified
//! synchronously, on the caller's stack, after the cache state has been updated.

use super::transaction::CacheTransaction;
use crate::config::CacheConfig;

/// Receiver of cache events.
pub trait CacheObserver: Send {
    /// An access completed.
    fn on_transaction(&mut self, _transaction: &CacheTransaction) {}

    /// The configuration changed and all contents were discarded.
    ///
    /// Receivers must re-read the whole configuration.
    fn on_configuration_changed(&mut self, _config: &CacheConfig) {}

    /// A way was restored by `undo` and must be redrawn.
    fn on_way_invalidated(&mut self, _line: u32, _way: u32) {}

    /// Every line was discarded.
    fn on_cache_invalidated(&mut self) {}

    /// The cumulative hit rate changed.
    fn on_hit_rate_changed(&mut self, _hit_rate: f64) {}
}
