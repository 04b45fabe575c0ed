//! Observer test doubles.

use std::sync::{Arc, Mutex};

use mockall::mock;
use rvsim_cache::cache::observer::CacheObserver;
use rvsim_cache::cache::transaction::CacheTransaction;
use rvsim_cache::config::CacheConfig;

mock! {
    pub Observer {}
    impl CacheObserver for Observer {
        fn on_transaction(&mut self, transaction: &CacheTransaction);
        fn on_configuration_changed(&mut self, config: &CacheConfig);
        fn on_way_invalidated(&mut self, line: u32, way: u32);
        fn on_cache_invalidated(&mut self);
        fn on_hit_rate_changed(&mut self, hit_rate: f64);
    }
}

/// One observed event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// An access completed at this address.
    Transaction(u32),
    /// The configuration changed.
    Configured,
    /// A way was restored by undo.
    WayInvalidated(u32, u32),
    /// The whole cache was discarded.
    CacheInvalidated,
    /// The hit rate changed.
    HitRate(f64),
}

/// Observer that appends every event to a shared log.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    /// Returns a boxed handle sharing this recorder's log.
    pub fn boxed(&self) -> Box<dyn CacheObserver> {
        Box::new(self.clone())
    }

    /// Drains the recorded events.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl CacheObserver for Recorder {
    fn on_transaction(&mut self, transaction: &CacheTransaction) {
        self.push(Event::Transaction(transaction.address));
    }

    fn on_configuration_changed(&mut self, _config: &CacheConfig) {
        self.push(Event::Configured);
    }

    fn on_way_invalidated(&mut self, line: u32, way: u32) {
        self.push(Event::WayInvalidated(line, way));
    }

    fn on_cache_invalidated(&mut self) {
        self.push(Event::CacheInvalidated);
    }

    fn on_hit_rate_changed(&mut self, hit_rate: f64) {
        self.push(Event::HitRate(hit_rate));
    }
}
