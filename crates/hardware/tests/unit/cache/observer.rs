//! Observer Notification Tests.
//!
//! Verifies which events reach subscribed observers and in what order.

use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rvsim_cache::CacheConfig;
use rvsim_cache::cache::transaction::CacheTransaction;

use crate::common::cache;
use crate::common::observer::{Event, MockObserver, Recorder};

const A: u32 = 0x1000;

/// Each access produces one transaction and one hit-rate event.
#[test]
fn every_access_reaches_observer() {
    let mut observer = MockObserver::new();
    let _ = observer
        .expect_on_transaction()
        .withf(|t: &CacheTransaction| t.address == A)
        .times(2)
        .return_const(());
    let _ = observer
        .expect_on_hit_rate_changed()
        .times(2)
        .return_const(());

    let mut cache = cache(CacheConfig::default());
    cache.subscribe(Box::new(observer));
    let _ = cache.read(A);
    let _ = cache.read(A);
}

/// A configuration change clears the cache before announcing the new geometry.
#[test]
fn reconfiguration_notifies_invalidation_then_configuration() {
    let mut observer = MockObserver::new();
    let mut seq = mockall::Sequence::new();
    let _ = observer
        .expect_on_cache_invalidated()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let _ = observer
        .expect_on_hit_rate_changed()
        .with(eq(0.0))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let _ = observer
        .expect_on_configuration_changed()
        .withf(|config: &CacheConfig| config.way_bits == 1)
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut cache = cache(CacheConfig::default());
    cache.subscribe(Box::new(observer));
    cache.set_ways(1).unwrap();
}

/// A rejected configuration emits nothing.
#[test]
fn rejected_configuration_is_silent() {
    // No expectations: any notification would panic.
    let observer = MockObserver::new();

    let mut cache = cache(CacheConfig::default());
    cache.subscribe(Box::new(observer));
    assert!(cache.set_ways(7).is_err());
}

/// Undo asks observers to redraw the way it restored.
#[test]
fn undo_invalidates_the_restored_way() {
    let mut observer = MockObserver::new();
    let _ = observer.expect_on_transaction().return_const(());
    let _ = observer.expect_on_hit_rate_changed().return_const(());
    let _ = observer
        .expect_on_way_invalidated()
        .with(eq(0), eq(0))
        .times(1)
        .return_const(());

    let mut cache = cache(CacheConfig::default());
    cache.subscribe(Box::new(observer));
    let _ = cache.read(A);
    let _ = cache.undo();
}

/// Events arrive in order, with the hit rate after every access.
#[test]
fn recorder_sees_hit_rate_progression() {
    let recorder = Recorder::default();
    let mut cache = cache(CacheConfig::default());
    cache.subscribe(recorder.boxed());

    let _ = cache.read(A);
    let _ = cache.read(A);
    cache.reset();

    assert_eq!(
        recorder.take(),
        vec![
            Event::Transaction(A),
            Event::HitRate(0.0),
            Event::Transaction(A),
            Event::HitRate(0.5),
            Event::CacheInvalidated,
            Event::HitRate(0.0),
        ]
    );
}

/// Every subscriber sees the same events.
#[test]
fn multiple_observers_all_notified() {
    let first = Recorder::default();
    let second = Recorder::default();
    let mut cache = cache(CacheConfig::default());
    cache.subscribe(first.boxed());
    cache.subscribe(second.boxed());

    let _ = cache.write(A);

    assert_eq!(first.take(), second.take());
}

/// A write that bypasses the cache is still reported.
#[test]
fn bypassed_write_still_emits_transaction() {
    let recorder = Recorder::default();
    let config = CacheConfig {
        write_alloc_policy: rvsim_cache::config::WriteAllocPolicy::NoWriteAllocate,
        ..CacheConfig::default()
    };
    let mut cache = cache(config);
    cache.subscribe(recorder.boxed());

    let _ = cache.write(A);

    assert_eq!(recorder.take()[0], Event::Transaction(A));
}
