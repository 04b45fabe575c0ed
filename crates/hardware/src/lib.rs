//! Cache simulation engine library.
//!
//! This crate models the data caches of an educational RISC-V pipeline simulator:
//! 1. **Cache:** A configurable set-associative cache model with LRU or random
//!    replacement, write-back/write-through and allocate/no-allocate policies.
//! 2. **Hierarchy:** An L1 → L2 → L3 coordinator that forwards misses down the chain.
//! 3. **Configuration:** Geometry and policy settings, presets, and JSON loading.
//! 4. **Simulation:** Trace loading and replay.
//! 5. **Statistics:** Per-level counters, hardware cost, and reporting.
//!
//! Only metadata (tags, valid/dirty bits, recency) is tracked; no data is stored.

/// Cache model (layout, lines, policies, transactions, trace, size).
pub mod cache;
/// Common types and constants (access types, errors).
pub mod common;
/// Cache configuration (defaults, policy enums, presets, hierarchy config).
pub mod config;
/// Multi-level cache coordinator.
pub mod hierarchy;
/// Trace loading and replay.
pub mod sim;
/// Cache statistics collection and reporting.
pub mod stats;

/// Single cache model; construct with `CacheSim::new`.
pub use crate::cache::CacheSim;
/// Per-cache configuration; use `CacheConfig::default()` or deserialize from JSON.
pub use crate::config::CacheConfig;
/// L1/L2/L3 coordinator; construct with `CacheHierarchy::from_config`.
pub use crate::hierarchy::CacheHierarchy;
