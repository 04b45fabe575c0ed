//! Set-Associative Cache Simulator.
//!
//! This module implements the configurable cache model. A single geometry covers
//! direct-mapped (1 way), set-associative and fully-associative (1 line) caches.
//! It models hits, misses, write-back/write-through and allocate/no-allocate
//! policies, and LRU or random replacement, tracking only tag/valid/dirty/LRU
//! metadata. No data is stored; the model exists for hit-rate and timing study.
//!
//! Every access produces a [`CacheTransaction`] that is returned to the caller and
//! broadcast to subscribed [`CacheObserver`]s.

/// Address decomposition masks.
pub mod layout;

/// Lazily materialized line and way metadata.
pub mod line;

/// Cache event observer trait.
pub mod observer;

/// Cache replacement policy implementations (LRU, Random).
pub mod policies;

/// Modeled storage cost.
pub mod size;

/// Cumulative access counters.
pub mod trace;

/// Per-access outcome records.
pub mod transaction;

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use tracing::{debug, trace, warn};

use self::layout::AddressLayout;
use self::line::{CacheLine, CacheWay};
use self::observer::CacheObserver;
use self::policies::{RandomSource, lru};
use self::size::CacheSize;
use self::trace::AccessTrace;
use self::transaction::{CacheIndex, CacheTransaction};
use crate::common::constants::{DEFAULT_UNDO_DEPTH, WORD_ALIGN_MASK};
use crate::common::{AccessType, ConfigError};
use crate::config::{
    CacheConfig, CachePreset, ReplacementPolicy, WriteAllocPolicy, WritePolicy,
};

/// State needed to revert one access.
#[derive(Debug, Clone)]
struct UndoRecord {
    transaction: CacheTransaction,
    /// The resolved way as it was before the access.
    old_way: CacheWay,
}

/// Cache simulator implementing a set-associative cache with configurable policies.
///
/// Any configuration change discards all contents and the access trace; partial
/// re-masking of existing tags under a new geometry is not attempted.
pub struct CacheSim {
    config: CacheConfig,
    layout: AddressLayout,
    lines: BTreeMap<u32, CacheLine>,
    trace: AccessTrace,
    undo_stack: VecDeque<UndoRecord>,
    undo_depth: usize,
    rng: RandomSource,
    observers: Vec<Box<dyn CacheObserver>>,
}

impl CacheSim {
    /// Creates a new cache simulator with the specified configuration.
    ///
    /// Random replacement uses the default fixed seed.
    ///
    /// # Arguments
    ///
    /// * `config` - Geometry and policies of the cache
    ///
    /// # Returns
    ///
    /// An empty cache with all lines invalid and an empty access trace.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`CacheConfig::validate`].
    pub fn new(config: CacheConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, RandomSource::default())
    }

    /// Creates a cache whose random replacement is seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`CacheConfig::validate`].
    pub fn with_seed(config: CacheConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, RandomSource::from_seed(seed))
    }

    /// Creates a cache drawing random replacement choices from `rng`.
    ///
    /// # Arguments
    ///
    /// * `config` - Geometry and policies of the cache
    /// * `rng` - Source of way indices for random replacement; unused under LRU
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`CacheConfig::validate`].
    pub fn with_rng(config: CacheConfig, rng: RandomSource) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            layout: AddressLayout::new(&config),
            config,
            lines: BTreeMap::new(),
            trace: AccessTrace::default(),
            undo_stack: VecDeque::new(),
            undo_depth: DEFAULT_UNDO_DEPTH,
            rng,
            observers: Vec::new(),
        })
    }

    /// Registers an observer for all subsequent events.
    pub fn subscribe(&mut self, observer: Box<dyn CacheObserver>) {
        self.observers.push(observer);
    }

    /// Current configuration.
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Address masks of the current configuration.
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    // ── Configuration ──────────────────────────────────────

    /// Sets the block-offset bits.
    ///
    /// # Errors
    ///
    /// Rejects geometries that overflow the address; the old configuration stays.
    pub fn set_blocks(&mut self, bits: u32) -> Result<(), ConfigError> {
        self.apply(CacheConfig {
            block_bits: bits,
            ..self.config
        })
    }

    /// Sets the line-index bits.
    ///
    /// # Errors
    ///
    /// Rejects geometries that overflow the address; the old configuration stays.
    pub fn set_lines(&mut self, bits: u32) -> Result<(), ConfigError> {
        self.apply(CacheConfig {
            line_bits: bits,
            ..self.config
        })
    }

    /// Sets the associativity bits.
    ///
    /// # Errors
    ///
    /// Rejects more than 32 ways; the old configuration stays.
    pub fn set_ways(&mut self, bits: u32) -> Result<(), ConfigError> {
        self.apply(CacheConfig {
            way_bits: bits,
            ..self.config
        })
    }

    /// Sets the write hit policy and resets the cache.
    pub fn set_write_policy(&mut self, policy: WritePolicy) {
        self.reconfigure(CacheConfig {
            write_policy: policy,
            ..self.config
        });
    }

    /// Sets the write miss policy and resets the cache.
    pub fn set_write_alloc_policy(&mut self, policy: WriteAllocPolicy) {
        self.reconfigure(CacheConfig {
            write_alloc_policy: policy,
            ..self.config
        });
    }

    /// Sets the replacement policy and resets the cache.
    pub fn set_replacement_policy(&mut self, policy: ReplacementPolicy) {
        self.reconfigure(CacheConfig {
            replacement_policy: policy,
            ..self.config
        });
    }

    /// Applies a whole preset with a single reset.
    ///
    /// # Errors
    ///
    /// Rejects an invalid preset; the old configuration stays.
    pub fn set_preset(&mut self, preset: &CachePreset) -> Result<(), ConfigError> {
        self.apply(preset.config)
    }

    /// Replaces the whole configuration.
    ///
    /// # Errors
    ///
    /// Rejects an invalid configuration; the old configuration stays.
    pub fn set_config(&mut self, config: CacheConfig) -> Result<(), ConfigError> {
        self.apply(config)
    }

    /// Sets how many accesses `undo` can revert. Excess history is dropped.
    pub fn set_undo_depth(&mut self, depth: usize) {
        self.undo_depth = depth;
        while self.undo_stack.len() > depth {
            let _ = self.undo_stack.pop_front();
        }
    }

    fn apply(&mut self, config: CacheConfig) -> Result<(), ConfigError> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejected cache configuration");
            return Err(err);
        }
        self.reconfigure(config);
        Ok(())
    }

    /// Installs an already validated configuration.
    fn reconfigure(&mut self, config: CacheConfig) {
        self.config = config;
        self.layout = AddressLayout::new(&config);
        debug!(
            block_bits = config.block_bits,
            line_bits = config.line_bits,
            way_bits = config.way_bits,
            write_policy = %config.write_policy,
            write_alloc_policy = %config.write_alloc_policy,
            replacement_policy = %config.replacement_policy,
            "cache reconfigured"
        );
        self.reset();
        self.notify(|observer| observer.on_configuration_changed(&config));
    }

    /// Discards all lines, the access trace and the undo history.
    ///
    /// The configuration is kept.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.trace.clear();
        self.undo_stack.clear();
        debug!("cache reset");
        self.notify(|observer| observer.on_cache_invalidated());
        self.notify(|observer| observer.on_hit_rate_changed(0.0));
    }

    // ── Access ─────────────────────────────────────────────

    /// Accesses the cache at `address`.
    ///
    /// The address is aligned down to its word. A miss fills a way when the
    /// access is a read, or a write under write-allocate; a missed write under
    /// no-write-allocate leaves the cache untouched.
    ///
    /// # Arguments
    ///
    /// * `address` - Byte address; the byte offset is ignored
    /// * `access` - Whether the access reads or writes
    ///
    /// # Returns
    ///
    /// The transaction describing where the access landed and what it did. The
    /// same transaction is broadcast to every observer.
    ///
    /// # Panics
    ///
    /// Panics if LRU replacement finds no way holding the oldest rank in a full
    /// line, which means the rank bookkeeping has been corrupted.
    pub fn access(&mut self, address: u32, access: AccessType) -> CacheTransaction {
        let address = address & WORD_ALIGN_MASK;
        let mut transaction = self.analyze(address, access);

        let resolved = transaction.index.way;
        let old_way = match resolved {
            Some(way) if transaction.is_hit => self.way_snapshot(transaction.index.line, way),
            _ if self.allocates(access) => self.evict_and_fill(&mut transaction),
            _ => CacheWay::default(),
        };

        if let Some(way_idx) = transaction.index.way {
            let write_back =
                access.is_write() && self.config.write_policy == WritePolicy::WriteBack;
            let lru = self.config.replacement_policy == ReplacementPolicy::Lru;
            let line = self.lines.entry(transaction.index.line).or_default();
            {
                let way = line.entry(way_idx).or_default();
                if write_back {
                    way.dirty = true;
                    let _ = way.dirty_blocks.insert(transaction.index.block);
                }
            }
            if lru {
                lru::touch(line, way_idx);
            }
        } else {
            // Write miss without allocation goes straight to memory.
            transaction.is_writeback = true;
        }

        if access.is_write() && self.config.write_policy == WritePolicy::WriteThrough {
            transaction.is_writeback = true;
        }

        self.push_undo(UndoRecord {
            transaction: transaction.clone(),
            old_way,
        });
        self.trace.push(&transaction);

        trace!(
            address = format_args!("{:#010x}", transaction.address),
            access = %access,
            line = transaction.index.line,
            way = ?transaction.index.way,
            block = transaction.index.block,
            hit = transaction.is_hit,
            writeback = transaction.is_writeback,
            "cache access"
        );

        let hit_rate = self.hit_rate();
        self.notify(|observer| observer.on_transaction(&transaction));
        self.notify(|observer| observer.on_hit_rate_changed(hit_rate));
        transaction
    }

    /// Shorthand for a read access.
    pub fn read(&mut self, address: u32) -> CacheTransaction {
        self.access(address, AccessType::Read)
    }

    /// Shorthand for a write access.
    pub fn write(&mut self, address: u32) -> CacheTransaction {
        self.access(address, AccessType::Write)
    }

    /// Decomposes the address and looks for a valid way with a matching tag.
    fn analyze(&self, address: u32, access: AccessType) -> CacheTransaction {
        let index = CacheIndex {
            line: self.layout.line_index(address),
            way: None,
            block: self.layout.block_index(address),
        };
        let tag = self.layout.tag(address);
        let mut transaction = CacheTransaction::new(address, access, index, tag);

        let hit_way = self.lines.get(&index.line).and_then(|line| {
            line.iter()
                .find(|(_, way)| way.valid && way.tag == tag)
                .map(|(&idx, _)| idx)
        });
        if let Some(way) = hit_way {
            transaction.index.way = Some(way);
            transaction.is_hit = true;
        }

        transaction
    }

    const fn allocates(&self, access: AccessType) -> bool {
        match access {
            AccessType::Read => true,
            AccessType::Write => {
                matches!(self.config.write_alloc_policy, WriteAllocPolicy::WriteAllocate)
            }
        }
    }

    fn way_snapshot(&self, line: u32, way: u32) -> CacheWay {
        self.lines
            .get(&line)
            .and_then(|entries| entries.get(&way))
            .cloned()
            .unwrap_or_default()
    }

    /// Chooses the way to fill according to the replacement policy.
    fn locate_eviction_way(&mut self, line_idx: u32) -> u32 {
        let ways = self.config.ways();
        match self.config.replacement_policy {
            ReplacementPolicy::Random => self.rng.pick_way(ways),
            ReplacementPolicy::Lru if ways == 1 => 0,
            ReplacementPolicy::Lru => {
                let line = self.lines.entry(line_idx).or_default();
                let Some(way) = lru::select_victim(line, ways) else {
                    panic!(
                        "line {line_idx}: no valid way holds LRU rank {}; replacement bookkeeping is corrupt",
                        ways - 1
                    );
                };
                way
            }
        }
    }

    /// Fills a way for a missed access and returns the way's previous contents.
    fn evict_and_fill(&mut self, transaction: &mut CacheTransaction) -> CacheWay {
        let line_idx = transaction.index.line;
        let way_idx = self.locate_eviction_way(line_idx);

        let way = self
            .lines
            .entry(line_idx)
            .or_default()
            .entry(way_idx)
            .or_default();
        let evicted = std::mem::take(way);

        if evicted.valid {
            if evicted.dirty {
                transaction.is_writeback = true;
            }
            trace!(line = line_idx, way = way_idx, tag = evicted.tag, "evicting way");
        } else {
            transaction.trans_to_valid = true;
        }

        way.valid = true;
        way.dirty = false;
        way.tag = transaction.tag;
        transaction.tag_changed = true;
        transaction.index.way = Some(way_idx);

        evicted
    }

    // ── Undo ───────────────────────────────────────────────

    fn push_undo(&mut self, record: UndoRecord) {
        if self.undo_depth == 0 {
            return;
        }
        self.undo_stack.push_back(record);
        if self.undo_stack.len() > self.undo_depth {
            let _ = self.undo_stack.pop_front();
        }
    }

    /// Reverts the most recent access.
    ///
    /// A freshly filled way becomes invalid again, an evicted way is restored, and
    /// dirty state, LRU ranks and the access trace return to their prior values.
    /// Returns the reverted transaction, or `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<CacheTransaction> {
        let UndoRecord {
            transaction,
            old_way,
        } = self.undo_stack.pop_back()?;
        let _ = self.trace.pop();

        if let Some(way_idx) = transaction.index.way {
            let lru = self.config.replacement_policy == ReplacementPolicy::Lru;
            if let Some(line) = self.lines.get_mut(&transaction.index.line) {
                let old_rank = old_way.lru;
                if let Some(way) = line.get_mut(&way_idx) {
                    *way = old_way;
                }
                if lru {
                    lru::revert(line, way_idx, old_rank);
                }
            }
            let line_idx = transaction.index.line;
            self.notify(|observer| observer.on_way_invalidated(line_idx, way_idx));
        }

        debug!(
            address = format_args!("{:#010x}", transaction.address),
            "access reverted"
        );
        let hit_rate = self.hit_rate();
        self.notify(|observer| observer.on_hit_rate_changed(hit_rate));
        Some(transaction)
    }

    /// Number of accesses that can currently be reverted.
    pub fn undo_available(&self) -> usize {
        self.undo_stack.len()
    }

    // ── Introspection ──────────────────────────────────────

    /// Returns the line at `idx`, or `None` if it has never been touched.
    pub fn line(&self, idx: u32) -> Option<&CacheLine> {
        self.lines.get(&idx)
    }

    /// Iterates over all materialized lines in index order.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &CacheLine)> {
        self.lines.iter().map(|(&idx, line)| (idx, line))
    }

    /// Whether `address` currently hits, without touching any state.
    pub fn contains(&self, address: u32) -> bool {
        self.analyze(address & WORD_ALIGN_MASK, AccessType::Read).is_hit
    }

    /// Cumulative access counters, one entry per access.
    pub const fn access_trace(&self) -> &AccessTrace {
        &self.trace
    }

    /// `hits / (hits + misses)`, or 0 before any access.
    pub fn hit_rate(&self) -> f64 {
        self.trace.latest().hit_rate()
    }

    /// Hits since the last reset.
    pub fn hits(&self) -> u64 {
        self.trace.latest().hits
    }

    /// Misses since the last reset.
    pub fn misses(&self) -> u64 {
        self.trace.latest().misses
    }

    /// Accesses that wrote to backing storage since the last reset.
    pub fn writebacks(&self) -> u64 {
        self.trace.latest().writebacks
    }

    /// Modeled hardware bit cost of the current configuration.
    pub fn cache_size(&self) -> CacheSize {
        CacheSize::of(&self.config)
    }

    /// Line index of `address`.
    pub const fn line_index(&self, address: u32) -> u32 {
        self.layout.line_index(address)
    }

    /// Block index of `address`.
    pub const fn block_index(&self, address: u32) -> u32 {
        self.layout.block_index(address)
    }

    /// Tag of `address`.
    pub const fn tag(&self, address: u32) -> u32 {
        self.layout.tag(address)
    }

    /// Word-aligned address held at `(tag, line, block)`.
    pub const fn build_address(&self, tag: u32, line: u32, block: u32) -> u32 {
        self.layout.build_address(tag, line, block)
    }

    fn notify(&mut self, mut event: impl FnMut(&mut Box<dyn CacheObserver>)) {
        for observer in &mut self.observers {
            event(observer);
        }
    }
}

impl Default for CacheSim {
    fn default() -> Self {
        let config = CacheConfig::default();
        Self {
            layout: AddressLayout::new(&config),
            config,
            lines: BTreeMap::new(),
            trace: AccessTrace::default(),
            undo_stack: VecDeque::new(),
            undo_depth: DEFAULT_UNDO_DEPTH,
            rng: RandomSource::default(),
            observers: Vec::new(),
        }
    }
}

impl fmt::Debug for CacheSim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSim")
            .field("config", &self.config)
            .field("lines", &self.lines.len())
            .field("accesses", &self.trace.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
