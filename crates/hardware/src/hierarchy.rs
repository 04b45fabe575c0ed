//! Multi-Level Cache Coordinator.
//!
//! Composes up to three [`CacheSim`] instances into a strict L1 → L2 → L3 chain.
//! It provides:
//! 1. **Level management:** A level can only be enabled below an enabled parent and
//!    only be disabled once nothing below it is enabled; `teardown` removes a level
//!    and everything below it in one step.
//! 2. **Miss forwarding:** Every access is presented to L1; a miss is forwarded to
//!    the next level until some level hits or the chain ends.
//! 3. **Undo/reset propagation:** Reverting or resetting the hierarchy applies to
//!    every level touched by the corresponding access.
//!
//! Parent/child links are implicit in the level index: level `n + 1` is the child
//! of level `n`, and the hierarchy is the only place they change. Levels are only
//! lent out immutably; every mutation goes through the hierarchy so its undo
//! history always matches the top of each level's own undo stack.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::CacheSim;
use crate::cache::observer::CacheObserver;
use crate::cache::transaction::CacheTransaction;
use crate::common::constants::DEFAULT_UNDO_DEPTH;
use crate::common::{AccessType, HierarchyError};
use crate::config::{CacheConfig, HierarchyConfig};
use crate::stats::HierarchyStats;

/// Position of a cache in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CacheLevel {
    /// First level, closest to the core.
    L1,
    /// Second level.
    L2,
    /// Third level, closest to memory.
    L3,
}

impl CacheLevel {
    /// All levels, from L1 down.
    pub const ALL: [Self; 3] = [Self::L1, Self::L2, Self::L3];

    /// Zero-based position in the chain.
    pub const fn index(self) -> usize {
        match self {
            Self::L1 => 0,
            Self::L2 => 1,
            Self::L3 => 2,
        }
    }

    /// The level above, if any.
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::L1 => None,
            Self::L2 => Some(Self::L1),
            Self::L3 => Some(Self::L2),
        }
    }

    /// The level below, if any.
    pub const fn child(self) -> Option<Self> {
        match self {
            Self::L1 => Some(Self::L2),
            Self::L2 => Some(Self::L3),
            Self::L3 => None,
        }
    }
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L3 => write!(f, "L3"),
        }
    }
}

/// Outcome of one access at one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelAccess {
    /// Level that was accessed.
    pub level: CacheLevel,
    /// What happened there.
    pub transaction: CacheTransaction,
}

/// Per-level outcome of an access presented to the hierarchy.
///
/// Levels appear in the order they were visited; the chain stops at the first hit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HierarchyAccess {
    /// Visited levels, L1 first.
    pub levels: Vec<LevelAccess>,
}

impl HierarchyAccess {
    /// The level that hit, or `None` if the access went to memory.
    pub fn served_by(&self) -> Option<CacheLevel> {
        self.levels
            .iter()
            .find(|access| access.transaction.is_hit)
            .map(|access| access.level)
    }

    /// The transaction recorded at `level`, if the access reached it.
    pub fn at(&self, level: CacheLevel) -> Option<&CacheTransaction> {
        self.levels
            .iter()
            .find(|access| access.level == level)
            .map(|access| &access.transaction)
    }
}

/// Owner of the L1/L2/L3 cache models.
#[derive(Debug)]
pub struct CacheHierarchy {
    levels: [Option<CacheSim>; 3],
    /// Number of levels touched by each recent access, newest last.
    history: VecDeque<usize>,
    undo_depth: usize,
}

impl CacheHierarchy {
    /// Creates a hierarchy with no levels enabled.
    pub fn new() -> Self {
        Self {
            levels: [None, None, None],
            history: VecDeque::new(),
            undo_depth: DEFAULT_UNDO_DEPTH,
        }
    }

    /// Builds a hierarchy with every level present in `config` enabled.
    ///
    /// # Errors
    ///
    /// Fails if a level is configured without its parent or has an invalid geometry.
    pub fn from_config(config: &HierarchyConfig) -> Result<Self, HierarchyError> {
        let mut hierarchy = Self::new();
        let levels = [config.l1, config.l2, config.l3];
        for (level, level_config) in CacheLevel::ALL.into_iter().zip(levels) {
            if let Some(level_config) = level_config {
                hierarchy.enable(level, level_config)?;
            }
        }
        Ok(hierarchy)
    }

    /// Enables or disables `level`.
    ///
    /// Enabling constructs a fresh cache with `config`, replacing any existing
    /// cache at that level, and links it below its parent. Disabling destroys the
    /// level; `config` is ignored.
    ///
    /// # Arguments
    ///
    /// * `level` - Level to change
    /// * `enabled` - Whether the level should exist afterwards
    /// * `config` - Configuration of the new cache when enabling
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::ParentDisabled`] when enabling below a disabled level.
    /// - [`HierarchyError::DependentLevelEnabled`] when disabling a level whose
    ///   child is still enabled (use [`CacheHierarchy::teardown`] to cascade).
    /// - [`HierarchyError::Config`] for an invalid configuration.
    pub fn set_cache_level(
        &mut self,
        level: CacheLevel,
        enabled: bool,
        config: CacheConfig,
    ) -> Result<(), HierarchyError> {
        if enabled {
            self.enable(level, config)
        } else {
            self.disable(level)
        }
    }

    /// Enables `level` with a fresh cache built from `config`.
    ///
    /// # Errors
    ///
    /// See [`CacheHierarchy::set_cache_level`].
    pub fn enable(&mut self, level: CacheLevel, config: CacheConfig) -> Result<(), HierarchyError> {
        if let Some(parent) = level.parent() {
            if !self.is_enabled(parent) {
                return Err(HierarchyError::ParentDisabled { level, parent });
            }
        }
        let mut cache = CacheSim::new(config)?;
        cache.set_undo_depth(self.undo_depth);
        self.levels[level.index()] = Some(cache);
        self.history.clear();
        debug!(%level, "cache level enabled");
        Ok(())
    }

    /// Disables `level`.
    ///
    /// # Errors
    ///
    /// See [`CacheHierarchy::set_cache_level`].
    pub fn disable(&mut self, level: CacheLevel) -> Result<(), HierarchyError> {
        if let Some(child) = level.child() {
            if self.is_enabled(child) {
                return Err(HierarchyError::DependentLevelEnabled { level, child });
            }
        }
        if self.levels[level.index()].take().is_some() {
            self.history.clear();
            debug!(%level, "cache level disabled");
        }
        Ok(())
    }

    /// Disables `level` and every level below it.
    pub fn teardown(&mut self, level: CacheLevel) {
        for slot in &mut self.levels[level.index()..] {
            *slot = None;
        }
        self.history.clear();
        debug!(%level, "cache levels torn down");
    }

    /// Whether `level` currently exists.
    pub const fn is_enabled(&self, level: CacheLevel) -> bool {
        self.levels[level.index()].is_some()
    }

    /// The cache at `level`, if enabled.
    pub const fn level(&self, level: CacheLevel) -> Option<&CacheSim> {
        self.levels[level.index()].as_ref()
    }

    /// Reconfigures an enabled level in place.
    ///
    /// The level keeps its observers but loses its contents, and the hierarchy's
    /// undo history is cleared because older accesses no longer line up with it.
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::LevelDisabled`] if `level` does not exist.
    /// - [`HierarchyError::Config`] for an invalid configuration; the old one stays.
    pub fn configure_level(
        &mut self,
        level: CacheLevel,
        config: CacheConfig,
    ) -> Result<(), HierarchyError> {
        self.require_mut(level)?.set_config(config)?;
        self.history.clear();
        debug!(%level, "cache level reconfigured");
        Ok(())
    }

    /// Registers `observer` on an enabled level.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::LevelDisabled`] if `level` does not exist.
    pub fn subscribe(
        &mut self,
        level: CacheLevel,
        observer: Box<dyn CacheObserver>,
    ) -> Result<(), HierarchyError> {
        self.require_mut(level)?.subscribe(observer);
        Ok(())
    }

    fn require_mut(&mut self, level: CacheLevel) -> Result<&mut CacheSim, HierarchyError> {
        self.levels[level.index()]
            .as_mut()
            .ok_or(HierarchyError::LevelDisabled(level))
    }

    /// Iterates over the enabled levels from L1 down.
    pub fn enabled_levels(&self) -> impl Iterator<Item = (CacheLevel, &CacheSim)> {
        CacheLevel::ALL
            .into_iter()
            .map_while(|level| self.level(level).map(|cache| (level, cache)))
    }

    /// Presents an access to L1 and forwards misses down the chain.
    ///
    /// With no level enabled the returned outcome is empty.
    pub fn access(&mut self, address: u32, access: AccessType) -> HierarchyAccess {
        let mut outcome = HierarchyAccess::default();

        for level in CacheLevel::ALL {
            let Some(cache) = self.levels[level.index()].as_mut() else {
                break;
            };
            let transaction = cache.access(address, access);
            let hit = transaction.is_hit;
            outcome.levels.push(LevelAccess { level, transaction });
            if hit {
                break;
            }
        }

        if !outcome.levels.is_empty() && self.undo_depth > 0 {
            self.history.push_back(outcome.levels.len());
            if self.history.len() > self.undo_depth {
                let _ = self.history.pop_front();
            }
        }
        outcome
    }

    /// Shorthand for a read access.
    pub fn read(&mut self, address: u32) -> HierarchyAccess {
        self.access(address, AccessType::Read)
    }

    /// Shorthand for a write access.
    pub fn write(&mut self, address: u32) -> HierarchyAccess {
        self.access(address, AccessType::Write)
    }

    /// Reverts the most recent hierarchy access at every level it touched.
    ///
    /// Returns the number of levels reverted, or `None` if there is nothing to undo.
    pub fn undo(&mut self) -> Option<usize> {
        let depth = self.history.pop_back()?;
        for level in CacheLevel::ALL[..depth].iter().rev() {
            if let Some(cache) = self.levels[level.index()].as_mut() {
                let _ = cache.undo();
            }
        }
        Some(depth)
    }

    /// Sets how many hierarchy accesses can be reverted, at every level.
    pub fn set_undo_depth(&mut self, depth: usize) {
        self.undo_depth = depth;
        while self.history.len() > depth {
            let _ = self.history.pop_front();
        }
        for cache in self.levels.iter_mut().flatten() {
            cache.set_undo_depth(depth);
        }
    }

    /// Snapshot of every enabled level's counters.
    pub fn stats(&self) -> HierarchyStats {
        HierarchyStats::collect(self)
    }

    /// Resets every enabled level, keeping configurations.
    pub fn reset(&mut self) {
        for cache in self.levels.iter_mut().flatten() {
            cache.reset();
        }
        self.history.clear();
    }
}

impl Default for CacheHierarchy {
    fn default() -> Self {
        Self::new()
    }
}
