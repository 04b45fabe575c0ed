//! Configuration system for the cache engine.
//!
//! This module defines the configuration structures and enums that parameterize
//! a cache model and a cache hierarchy. It provides:
//! 1. **Defaults:** Baseline geometry and policies (32 lines × 4 blocks, direct-mapped, write-back, LRU).
//! 2. **Structures:** Per-cache geometry/policy config, named presets, and the L1/L2/L3 hierarchy config.
//! 3. **Enums:** Write policy, write-allocate policy, and replacement policy.
//!
//! All sizes are stored as bit counts; the element count is always `2^bits`, so a
//! stored geometry is a power of two by construction. Configuration is supplied as
//! JSON or built in code starting from `CacheConfig::default()`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;
use crate::common::constants::{ADDRESS_BITS, BYTE_OFFSET_BITS, MAX_WAY_BITS};

/// Default configuration constants for the cache model.
mod defaults {
    /// Default block-offset bits (4 words per way).
    pub const BLOCK_BITS: u32 = 2;

    /// Default line-index bits (32 lines).
    pub const LINE_BITS: u32 = 5;

    /// Default associativity bits (direct-mapped).
    pub const WAY_BITS: u32 = 0;
}

/// Write hit policy.
///
/// Decides whether a write is propagated to the next level immediately or only
/// when the dirty way is evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WritePolicy {
    /// Every write is forwarded to backing storage.
    WriteThrough,
    /// Writes mark the way dirty; it is written back on eviction.
    #[default]
    WriteBack,
}

/// Write miss policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WriteAllocPolicy {
    /// A missed write loads the line into the cache.
    #[default]
    WriteAllocate,
    /// A missed write bypasses the cache.
    NoWriteAllocate,
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which way to fill when a miss
/// allocates in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Uniformly random way selection.
    #[serde(alias = "Random")]
    Random,
    /// Least Recently Used replacement policy.
    ///
    /// Prefers invalid ways, then evicts the way with the highest recency rank.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteThrough => write!(f, "Write-through"),
            Self::WriteBack => write!(f, "Write-back"),
        }
    }
}

impl fmt::Display for WriteAllocPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteAllocate => write!(f, "Write allocate"),
            Self::NoWriteAllocate => write!(f, "No write allocate"),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "Random"),
            Self::Lru => write!(f, "LRU"),
        }
    }
}

/// Geometry and policy configuration of a single cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Block-offset bits; each way holds `2^block_bits` words
    #[serde(default = "CacheConfig::default_block_bits")]
    pub block_bits: u32,

    /// Line-index (set-index) bits; the cache has `2^line_bits` lines
    #[serde(default = "CacheConfig::default_line_bits")]
    pub line_bits: u32,

    /// Associativity bits; each line has `2^way_bits` ways
    #[serde(default = "CacheConfig::default_way_bits")]
    pub way_bits: u32,

    /// Write hit policy
    #[serde(default)]
    pub write_policy: WritePolicy,

    /// Write miss policy
    #[serde(default)]
    pub write_alloc_policy: WriteAllocPolicy,

    /// Replacement policy
    #[serde(default)]
    pub replacement_policy: ReplacementPolicy,
}

impl CacheConfig {
    /// Returns the default block-offset bits.
    const fn default_block_bits() -> u32 {
        defaults::BLOCK_BITS
    }

    /// Returns the default line-index bits.
    const fn default_line_bits() -> u32 {
        defaults::LINE_BITS
    }

    /// Returns the default associativity bits.
    const fn default_way_bits() -> u32 {
        defaults::WAY_BITS
    }

    /// Builds a configuration from element counts instead of bit counts.
    ///
    /// Policies take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] if any count is not a power of two,
    /// or the geometry error reported by [`CacheConfig::validate`].
    pub fn from_counts(blocks: u32, lines: u32, ways: u32) -> Result<Self, ConfigError> {
        let config = Self {
            block_bits: log2_exact("blocks", blocks)?,
            line_bits: log2_exact("lines", lines)?,
            way_bits: log2_exact("ways", ways)?,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the geometry fits the 32-bit address and the associativity limit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WayBitsOutOfRange`] or [`ConfigError::AddressBitsExceeded`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.way_bits > MAX_WAY_BITS {
            return Err(ConfigError::WayBitsOutOfRange(self.way_bits));
        }
        let index_bits = self.block_bits.checked_add(self.line_bits);
        if index_bits.is_none_or(|bits| bits > ADDRESS_BITS - BYTE_OFFSET_BITS) {
            return Err(ConfigError::AddressBitsExceeded {
                block_bits: self.block_bits,
                line_bits: self.line_bits,
            });
        }
        Ok(())
    }

    /// Number of words per way.
    pub const fn blocks(&self) -> u32 {
        1 << self.block_bits
    }

    /// Number of lines (sets).
    pub const fn lines(&self) -> u32 {
        1 << self.line_bits
    }

    /// Number of ways per line.
    pub const fn ways(&self) -> u32 {
        1 << self.way_bits
    }

    /// Total number of ways in the cache (`lines × ways`).
    pub const fn entries(&self) -> u64 {
        (self.lines() as u64) * (self.ways() as u64)
    }

    /// Width of the stored tag.
    pub const fn tag_bits(&self) -> u32 {
        ADDRESS_BITS - BYTE_OFFSET_BITS - self.block_bits - self.line_bits
    }

    /// Parses a single cache configuration from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input, or a geometry error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for CacheConfig {
    /// Creates the default cache configuration.
    ///
    /// 32 lines of 4 words, direct-mapped, write-back with write-allocate and LRU.
    fn default() -> Self {
        Self {
            block_bits: defaults::BLOCK_BITS,
            line_bits: defaults::LINE_BITS,
            way_bits: defaults::WAY_BITS,
            write_policy: WritePolicy::default(),
            write_alloc_policy: WriteAllocPolicy::default(),
            replacement_policy: ReplacementPolicy::default(),
        }
    }
}

/// Returns `log2(value)` if `value` is a power of two.
fn log2_exact(field: &'static str, value: u32) -> Result<u32, ConfigError> {
    if value.is_power_of_two() {
        Ok(value.trailing_zeros())
    } else {
        Err(ConfigError::NotPowerOfTwo { field, value })
    }
}

/// A named, reusable cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePreset {
    /// Display name.
    pub name: String,
    /// The configuration applied by this preset.
    #[serde(flatten)]
    pub config: CacheConfig,
}

impl CachePreset {
    /// Creates a preset.
    pub fn new(name: impl Into<String>, config: CacheConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Returns the built-in presets offered alongside user presets.
///
/// All of them hold 128 words of data and differ only in how the words are arranged.
pub fn builtin_presets() -> Vec<CachePreset> {
    let base = CacheConfig::default();
    vec![
        CachePreset::new("32-entry 4-word direct-mapped", base),
        CachePreset::new(
            "16-entry 4-word 2-way set associative",
            CacheConfig {
                line_bits: 4,
                way_bits: 1,
                ..base
            },
        ),
        CachePreset::new(
            "8-entry 4-word 4-way set associative",
            CacheConfig {
                line_bits: 3,
                way_bits: 2,
                ..base
            },
        ),
        CachePreset::new(
            "32-way 4-word fully associative",
            CacheConfig {
                line_bits: 0,
                way_bits: 5,
                ..base
            },
        ),
    ]
}

/// Cache hierarchy configuration.
///
/// A level is enabled when its entry is present. Levels must be contiguous from L1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// First-level cache
    #[serde(default)]
    pub l1: Option<CacheConfig>,
    /// Second-level cache
    #[serde(default)]
    pub l2: Option<CacheConfig>,
    /// Third-level cache
    #[serde(default)]
    pub l3: Option<CacheConfig>,
}

impl HierarchyConfig {
    /// Parses a hierarchy configuration from JSON and validates every present level.
    ///
    /// Chain continuity is checked when the hierarchy is built.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input, or the first geometry error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        for level in [&config.l1, &config.l2, &config.l3].into_iter().flatten() {
            level.validate()?;
        }
        Ok(config)
    }
}

impl Default for HierarchyConfig {
    /// A single default L1 cache.
    fn default() -> Self {
        Self {
            l1: Some(CacheConfig::default()),
            l2: None,
            l3: None,
        }
    }
}
