//! Modeled hardware cost of a cache configuration.

use std::fmt;

use serde::Serialize;

use crate::common::constants::WORD_BITS;
use crate::config::{CacheConfig, ReplacementPolicy, WritePolicy};

/// One storage component of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SizeComponent {
    /// One valid bit per way.
    Valid,
    /// One dirty bit per way (write-back only).
    Dirty,
    /// `way_bits` recency bits per way (LRU only).
    Lru,
    /// Stored tag bits.
    Tag,
    /// Data words.
    Data,
}

impl fmt::Display for SizeComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "Valid bits"),
            Self::Dirty => write!(f, "Dirty bits"),
            Self::Lru => write!(f, "LRU bits"),
            Self::Tag => write!(f, "Tag bits"),
            Self::Data => write!(f, "Data bits"),
        }
    }
}

/// Total bit cost and its breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CacheSize {
    /// Sum of all components.
    pub bits: u64,
    /// Per-component bit counts, in reporting order.
    pub components: Vec<(SizeComponent, u64)>,
}

impl CacheSize {
    /// Computes the bit cost of `config`.
    pub fn of(config: &CacheConfig) -> Self {
        let entries = config.entries();
        let mut size = Self::default();

        size.add(SizeComponent::Valid, entries);
        if config.write_policy == WritePolicy::WriteBack {
            size.add(SizeComponent::Dirty, entries);
        }
        if config.replacement_policy == ReplacementPolicy::Lru {
            size.add(SizeComponent::Lru, u64::from(config.way_bits) * entries);
        }
        size.add(SizeComponent::Tag, u64::from(config.tag_bits()) * entries);
        size.add(
            SizeComponent::Data,
            WORD_BITS * entries * u64::from(config.blocks()),
        );

        size
    }

    fn add(&mut self, component: SizeComponent, bits: u64) {
        self.components.push((component, bits));
        self.bits += bits;
    }

    /// Bits attributed to `component`, if it is part of this configuration.
    pub fn component(&self, component: SizeComponent) -> Option<u64> {
        self.components
            .iter()
            .find(|(c, _)| *c == component)
            .map(|&(_, bits)| bits)
    }
}

impl fmt::Display for CacheSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (component, bits) in &self.components {
            writeln!(f, "{component}: {bits}")?;
        }
        write!(f, "Total: {} bits", self.bits)
    }
}
