//! Cache statistics collection and reporting.
//!
//! This module snapshots the counters of a cache or a whole hierarchy. It provides:
//! 1. **Per-cache counters:** Accesses, hits, misses, reads, writes and writebacks.
//! 2. **Derived metrics:** Hit and miss rate.
//! 3. **Hardware cost:** Modeled storage bits per level.
//! 4. **Reporting:** A sectioned text report and a JSON form.

use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::cache::CacheSim;
use crate::hierarchy::{CacheHierarchy, CacheLevel};

/// Counters of a single cache at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CacheStats {
    /// Total accesses since the last reset.
    pub accesses: u64,
    /// Accesses that found their tag.
    pub hits: u64,
    /// Accesses that did not.
    pub misses: u64,
    /// Read accesses.
    pub reads: u64,
    /// Write accesses.
    pub writes: u64,
    /// Accesses that wrote to backing storage.
    pub writebacks: u64,
    /// `hits / accesses`, or 0 before any access.
    pub hit_rate: f64,
    /// Modeled storage cost in bits.
    pub size_bits: u64,
}

impl CacheStats {
    /// Snapshots the counters of `cache`.
    pub fn from_cache(cache: &CacheSim) -> Self {
        let latest = cache.access_trace().latest();
        Self {
            accesses: latest.accesses(),
            hits: latest.hits,
            misses: latest.misses,
            reads: latest.reads,
            writes: latest.writes,
            writebacks: latest.writebacks,
            hit_rate: latest.hit_rate(),
            size_bits: cache.cache_size().bits,
        }
    }

    /// `1 - hit_rate`, or 0 before any access.
    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            1.0 - self.hit_rate
        }
    }
}

/// Counters of one hierarchy level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelStats {
    /// Which level.
    pub level: CacheLevel,
    /// Its counters.
    #[serde(flatten)]
    pub stats: CacheStats,
}

/// Counters of every enabled level, L1 first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HierarchyStats {
    /// Per-level counters.
    pub levels: Vec<LevelStats>,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"levels"`, `"size"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "levels", "size"];

const RULE: &str = "==========================================================";
const THIN_RULE: &str = "----------------------------------------------------------";

impl HierarchyStats {
    /// Snapshots every enabled level of `hierarchy`.
    pub fn collect(hierarchy: &CacheHierarchy) -> Self {
        Self {
            levels: hierarchy
                .enabled_levels()
                .map(|(level, cache)| LevelStats {
                    level,
                    stats: CacheStats::from_cache(cache),
                })
                .collect(),
        }
    }

    /// Counters of `level`, if it was enabled.
    pub fn level(&self, level: CacheLevel) -> Option<&CacheStats> {
        self.levels
            .iter()
            .find(|entry| entry.level == level)
            .map(|entry| &entry.stats)
    }

    /// Accesses that missed in every enabled level.
    pub fn memory_accesses(&self) -> u64 {
        self.levels.last().map_or(0, |last| last.stats.misses)
    }

    /// Renders the requested sections; an empty slice renders all of them.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_sections(&mut out, &want);
        out
    }

    fn write_sections(&self, out: &mut String, want: &dyn Fn(&str) -> bool) -> fmt::Result {
        writeln!(out, "{RULE}")?;
        writeln!(out, "CACHE SIMULATION STATISTICS")?;
        writeln!(out, "{RULE}")?;

        if want("summary") {
            let accesses = self.levels.first().map_or(0, |l1| l1.stats.accesses);
            writeln!(out, "levels.enabled           {}", self.levels.len())?;
            writeln!(out, "sim_accesses             {accesses}")?;
            writeln!(out, "sim_memory_accesses      {}", self.memory_accesses())?;
            writeln!(out, "{THIN_RULE}")?;
        }
        if want("levels") {
            writeln!(out, "CACHE LEVELS")?;
            for LevelStats { level, stats } in &self.levels {
                writeln!(
                    out,
                    "  {:<4} accesses: {:<10} | hits: {:<10} | hit_rate: {:.2}% | writebacks: {}",
                    level.to_string(),
                    stats.accesses,
                    stats.hits,
                    stats.hit_rate * 100.0,
                    stats.writebacks
                )?;
                writeln!(
                    out,
                    "       reads: {:<10}    | writes: {:<9} | miss_rate: {:.2}%",
                    stats.reads,
                    stats.writes,
                    stats.miss_rate() * 100.0
                )?;
            }
            writeln!(out, "{THIN_RULE}")?;
        }
        if want("size") {
            writeln!(out, "HARDWARE COST")?;
            for LevelStats { level, stats } in &self.levels {
                writeln!(out, "  {:<4} {} bits", level.to_string(), stats.size_bits)?;
            }
        }
        writeln!(out, "{RULE}")
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }

    /// Serializes the statistics as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for HierarchyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_sections(&[]))
    }
}
