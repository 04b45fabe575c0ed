//! Cache Replacement Policies.
//!
//! Implements the algorithms for selecting the way to fill on an allocating miss.
//! The policy set is closed (see [`crate::config::ReplacementPolicy`]), so the
//! cache dispatches with a `match` rather than through a trait object.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, tracked as a per-way rank.
//! - `Random`: Uniform selection from a seedable source.

/// Least Recently Used rank maintenance and victim selection.
pub mod lru;

/// Random victim selection.
pub mod random;

pub use random::RandomSource;
