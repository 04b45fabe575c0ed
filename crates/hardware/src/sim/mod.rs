//! Trace-driven simulation.
//!
//! Provides utilities for loading memory-access traces from disk and replaying
//! them through a cache hierarchy.

pub mod replay;
pub mod trace;
