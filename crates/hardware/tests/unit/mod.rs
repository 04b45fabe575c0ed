//! # Unit Components
//!
//! This module organizes the unit tests of the cache engine by component.

/// Unit tests for the single-cache model.
///
/// This module aggregates tests for:
/// - Address decomposition and field masks.
/// - Hit/miss handling under every write and allocation policy.
/// - LRU and random replacement.
/// - Undo, reconfiguration, observers, and modeled size.
pub mod cache;

/// Unit tests for configuration defaults, validation, presets, and JSON loading.
pub mod config;


/// Unit tests for trace parsing and replay.
pub mod sim;
