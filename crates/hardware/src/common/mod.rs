//! Common types and constants shared by the cache engine.
//!
//! This module provides the building blocks used across the crate. It includes:
//! 1. **Constants:** Address width, byte offset, associativity limit, undo depth.
//! 2. **Memory Access:** The read/write classification of an access.
//! 3. **Error Handling:** Configuration, hierarchy and trace errors.

/// Address width and geometry constants.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

pub use data::AccessType;
pub use error::{ConfigError, HierarchyError, TraceError};
