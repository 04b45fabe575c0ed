//! Memory Access Types.
//!
//! This module defines the classification of memory accesses presented to the cache model.
//! These types are used for the following:
//! 1. **Allocation Decisions:** A missed write only allocates under write-allocate.
//! 2. **Dirty Tracking:** Writes mark ways dirty under write-back.
//! 3. **Statistics Tracking:** Reads and writes are counted separately in the access trace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of memory access operation.
///
/// Instruction fetches are presented to an instruction cache as reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum AccessType {
    /// Data or instruction read access.
    Read,

    /// Data write access.
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "Read"),
            Self::Write => write!(f, "Write"),
        }
    }
}
