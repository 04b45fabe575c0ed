//! Memory-access trace files.
//!
//! One access per line: an access kind (`R` or `W`, case-insensitive) followed
//! by an address in hex (`0x` prefix) or decimal. Blank lines are skipped and
//! `#` starts a comment that runs to the end of the line.
//!
//! ```text
//! # warm up
//! R 0x1000
//! W 4100
//! ```

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::common::{AccessType, TraceError};

/// One access from a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    /// Read or write.
    pub access: AccessType,
    /// Byte address.
    pub address: u32,
}

impl TraceRecord {
    /// Creates a read record.
    pub const fn read(address: u32) -> Self {
        Self {
            access: AccessType::Read,
            address,
        }
    }

    /// Creates a write record.
    pub const fn write(address: u32) -> Self {
        Self {
            access: AccessType::Write,
            address,
        }
    }
}

/// Parses trace text.
///
/// # Errors
///
/// Returns [`TraceError::Parse`] with the 1-based line number of the first bad line.
pub fn parse_trace(text: &str) -> Result<Vec<TraceRecord>, TraceError> {
    let mut records = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split_once('#').map_or(raw, |(body, _)| body).trim();
        if line.is_empty() {
            continue;
        }
        let record = parse_line(line).map_err(|reason| TraceError::Parse {
            line: idx + 1,
            reason,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Reads and parses a trace file.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be read, or a parse error.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>, TraceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let records = parse_trace(&text)?;
    debug!(path = %path.display(), records = records.len(), "trace loaded");
    Ok(records)
}

fn parse_line(line: &str) -> Result<TraceRecord, String> {
    let mut fields = line.split_whitespace();
    let kind = fields.next().unwrap_or_default();
    let access = match kind {
        "R" | "r" => AccessType::Read,
        "W" | "w" => AccessType::Write,
        other => return Err(format!("unknown access kind `{other}`")),
    };
    let Some(addr) = fields.next() else {
        return Err("missing address".to_owned());
    };
    if let Some(extra) = fields.next() {
        return Err(format!("unexpected field `{extra}`"));
    }
    let address = parse_address(addr).ok_or_else(|| format!("invalid address `{addr}`"))?;
    Ok(TraceRecord { access, address })
}

fn parse_address(text: &str) -> Option<u32> {
    match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}
