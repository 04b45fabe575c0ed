//! Trace Loading and Replay Tests.
//!
//! Verifies the trace text format, file loading, and replay through a hierarchy.

use std::io::Write as _;

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvsim_cache::CacheConfig;
use rvsim_cache::common::TraceError;
use rvsim_cache::hierarchy::{CacheHierarchy, CacheLevel};
use rvsim_cache::sim::replay::replay;
use rvsim_cache::sim::trace::{TraceRecord, load_trace, parse_trace};
use tempfile::NamedTempFile;

use crate::common::init_tracing;

const TRACE: &str = "\
# warm-up
R 0x1000
w 4096   # same word, decimal

W 0X1200
r 0x40
";

#[test]
fn parses_kinds_radixes_and_comments() {
    let records = parse_trace(TRACE).unwrap();

    assert_eq!(
        records,
        vec![
            TraceRecord::read(0x1000),
            TraceRecord::write(0x1000),
            TraceRecord::write(0x1200),
            TraceRecord::read(0x40),
        ]
    );
}

#[test]
fn empty_trace_has_no_records() {
    assert!(parse_trace("").unwrap().is_empty());
    assert!(parse_trace("# nothing\n\n   \n").unwrap().is_empty());
}

#[rstest]
#[case::unknown_kind("R 0x10\nX 0x10", 2, "unknown access kind `X`")]
#[case::missing_address("\n\nR", 3, "missing address")]
#[case::extra_field("W 0x10 4", 1, "unexpected field `4`")]
#[case::bad_hex("R 0xZZ", 1, "invalid address `0xZZ`")]
#[case::overflow("R 4294967296", 1, "invalid address `4294967296`")]
fn reports_first_bad_line(#[case] text: &str, #[case] line: usize, #[case] reason: &str) {
    match parse_trace(text) {
        Err(TraceError::Parse { line: l, reason: r }) => {
            assert_eq!(l, line);
            assert_eq!(r, reason);
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn parse_error_message_names_line() {
    let err = parse_trace("Q 1").unwrap_err();
    assert_eq!(err.to_string(), "line 1: unknown access kind `Q`");
}

#[test]
fn loads_trace_from_file() {
    init_tracing();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(TRACE.as_bytes()).unwrap();

    let records = load_trace(file.path()).unwrap();

    assert_eq!(records.len(), 4);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_trace(dir.path().join("absent.trace"));

    assert!(matches!(result, Err(TraceError::Io(_))));
}

#[test]
fn replay_counts_where_accesses_were_served() {
    let mut hierarchy = CacheHierarchy::new();
    hierarchy.enable(CacheLevel::L1, CacheConfig::default()).unwrap();
    hierarchy.enable(CacheLevel::L2, CacheConfig::default()).unwrap();
    let records = parse_trace(TRACE).unwrap();

    let summary = replay(&mut hierarchy, &records);

    // R 0x1000 miss, W 0x1000 L1 hit, W 0x1200 miss (evicts in L1 and L2), R 0x40 miss.
    assert_eq!(summary.accesses, 4);
    assert_eq!(summary.served_by(CacheLevel::L1), 1);
    assert_eq!(summary.served_by(CacheLevel::L2), 0);
    assert_eq!(summary.memory, 3);
}

#[test]
fn replay_without_levels_goes_to_memory() {
    let mut hierarchy = CacheHierarchy::new();
    let records = vec![TraceRecord::read(0), TraceRecord::write(4)];

    let summary = replay(&mut hierarchy, &records);

    assert_eq!(summary.accesses, 2);
    assert_eq!(summary.memory, 2);
    assert_eq!(summary.served_by, [0, 0, 0]);
}
