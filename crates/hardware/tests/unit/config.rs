//! # Configuration Tests
//!
//! Tests for configuration structures, deserialization, defaults, presets, and
//! validation.

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvsim_cache::common::ConfigError;
use rvsim_cache::config::*;

#[test]
fn test_cache_config_defaults() {
    let config = CacheConfig::default();
    assert_eq!(config.block_bits, 2);
    assert_eq!(config.line_bits, 5);
    assert_eq!(config.way_bits, 0);
    assert_eq!(config.write_policy, WritePolicy::WriteBack);
    assert_eq!(config.write_alloc_policy, WriteAllocPolicy::WriteAllocate);
    assert_eq!(config.replacement_policy, ReplacementPolicy::Lru);
}

#[test]
fn test_derived_counts() {
    let config = CacheConfig {
        block_bits: 3,
        line_bits: 4,
        way_bits: 2,
        ..CacheConfig::default()
    };
    assert_eq!(config.blocks(), 8);
    assert_eq!(config.lines(), 16);
    assert_eq!(config.ways(), 4);
    assert_eq!(config.entries(), 64);
    assert_eq!(config.tag_bits(), 23);
}

#[test]
fn test_from_counts_matches_default() {
    assert_eq!(CacheConfig::from_counts(4, 32, 1).unwrap(), CacheConfig::default());
}

#[rstest]
#[case::blocks(3, 32, 1, "blocks", 3)]
#[case::lines(4, 0, 1, "lines", 0)]
#[case::ways(4, 32, 6, "ways", 6)]
fn test_from_counts_rejects_non_powers_of_two(
    #[case] blocks: u32,
    #[case] lines: u32,
    #[case] ways: u32,
    #[case] expected_field: &str,
    #[case] expected_value: u32,
) {
    match CacheConfig::from_counts(blocks, lines, ways) {
        Err(ConfigError::NotPowerOfTwo { field, value }) => {
            assert_eq!(field, expected_field);
            assert_eq!(value, expected_value);
        }
        other => panic!("expected NotPowerOfTwo, got {other:?}"),
    }
}

#[test]
fn test_from_counts_validates_geometry() {
    assert!(matches!(
        CacheConfig::from_counts(4, 32, 64),
        Err(ConfigError::WayBitsOutOfRange(6))
    ));
}

#[rstest]
#[case(0, 30, 0, true)]
#[case(30, 0, 5, true)]
#[case(15, 16, 0, false)]
#[case(2, 5, 5, true)]
#[case(2, 5, 6, false)]
#[case(u32::MAX, 1, 0, false)]
fn test_validate(
    #[case] block_bits: u32,
    #[case] line_bits: u32,
    #[case] way_bits: u32,
    #[case] valid: bool,
) {
    let config = CacheConfig {
        block_bits,
        line_bits,
        way_bits,
        ..CacheConfig::default()
    };
    assert_eq!(config.validate().is_ok(), valid);
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ConfigError::WayBitsOutOfRange(7).to_string(),
        "way bits 7 exceed the maximum of 5"
    );
    assert_eq!(
        ConfigError::AddressBitsExceeded {
            block_bits: 20,
            line_bits: 20
        }
        .to_string(),
        "block bits (20) + line bits (20) exceed the 30 index bits of a 32-bit address"
    );
}

#[test]
fn test_cache_config_json_partial() {
    let config =
        CacheConfig::from_json(r#"{"way_bits": 2, "replacement_policy": "RANDOM"}"#).unwrap();
    assert_eq!(config.way_bits, 2);
    assert_eq!(config.line_bits, 5);
    assert_eq!(config.replacement_policy, ReplacementPolicy::Random);
}

#[test]
fn test_cache_config_json_policies() {
    let config = CacheConfig::from_json(
        r#"{
            "write_policy": "WriteThrough",
            "write_alloc_policy": "NoWriteAllocate",
            "replacement_policy": "Lru"
        }"#,
    )
    .unwrap();
    assert_eq!(config.write_policy, WritePolicy::WriteThrough);
    assert_eq!(config.write_alloc_policy, WriteAllocPolicy::NoWriteAllocate);
    assert_eq!(config.replacement_policy, ReplacementPolicy::Lru);
}

#[test]
fn test_cache_config_json_errors() {
    assert!(matches!(
        CacheConfig::from_json("{not json"),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        CacheConfig::from_json(r#"{"replacement_policy": "FIFO"}"#),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        CacheConfig::from_json(r#"{"way_bits": 9}"#),
        Err(ConfigError::WayBitsOutOfRange(9))
    ));
}

#[test]
fn test_cache_config_serde_roundtrip_is_stable() {
    let config = CacheConfig {
        way_bits: 3,
        write_policy: WritePolicy::WriteThrough,
        ..CacheConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains(r#""write_policy":"WriteThrough""#));
    assert!(json.contains(r#""replacement_policy":"LRU""#));
    assert_eq!(CacheConfig::from_json(&json).unwrap(), config);
}

#[test]
fn test_builtin_presets_hold_128_words() {
    let presets = builtin_presets();
    assert_eq!(presets.len(), 4);
    for preset in &presets {
        let c = preset.config;
        assert_eq!(c.lines() * c.ways() * c.blocks(), 128, "{}", preset.name);
        assert!(c.validate().is_ok());
    }
    let names: HashSet<_> = presets.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names.len(), presets.len());
}

#[test]
fn test_preset_json_is_flat() {
    let preset: CachePreset =
        serde_json::from_str(r#"{"name": "tiny", "line_bits": 1, "way_bits": 1}"#).unwrap();
    assert_eq!(preset.name, "tiny");
    assert_eq!(preset.config.line_bits, 1);
    assert_eq!(preset.config.way_bits, 1);
    assert_eq!(preset.config.block_bits, 2);
}

#[test]
fn test_hierarchy_config_default() {
    let config = HierarchyConfig::default();
    assert_eq!(config.l1, Some(CacheConfig::default()));
    assert_eq!(config.l2, None);
    assert_eq!(config.l3, None);
}

#[test]
fn test_hierarchy_config_json() {
    let config = HierarchyConfig::from_json(r#"{"l1": {}, "l2": {"line_bits": 8}}"#).unwrap();
    assert_eq!(config.l1, Some(CacheConfig::default()));
    assert_eq!(config.l2.map(|c| c.line_bits), Some(8));
    assert_eq!(config.l3, None);
}

#[test]
fn test_hierarchy_config_json_validates_levels() {
    assert!(matches!(
        HierarchyConfig::from_json(r#"{"l1": {}, "l2": {"block_bits": 29}}"#),
        Err(ConfigError::AddressBitsExceeded { .. })
    ));
}

#[rstest]
#[case(WritePolicy::WriteBack.to_string(), "Write-back")]
#[case(WritePolicy::WriteThrough.to_string(), "Write-through")]
#[case(WriteAllocPolicy::NoWriteAllocate.to_string(), "No write allocate")]
#[case(ReplacementPolicy::Lru.to_string(), "LRU")]
#[case(ReplacementPolicy::Random.to_string(), "Random")]
fn test_policy_display(#[case] shown: String, #[case] expected: &str) {
    assert_eq!(shown, expected);
}
