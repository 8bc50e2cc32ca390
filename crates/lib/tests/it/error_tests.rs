//! Crate-level error wrapper integration tests
//!
//! Drives module errors and serde failures through `?` into [`digmap::Error`]
//! the way a caller mixing path lookups with JSON loading would, and checks
//! that the predicate helpers classify every variant.

use digmap::{AttrMap, Error, Map, Result, Value, attr::RESERVED_PREFIX};

use crate::helpers::sample_config;

// Typical caller shape: lookups, wrapping, and parsing behind one error type
fn int_at(map: &Map, path: &str) -> Result<i64> {
    Ok(map.dig_as(path)?)
}

fn wrap(map: Map) -> Result<AttrMap> {
    Ok(AttrMap::from_map(map)?)
}

fn parse(payload: &str) -> Result<Value> {
    Ok(serde_json::from_str(payload)?)
}

#[test]
fn test_missing_paths_classify_as_not_found() {
    let config = sample_config();

    let err = int_at(&config, "a.missing").unwrap_err();
    assert!(matches!(err, Error::Map(_)));
    assert!(err.is_not_found());
    assert!(!err.is_type_mismatch());
    assert!(!err.is_reserved_key());
    assert!(!err.is_serialization_error());

    // Out-of-range indexes count as failed lookups too
    let err = int_at(&config, "a.b[9].c").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_wrong_types_classify_as_mismatches() {
    let config = sample_config();

    // "a.e" resolves to a mapping, not an integer
    let err = int_at(&config, "a.e").unwrap_err();
    assert!(err.is_type_mismatch());
    assert!(!err.is_not_found());
    assert!(!err.is_serialization_error());

    assert_eq!(int_at(&config, "g").unwrap(), 3);
}

#[test]
fn test_rejected_wrapper_keys_classify_as_reserved() {
    let err = wrap(Map::new().with("copy", 1i64)).unwrap_err();
    assert!(err.is_reserved_key());
    assert!(!err.is_not_found());

    let err = wrap(Map::new().with(format!("{RESERVED_PREFIX}x"), 1i64)).unwrap_err();
    assert!(err.is_reserved_key());
}

#[test]
fn test_serde_failures_surface_as_serialization_errors() {
    let err = parse("{not json").unwrap_err();
    assert!(matches!(err, Error::Serialize(_)));
    assert!(err.is_serialization_error());
    assert!(!err.is_not_found());
    assert!(!err.is_type_mismatch());
    assert!(!err.is_reserved_key());
    assert!(err.to_string().starts_with("Serialization error"));

    assert_eq!(parse("3").unwrap(), Value::Int(3));
}
