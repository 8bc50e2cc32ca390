//! Export/original projection integration tests
//!
//! Exercises the two walks that turn wrapper-bearing structures back into
//! plain mappings: `export` keeps both key variants and drops bookkeeping,
//! `original` restores the pre-wrapping shape.

use digmap::{AttrMap, Map, Value, attr::RESERVED_PREFIX, project};

use crate::helpers::wrapped_sample;

// ===== EXPORT =====

#[test]
fn test_export_keeps_both_variants_and_drops_bookkeeping() {
    let attrs =
        AttrMap::from_map(Map::new().with_int("ugly key", 1).with_int("fine", 2)).unwrap();

    let exported = attrs.to_export();
    assert_eq!(
        exported.to_json_string(),
        r#"{"fine":2,"ugly key":1,"ugly_key":1}"#
    );
    assert!(exported.keys().all(|key| !key.starts_with(RESERVED_PREFIX)));
}

#[test]
fn test_export_recurses_through_nested_wrappers() {
    let exported = project::export(Value::Attr(wrapped_sample()));
    assert_eq!(
        exported.to_json_string(),
        r#"{"a":{"b":1,"ugly var!":2,"ugly_var_":2},"c":3}"#
    );
}

// ===== ORIGINAL =====

#[test]
fn test_original_restores_exact_input() {
    let input = Map::new().with_int("ugly key", 1).with_int("fine", 2);
    let attrs = AttrMap::from_map(input.clone()).unwrap();

    // No sanitized duplicates, no bookkeeping, exactly the input
    assert_eq!(attrs.to_original(), input);
}

#[test]
fn test_original_round_trips_through_reconstruction() {
    let attrs = wrapped_sample();
    let rebuilt = AttrMap::from_map(attrs.to_original()).unwrap();
    assert_eq!(rebuilt, attrs);
}

#[test]
fn test_original_prefers_the_sanitized_entry() {
    let mut attrs = AttrMap::from_map(Map::new().with_int("ugly var!", 2)).unwrap();
    *attrs.get_mut("ugly_var_").unwrap() = Value::Int(10);

    let restored = project::original(Value::Attr(attrs));
    assert_eq!(restored.to_json_string(), r#"{"ugly var!":10}"#);
}

// ===== MIXED STRUCTURES =====

#[test]
fn test_walks_convert_wrappers_below_plain_mappings() {
    // A plain top-level mapping with wrappers at different depths
    let direct = AttrMap::from_map(Map::new().with_int("a b", 1)).unwrap();
    let deep = AttrMap::from_map(Map::new().with_int("c d", 2)).unwrap();
    let top = Map::new()
        .with("wrapped", Value::Attr(direct))
        .with_map("plain", Map::new().with("inner", Value::Attr(deep)));

    let exported = project::export(Value::Map(top.clone()));
    assert_eq!(
        exported.to_json_string(),
        r#"{"plain":{"inner":{"c d":2,"c_d":2}},"wrapped":{"a b":1,"a_b":1}}"#
    );

    let restored = project::original(Value::Map(top));
    assert_eq!(
        restored.to_json_string(),
        r#"{"plain":{"inner":{"c d":2}},"wrapped":{"a b":1}}"#
    );
}

#[test]
fn test_wrappers_inside_sequences_stay_wrapped() {
    let inner = AttrMap::from_map(Map::new().with_int("x y", 1)).unwrap();
    let top = Map::new().with_list("items", vec![Value::Attr(inner.clone())]);

    // Neither walk enters sequences, matching construction
    let exported = project::export(Value::Map(top.clone()));
    let items = exported
        .as_map()
        .and_then(|map| map.get("items"))
        .and_then(Value::as_list)
        .unwrap();
    assert_eq!(items.get(0), Some(&Value::Attr(inner.clone())));

    let restored = project::original(Value::Map(top));
    let items = restored
        .as_map()
        .and_then(|map| map.get("items"))
        .and_then(Value::as_list)
        .unwrap();
    assert_eq!(items.get(0), Some(&Value::Attr(inner)));
}

// ===== SERIALIZATION =====

#[test]
fn test_projection_before_serialization_gives_clean_output() {
    let attrs = wrapped_sample();

    // Serializing the unprojected wrapper leaks reverse-mapping entries
    let raw = serde_json::to_string(&attrs).unwrap();
    assert!(raw.contains("\\f$\\f"));

    // Either projection first gives clean output
    let original = serde_json::to_string(&attrs.to_original()).unwrap();
    assert_eq!(original, r#"{"a":{"b":1,"ugly var!":2},"c":3}"#);

    let export = serde_json::to_string(&attrs.to_export()).unwrap();
    assert_eq!(
        export,
        r#"{"a":{"b":1,"ugly var!":2,"ugly_var_":2},"c":3}"#
    );
}
