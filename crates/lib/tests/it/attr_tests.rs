//! Attribute-view wrapper integration tests
//!
//! Covers wrapper construction over nested data, access through sanitized and
//! original key variants, the independence of those entries after
//! construction, deep copying, and the serialized wire layout.

use digmap::{AttrMap, Map, MapError, Value, attr::RESERVED_PREFIX};

use crate::helpers::wrapped_sample;

// ===== CONSTRUCTION =====

#[test]
fn test_wrapper_over_nested_config() {
    let attrs = wrapped_sample();

    // Nested plain mappings were wrapped recursively
    let a = attrs.get("a").and_then(Value::as_attr).unwrap();
    assert_eq!(a.get("b"), Some(&Value::Int(1)));
    assert_eq!(attrs.get("c"), Some(&Value::Int(3)));

    // The rewritten key resolves through both variants
    assert_eq!(a.get("ugly_var_"), Some(&Value::Int(2)));
    assert_eq!(a.get("ugly var!"), Some(&Value::Int(2)));
    assert_eq!(a.original_key_of("ugly_var_"), Some("ugly var!"));

    // Only the nested level needed a rewrite
    assert_eq!(attrs.rewrites().count(), 0);
    assert_eq!(a.rewrites().count(), 1);
}

#[test]
fn test_from_entries_accepts_pair_sequences() {
    let attrs = AttrMap::from_entries([
        ("fine".to_string(), Value::Int(1)),
        ("needs work!".to_string(), Value::Int(2)),
    ])
    .unwrap();

    // One entry for the clean key, two for the rewritten one
    assert_eq!(attrs.len(), 3);
    assert_eq!(attrs.get("fine"), Some(&Value::Int(1)));
    assert_eq!(attrs.get("needs_work_"), Some(&Value::Int(2)));
    assert_eq!(attrs.get("needs work!"), Some(&Value::Int(2)));
}

#[test]
fn test_construction_failures_surface_from_nested_maps() {
    // A reserved word anywhere in the tree fails the whole construction
    let err = AttrMap::from_map(
        Map::new().with_map("outer", Map::new().with("copy", 1i64)),
    )
    .unwrap_err();
    assert!(matches!(err, MapError::ReservedWord { ref word, .. } if word == "copy"));

    let err = AttrMap::from_map(
        Map::new().with_map("outer", Map::new().with(format!("{RESERVED_PREFIX}x"), 1i64)),
    )
    .unwrap_err();
    assert!(matches!(err, MapError::ReservedPrefix { .. }));
}

// ===== ENTRY ACCESS =====

#[test]
fn test_variant_entries_do_not_alias() {
    let mut attrs = AttrMap::from_map(Map::new().with_int("ugly var!", 2)).unwrap();

    // Construction synchronized the two entries; mutation does not
    *attrs.get_mut("ugly_var_").unwrap() = Value::Int(10);
    assert_eq!(attrs.get("ugly_var_"), Some(&Value::Int(10)));
    assert_eq!(attrs.get("ugly var!"), Some(&Value::Int(2)));

    // The export view shows both entries as they are
    assert_eq!(
        attrs.to_export().to_json_string(),
        r#"{"ugly var!":2,"ugly_var_":10}"#
    );
    // The original view keeps the sanitized entry's value
    assert_eq!(
        attrs.to_original().to_json_string(),
        r#"{"ugly var!":10}"#
    );
}

#[test]
fn test_iteration_covers_data_entries_only() {
    let attrs = AttrMap::from_map(
        Map::new().with_int("fine", 1).with_int("ugly var!", 2),
    )
    .unwrap();

    assert_eq!(attrs.len(), 3);
    assert_eq!(attrs.keys().count(), 3);
    assert_eq!(attrs.values().count(), 3);
    assert!(attrs.keys().all(|key| !key.starts_with(RESERVED_PREFIX)));
    assert!(attrs.contains_key("fine"));
    assert!(attrs.contains_key("ugly_var_"));
    assert!(attrs.contains_key("ugly var!"));
}

#[test]
fn test_get_or_insert_with_inserts_raw() {
    let mut attrs = AttrMap::new();

    let slot = attrs.get_or_insert_with("odd key!", || Value::Int(1));
    assert_eq!(*slot, Value::Int(1));
    // No sanitization happened: only the literal key exists
    assert_eq!(attrs.get("odd_key_"), None);
    assert_eq!(attrs.rewrites().count(), 0);

    // An existing entry wins over the default
    let slot = attrs.get_or_insert_with("odd key!", || Value::Int(9));
    assert_eq!(*slot, Value::Int(1));
}

// ===== COPYING =====

#[test]
fn test_copy_detaches_from_the_source() {
    let mut attrs = wrapped_sample();
    let copied = attrs.copy().unwrap();

    // Mutate the source at both levels after copying
    *attrs.get_mut("c").unwrap() = Value::Int(4);
    let a = attrs.get_mut("a").and_then(Value::as_attr_mut).unwrap();
    *a.get_mut("ugly_var_").unwrap() = Value::Int(10);

    assert_eq!(
        attrs.to_original().to_json_string(),
        r#"{"a":{"b":1,"ugly var!":10},"c":4}"#
    );
    // The copy still holds the values from construction time
    assert_eq!(
        copied.to_original().to_json_string(),
        r#"{"a":{"b":1,"ugly var!":2},"c":3}"#
    );
}

#[test]
fn test_copy_rebuilds_variant_entries_from_originals() {
    let mut attrs = AttrMap::from_map(Map::new().with_int("ugly var!", 2)).unwrap();
    *attrs.get_mut("ugly_var_").unwrap() = Value::Int(10);

    // The copy routes through the original projection, so the diverged
    // variants come back synchronized on the sanitized entry's value
    let copied = attrs.copy().unwrap();
    assert_eq!(copied.get("ugly var!"), Some(&Value::Int(10)));
    assert_eq!(copied.get("ugly_var_"), Some(&Value::Int(10)));
    assert_eq!(copied.original_key_of("ugly_var_"), Some("ugly var!"));
}

// ===== WIRE LAYOUT =====

#[test]
fn test_serialized_layout_matches_wire_form() {
    let attrs = wrapped_sample();

    let expected =
        r#"{"a":{"\f$\fugly_var_":"ugly var!","b":1,"ugly var!":2,"ugly_var_":2},"c":3}"#;
    assert_eq!(attrs.to_json_string(), expected);
    // serde emits the identical layout
    assert_eq!(serde_json::to_string(&attrs).unwrap(), expected);
}

#[test]
fn test_wire_layout_floats_match_serde() {
    let attrs = AttrMap::from_map(
        Map::new().with_float("huge val!", 1e16).with_float("tiny", 5e-9),
    )
    .unwrap();

    // The writer and serde agree on float notation at extreme magnitudes
    assert_eq!(attrs.to_json_string(), serde_json::to_string(&attrs).unwrap());
}

#[test]
fn test_deserialize_reabsorbs_raw_wire_json() {
    let wire = r#"{"\f$\fugly_var_":"ugly var!","b":1,"ugly var!":2,"ugly_var_":2}"#;
    let attrs: AttrMap = serde_json::from_str(wire).unwrap();

    // The prefix-tagged entry became a side-table pair, not data
    assert_eq!(attrs.len(), 3);
    assert_eq!(attrs.get("b"), Some(&Value::Int(1)));
    assert_eq!(attrs.get("ugly_var_"), Some(&Value::Int(2)));
    assert_eq!(attrs.original_key_of("ugly_var_"), Some("ugly var!"));

    // And the round trip is stable
    assert_eq!(serde_json::to_string(&attrs).unwrap(), wire);
}

#[test]
fn test_serde_round_trip_preserves_nested_wrappers() {
    let attrs = wrapped_sample();

    let json = serde_json::to_string(&attrs).unwrap();
    let back: AttrMap = serde_json::from_str(&json).unwrap();

    assert_eq!(back, attrs);
    let a = back.get("a").and_then(Value::as_attr).unwrap();
    assert_eq!(a.original_key_of("ugly_var_"), Some("ugly var!"));
}
