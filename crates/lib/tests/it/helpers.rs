use digmap::{AttrMap, Map, Value};

/// Creates the nested structure used across path and merge tests:
/// `{"a": {"b": [{"c": 1}, {"d": 4}], "e": {"f": 2}}, "g": 3}`
pub fn sample_config() -> Map {
    Map::new()
        .with_map(
            "a",
            Map::new()
                .with_list(
                    "b",
                    vec![
                        Value::Map(Map::new().with_int("c", 1)),
                        Value::Map(Map::new().with_int("d", 4)),
                    ],
                )
                .with_map("e", Map::new().with_int("f", 2)),
        )
        .with_int("g", 3)
}

/// Creates a wrapper over a mapping that mixes clean and non-identifier keys
pub fn wrapped_sample() -> AttrMap {
    AttrMap::from_map(
        Map::new()
            .with_map("a", Map::new().with_int("b", 1).with_int("ugly var!", 2))
            .with_int("c", 3),
    )
    .expect("Failed to build wrapper")
}

/// Asserts that a strict lookup resolves to the given integer
pub fn assert_int_at(map: &Map, path: &str, expected: i64) {
    match map.dig(path) {
        Ok(Value::Int(actual)) => {
            assert_eq!(*actual, expected, "Value mismatch at '{path}'");
        }
        Ok(other) => panic!("Expected int at '{path}', got: {other:?}"),
        Err(err) => panic!("Path '{path}' failed to resolve: {err}"),
    }
}
