//! Projections from wrapper-bearing structures back to plain mappings.
//!
//! Both walks recurse through mappings only: sequences are never entered,
//! matching construction, which never wraps inside them. The difference is
//! what happens at each wrapper node:
//!
//! - [`export`] keeps both key variants of every rewritten key and drops the
//!   side-table.
//! - [`original`] restores original keys, leaving no duplication.

use crate::value::Value;

/// Converts every wrapper node in `value` into a plain mapping keeping both
/// sanitized- and original-key entries.
///
/// ```
/// # use digmap::{project, AttrMap, Map, Value};
/// let attrs = AttrMap::from_map(Map::new().with_int("ugly var!", 2)).unwrap();
/// let exported = project::export(Value::Attr(attrs));
/// assert_eq!(
///     exported.to_json_string(),
///     r#"{"ugly var!":2,"ugly_var_":2}"#
/// );
/// ```
pub fn export(value: Value) -> Value {
    match value {
        Value::Attr(attr) => Value::Map(attr.to_export()),
        Value::Map(map) => Value::Map(
            map.into_iter()
                .map(|(key, value)| (key, export(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Converts every wrapper node in `value` into a plain mapping with original
/// keys restored.
///
/// For each side-table pair the sanitized entry's value lands under the
/// original key and the sanitized entry disappears, so the result is exactly
/// the pre-wrapping shape.
///
/// ```
/// # use digmap::{project, AttrMap, Map, Value};
/// let attrs = AttrMap::from_map(Map::new().with_int("ugly var!", 2)).unwrap();
/// let restored = project::original(Value::Attr(attrs));
/// assert_eq!(restored.to_json_string(), r#"{"ugly var!":2}"#);
/// ```
pub fn original(value: Value) -> Value {
    match value {
        Value::Attr(attr) => Value::Map(attr.to_original()),
        Value::Map(map) => Value::Map(
            map.into_iter()
                .map(|(key, value)| (key, original(value)))
                .collect(),
        ),
        other => other,
    }
}
