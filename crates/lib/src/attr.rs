//! Attribute-view wrapper over a mapping.
//!
//! [`AttrMap`] holds mapping data under attribute-safe keys: at construction
//! every key is sanitized to `[A-Za-z0-9_]` and nested plain mappings are
//! wrapped recursively. When sanitization changes a key, the wrapper keeps
//! the sanitized entry, an independent entry under the original key, and a
//! sanitized-to-original pair in a side-table so the original shape can be
//! restored later (see [`crate::project`]).
//!
//! The three-character marker [`RESERVED_PREFIX`] is reserved for the
//! serialized form: input keys carrying it are rejected, and serialization
//! emits one `prefix + sanitized` entry per side-table pair holding the
//! original key. In memory the side-table stays out of the entry namespace,
//! so iteration and `len` cover data entries only.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::{errors::MapError, map::Map, value::Value};

/// Marker reserved for serialized reverse-mapping entries: form feed, dollar,
/// form feed. Construction rejects input keys beginning with it.
pub const RESERVED_PREFIX: &str = "\u{0c}$\u{0c}";

/// Sanitized keys that would collide with the wrapper's own method names,
/// plus the merge entry point.
const RESERVED_WORDS: &[&str] = &[
    "contains_key",
    "copy",
    "from_entries",
    "from_map",
    "get",
    "get_mut",
    "get_or_insert_with",
    "insert",
    "is_empty",
    "iter",
    "iter_mut",
    "keys",
    "len",
    "new",
    "original_key_of",
    "remove",
    "rewrites",
    "to_export",
    "to_json_string",
    "to_original",
    "union",
    "values",
];

/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
///
/// ```
/// # use digmap::attr::sanitize_key;
/// assert_eq!(sanitize_key("ugly var!"), "ugly_var_");
/// assert_eq!(sanitize_key("clean_key0"), "clean_key0");
/// ```
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A mapping viewed through attribute-safe keys.
///
/// Construction is the only validating path: it rejects keys that carry
/// [`RESERVED_PREFIX`] or sanitize to a reserved word, rewrites the rest, and
/// recursively wraps nested plain mappings (sequences and already-wrapped
/// values are left as they are). After construction, [`AttrMap::insert`] and
/// [`AttrMap::remove`] are raw subscript-style accessors with no validation.
///
/// # Examples
///
/// ```
/// # use digmap::{AttrMap, Map, Value};
/// let map = Map::new()
///     .with_map("a", Map::new().with_int("b", 1).with_int("ugly var!", 2))
///     .with_int("c", 3);
/// let attrs = AttrMap::from_map(map).unwrap();
///
/// let a = attrs.get("a").and_then(Value::as_attr).unwrap();
/// assert_eq!(a.get("b"), Some(&Value::Int(1)));
/// // Rewritten keys resolve through either variant
/// assert_eq!(a.get("ugly_var_"), Some(&Value::Int(2)));
/// assert_eq!(a.get("ugly var!"), Some(&Value::Int(2)));
/// assert_eq!(a.original_key_of("ugly_var_"), Some("ugly var!"));
/// ```
///
/// Serializing an unprojected wrapper exposes the reverse-mapping entries,
/// which is exactly why the projections exist:
///
/// ```
/// # use digmap::{AttrMap, Map};
/// let attrs = AttrMap::from_map(Map::new().with_int("ugly var!", 2)).unwrap();
/// assert_eq!(
///     attrs.to_json_string(),
///     r#"{"\f$\fugly_var_":"ugly var!","ugly var!":2,"ugly_var_":2}"#
/// );
/// assert_eq!(attrs.to_original().to_json_string(), r#"{"ugly var!":2}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttrMap {
    entries: HashMap<String, Value>,
    /// Sanitized key to the original it replaced
    rewrites: HashMap<String, String>,
}

enum WireValue<'a> {
    Data(&'a Value),
    OriginalKey(&'a str),
}

impl AttrMap {
    /// Creates a new, empty wrapper
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a wrapper from a plain mapping, validating and sanitizing every
    /// key and recursively wrapping nested plain mappings.
    ///
    /// Fails with [`MapError::ReservedPrefix`] or [`MapError::ReservedWord`]
    /// on invalid keys.
    pub fn from_map(map: Map) -> Result<Self, MapError> {
        Self::from_entries(map)
    }

    /// Builds a wrapper from key-value pairs, with the same validation as
    /// [`AttrMap::from_map`].
    ///
    /// When two distinct keys sanitize to the same name, the pair seen last
    /// wins; iteration order of the input decides which that is.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Self, MapError> {
        let mut built = Self::new();
        for (key, value) in entries {
            built.install(key, value)?;
        }
        Ok(built)
    }

    fn install(&mut self, key: String, value: Value) -> Result<(), MapError> {
        if key.starts_with(RESERVED_PREFIX) {
            return Err(MapError::ReservedPrefix { key });
        }
        let sanitized = sanitize_key(&key);
        if RESERVED_WORDS.contains(&sanitized.as_str()) {
            return Err(MapError::ReservedWord {
                key,
                word: sanitized,
            });
        }
        let value = match value {
            Value::Map(map) => Value::Attr(AttrMap::from_map(map)?),
            other => other,
        };
        if sanitized == key {
            self.entries.insert(key, value);
        } else {
            trace!(original = %key, %sanitized, "Rewrote non-identifier key");
            self.entries.insert(key.clone(), value.clone());
            self.rewrites.insert(sanitized.clone(), key);
            self.entries.insert(sanitized, value);
        }
        Ok(())
    }

    /// Gets a value by any stored key, sanitized or original
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Gets a mutable reference by any stored key.
    ///
    /// The sanitized and original entries are independent: mutating one
    /// leaves the other untouched, and [`AttrMap::to_original`] prefers the
    /// sanitized entry's value.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Gets a mutable reference to the value for `key`, inserting the default
    /// raw (no validation) if absent
    pub fn get_or_insert_with(
        &mut self,
        key: &str,
        default: impl FnOnce() -> Value,
    ) -> &mut Value {
        self.entries.entry(key.to_string()).or_insert_with(default)
    }

    /// Inserts raw, with no validation, sanitization, or wrapping; returns
    /// the previous value if present.
    ///
    /// This matches post-construction subscript semantics: keys land exactly
    /// as given. Route through [`AttrMap::from_map`] to validate.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes an entry by exact key, returning its value if present.
    ///
    /// Removing a sanitized entry leaves its side-table pair inert: the
    /// original-variant entry stays, and projections simply skip the pair.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Returns true if the exact key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of data entries (rewritten keys count twice:
    /// sanitized and original variants are both data)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no data entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the data entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Iterates the data entries with mutable values
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.entries.iter_mut()
    }

    /// Iterates the data entry keys
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Iterates the data entry values
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Looks up the original key a sanitized key replaced, if any
    pub fn original_key_of(&self, sanitized: &str) -> Option<&str> {
        self.rewrites.get(sanitized).map(String::as_str)
    }

    /// Iterates the side-table as (sanitized, original) pairs
    pub fn rewrites(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rewrites
            .iter()
            .map(|(sanitized, original)| (sanitized.as_str(), original.as_str()))
    }

    /// Deep-copies through the original-keyed projection and full
    /// reconstruction.
    ///
    /// Unlike the derived `Clone`, which duplicates the wrapper structurally,
    /// this re-validates every key, so it fails if raw inserts introduced
    /// keys that construction would reject.
    pub fn copy(&self) -> Result<Self, MapError> {
        Self::from_map(self.to_original())
    }

    /// Projects to a plain mapping keeping both key variants and dropping the
    /// side-table. Nested wrappers are projected recursively; sequences are
    /// not walked.
    pub fn to_export(&self) -> Map {
        let mut out = Map::new();
        for (key, value) in &self.entries {
            out.insert(key.clone(), crate::project::export(value.clone()));
        }
        out
    }

    /// Projects to a plain mapping with original keys restored.
    ///
    /// For every side-table pair the sanitized entry's value moves to the
    /// original key, replacing the original-variant entry, and the sanitized
    /// entry disappears; pairs whose sanitized entry was removed are skipped.
    /// Nested wrappers are projected recursively; sequences are not walked.
    pub fn to_original(&self) -> Map {
        let mut out = Map::new();
        for (key, value) in &self.entries {
            out.insert(key.clone(), crate::project::original(value.clone()));
        }
        for (sanitized, original) in &self.rewrites {
            if let Some(value) = out.remove(sanitized) {
                out.insert(original.clone(), value);
            }
        }
        out
    }

    /// Renders the serialized wire layout as compact JSON with sorted keys:
    /// all data entries plus one `prefix + sanitized` entry per side-table
    /// pair holding the original key.
    pub fn to_json_string(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out);
        out
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        out.push('{');
        for (i, (key, value)) in self.wire_entries().iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            crate::value::escape_json(key, out);
            out.push(':');
            match value {
                WireValue::Data(value) => value.write_json(out),
                WireValue::OriginalKey(original) => crate::value::escape_json(original, out),
            }
        }
        out.push('}');
    }

    /// Data entries and prefix-tagged reverse-mapping entries, sorted by key
    fn wire_entries(&self) -> Vec<(String, WireValue<'_>)> {
        let mut entries: Vec<(String, WireValue<'_>)> = self
            .entries
            .iter()
            .map(|(key, value)| (key.clone(), WireValue::Data(value)))
            .collect();
        for (sanitized, original) in &self.rewrites {
            entries.push((
                format!("{RESERVED_PREFIX}{sanitized}"),
                WireValue::OriginalKey(original),
            ));
        }
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    /// Rebuilds a wrapper from its serialized layout: prefix-tagged text
    /// entries refill the side-table, everything else is a data entry, and
    /// nested prefix-bearing mappings reabsorb recursively.
    fn from_wire(raw: Map) -> Result<Self, MapError> {
        let mut built = Self::new();
        for (key, value) in raw {
            if let Some(sanitized) = key.strip_prefix(RESERVED_PREFIX) {
                match value {
                    Value::Text(original) => {
                        built.rewrites.insert(sanitized.to_string(), original);
                    }
                    other => {
                        return Err(MapError::TypeMismatch {
                            expected: "text reverse-mapping entry".to_string(),
                            actual: other.type_name().to_string(),
                        });
                    }
                }
            } else {
                built.entries.insert(key, reabsorb(value)?);
            }
        }
        Ok(built)
    }
}

/// Reinterprets serialized wrapper layouts inside a freshly deserialized
/// value: a mapping holding a prefix-tagged key can only be a serialized
/// wrapper, so it becomes one; other mappings stay plain but are walked for
/// deeper wrappers. Sequences are not walked.
fn reabsorb(value: Value) -> Result<Value, MapError> {
    match value {
        Value::Map(map) => {
            if map.keys().any(|key| key.starts_with(RESERVED_PREFIX)) {
                Ok(Value::Attr(AttrMap::from_wire(map)?))
            } else {
                let rebuilt = map
                    .into_iter()
                    .map(|(key, value)| Ok((key, reabsorb(value)?)))
                    .collect::<Result<Map, MapError>>()?;
                Ok(Value::Map(rebuilt))
            }
        }
        other => Ok(other),
    }
}

impl fmt::Display for AttrMap {
    /// Renders the export projection, the clean external view
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_export())
    }
}

impl TryFrom<Map> for AttrMap {
    type Error = MapError;

    fn try_from(map: Map) -> Result<Self, Self::Error> {
        Self::from_map(map)
    }
}

impl<'a> IntoIterator for &'a AttrMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl serde::Serialize for AttrMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let entries = self.wire_entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            match value {
                WireValue::Data(value) => map.serialize_entry(key, value)?,
                WireValue::OriginalKey(original) => map.serialize_entry(key, original)?,
            }
        }
        map.end()
    }
}

impl<'de> serde::Deserialize<'de> for AttrMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Map::deserialize(deserializer)?;
        Self::from_wire(raw).map_err(serde::de::Error::custom)
    }
}
