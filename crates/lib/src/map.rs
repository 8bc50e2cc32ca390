//! String-keyed mapping type for nested structures.
//!
//! [`Map`] is the mapping member of the data model and the root type for every
//! dotted-path and merge operation. Keys are plain strings and `insert`/`get`
//! are literal; dotted-path semantics live exclusively in [`Map::dig`],
//! [`Map::dig_get`], and [`Map::dug`], so a key containing a `.` is a perfectly
//! legal entry reachable through the literal accessors.
//!
//! # Usage
//!
//! ```
//! use digmap::Map;
//!
//! let mut map = Map::new()
//!     .with("name", "Alice")
//!     .with_map("profile", Map::new().with_int("age", 30));
//!
//! assert_eq!(map.dig_as::<i64>("profile.age").unwrap(), 30);
//! map.dug("profile.city", "NYC").unwrap();
//! assert_eq!(map.dig("profile.city").unwrap(), "NYC");
//! ```

use std::{collections::HashMap, fmt};

use crate::{errors::MapError, list::List, value::Value};

/// A string-keyed mapping of [`Value`]s.
///
/// `Map` wraps a `HashMap<String, Value>` with the container surface, builder
/// methods for literal construction, and deterministic rendering: `Display` and
/// [`Map::to_json_string`] emit keys in sorted order so output is stable
/// despite hash-map storage, and serde serialization follows the same order.
///
/// Path resolution ([`Map::dig`] and friends) and the merge variants
/// ([`Map::union`] and friends) are implemented in their own modules but all
/// operate on this type.
///
/// # Examples
///
/// ```
/// use digmap::{Map, Value};
///
/// let map = Map::new().with_int("b", 2).with_int("a", 1);
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get("a"), Some(&Value::Int(1)));
/// assert_eq!(map.to_json_string(), r#"{"a":1,"b":2}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
#[serde(transparent)]
pub struct Map {
    entries: HashMap<String, Value>,
}

impl Map {
    /// Creates a new, empty map
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the map contains the literal key
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns a reference to the value stored under the literal key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value stored under the literal key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns the value under `key` converted to `T`, if present and of the right kind.
    ///
    /// ```
    /// # use digmap::Map;
    /// let map = Map::new().with("name", "Alice");
    /// assert_eq!(map.get_as::<&str>("name"), Some("Alice"));
    /// assert_eq!(map.get_as::<i64>("name"), None);
    /// ```
    pub fn get_as<'a, T>(&'a self, key: &str) -> Option<T>
    where
        T: TryFrom<&'a Value, Error = MapError>,
    {
        let value = self.get(key)?;
        T::try_from(value).ok()
    }

    /// Inserts a value under the literal key, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns a mutable reference to the value under `key`, inserting the
    /// result of `default` first if the key is missing
    pub fn get_or_insert_with(
        &mut self,
        key: impl Into<String>,
        default: impl FnOnce() -> Value,
    ) -> &mut Value {
        self.entries.entry(key.into()).or_insert_with(default)
    }

    /// Removes the literal key, returning its value if it was present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Removes all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns an iterator over entries (arbitrary order)
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Returns a mutable iterator over entries (arbitrary order)
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.entries.iter_mut()
    }

    /// Returns an iterator over keys (arbitrary order)
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Returns an iterator over values (arbitrary order)
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Returns a mutable iterator over values (arbitrary order)
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.entries.values_mut()
    }

    /// Renders the map as compact JSON with sorted keys.
    ///
    /// Output is deterministic and fully escaped, suitable for comparisons and
    /// logs. Attribute-view wrapper nodes render in their serialized (wire)
    /// layout, bookkeeping entries included; project them first for clean
    /// output.
    ///
    /// ```
    /// # use digmap::Map;
    /// let map = Map::new().with_int("b", 2).with("a", "x");
    /// assert_eq!(map.to_json_string(), r#"{"a":"x","b":2}"#);
    /// ```
    pub fn to_json_string(&self) -> String {
        let mut out = String::with_capacity(self.entries.len() * 16);
        self.write_json(&mut out);
        out
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        let mut entries: Vec<(&String, &Value)> = self.entries.iter().collect();
        entries.sort_by_key(|(key, _)| *key);
        out.push('{');
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            crate::value::escape_json(key, out);
            out.push(':');
            value.write_json(out);
        }
        out.push('}');
    }

    /// Returns entries sorted by key, for deterministic walks
    pub(crate) fn sorted_entries(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<(&String, &Value)> = self.entries.iter().collect();
        entries.sort_by_key(|(key, _)| *key);
        entries
    }
}

// Builder pattern methods
impl Map {
    /// Builder method to insert a value and return self
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder method to insert a boolean value
    pub fn with_bool(self, key: impl Into<String>, value: bool) -> Self {
        self.with(key, Value::Bool(value))
    }

    /// Builder method to insert an integer value
    pub fn with_int(self, key: impl Into<String>, value: i64) -> Self {
        self.with(key, Value::Int(value))
    }

    /// Builder method to insert a float value
    pub fn with_float(self, key: impl Into<String>, value: f64) -> Self {
        self.with(key, Value::Float(value))
    }

    /// Builder method to insert a text value
    pub fn with_text(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(key, Value::Text(value.into()))
    }

    /// Builder method to insert a list value
    pub fn with_list(self, key: impl Into<String>, value: impl Into<List>) -> Self {
        self.with(key, Value::List(value.into()))
    }

    /// Builder method to insert a nested map
    pub fn with_map(self, key: impl Into<String>, value: impl Into<Map>) -> Self {
        self.with(key, Value::Map(value.into()))
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.sorted_entries().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl serde::Serialize for Map {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let entries = self.sorted_entries();
        let mut state = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            state.serialize_entry(key, value)?;
        }
        state.end()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, Value)> for Map {
    fn extend<T: IntoIterator<Item = (String, Value)>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl From<HashMap<String, Value>> for Map {
    fn from(entries: HashMap<String, Value>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
