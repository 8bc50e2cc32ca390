//! Deep-merge strategies for nested mappings.
//!
//! Three variants share one collision rule: when a key exists on both sides
//! and both values are mappings, merge recursively; when the source value is
//! a mapping but the target's is not, the source mapping is installed
//! wholesale; otherwise the source value replaces the target's. They differ
//! in how sequences collide and in who owns the data afterwards:
//!
//! - [`Map::union`] replaces colliding sequences and moves source values into
//!   the target (no copies).
//! - [`Map::union_setadd`] treats colliding sequences as sets (or merges them
//!   positionally when they hold mappings), also moving source values.
//! - [`Map::union_copy`] leaves both inputs untouched and returns a fresh
//!   result sharing no state with either.
//!
//! Attribute-view wrapper values are opaque here: they install and replace
//! wholesale but are never recursed into. Project them to plain mappings
//! first to merge their contents.

use crate::{errors::MapError, list::List, map::Map, value::Value};

impl Map {
    /// Deep replace-merge of `source` into `self`.
    ///
    /// Mapping collisions recurse; every other collision, sequences included,
    /// is replaced by the source value. Source values are moved, not copied.
    ///
    /// # Examples
    ///
    /// ```
    /// # use digmap::Map;
    /// let mut target = Map::new().with_map("a", Map::new().with_map("b", Map::new().with_int("c", 1)));
    /// let source = Map::new()
    ///     .with_map("a", Map::new().with_map("b", Map::new().with_int("d", 2)))
    ///     .with_list("e", vec![digmap::Value::Int(1), digmap::Value::Int(2)]);
    /// target.union(source);
    /// assert_eq!(
    ///     target.to_json_string(),
    ///     r#"{"a":{"b":{"c":1,"d":2}},"e":[1,2]}"#
    /// );
    /// ```
    pub fn union(&mut self, source: Map) {
        for (key, value) in source {
            match value {
                Value::Map(src) => {
                    if let Some(Value::Map(dst)) = self.get_mut(&key) {
                        dst.union(src);
                    } else {
                        self.insert(key, Value::Map(src));
                    }
                }
                other => {
                    self.insert(key, other);
                }
            }
        }
    }

    /// Deep set-add merge of `source` into `self`.
    ///
    /// Mapping collisions recurse like [`Map::union`]. Sequence collisions
    /// merge instead of replacing: when the first source element is a mapping
    /// the sequences merge element-by-element by position (both-mapping pairs
    /// recurse, other pairs replace, surplus source elements append);
    /// otherwise each source element not already present in the target is
    /// appended, so scalar sequences behave as ordered sets. An empty source
    /// sequence leaves the target unchanged.
    ///
    /// Fails with [`MapError::SequenceMismatch`] when the target holds a
    /// non-sequence where the source holds a sequence. The merge is not
    /// transactional: entries processed before the failure stay merged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use digmap::{Map, Value};
    /// let mut target = Map::new().with_list("e", vec![Value::Int(1)]);
    /// let source = Map::new().with_list("e", vec![Value::Int(1), Value::Int(2)]);
    /// target.union_setadd(source).unwrap();
    /// assert_eq!(target.to_json_string(), r#"{"e":[1,2]}"#);
    /// ```
    pub fn union_setadd(&mut self, source: Map) -> Result<(), MapError> {
        for (key, value) in source {
            match value {
                Value::Map(src) => {
                    if let Some(Value::Map(dst)) = self.get_mut(&key) {
                        dst.union_setadd(src)?;
                    } else {
                        self.insert(key, Value::Map(src));
                    }
                }
                Value::List(src) => match self.get_mut(&key) {
                    Some(Value::List(dst)) => setadd_sequence(dst, src)?,
                    Some(existing) => {
                        return Err(MapError::SequenceMismatch {
                            actual: existing.type_name().to_string(),
                            key,
                        });
                    }
                    None => {
                        self.insert(key, Value::List(src));
                    }
                },
                other => {
                    self.insert(key, other);
                }
            }
        }
        Ok(())
    }

    /// Deep merge of `source` over `self` into a fresh mapping.
    ///
    /// Same collision rule as [`Map::union`], but neither input is mutated
    /// and the result shares no state with either: the target is cloned and
    /// every installed source value is a deep copy.
    ///
    /// # Examples
    ///
    /// ```
    /// # use digmap::{Map, Value};
    /// let target = Map::new().with_map("a", Map::new().with_int("b", 1));
    /// let source = Map::new().with_list("e", vec![Value::Int(1), Value::Int(2)]);
    /// let mut merged = target.union_copy(&source);
    ///
    /// merged.dug("e[0]", 3).unwrap();
    /// assert_eq!(source.to_json_string(), r#"{"e":[1,2]}"#);
    /// assert_eq!(merged.to_json_string(), r#"{"a":{"b":1},"e":[3,2]}"#);
    /// ```
    pub fn union_copy(&self, source: &Map) -> Map {
        let mut merged = self.clone();
        merged.absorb_copy(source);
        merged
    }

    fn absorb_copy(&mut self, source: &Map) {
        for (key, value) in source {
            match value {
                Value::Map(src) => {
                    if let Some(Value::Map(dst)) = self.get_mut(key) {
                        dst.absorb_copy(src);
                    } else {
                        self.insert(key.clone(), Value::Map(src.clone()));
                    }
                }
                other => {
                    self.insert(key.clone(), other.clone());
                }
            }
        }
    }
}

/// Merges a source sequence into a target sequence under set-add rules.
fn setadd_sequence(target: &mut List, source: List) -> Result<(), MapError> {
    if source.is_empty() {
        return Ok(());
    }
    if matches!(source.first(), Some(Value::Map(_))) {
        // Positional merge, assuming homogeneous mapping elements
        for (offset, element) in source.into_iter().enumerate() {
            let Some(slot) = target.get_mut(offset) else {
                target.push(element);
                continue;
            };
            match (slot, element) {
                (Value::Map(dst), Value::Map(src)) => dst.union_setadd(src)?,
                (slot, element) => *slot = element,
            }
        }
    } else {
        for element in source {
            if !target.contains(&element) {
                target.push(element);
            }
        }
    }
    Ok(())
}
