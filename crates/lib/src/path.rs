//! Dotted-path parsing and traversal.
//!
//! A path is a dot-separated string. Each token is inspected once for a
//! trailing `[index]` suffix, which splices the token into a key step followed
//! by an index step: `"a.b[1].c"` resolves key `a`, key `b`, index `1`,
//! key `c`. Key steps resolve through mappings (plain and attribute-view),
//! index steps resolve through sequences.
//!
//! Three traversal modes live here as methods on [`Map`]:
//!
//! - [`Map::dig`] is strict: any unresolvable step is an error.
//! - [`Map::dig_get`] is lenient and total: unresolvable steps and falsy
//!   intermediates yield `None`.
//! - [`Map::dug`] writes, creating empty intermediate maps at missing key
//!   steps.

use tracing::trace;

use crate::{errors::MapError, map::Map, value::Value};

/// One resolved step of a dotted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// Mapping lookup by key
    Key(&'a str),
    /// Sequence lookup by position
    Index(usize),
}

impl Step<'_> {
    fn describe(&self) -> String {
        match self {
            Step::Key(key) => (*key).to_string(),
            Step::Index(index) => index.to_string(),
        }
    }
}

/// Splits one path token into its key part and an optional trailing index.
///
/// A token ending in `[digits]` splices into the part before the bracket and
/// the parsed index. Anything else stays a literal key: no brackets,
/// non-numeric brackets, or digits too large for `usize`. Splicing applies
/// once per token, to the rightmost trailing suffix only.
///
/// ```
/// # use digmap::path::split_index;
/// assert_eq!(split_index("abc[0]"), ("abc", Some(0)));
/// assert_eq!(split_index("abc[200]"), ("abc", Some(200)));
/// assert_eq!(split_index("abc[a]"), ("abc[a]", None));
/// assert_eq!(split_index("abc"), ("abc", None));
/// assert_eq!(split_index("a[1][2]"), ("a[1]", Some(2)));
/// ```
pub fn split_index(segment: &str) -> (&str, Option<usize>) {
    let Some(stripped) = segment.strip_suffix(']') else {
        return (segment, None);
    };
    let Some(open) = stripped.rfind('[') else {
        return (segment, None);
    };
    let digits = &stripped[open + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (segment, None);
    }
    match digits.parse::<usize>() {
        Ok(index) => (&stripped[..open], Some(index)),
        // Too large to ever be in range; keep the token as a literal key
        Err(_) => (segment, None),
    }
}

/// Iterates the steps of a dotted path.
///
/// Tokens come from a literal split on `.`, so empty tokens are literal
/// empty-string keys and no normalization happens. Every path yields at least
/// one step.
///
/// ```
/// # use digmap::path::{steps, Step};
/// let parsed: Vec<Step> = steps("a.b[1].c").collect();
/// assert_eq!(
///     parsed,
///     vec![Step::Key("a"), Step::Key("b"), Step::Index(1), Step::Key("c")]
/// );
/// ```
pub fn steps(path: &str) -> impl Iterator<Item = Step<'_>> {
    path.split('.').flat_map(|segment| {
        let (key, index) = split_index(segment);
        std::iter::once(Step::Key(key)).chain(index.map(Step::Index))
    })
}

impl Map {
    /// Gets a value at a dotted path, failing on any unresolvable step.
    ///
    /// Key steps resolve through plain and attribute-view mappings; index
    /// steps resolve through sequences. An index step applied to a mapping is
    /// a missing-key error (mapping keys are strings), a key step applied to
    /// a sequence or any step into a scalar is a [`MapError::NotIndexable`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use digmap::{Map, Value};
    /// let map = Map::new().with_map("a", Map::new().with_map("b", Map::new().with_int("c", 1)));
    /// assert_eq!(map.dig("a.b.c").unwrap(), &Value::Int(1));
    /// assert!(map.dig("a.b.d").unwrap_err().is_not_found());
    /// ```
    pub fn dig(&self, path: &str) -> Result<&Value, MapError> {
        let mut parsed = steps(path);
        // A split on '.' always yields at least one token
        let Some(first) = parsed.next() else {
            return Err(MapError::KeyNotFound {
                path: path.to_string(),
                key: String::new(),
            });
        };
        let mut current = lookup_in_map(self, path, first)?;
        for step in parsed {
            current = lookup(current, path, step)?;
        }
        Ok(current)
    }

    /// Gets a value at a dotted path, or `None`.
    ///
    /// Total: any missing key, out-of-range index, or non-indexable value
    /// yields `None` instead of an error. Traversal also short-circuits to
    /// `None` when an intermediate value is falsy (null, `false`, zero, empty
    /// text or container) before the next step is applied; the final resolved
    /// value is returned as-is even if falsy.
    ///
    /// # Examples
    ///
    /// ```
    /// # use digmap::{Map, Value};
    /// let map = Map::new().with_map("a", Map::new().with_map("b", Map::new().with_int("c", 1)));
    /// assert_eq!(map.dig_get("a.b.c"), Some(&Value::Int(1)));
    /// assert_eq!(map.dig_get("a.b.d"), None);
    /// assert_eq!(map.dig_get("a.z.c"), None);
    /// ```
    pub fn dig_get(&self, path: &str) -> Option<&Value> {
        if self.is_empty() {
            return None;
        }
        let mut parsed = steps(path);
        let first = parsed.next()?;
        let mut current = lookup_lenient_in_map(self, first)?;
        for step in parsed {
            if !current.is_truthy() {
                return None;
            }
            current = lookup_lenient(current, step)?;
        }
        Some(current)
    }

    /// Gets a value at a dotted path, or the given default.
    ///
    /// ```
    /// # use digmap::{Map, Value};
    /// let map = Map::new().with_map("a", Map::new().with_int("b", 1));
    /// let fallback = Value::Int(2);
    /// assert_eq!(map.dig_get_or("a.b", &fallback), &Value::Int(1));
    /// assert_eq!(map.dig_get_or("a.c", &fallback), &fallback);
    /// ```
    pub fn dig_get_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
        self.dig_get(path).unwrap_or(default)
    }

    /// Gets a value at a dotted path with typed extraction.
    ///
    /// Strict like [`Map::dig`], then converts via `TryFrom<&Value>`, so the
    /// error distinguishes a failed lookup from a type mismatch.
    ///
    /// ```
    /// # use digmap::Map;
    /// let map = Map::new().with_map("a", Map::new().with_int("b", 7));
    /// assert_eq!(map.dig_as::<i64>("a.b").unwrap(), 7);
    /// assert!(map.dig_as::<bool>("a.b").unwrap_err().is_type_mismatch());
    /// ```
    pub fn dig_as<'a, T>(&'a self, path: &str) -> Result<T, MapError>
    where
        T: TryFrom<&'a Value, Error = MapError>,
    {
        T::try_from(self.dig(path)?)
    }

    /// Sets a value at a dotted path, creating intermediate maps as needed.
    ///
    /// Missing intermediate key steps create empty maps. Index steps never
    /// create: an in-range intermediate index descends into the existing
    /// element, out of range fails. An existing non-container intermediate
    /// fails rather than being replaced. The final step inserts or replaces
    /// under a key, or replaces an in-range sequence element.
    ///
    /// # Examples
    ///
    /// ```
    /// # use digmap::{Map, Value};
    /// let mut map = Map::new();
    /// map.dug("a.b.c", 10).unwrap();
    /// assert_eq!(map.dig("a.b.c").unwrap(), &Value::Int(10));
    /// ```
    pub fn dug(&mut self, path: &str, value: impl Into<Value>) -> Result<(), MapError> {
        let value = value.into();
        let parsed: Vec<Step<'_>> = steps(path).collect();
        // A split on '.' always yields at least one token
        let Some((last, intermediates)) = parsed.split_last() else {
            return Err(MapError::KeyNotFound {
                path: path.to_string(),
                key: String::new(),
            });
        };

        let Some(first) = intermediates.first() else {
            return assign_in_map(self, path, *last, value);
        };
        let mut current = advance_in_map(self, path, *first)?;
        for step in &intermediates[1..] {
            current = advance(current, path, *step)?;
        }
        assign(current, path, *last, value)
    }
}

fn lookup_in_map<'a>(map: &'a Map, path: &str, step: Step<'_>) -> Result<&'a Value, MapError> {
    match step {
        Step::Key(key) => map.get(key).ok_or_else(|| MapError::KeyNotFound {
            path: path.to_string(),
            key: key.to_string(),
        }),
        // Mapping keys are strings, so a numeric step cannot match
        Step::Index(index) => Err(MapError::KeyNotFound {
            path: path.to_string(),
            key: index.to_string(),
        }),
    }
}

fn lookup<'a>(value: &'a Value, path: &str, step: Step<'_>) -> Result<&'a Value, MapError> {
    match value {
        Value::Map(map) => lookup_in_map(map, path, step),
        Value::Attr(attr) => match step {
            Step::Key(key) => attr.get(key).ok_or_else(|| MapError::KeyNotFound {
                path: path.to_string(),
                key: key.to_string(),
            }),
            Step::Index(index) => Err(MapError::KeyNotFound {
                path: path.to_string(),
                key: index.to_string(),
            }),
        },
        Value::List(list) => match step {
            Step::Index(index) => {
                list.get(index).ok_or_else(|| MapError::IndexOutOfBounds {
                    path: path.to_string(),
                    index,
                    len: list.len(),
                })
            }
            Step::Key(key) => Err(MapError::NotIndexable {
                path: path.to_string(),
                segment: key.to_string(),
                kind: "list".to_string(),
            }),
        },
        other => Err(MapError::NotIndexable {
            path: path.to_string(),
            segment: step.describe(),
            kind: other.type_name().to_string(),
        }),
    }
}

fn lookup_lenient_in_map<'a>(map: &'a Map, step: Step<'_>) -> Option<&'a Value> {
    match step {
        Step::Key(key) => map.get(key),
        Step::Index(_) => None,
    }
}

fn lookup_lenient<'a>(value: &'a Value, step: Step<'_>) -> Option<&'a Value> {
    match (value, step) {
        (Value::Map(map), Step::Key(key)) => map.get(key),
        (Value::Attr(attr), Step::Key(key)) => attr.get(key),
        (Value::List(list), Step::Index(index)) => list.get(index),
        _ => None,
    }
}

fn advance_in_map<'a>(
    map: &'a mut Map,
    path: &str,
    step: Step<'_>,
) -> Result<&'a mut Value, MapError> {
    match step {
        Step::Key(key) => {
            if !map.contains_key(key) {
                trace!(path, key, "Creating intermediate map");
            }
            Ok(map.get_or_insert_with(key, || Value::Map(Map::new())))
        }
        Step::Index(index) => Err(MapError::KeyNotFound {
            path: path.to_string(),
            key: index.to_string(),
        }),
    }
}

fn advance<'a>(
    value: &'a mut Value,
    path: &str,
    step: Step<'_>,
) -> Result<&'a mut Value, MapError> {
    match value {
        Value::Map(map) => advance_in_map(map, path, step),
        Value::Attr(attr) => match step {
            Step::Key(key) => {
                if !attr.contains_key(key) {
                    trace!(path, key, "Creating intermediate map inside attribute view");
                }
                Ok(attr.get_or_insert_with(key, || Value::Map(Map::new())))
            }
            Step::Index(index) => Err(MapError::KeyNotFound {
                path: path.to_string(),
                key: index.to_string(),
            }),
        },
        Value::List(list) => match step {
            Step::Index(index) => {
                let len = list.len();
                list.get_mut(index)
                    .ok_or_else(|| MapError::IndexOutOfBounds {
                        path: path.to_string(),
                        index,
                        len,
                    })
            }
            Step::Key(key) => Err(MapError::NotIndexable {
                path: path.to_string(),
                segment: key.to_string(),
                kind: "list".to_string(),
            }),
        },
        other => Err(MapError::NotIndexable {
            path: path.to_string(),
            segment: step.describe(),
            kind: other.type_name().to_string(),
        }),
    }
}

fn assign_in_map(map: &mut Map, path: &str, step: Step<'_>, value: Value) -> Result<(), MapError> {
    match step {
        Step::Key(key) => {
            map.insert(key, value);
            Ok(())
        }
        Step::Index(index) => Err(MapError::KeyNotFound {
            path: path.to_string(),
            key: index.to_string(),
        }),
    }
}

fn assign(target: &mut Value, path: &str, step: Step<'_>, value: Value) -> Result<(), MapError> {
    match target {
        Value::Map(map) => assign_in_map(map, path, step, value),
        Value::Attr(attr) => match step {
            Step::Key(key) => {
                attr.insert(key, value);
                Ok(())
            }
            Step::Index(index) => Err(MapError::KeyNotFound {
                path: path.to_string(),
                key: index.to_string(),
            }),
        },
        Value::List(list) => match step {
            Step::Index(index) => {
                let len = list.len();
                if list.set(index, value).is_some() {
                    Ok(())
                } else {
                    Err(MapError::IndexOutOfBounds {
                        path: path.to_string(),
                        index,
                        len,
                    })
                }
            }
            Step::Key(key) => Err(MapError::NotIndexable {
                path: path.to_string(),
                segment: key.to_string(),
                kind: "list".to_string(),
            }),
        },
        other => Err(MapError::NotIndexable {
            path: path.to_string(),
            segment: step.describe(),
            kind: other.type_name().to_string(),
        }),
    }
}
