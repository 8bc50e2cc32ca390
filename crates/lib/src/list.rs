//! Ordered sequence type for nested structures.
//!
//! [`List`] is the sequence member of the data model: a thin, ordered
//! collection of [`Value`]s. Ordering is positional and caller-controlled;
//! there is no key, no dedup, and no merge policy of its own (the merge
//! engine decides how sequences combine).

use std::fmt;

use crate::value::Value;

/// An ordered sequence of [`Value`]s.
///
/// `List` wraps a `Vec<Value>` and exposes the usual container surface. Index
/// steps in dotted paths resolve against lists, and the set-add merge variant
/// applies its positional/dedup policy to them.
///
/// # Examples
///
/// ```
/// use digmap::{List, Value};
///
/// let mut list = List::new();
/// list.push(1);
/// list.push("two");
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.get(1), Some(&Value::Text("two".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct List {
    items: Vec<Value>,
}

impl List {
    /// Creates a new, empty list
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list holds no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a value to the end of the list
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Inserts a value at the given index, shifting later elements.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, like [`Vec::insert`].
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) {
        self.items.insert(index, value.into());
    }

    /// Returns a reference to the element at `index`, if in bounds
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Returns a mutable reference to the element at `index`, if in bounds
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// Replaces the element at `index`, returning the previous value if in bounds
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let slot = self.items.get_mut(index)?;
        Some(std::mem::replace(slot, value.into()))
    }

    /// Removes and returns the element at `index`, if in bounds
    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Returns true if any element equals `value`
    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    /// Returns the first element, if any
    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }

    /// Returns an iterator over the elements
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    /// Returns a mutable iterator over the elements
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.items.iter_mut()
    }

    /// Removes all elements
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        out.push('[');
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            item.write_json(out);
        }
        out.push(']');
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl FromIterator<Value> for List {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
