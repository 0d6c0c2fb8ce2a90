//! Ordered map type for keyed tables.
//!
//! This module provides [`LuaTable`], a wrapper around [`IndexMap`] keyed by
//! [`LuaKey`]. Insertion order is kept so that serialization is
//! deterministic; equality ignores order, matching the table semantics.
//!
//! ## Examples
//!
//! ```rust
//! use serde_luatable::{LuaKey, LuaTable, LuaValue};
//!
//! let mut table = LuaTable::new();
//! table.insert(LuaKey::from("name"), LuaValue::from("Alice"));
//! table.insert(LuaKey::from(1), LuaValue::from(30));
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.get_str("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::{LuaKey, LuaValue};
use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of scalar keys to values.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::{LuaKey, LuaTable, LuaValue};
///
/// let mut table = LuaTable::new();
/// table.insert(LuaKey::from("first"), LuaValue::from(1));
/// table.insert(LuaKey::from("second"), LuaValue::from(2));
///
/// let keys: Vec<_> = table.keys().map(|k| k.to_string()).collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LuaTable(IndexMap<LuaKey, LuaValue>);

impl LuaTable {
    /// Creates an empty `LuaTable`.
    #[must_use]
    pub fn new() -> Self {
        LuaTable(IndexMap::new())
    }

    /// Creates an empty `LuaTable` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        LuaTable(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair. An existing key keeps its position and gets
    /// the new value; the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_luatable::{LuaKey, LuaTable, LuaValue};
    ///
    /// let mut table = LuaTable::new();
    /// assert!(table.insert(LuaKey::from("key"), LuaValue::from(42)).is_none());
    /// assert!(table.insert(LuaKey::from("key"), LuaValue::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: LuaKey, value: LuaValue) -> Option<LuaValue> {
        self.0.insert(key, value)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &LuaKey) -> Option<LuaValue> {
        self.0.shift_remove(key)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &LuaKey) -> Option<&LuaValue> {
        self.0.get(key)
    }

    /// Convenience lookup for string keys.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&LuaValue> {
        self.0.get(&LuaKey::String(key.to_string()))
    }

    /// Returns `true` if the map holds the key.
    #[must_use]
    pub fn contains_key(&self, key: &LuaKey) -> bool {
        self.0.contains_key(key)
    }

    /// Keeps only the entries for which `keep` returns `true`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&LuaKey, &LuaValue) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, LuaKey, LuaValue> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, LuaKey, LuaValue> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, LuaKey, LuaValue> {
        self.0.iter()
    }

    /// Converts the map into the value a parsed constructor with the same
    /// keyed entries would produce: `nil` entries are dropped, and a map keyed
    /// exactly `1..=n` (or left empty) becomes an array.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_luatable::{LuaKey, LuaTable, LuaValue};
    ///
    /// let table: LuaTable = [(LuaKey::from(2), LuaValue::from("b")), (LuaKey::from(1), LuaValue::from("a"))]
    ///     .into_iter()
    ///     .collect();
    /// assert_eq!(table.into_value(), LuaValue::Array(vec!["a".into(), "b".into()]));
    /// ```
    #[must_use]
    pub fn into_value(self) -> LuaValue {
        crate::parser::reduce(self, Vec::new())
    }
}

impl From<HashMap<LuaKey, LuaValue>> for LuaTable {
    fn from(map: HashMap<LuaKey, LuaValue>) -> Self {
        LuaTable(map.into_iter().collect())
    }
}

impl From<LuaTable> for HashMap<LuaKey, LuaValue> {
    fn from(table: LuaTable) -> Self {
        table.0.into_iter().collect()
    }
}

impl IntoIterator for LuaTable {
    type Item = (LuaKey, LuaValue);
    type IntoIter = indexmap::map::IntoIter<LuaKey, LuaValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a LuaTable {
    type Item = (&'a LuaKey, &'a LuaValue);
    type IntoIter = indexmap::map::Iter<'a, LuaKey, LuaValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(LuaKey, LuaValue)> for LuaTable {
    fn from_iter<T: IntoIterator<Item = (LuaKey, LuaValue)>>(iter: T) -> Self {
        LuaTable(IndexMap::from_iter(iter))
    }
}
