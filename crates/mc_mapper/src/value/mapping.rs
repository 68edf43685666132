use alloc::string::String;

use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter, IterMut, Keys, Values};
use mc_utils::hash::FixedHashState;

use super::Value;

// -----------------------------------------------------------------------------
// Mapping

/// String-keyed mapping of encoded values.
///
/// Keys keep insertion order, so an encoded class lists its fields in
/// declaration order followed by any discriminator merged in afterwards.
/// Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping(IndexMap<String, Value, FixedHashState>);

impl Mapping {
    #[inline]
    pub fn new() -> Self {
        Self(IndexMap::with_hasher(FixedHashState))
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity_and_hasher(capacity, FixedHashState))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts or overwrites `key`.
    ///
    /// An existing key keeps its position, a new key goes last.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Value) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.0.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, String, Value> {
        self.0.iter_mut()
    }

    #[inline]
    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.0.keys()
    }

    #[inline]
    pub fn values(&self) -> Values<'_, String, Value> {
        self.0.values()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Mapping {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.0.insert(k.into(), v.into());
        }
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::Mapping;
    use crate::value::Value;

    #[test]
    fn keeps_insertion_order() {
        let mut map = Mapping::new();
        map.insert("name", "Judy");
        map.insert("color", "Black");
        map.insert("type", "Cat");
        map.insert("name", "Luna");

        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["name", "color", "type"]);
        assert_eq!(map.get("name"), Some(&Value::from("Luna")));

        map.remove("color");
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["name", "type"]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: Mapping = [("x", 1), ("y", 2)].into_iter().collect();
        let b: Mapping = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
    }
}
