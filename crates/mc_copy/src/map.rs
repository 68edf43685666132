use alloc::collections::BTreeMap;
use core::hash::{BuildHasher, Hash};

use mc_utils::hash::HashMap;

use crate::{CopyLens, Copyable};

// -----------------------------------------------------------------------------
// LensMap

/// The map operations a [`MapLens`] needs.
pub trait LensMap: Clone {
    type Key: Clone;
    type Value: Clone;

    fn get_entry(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn put_entry(&mut self, key: Self::Key, value: Self::Value);

    fn remove_entry(&mut self, key: &Self::Key);
}

impl<K: Ord + Clone, V: Clone> LensMap for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    #[inline]
    fn get_entry(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    #[inline]
    fn put_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    #[inline]
    fn remove_entry(&mut self, key: &K) {
        self.remove(key);
    }
}

impl<K, V, S> LensMap for HashMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn get_entry(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    #[inline]
    fn put_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    #[inline]
    fn remove_entry(&mut self, key: &K) {
        self.remove(key);
    }
}

// -----------------------------------------------------------------------------
// MapLens

/// Lens over a map.
///
/// Every update clones the map once, values held in `Arc` keep their
/// allocation.
pub struct MapLens<'a, M, R> {
    lens: CopyLens<'a, M, R>,
}

impl<'a, M: LensMap + 'a, R: 'a> MapLens<'a, M, R> {
    #[inline]
    pub fn new(lens: CopyLens<'a, M, R>) -> Self {
        Self { lens }
    }

    #[inline]
    pub fn value(&self) -> &'a M {
        self.lens.value()
    }

    #[inline]
    pub fn into_lens(self) -> CopyLens<'a, M, R> {
        self.lens
    }

    /// Lens over the value of `key`, `None` if the key is absent.
    pub fn get(self, key: M::Key) -> Option<CopyLens<'a, M::Value, R>>
    where
        M::Value: 'a,
    {
        let value = self.lens.value().get_entry(&key)?;
        Some(self.lens.focus(
            move |_| value,
            move |map, value| {
                let mut out = map.clone();
                out.put_entry(key, value);
                out
            },
        ))
    }

    /// Object lens over the value of `key`, `None` if the key is absent.
    #[inline]
    pub fn get_with(self, key: M::Key) -> Option<<M::Value as Copyable>::Lens<'a, R>>
    where
        M::Value: Copyable + 'a,
    {
        self.get(key).map(<M::Value as Copyable>::lens_from)
    }

    pub fn put(self, key: M::Key, value: M::Value) -> R {
        self.apply(|map| {
            let mut out = map.clone();
            out.put_entry(key, value);
            out
        })
    }

    pub fn put_all(self, entries: impl IntoIterator<Item = (M::Key, M::Value)>) -> R {
        self.apply(|map| {
            let mut out = map.clone();
            for (key, value) in entries {
                out.put_entry(key, value);
            }
            out
        })
    }

    #[inline]
    pub fn replace(self, map: M) -> R {
        self.lens.set(map)
    }

    /// Removes `key`. An absent key leaves the map unchanged.
    pub fn remove_at(self, key: &M::Key) -> R {
        self.apply(|map| {
            let mut out = map.clone();
            out.remove_entry(key);
            out
        })
    }

    /// Replaces the map with `f` of the current one.
    #[inline]
    pub fn apply(self, f: impl FnOnce(&'a M) -> M) -> R {
        self.lens.apply(f)
    }
}

// -----------------------------------------------------------------------------
// Tests
