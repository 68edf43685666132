use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::convert::ClassInfo;
use crate::error::MapResult;
use crate::hooks::{Hook, Hooked};
use crate::value::{Mapping, Value};

/// Collects the mapping keys a class does not map into one nested mapping.
///
/// On decode, every key that is not listed as known is moved under `key`,
/// so a class can keep them in a `Mapping` field of that name. On encode,
/// the nested mapping is flattened back into its parent.
///
/// # Examples
///
/// ```
/// use mc_mapper::hooks::{Hook, Hooked, UnmappedPropertiesHook};
/// use mc_mapper::{Mapping, Value};
///
/// let hook = UnmappedPropertiesHook::new("extra", ["name"]);
///
/// let mut map = Mapping::new();
/// map.insert("name", "Judy");
/// map.insert("age", 7);
///
/// let Ok(Hooked::Encoded(Value::Map(moved))) = hook.before_decode(Value::Map(map)) else {
///     unreachable!()
/// };
/// assert_eq!(moved.get("name"), Some(&Value::from("Judy")));
/// assert_eq!(
///     moved.get("extra").and_then(Value::as_map).and_then(|m| m.get("age")),
///     Some(&Value::Int(7)),
/// );
/// ```
pub struct UnmappedPropertiesHook {
    key: Cow<'static, str>,
    known: Vec<Cow<'static, str>>,
}

impl UnmappedPropertiesHook {
    pub fn new<K>(key: impl Into<Cow<'static, str>>, known: impl IntoIterator<Item = K>) -> Self
    where
        K: Into<Cow<'static, str>>,
    {
        Self {
            key: key.into(),
            known: known.into_iter().map(Into::into).collect(),
        }
    }

    /// Treats the keys of the class fields as known.
    ///
    /// Discriminator and type-marker keys are not fields, add them with
    /// [`with_known`](Self::with_known) to keep them out of the collected set.
    pub fn for_class(key: impl Into<Cow<'static, str>>, class: &ClassInfo) -> Self {
        Self::new(key, class.fields().iter().map(|f| f.key()))
    }

    pub fn with_known(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.known.push(key.into());
        self
    }

    fn is_known(&self, key: &str) -> bool {
        key == self.key || self.known.iter().any(|k| k == key)
    }
}

impl Hook for UnmappedPropertiesHook {
    fn before_decode(&self, value: Value) -> MapResult<Hooked> {
        let Value::Map(map) = value else {
            return Ok(Hooked::Encoded(value));
        };

        let mut mapped = Mapping::with_capacity(map.len());
        let mut unmapped = Mapping::new();
        for (k, v) in map {
            if self.is_known(&k) {
                mapped.insert(k, v);
            } else {
                unmapped.insert(k, v);
            }
        }
        mapped.insert(&*self.key, unmapped);
        Ok(Hooked::Encoded(Value::Map(mapped)))
    }

    fn after_encode(&self, mut value: Value) -> MapResult<Value> {
        if let Some(map) = value.as_map_mut()
            && let Some(Value::Map(unmapped)) = map.remove(&self.key)
        {
            for (k, v) in unmapped {
                if !map.contains_key(&k) {
                    map.insert(k, v);
                }
            }
        }
        Ok(value)
    }
}
