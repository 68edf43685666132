use alloc::collections::BTreeMap;
use alloc::string::String;
use core::hash::BuildHasher;
use core::marker::PhantomData;

use mc_utils::hash::{FixedHashState, HashMap};

use crate::convert::{Context, TypedConverter};
use crate::error::{MapError, MapResult};
use crate::impls::{generic_fallback, join};
use crate::info::{GenericTypeInfoCell, TypeInfo, TypeKind};
use crate::mappable::MapType;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::value::{Mapping, Value};

// -----------------------------------------------------------------------------
// Shared

/// Decodes every entry but the type marker.
fn decode_entries<V: MapType, M: FromIterator<(String, V)>>(
    value: &Value,
    expected: &'static TypeInfo,
    cx: &Context<'_>,
) -> MapResult<M> {
    let map = value
        .as_map()
        .ok_or_else(|| MapError::mismatch(expected.name(), value.shape()))?;
    let marker = cx.options().type_marker_key();
    map.iter()
        .filter(|(key, _)| key.as_str() != marker)
        .map(|(key, item)| {
            let item = cx.decode::<V>(item).map_err(|e| e.at_key(key))?;
            Ok((key.clone(), item))
        })
        .collect()
}

fn encode_entries<'v, V: MapType>(
    entries: impl ExactSizeIterator<Item = (&'v String, &'v V)>,
    cx: &Context<'_>,
) -> MapResult<Value> {
    let mut map = Mapping::with_capacity(entries.len());
    for (key, item) in entries {
        cx.put(&mut map, key, item)?;
    }
    Ok(Value::Map(map))
}

fn map_equals<'v, V: MapType + 'v>(
    mut a: impl ExactSizeIterator<Item = (&'v String, &'v V)>,
    b_len: usize,
    b: impl Fn(&str) -> Option<&'v V>,
    cx: &Context<'_>,
) -> bool {
    a.len() == b_len && a.all(|(key, x)| b(key).is_some_and(|y| cx.equals(x, y)))
}

/// Order-independent combination of entry hashes.
fn map_hash<'v, V: MapType + 'v>(
    entries: impl Iterator<Item = (&'v String, &'v V)>,
    cx: &Context<'_>,
) -> u64 {
    entries.fold(0_u64, |sum, (key, item)| {
        sum.wrapping_add(FixedHashState.hash_one((key, cx.hash(item))))
    })
}

fn map_string<'v, V: MapType + 'v>(
    entries: impl Iterator<Item = (&'v String, &'v V)>,
    cx: &Context<'_>,
) -> String {
    join(
        '{',
        entries.map(|(key, item)| alloc::format!("{key}: {}", cx.stringify(item))),
        '}',
    )
}

// -----------------------------------------------------------------------------
// BTreeMap

/// `BTreeMap<String, V>` as a mapping. Keys are encoded in sorted order.
pub struct BTreeMapConverter<V>(PhantomData<fn() -> V>);

impl<V> BTreeMapConverter<V> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<V: MapType> TypedConverter<BTreeMap<String, V>> for BTreeMapConverter<V> {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<BTreeMap<String, V>> {
        decode_entries(value, BTreeMap::<String, V>::type_info(), cx)
    }

    fn encode(&self, value: &BTreeMap<String, V>, cx: &Context<'_>) -> MapResult<Value> {
        encode_entries(value.iter(), cx)
    }

    fn equals(&self, a: &BTreeMap<String, V>, b: &BTreeMap<String, V>, cx: &Context<'_>) -> bool {
        map_equals(a.iter(), b.len(), |key| b.get(key), cx)
    }

    fn hash(&self, value: &BTreeMap<String, V>, cx: &Context<'_>) -> u64 {
        map_hash(value.iter(), cx)
    }

    fn stringify(&self, value: &BTreeMap<String, V>, cx: &Context<'_>) -> String {
        map_string(value.iter(), cx)
    }
}

impl<V: MapType> MapType for BTreeMap<String, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::generic::<Self>("Map", TypeKind::Map, &[String::type_info(), V::type_info()])
        })
    }

    fn fallback_meta() -> Option<&'static TypeMeta> {
        generic_fallback!(Self)
    }
}

impl<V: MapType> GetTypeMeta for BTreeMap<String, V> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new::<Self>(BTreeMapConverter::<V>::new())
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register_fallback::<V>();
    }
}

// -----------------------------------------------------------------------------
// HashMap

/// `HashMap<String, V>` as a mapping.
pub struct HashMapConverter<V>(PhantomData<fn() -> V>);

impl<V> HashMapConverter<V> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<V: MapType> TypedConverter<HashMap<String, V>> for HashMapConverter<V> {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<HashMap<String, V>> {
        decode_entries(value, HashMap::<String, V>::type_info(), cx)
    }

    fn encode(&self, value: &HashMap<String, V>, cx: &Context<'_>) -> MapResult<Value> {
        encode_entries(value.iter(), cx)
    }

    fn equals(&self, a: &HashMap<String, V>, b: &HashMap<String, V>, cx: &Context<'_>) -> bool {
        map_equals(a.iter(), b.len(), |key| b.get(key), cx)
    }

    fn hash(&self, value: &HashMap<String, V>, cx: &Context<'_>) -> u64 {
        map_hash(value.iter(), cx)
    }

    fn stringify(&self, value: &HashMap<String, V>, cx: &Context<'_>) -> String {
        map_string(value.iter(), cx)
    }
}

impl<V: MapType> MapType for HashMap<String, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::generic::<Self>(
                "HashMap",
                TypeKind::Map,
                &[String::type_info(), V::type_info()],
            )
        })
    }

    fn fallback_meta() -> Option<&'static TypeMeta> {
        generic_fallback!(Self)
    }
}

impl<V: MapType> GetTypeMeta for HashMap<String, V> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new::<Self>(HashMapConverter::<V>::new())
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register_fallback::<V>();
    }
}

// -----------------------------------------------------------------------------
// Tests
