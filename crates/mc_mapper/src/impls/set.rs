use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::Hash;
use core::marker::PhantomData;

use mc_utils::hash::{HashSet, HashTable};

use crate::convert::{Context, TypedConverter};
use crate::error::MapResult;
use crate::impls::list::{decode_items, encode_items};
use crate::impls::{generic_fallback, join};
use crate::info::{GenericTypeInfoCell, TypeInfo, TypeKind};
use crate::mappable::MapType;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Shared

/// Drops later items the registry considers equal to an earlier one.
fn dedup<T: MapType>(items: Vec<T>, cx: &Context<'_>) -> Vec<T> {
    let mut seen: HashTable<usize> = HashTable::with_capacity(items.len());
    let mut hashes: Vec<u64> = Vec::with_capacity(items.len());
    let mut kept: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        let hash = cx.hash(&item);
        if seen.find(hash, |&i| cx.equals(&kept[i], &item)).is_some() {
            continue;
        }
        seen.insert_unique(hash, kept.len(), |&i| hashes[i]);
        hashes.push(hash);
        kept.push(item);
    }
    kept
}

/// Set equality through the registry: same size and every item of `a` has
/// an equal item in `b`.
fn set_equals<'v, T: MapType + 'v>(
    mut a: impl ExactSizeIterator<Item = &'v T>,
    b: impl ExactSizeIterator<Item = &'v T> + Clone,
    cx: &Context<'_>,
) -> bool {
    a.len() == b.len() && a.all(|x| b.clone().any(|y| cx.equals(x, y)))
}

/// Order-independent combination of item hashes.
fn set_hash<'v, T: MapType + 'v>(items: impl Iterator<Item = &'v T>, cx: &Context<'_>) -> u64 {
    items.fold(0_u64, |sum, item| sum.wrapping_add(cx.hash(item)))
}

// -----------------------------------------------------------------------------
// HashSet

/// `HashSet<T>` as a sequence. Duplicates in the input keep the first one.
pub struct HashSetConverter<T>(PhantomData<fn() -> T>);

impl<T> HashSetConverter<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: MapType + Eq + Hash> TypedConverter<HashSet<T>> for HashSetConverter<T> {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<HashSet<T>> {
        let items = decode_items::<T>(value, HashSet::<T>::type_info(), cx)?;
        Ok(dedup(items, cx).into_iter().collect())
    }

    fn encode(&self, value: &HashSet<T>, cx: &Context<'_>) -> MapResult<Value> {
        encode_items(value, cx)
    }

    fn equals(&self, a: &HashSet<T>, b: &HashSet<T>, cx: &Context<'_>) -> bool {
        set_equals(a.iter(), b.iter(), cx)
    }

    fn hash(&self, value: &HashSet<T>, cx: &Context<'_>) -> u64 {
        set_hash(value.iter(), cx)
    }

    fn stringify(&self, value: &HashSet<T>, cx: &Context<'_>) -> String {
        join('{', value.iter().map(|item| cx.stringify(item)), '}')
    }
}

impl<T: MapType + Eq + Hash> MapType for HashSet<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::generic::<Self>("Set", TypeKind::Set, &[T::type_info()])
        })
    }

    fn fallback_meta() -> Option<&'static TypeMeta> {
        generic_fallback!(Self)
    }
}

impl<T: MapType + Eq + Hash> GetTypeMeta for HashSet<T> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new::<Self>(HashSetConverter::<T>::new())
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register_fallback::<T>();
    }
}

// -----------------------------------------------------------------------------
// BTreeSet

/// `BTreeSet<T>` as a sequence in sorted order.
pub struct BTreeSetConverter<T>(PhantomData<fn() -> T>);

impl<T> BTreeSetConverter<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: MapType + Ord> TypedConverter<BTreeSet<T>> for BTreeSetConverter<T> {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<BTreeSet<T>> {
        let items = decode_items::<T>(value, BTreeSet::<T>::type_info(), cx)?;
        Ok(dedup(items, cx).into_iter().collect())
    }

    fn encode(&self, value: &BTreeSet<T>, cx: &Context<'_>) -> MapResult<Value> {
        encode_items(value, cx)
    }

    fn equals(&self, a: &BTreeSet<T>, b: &BTreeSet<T>, cx: &Context<'_>) -> bool {
        set_equals(a.iter(), b.iter(), cx)
    }

    fn hash(&self, value: &BTreeSet<T>, cx: &Context<'_>) -> u64 {
        set_hash(value.iter(), cx)
    }

    fn stringify(&self, value: &BTreeSet<T>, cx: &Context<'_>) -> String {
        join('{', value.iter().map(|item| cx.stringify(item)), '}')
    }
}

impl<T: MapType + Ord> MapType for BTreeSet<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::generic::<Self>("SortedSet", TypeKind::Set, &[T::type_info()])
        })
    }

    fn fallback_meta() -> Option<&'static TypeMeta> {
        generic_fallback!(Self)
    }
}

impl<T: MapType + Ord> GetTypeMeta for BTreeSet<T> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new::<Self>(BTreeSetConverter::<T>::new())
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register_fallback::<T>();
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use mc_utils::hash::HashSet;

    use super::dedup;
    use crate::{Mapper, Value};

    #[test]
    fn first_occurrence_wins() {
        let mapper = Mapper::new();
        // `0.0` and `-0.0` are equal, the first one is kept.
        let kept: Vec<f64> =
            mapper.with_context(|cx| dedup(vec![-0.0, 1.0, 0.0, 1.0, 2.0], cx));
        assert_eq!(kept.len(), 3);
        assert!(kept[0].is_sign_negative());
    }

    #[test]
    fn sets_drop_duplicates() {
        let mapper = Mapper::new();
        let value = Value::List(vec![
            Value::from("a"),
            Value::from("b"),
            Value::from("a"),
        ]);

        let set = mapper.decode::<HashSet<String>>(&value).unwrap();
        assert_eq!(set.len(), 2);

        let sorted = mapper.decode::<BTreeSet<i64>>(&Value::List(vec![
            Value::Int(3),
            Value::Int(1),
            Value::Int(3),
        ]))
        .unwrap();
        assert_eq!(sorted.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn equality_ignores_order() {
        let mapper = Mapper::new();
        let a: HashSet<i64> = [1, 2, 3].into_iter().collect();
        let b: HashSet<i64> = [3, 2, 1].into_iter().collect();
        let c: HashSet<i64> = [1, 2].into_iter().collect();

        assert!(mapper.equals(&a, &b));
        assert_eq!(mapper.hash(&a), mapper.hash(&b));
        assert!(!mapper.equals(&a, &c));
    }
}
