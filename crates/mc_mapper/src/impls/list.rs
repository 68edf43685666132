use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hasher};
use core::marker::PhantomData;

use mc_utils::hash::FixedHashState;

use crate::convert::{Context, TypedConverter};
use crate::error::{MapError, MapResult};
use crate::impls::{generic_fallback, join};
use crate::info::{GenericTypeInfoCell, TypeInfo, TypeKind};
use crate::mappable::MapType;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::value::Value;

/// `Vec<T>` as a sequence, element by element.
pub struct ListConverter<T>(PhantomData<fn() -> T>);

impl<T> ListConverter<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

/// Decodes every item of a sequence as `T`, tagging errors with the index.
pub(crate) fn decode_items<T: MapType>(
    value: &Value,
    expected: &'static TypeInfo,
    cx: &Context<'_>,
) -> MapResult<Vec<T>> {
    let items = value
        .as_list()
        .ok_or_else(|| MapError::mismatch(expected.name(), value.shape()))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| cx.decode::<T>(item).map_err(|e| e.at_index(i)))
        .collect()
}

/// Encodes every item, tagging errors with the index.
pub(crate) fn encode_items<'v, T: MapType>(
    items: impl IntoIterator<Item = &'v T>,
    cx: &Context<'_>,
) -> MapResult<Value> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| cx.encode(item).map_err(|e| e.at_index(i)))
        .collect::<MapResult<Vec<_>>>()
        .map(Value::List)
}

impl<T: MapType> TypedConverter<Vec<T>> for ListConverter<T> {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Vec<T>> {
        decode_items(value, Vec::<T>::type_info(), cx)
    }

    fn encode(&self, value: &Vec<T>, cx: &Context<'_>) -> MapResult<Value> {
        encode_items(value, cx)
    }

    fn equals(&self, a: &Vec<T>, b: &Vec<T>, cx: &Context<'_>) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(a, b)| cx.equals(a, b))
    }

    fn hash(&self, value: &Vec<T>, cx: &Context<'_>) -> u64 {
        let mut hasher = FixedHashState.build_hasher();
        hasher.write_usize(value.len());
        for item in value {
            hasher.write_u64(cx.hash(item));
        }
        hasher.finish()
    }

    fn stringify(&self, value: &Vec<T>, cx: &Context<'_>) -> String {
        join('[', value.iter().map(|item| cx.stringify(item)), ']')
    }
}

impl<T: MapType> MapType for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::generic::<Self>("List", TypeKind::List, &[T::type_info()])
        })
    }

    fn fallback_meta() -> Option<&'static TypeMeta> {
        generic_fallback!(Self)
    }
}

impl<T: MapType> GetTypeMeta for Vec<T> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new::<Self>(ListConverter::<T>::new())
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register_fallback::<T>();
    }
}
