use alloc::string::String;
use core::hash::{BuildHasher, Hasher};
use core::marker::PhantomData;

use mc_utils::hash::FixedHashState;

use crate::convert::{Context, TypedConverter};
use crate::error::MapResult;
use crate::impls::generic_fallback;
use crate::info::{GenericTypeInfoCell, TypeInfo, TypeKind};
use crate::mappable::MapType;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::value::Value;

/// `Option<T>`: null is `None`, anything else decodes as `T`.
pub struct OptionConverter<T>(PhantomData<fn() -> T>);

impl<T> OptionConverter<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: MapType> TypedConverter<Option<T>> for OptionConverter<T> {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Option<T>> {
        match value {
            Value::Null => Ok(None),
            value => cx.decode(value).map(Some),
        }
    }

    fn encode(&self, value: &Option<T>, cx: &Context<'_>) -> MapResult<Value> {
        match value {
            None => Ok(Value::Null),
            Some(inner) => cx.encode(inner),
        }
    }

    fn equals(&self, a: &Option<T>, b: &Option<T>, cx: &Context<'_>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => cx.equals(a, b),
            _ => false,
        }
    }

    fn hash(&self, value: &Option<T>, cx: &Context<'_>) -> u64 {
        let mut hasher = FixedHashState.build_hasher();
        match value {
            None => hasher.write_u8(0),
            Some(inner) => {
                hasher.write_u8(1);
                hasher.write_u64(cx.hash(inner));
            }
        }
        hasher.finish()
    }

    fn stringify(&self, value: &Option<T>, cx: &Context<'_>) -> String {
        match value {
            None => String::from("null"),
            Some(inner) => cx.stringify(inner),
        }
    }
}

impl<T: MapType> MapType for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::generic::<Self>("Option", TypeKind::Option, &[T::type_info()])
        })
    }

    fn fallback_meta() -> Option<&'static TypeMeta> {
        generic_fallback!(Self)
    }
}

impl<T: MapType> GetTypeMeta for Option<T> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new::<Self>(OptionConverter::<T>::new())
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register_fallback::<T>();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::{MapError, Mapper, Mapping, Value};

    #[test]
    fn null_is_none() {
        let mapper = Mapper::new();
        assert_eq!(mapper.decode::<Option<i64>>(&Value::Null).unwrap(), None);
        assert_eq!(mapper.decode::<Option<i64>>(&Value::Int(3)).unwrap(), Some(3));
        assert_eq!(mapper.encode(&None::<String>).unwrap(), Value::Null);
        assert_ne!(mapper.hash(&None::<i64>), mapper.hash(&Some(0_i64)));
    }

    #[test]
    fn absent_field_is_none() {
        let mapper = Mapper::new();
        let map = Mapping::new();
        let found: Option<String> = mapper
            .with_context(|cx| cx.field::<Option<String>>(&map, "email"))
            .unwrap();
        assert_eq!(found, None);

        let err = mapper
            .with_context(|cx| cx.field::<String>(&map, "email"))
            .unwrap_err();
        assert!(matches!(err, MapError::MissingField { .. }));
    }
}
