use alloc::string::String;
use alloc::sync::Arc;
use core::marker::PhantomData;

use crate::convert::{Context, TypedConverter};
use crate::error::MapResult;
use crate::impls::generic_fallback;
use crate::info::{GenericTypeInfoCell, TypeInfo, TypeKind};
use crate::mappable::MapType;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::value::Value;

/// `Arc<T>`, encoded as `T`.
///
/// Two handles are equal when they share the allocation or their pointees
/// are equal.
pub struct ArcConverter<T>(PhantomData<fn() -> T>);

impl<T> ArcConverter<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: MapType> TypedConverter<Arc<T>> for ArcConverter<T> {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Arc<T>> {
        cx.decode::<T>(value).map(Arc::new)
    }

    fn encode(&self, value: &Arc<T>, cx: &Context<'_>) -> MapResult<Value> {
        cx.encode::<T>(value)
    }

    fn equals(&self, a: &Arc<T>, b: &Arc<T>, cx: &Context<'_>) -> bool {
        Arc::ptr_eq(a, b) || cx.equals::<T>(a, b)
    }

    fn hash(&self, value: &Arc<T>, cx: &Context<'_>) -> u64 {
        cx.hash::<T>(value)
    }

    fn stringify(&self, value: &Arc<T>, cx: &Context<'_>) -> String {
        cx.stringify::<T>(value)
    }
}

impl<T: MapType> MapType for Arc<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::generic::<Self>("Arc", TypeKind::Pointer, &[T::type_info()])
        })
    }

    fn fallback_meta() -> Option<&'static TypeMeta> {
        generic_fallback!(Self)
    }
}

impl<T: MapType> GetTypeMeta for Arc<T> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new::<Self>(ArcConverter::<T>::new())
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register_fallback::<T>();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;

    use crate::{Mapper, Value};

    #[test]
    fn transparent_pointer() {
        let mapper = Mapper::new();
        let name = Arc::new(String::from("Judy"));

        assert_eq!(mapper.encode(&name).unwrap(), Value::from("Judy"));
        let decoded = mapper.decode::<Arc<String>>(&Value::from("Judy")).unwrap();
        assert!(!Arc::ptr_eq(&decoded, &name));
        assert!(mapper.equals(&decoded, &name));
        assert_eq!(mapper.hash(&decoded), mapper.hash(&name));
        assert_eq!(<Arc<String> as crate::MapType>::type_info().name(), "Arc<String>");
    }
}
