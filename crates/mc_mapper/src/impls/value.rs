use alloc::string::{String, ToString};

use crate::convert::{Context, TypeFactory, TypedConverter};
use crate::error::{MapError, MapResult};
use crate::impls::static_fallback;
use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind};
use crate::mappable::MapType;
use crate::registry::{GetTypeMeta, TypeMeta};
use crate::value::{Mapping, Value};

// -----------------------------------------------------------------------------
// Value

/// The encoded form as a field type, passed through untouched.
pub struct ValueConverter;

impl TypedConverter<Value> for ValueConverter {
    fn decode(&self, value: &Value, _cx: &Context<'_>) -> MapResult<Value> {
        Ok(value.clone())
    }

    fn encode(&self, value: &Value, _cx: &Context<'_>) -> MapResult<Value> {
        Ok(value.clone())
    }

    fn equals(&self, a: &Value, b: &Value, _cx: &Context<'_>) -> bool {
        a == b
    }

    fn hash(&self, value: &Value, _cx: &Context<'_>) -> u64 {
        value.stable_hash()
    }

    fn stringify(&self, value: &Value, _cx: &Context<'_>) -> String {
        value.to_string()
    }
}

impl MapType for Value {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::new::<Value>("Value", TypeKind::Encoded))
    }

    fn fallback_meta() -> Option<&'static TypeMeta> {
        static_fallback!(Value)
    }
}

impl GetTypeMeta for Value {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new::<Value>(ValueConverter).with_factory(TypeFactory::of::<Value>())
    }
}

// -----------------------------------------------------------------------------
// Mapping

/// A mapping field kept in encoded form.
pub struct MappingConverter;

impl TypedConverter<Mapping> for MappingConverter {
    fn decode(&self, value: &Value, _cx: &Context<'_>) -> MapResult<Mapping> {
        value
            .as_map()
            .cloned()
            .ok_or_else(|| MapError::mismatch("Mapping", value.shape()))
    }

    fn encode(&self, value: &Mapping, _cx: &Context<'_>) -> MapResult<Value> {
        Ok(Value::Map(value.clone()))
    }

    fn equals(&self, a: &Mapping, b: &Mapping, _cx: &Context<'_>) -> bool {
        a == b
    }
}

impl MapType for Mapping {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::new::<Mapping>("Mapping", TypeKind::Encoded))
    }

    fn fallback_meta() -> Option<&'static TypeMeta> {
        static_fallback!(Mapping)
    }
}

impl GetTypeMeta for Mapping {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::new::<Mapping>(MappingConverter).with_factory(TypeFactory::of::<Mapping>())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use crate::{MapError, Mapper, Mapping, Value};

    #[test]
    fn passed_through() {
        let mapper = Mapper::new();
        let raw = Value::List(vec![Value::Null, Value::Float(1.5)]);
        assert_eq!(mapper.decode::<Value>(&raw).unwrap(), raw);
        assert_eq!(mapper.encode(&raw).unwrap(), raw);
        assert_eq!(mapper.as_string(&raw), "[null,1.5]");

        let mut extra = Mapping::new();
        extra.insert("nickname", "Jude");
        let decoded = mapper.decode::<Mapping>(&Value::Map(extra.clone())).unwrap();
        assert_eq!(decoded, extra);

        let err = mapper.decode::<Mapping>(&Value::Int(1)).unwrap_err();
        assert!(matches!(err, MapError::TypeMismatch { .. }));
    }
}
