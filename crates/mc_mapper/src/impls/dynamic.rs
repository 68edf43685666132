use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;

use log::trace;

use crate::convert::{Context, Converter, TypeFactory};
use crate::error::{MapError, MapResult};
use crate::impls::static_fallback;
use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind};
use crate::mappable::{Dynamic, MapType, Mappable};
use crate::registry::{GetTypeMeta, TypeMeta};
use crate::value::Value;

/// Converter of the open type [`Dynamic`].
///
/// Decoding a mapping that carries the type marker goes through the named
/// type. Inside a generic value whose own marker fills this slot, see
/// [`Context::decode`], the slot decodes as that argument. Anything else
/// decodes untyped:
///
/// | Encoded   | Decoded                      |
/// |-----------|------------------------------|
/// | null      | `()`                         |
/// | boolean   | `bool`                       |
/// | integer   | `i64`                        |
/// | float     | `f64`                        |
/// | string    | `String`                     |
/// | sequence  | `Vec<Dynamic>`               |
/// | mapping   | `BTreeMap<String, Dynamic>`  |
///
/// Encoding goes through the entry of the held value's runtime type, which
/// adds the type marker under [`TypeMarkerPolicy::Auto`](crate::TypeMarkerPolicy::Auto).
pub struct DynamicConverter;

impl DynamicConverter {
    fn held(value: &dyn Mappable) -> MapResult<&dyn Mappable> {
        match value.downcast_ref::<Dynamic>() {
            Some(held) => Ok(&**held),
            None => Err(MapError::mismatch("Dynamic", value.rust_type_name())),
        }
    }

    fn decode_untyped(value: &Value, cx: &Context<'_>) -> MapResult<Dynamic> {
        Ok(match value {
            Value::Null => Box::new(()),
            Value::Bool(b) => Box::new(*b),
            Value::Int(i) => Box::new(*i),
            Value::Float(f) => Box::new(*f),
            Value::String(s) => Box::new(s.clone()),
            Value::List(_) => Box::new(cx.decode::<Vec<Dynamic>>(value)?),
            Value::Map(_) => Box::new(cx.decode::<BTreeMap<String, Dynamic>>(value)?),
        })
    }
}

impl Converter for DynamicConverter {
    fn type_info(&self) -> &'static TypeInfo {
        Dynamic::type_info()
    }

    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Dynamic> {
        if let Value::Map(map) = value
            && let Some(marker) = cx.marker(map)
        {
            let meta = cx.registry().resolve_name(marker)?;
            if meta.info().kind() != TypeKind::Dynamic {
                trace!("type marker `{marker}` selects `{}`", meta.name());
                let held = cx.decode_marked(meta, value)?;
                return Ok(Box::new(held));
            }
        }
        if let Some(meta) = cx.open_arg() {
            trace!("open slot decodes as `{}`", meta.name());
            let held = cx.in_open_slot().decode_marked(meta, value)?;
            return Ok(Box::new(held));
        }
        let held = Self::decode_untyped(value, &cx.in_open_slot())?;
        Ok(Box::new(held))
    }

    fn encode(&self, value: &dyn Mappable, cx: &Context<'_>) -> MapResult<Value> {
        let held = Self::held(value)?;
        let meta = cx.meta_by_id(held.ty_id(), held.rust_type_name())?;
        cx.encode_as(TypeId::of::<Dynamic>(), meta, held)
    }

    fn equals(&self, a: &dyn Mappable, b: &dyn Mappable, cx: &Context<'_>) -> bool {
        match (Self::held(a), Self::held(b)) {
            (Ok(a), Ok(b)) => cx.equals_dynamic(a, b),
            _ => false,
        }
    }

    fn hash(&self, value: &dyn Mappable, cx: &Context<'_>) -> u64 {
        Self::held(value)
            .map(|held| cx.hash_dynamic(held))
            .unwrap_or_default()
    }

    fn stringify(&self, value: &dyn Mappable, cx: &Context<'_>) -> String {
        match Self::held(value) {
            Ok(held) => cx.stringify_dynamic(held),
            Err(_) => value.rust_type_name().into(),
        }
    }
}

impl MapType for Dynamic {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::new::<Dynamic>("Dynamic", TypeKind::Dynamic))
    }

    fn fallback_meta() -> Option<&'static TypeMeta> {
        static_fallback!(Dynamic)
    }
}

impl GetTypeMeta for Dynamic {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::from_converter(alloc::sync::Arc::new(DynamicConverter))
            .with_factory(TypeFactory::of::<Dynamic>())
    }
}
