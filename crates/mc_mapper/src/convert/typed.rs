use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::marker::PhantomData;

use crate::convert::{ClassInfo, Context, Converter};
use crate::error::{MapError, MapResult};
use crate::info::TypeInfo;
use crate::mappable::{Dynamic, MapType, Mappable};
use crate::value::Value;

// -----------------------------------------------------------------------------
// TypedConverter

/// A converter written against a concrete type.
///
/// Only [`decode`](TypedConverter::decode) and [`encode`](TypedConverter::encode)
/// are required. The defaults for equality, hashing and stringify go through
/// the encoded form, so two values are equal when they encode equally.
///
/// # Examples
///
/// ```
/// use mc_mapper::convert::{Context, TypedConverter};
/// use mc_mapper::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind};
/// use mc_mapper::{MapResult, MapType, Mapper, Mapping, Value};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl MapType for Point {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::new::<Point>("Point", TypeKind::Class))
///     }
/// }
///
/// struct PointConverter;
///
/// impl TypedConverter<Point> for PointConverter {
///     fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Point> {
///         let map = cx.expect_map(value)?;
///         Ok(Point { x: cx.field(map, "x")?, y: cx.field(map, "y")? })
///     }
///
///     fn encode(&self, value: &Point, cx: &Context<'_>) -> MapResult<Value> {
///         let mut map = Mapping::new();
///         cx.put(&mut map, "x", &value.x)?;
///         cx.put(&mut map, "y", &value.y)?;
///         Ok(Value::Map(map))
///     }
/// }
///
/// let mapper = Mapper::new();
/// mapper.use_converter::<Point>(PointConverter);
///
/// let point = Point { x: 1, y: 2 };
/// let text = mapper.encode_to_text(&point).unwrap();
/// assert_eq!(text, r#"{"x":1,"y":2}"#);
/// assert_eq!(mapper.decode_from_text::<Point>(&text).unwrap(), point);
/// ```
pub trait TypedConverter<T: MapType>: Send + Sync + 'static {
    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<T>;

    fn encode(&self, value: &T, cx: &Context<'_>) -> MapResult<Value>;

    fn equals(&self, a: &T, b: &T, cx: &Context<'_>) -> bool {
        match (self.encode(a, cx), self.encode(b, cx)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn hash(&self, value: &T, cx: &Context<'_>) -> u64 {
        match self.encode(value, cx) {
            Ok(encoded) => encoded.stable_hash(),
            Err(_) => 0,
        }
    }

    fn stringify(&self, value: &T, cx: &Context<'_>) -> String {
        match self.encode(value, cx) {
            Ok(Value::String(s)) => s,
            Ok(encoded) => encoded.to_string(),
            Err(_) => T::type_info().name().into(),
        }
    }

    fn class_info(&self) -> Option<&ClassInfo> {
        None
    }
}

// -----------------------------------------------------------------------------
// Erased

/// Adapts a [`TypedConverter`] into an object-safe [`Converter`].
pub struct Erased<T, C> {
    inner: C,
    marker: PhantomData<fn() -> T>,
}

impl<T: MapType, C: TypedConverter<T>> Erased<T, C> {
    #[inline]
    pub const fn new(inner: C) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }

    #[inline]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn downcast(value: &dyn Mappable) -> MapResult<&T> {
        value
            .downcast_ref::<T>()
            .ok_or_else(|| MapError::mismatch(T::type_info().name(), value.rust_type_name()))
    }
}

impl<T: MapType, C: TypedConverter<T>> Converter for Erased<T, C> {
    #[inline]
    fn type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }

    fn decode(&self, value: &Value, cx: &Context<'_>) -> MapResult<Dynamic> {
        let decoded = self.inner.decode(value, cx)?;
        Ok(Box::new(decoded))
    }

    fn encode(&self, value: &dyn Mappable, cx: &Context<'_>) -> MapResult<Value> {
        self.inner.encode(Self::downcast(value)?, cx)
    }

    fn equals(&self, a: &dyn Mappable, b: &dyn Mappable, cx: &Context<'_>) -> bool {
        match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
            (Some(a), Some(b)) => self.inner.equals(a, b, cx),
            _ => false,
        }
    }

    fn hash(&self, value: &dyn Mappable, cx: &Context<'_>) -> u64 {
        match value.downcast_ref::<T>() {
            Some(value) => self.inner.hash(value, cx),
            None => 0,
        }
    }

    fn stringify(&self, value: &dyn Mappable, cx: &Context<'_>) -> String {
        match value.downcast_ref::<T>() {
            Some(value) => self.inner.stringify(value, cx),
            None => value.rust_type_name().into(),
        }
    }

    #[inline]
    fn class_info(&self) -> Option<&ClassInfo> {
        self.inner.class_info()
    }
}
