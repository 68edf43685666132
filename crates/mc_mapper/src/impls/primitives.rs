use alloc::string::{String, ToString};
use core::marker::PhantomData;

use mc_utils::hash::hash_one;

use crate::convert::{Context, TypeFactory, TypedConverter};
use crate::error::{MapError, MapResult};
use crate::impls::static_fallback;
use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind};
use crate::mappable::MapType;
use crate::registry::{GetTypeMeta, TypeMeta};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Scalar

/// A type encoded as a single scalar [`Value`].
pub trait Scalar: MapType + PartialEq {
    /// `None` if the value has the wrong shape or is out of range.
    fn from_value(value: &Value) -> Option<Self>;

    fn to_value(&self) -> MapResult<Value>;

    /// Must agree with `==`.
    fn scalar_hash(&self) -> u64;

    fn scalar_string(&self) -> String;
}

/// [`TypedConverter`] for any [`Scalar`].
pub struct ScalarConverter<T>(PhantomData<fn() -> T>);

impl<T> ScalarConverter<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for ScalarConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> TypedConverter<T> for ScalarConverter<T> {
    fn decode(&self, value: &Value, _: &Context<'_>) -> MapResult<T> {
        T::from_value(value).ok_or_else(|| mismatch::<T>(value))
    }

    fn encode(&self, value: &T, _: &Context<'_>) -> MapResult<Value> {
        value.to_value()
    }

    fn equals(&self, a: &T, b: &T, _: &Context<'_>) -> bool {
        a == b
    }

    fn hash(&self, value: &T, _: &Context<'_>) -> u64 {
        value.scalar_hash()
    }

    fn stringify(&self, value: &T, _: &Context<'_>) -> String {
        value.scalar_string()
    }
}

fn mismatch<T: MapType>(value: &Value) -> MapError {
    match value {
        // Integers out of range report the value, not just the shape.
        Value::Int(i) => MapError::mismatch(T::type_info().name(), alloc::format!("integer {i}")),
        _ => MapError::mismatch(T::type_info().name(), value.shape()),
    }
}

// -----------------------------------------------------------------------------
// MapType

macro_rules! impl_scalar_type {
    ($ty:ty, $name:expr, $factory:ident) => {
        impl MapType for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::new::<$ty>($name, TypeKind::Primitive))
            }

            fn fallback_meta() -> Option<&'static TypeMeta> {
                static_fallback!($ty)
            }
        }

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                TypeMeta::new::<$ty>(ScalarConverter::<$ty>::new())
                    .with_factory(TypeFactory::$factory::<$ty>())
            }
        }
    };
}

macro_rules! impl_int {
    ($($ty:ty),*) => {$(
        impl_scalar_type!($ty, stringify!($ty), hashable);

        impl Scalar for $ty {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Int(i) => <$ty>::try_from(*i).ok(),
                    _ => None,
                }
            }

            fn to_value(&self) -> MapResult<Value> {
                i64::try_from(*self)
                    .map(Value::Int)
                    .map_err(|_| MapError::mismatch("integer within i64", self.to_string()))
            }

            fn scalar_hash(&self) -> u64 {
                hash_one(self)
            }

            fn scalar_string(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

impl_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($($ty:ty),*) => {$(
        impl_scalar_type!($ty, stringify!($ty), of);

        impl Scalar for $ty {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Int(i) => Some(*i as $ty),
                    Value::Float(f) => Some(*f as $ty),
                    _ => None,
                }
            }

            fn to_value(&self) -> MapResult<Value> {
                Ok(Value::Float(f64::from(*self)))
            }

            fn scalar_hash(&self) -> u64 {
                // `0.0 == -0.0`, so both hash as `0.0`.
                let normalized: $ty = if *self == 0.0 { 0.0 } else { *self };
                hash_one(&normalized.to_bits())
            }

            fn scalar_string(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

impl_float!(f32, f64);

impl_scalar_type!(bool, "bool", hashable);

impl Scalar for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_value(&self) -> MapResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn scalar_hash(&self) -> u64 {
        hash_one(self)
    }

    fn scalar_string(&self) -> String {
        self.to_string()
    }
}

impl_scalar_type!(char, "char", hashable);

impl Scalar for char {
    fn from_value(value: &Value) -> Option<Self> {
        let mut chars = value.as_str()?.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    fn to_value(&self) -> MapResult<Value> {
        Ok(Value::String(self.to_string()))
    }

    fn scalar_hash(&self) -> u64 {
        hash_one(self)
    }

    fn scalar_string(&self) -> String {
        self.to_string()
    }
}

impl_scalar_type!(String, "String", hashable);

impl Scalar for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(String::from)
    }

    fn to_value(&self) -> MapResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn scalar_hash(&self) -> u64 {
        hash_one(self.as_str())
    }

    fn scalar_string(&self) -> String {
        self.clone()
    }
}

impl_scalar_type!((), "()", hashable);

impl Scalar for () {
    fn from_value(value: &Value) -> Option<Self> {
        value.is_null().then_some(())
    }

    fn to_value(&self) -> MapResult<Value> {
        Ok(Value::Null)
    }

    fn scalar_hash(&self) -> u64 {
        0
    }

    fn scalar_string(&self) -> String {
        String::from("null")
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use crate::{MapError, Mapper, Value};

    #[test]
    fn integers_check_range() {
        let mapper = Mapper::new();
        assert_eq!(mapper.decode::<u8>(&Value::Int(255)).unwrap(), 255);

        let err = mapper.decode::<u8>(&Value::Int(256)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type mismatch at $: expected u8, found integer 256",
        );
        assert!(mapper.decode::<u32>(&Value::Int(-1)).is_err());
        assert!(mapper.encode(&u64::MAX).is_err());
        assert_eq!(mapper.encode(&(i64::MAX as u64)).unwrap(), Value::Int(i64::MAX));
    }

    #[test]
    fn floats_accept_integers() {
        let mapper = Mapper::new();
        assert_eq!(mapper.decode::<f64>(&Value::Int(3)).unwrap(), 3.0);
        assert_eq!(mapper.encode(&1.5_f32).unwrap(), Value::Float(1.5));
        assert_eq!(mapper.hash(&0.0_f64), mapper.hash(&-0.0_f64));
        assert!(mapper.equals(&0.0_f64, &-0.0_f64));
    }

    #[test]
    fn shapes_must_match() {
        let mapper = Mapper::new();
        let err = mapper.decode::<String>(&Value::Int(1)).unwrap_err();
        assert!(matches!(err, MapError::TypeMismatch { .. }));
        assert!(mapper.decode::<bool>(&Value::from("true")).is_err());
        assert!(mapper.decode::<char>(&Value::from("ab")).is_err());
        assert_eq!(mapper.decode::<char>(&Value::from("a")).unwrap(), 'a');
        mapper.decode::<()>(&Value::Null).unwrap();
    }

    #[test]
    fn stringify_is_plain() {
        let mapper = Mapper::new();
        assert_eq!(mapper.as_string(&String::from("Judy")), "Judy");
        assert_eq!(mapper.as_string(&7_u16), "7");
        assert_eq!(mapper.as_string(&true), "true");
    }
}
