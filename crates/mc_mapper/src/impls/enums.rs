use alloc::format;
use alloc::vec::Vec;

use crate::convert::{Context, TypedConverter};
use crate::error::{MapError, MapResult};
use crate::mappable::MapType;
use crate::value::Value;

/// Unit-like enum encoded as one scalar per variant.
///
/// Decoding an unknown scalar takes the default variant if one is set and
/// fails with [`MapError::TypeMismatch`] otherwise.
///
/// # Examples
///
/// ```
/// use mc_mapper::impls::EnumConverter;
/// use mc_mapper::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind};
/// use mc_mapper::{MapType, Mapper, Value};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Color {
///     Black,
///     White,
///     Unknown,
/// }
///
/// impl MapType for Color {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::new::<Color>("Color", TypeKind::Enum))
///     }
/// }
///
/// let mapper = Mapper::new();
/// mapper.use_converter::<Color>(
///     EnumConverter::new()
///         .variant(Color::Black, "Black")
///         .variant(Color::White, "White")
///         .with_default(Color::Unknown),
/// );
///
/// assert_eq!(mapper.encode(&Color::White).unwrap(), Value::from("White"));
/// assert_eq!(mapper.decode::<Color>(&Value::from("Grey")).unwrap(), Color::Unknown);
/// assert!(mapper.encode(&Color::Unknown).is_err());
/// ```
pub struct EnumConverter<T> {
    variants: Vec<(T, Value)>,
    default: Option<T>,
}

impl<T: MapType + PartialEq> EnumConverter<T> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            variants: Vec::new(),
            default: None,
        }
    }

    /// Maps `variant` to `encoded`. A later mapping of the same variant or
    /// scalar does not override an earlier one.
    pub fn variant(mut self, variant: T, encoded: impl Into<Value>) -> Self {
        self.variants.push((variant, encoded.into()));
        self
    }

    /// Variant decoded from scalars that match no mapping.
    pub fn with_default(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }
}

impl<T: MapType + PartialEq> Default for EnumConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MapType + PartialEq> TypedConverter<T> for EnumConverter<T> {
    fn decode(&self, value: &Value, _cx: &Context<'_>) -> MapResult<T> {
        let found = self
            .variants
            .iter()
            .find(|(_, encoded)| encoded == value)
            .map(|(variant, _)| variant)
            .or(self.default.as_ref());
        match found {
            Some(variant) => Ok(variant.clone()),
            None => Err(MapError::mismatch(T::type_info().name(), format!("{value}"))),
        }
    }

    fn encode(&self, value: &T, _cx: &Context<'_>) -> MapResult<Value> {
        self.variants
            .iter()
            .find(|(variant, _)| variant == value)
            .map(|(_, encoded)| encoded.clone())
            .ok_or_else(|| MapError::mismatch(T::type_info().name(), "unmapped variant"))
    }

    fn equals(&self, a: &T, b: &T, _cx: &Context<'_>) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::EnumConverter;
    use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind};
    use crate::{MapType, Mapper, Value};

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Level {
        Low,
        High,
    }

    impl MapType for Level {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::new::<Level>("Level", TypeKind::Enum))
        }
    }

    #[test]
    fn integer_variants() {
        let mapper = Mapper::new();
        mapper.use_converter::<Level>(
            EnumConverter::new()
                .variant(Level::Low, 0_i64)
                .variant(Level::High, 1_i64),
        );

        assert_eq!(mapper.encode(&Level::High).unwrap(), Value::Int(1));
        assert_eq!(mapper.decode::<Level>(&Value::Int(0)).unwrap(), Level::Low);
        assert_eq!(mapper.as_string(&Level::High), "1");

        let err = mapper.decode::<Level>(&Value::Int(2)).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch at $: expected Level, found 2");
    }
}
